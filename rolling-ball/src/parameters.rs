//! Defines the options which control the window sizes and the strategy used to compute a baseline.
use crate::{InvalidInput, Real, Stage};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Fraction of the spectrum length used for the minimization/maximization radius when none is given.
pub const MINMAX_WINDOW_FRACTION: Real = 0.04;

/// Fraction of the spectrum length used for the smoothing radius by [Strategy::Windowed].
pub const WINDOWED_SMOOTHING_FRACTION: Real = 0.08;

/// Fraction of the spectrum length used for the smoothing radius by [Strategy::Incremental].
pub const INCREMENTAL_SMOOTHING_FRACTION: Real = 0.04;

/// Rounds `len * fraction` half away from zero.
fn fraction_of_length(len: usize, fraction: Real) -> usize {
    (len as Real * fraction).round() as usize
}

/// Selects the algorithm used for the three stages.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Scans the whole window at every position. Simple and slow, used as a reference.
    Windowed,
    /// Reuses the previous window's extremum or sum wherever possible.
    #[default]
    Incremental,
}

impl Strategy {
    /// The window radii used by this strategy when the caller specifies neither.
    ///
    /// The two strategies disagree on the smoothing radius, 8% and 4% of the length respectively.
    pub fn default_windows(self, len: usize) -> Windows {
        let smoothing_fraction = match self {
            Self::Windowed => WINDOWED_SMOOTHING_FRACTION,
            Self::Incremental => INCREMENTAL_SMOOTHING_FRACTION,
        };
        Windows {
            minmax: fraction_of_length(len, MINMAX_WINDOW_FRACTION),
            smoothing: fraction_of_length(len, smoothing_fraction),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Windowed => "windowed",
            Self::Incremental => "incremental",
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Determines what happens when a window radius is not smaller than the spectrum length.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DegenerateWindowPolicy {
    /// Windows are clipped to the bounds of the spectrum, so every window covers the whole of it.
    #[default]
    Clamp,
    /// The spectrum is rejected with [InvalidInput::DegenerateWindow].
    Reject,
}

/// User supplied window radii, either of which may be left for the strategy to choose.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct WindowOptions {
    /// Radius of the minimization and maximization windows.
    pub window_m: Option<usize>,
    /// Radius of the smoothing window.
    pub window_s: Option<usize>,
}

impl WindowOptions {
    pub fn new(window_m: Option<usize>, window_s: Option<usize>) -> Self {
        Self { window_m, window_s }
    }
}

/// Concrete window radii, ready to be applied to a spectrum.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Windows {
    /// Radius used by both the minimization and the maximization stage.
    #[serde(rename = "window-m")]
    pub minmax: usize,
    /// Radius used by the smoothing stage.
    #[serde(rename = "window-s")]
    pub smoothing: usize,
}

impl Windows {
    pub fn new(minmax: usize, smoothing: usize) -> Self {
        Self { minmax, smoothing }
    }

    /// Fills in any radius missing from `options` with the strategy's default for a spectrum of length `len`.
    ///
    /// # Parameters
    /// - len: length of the spectrum the windows will be applied to.
    /// - options: radii supplied by the caller.
    /// - strategy: determines the default radii.
    /// - policy: whether radii not smaller than `len` are rejected or left to be clipped.
    pub fn resolve(
        len: usize,
        options: &WindowOptions,
        strategy: Strategy,
        policy: DegenerateWindowPolicy,
    ) -> Result<Self, InvalidInput> {
        if len == 0 {
            return Err(InvalidInput::EmptySequence);
        }
        let defaults = strategy.default_windows(len);
        let windows = Windows {
            minmax: options.window_m.unwrap_or(defaults.minmax),
            smoothing: options.window_s.unwrap_or(defaults.smoothing),
        };

        if policy == DegenerateWindowPolicy::Reject {
            for (stage, radius) in [
                (Stage::Minimize, windows.minmax),
                (Stage::Smooth, windows.smoothing),
            ] {
                if radius >= len {
                    return Err(InvalidInput::DegenerateWindow { stage, radius, len });
                }
            }
        }
        Ok(windows)
    }

    /// The radius applied by the given stage.
    pub fn radius(&self, stage: Stage) -> usize {
        match stage {
            Stage::Minimize | Stage::Maximize => self.minmax,
            Stage::Smooth => self.smoothing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_per_strategy() {
        assert_eq!(Strategy::Windowed.default_windows(1000), Windows::new(40, 80));
        assert_eq!(
            Strategy::Incremental.default_windows(1000),
            Windows::new(40, 40)
        );
    }

    #[test]
    fn defaults_round_half_away_from_zero() {
        // 0.04 * 38 = 1.52, 0.08 * 38 = 3.04
        assert_eq!(Strategy::Windowed.default_windows(38), Windows::new(2, 3));
        // 0.04 * 37 = 1.48
        assert_eq!(Strategy::Incremental.default_windows(37), Windows::new(1, 1));
        assert_eq!(Strategy::Windowed.default_windows(1), Windows::new(0, 0));
    }

    #[test]
    fn explicit_radii_override_defaults() {
        let windows = Windows::resolve(
            1000,
            &WindowOptions::new(Some(7), None),
            Strategy::Windowed,
            Default::default(),
        )
        .expect("valid windows");
        assert_eq!(windows, Windows::new(7, 80));

        let windows = Windows::resolve(
            1000,
            &WindowOptions::new(None, Some(3)),
            Strategy::Incremental,
            Default::default(),
        )
        .expect("valid windows");
        assert_eq!(windows, Windows::new(40, 3));
    }

    #[test]
    fn empty_spectrum_is_rejected() {
        assert_eq!(
            Windows::resolve(0, &Default::default(), Strategy::Incremental, Default::default()),
            Err(InvalidInput::EmptySequence)
        );
    }

    #[test]
    fn degenerate_windows_clamped() {
        let windows = Windows::resolve(
            5,
            &WindowOptions::new(Some(5), Some(50)),
            Strategy::Incremental,
            DegenerateWindowPolicy::Clamp,
        )
        .expect("clamped windows");
        assert_eq!(windows, Windows::new(5, 50));
    }

    #[test]
    fn degenerate_windows_rejected() {
        let policy = DegenerateWindowPolicy::Reject;
        assert_eq!(
            Windows::resolve(5, &WindowOptions::new(Some(5), Some(1)), Strategy::Windowed, policy),
            Err(InvalidInput::DegenerateWindow {
                stage: Stage::Minimize,
                radius: 5,
                len: 5
            })
        );
        assert_eq!(
            Windows::resolve(5, &WindowOptions::new(Some(2), Some(9)), Strategy::Windowed, policy),
            Err(InvalidInput::DegenerateWindow {
                stage: Stage::Smooth,
                radius: 9,
                len: 5
            })
        );
        assert!(
            Windows::resolve(5, &WindowOptions::new(Some(4), Some(4)), Strategy::Windowed, policy)
                .is_ok()
        );
    }

    #[test]
    fn options_from_json() {
        let options: WindowOptions =
            serde_json::from_str(r#"{ "window-m": 12 }"#).expect("valid options");
        assert_eq!(options, WindowOptions::new(Some(12), None));

        assert!(serde_json::from_str::<WindowOptions>(r#"{ "window_m": 12 }"#).is_err());

        let strategy: Strategy = serde_json::from_str(r#""windowed""#).expect("valid strategy");
        assert_eq!(strategy, Strategy::Windowed);

        assert_eq!(
            serde_json::to_string(&Windows::new(3, 4)).expect("serialisable windows"),
            r#"{"window-m":3,"window-s":4}"#
        );
    }
}

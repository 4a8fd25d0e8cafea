//! Defines the parameters used to select and configure the baseline strategy.
use clap::{Parser, Subcommand, ValueEnum};
use rolling_ball::{DegenerateWindowPolicy, RollingBall, Strategy, WindowOptions};
use std::{fs, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum WindowConfigError {
    #[error("Cannot read window config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed window config {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Determines how spectra are read and written.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    /// One sample per line. Lines may hold several comma or whitespace separated columns,
    /// `#` starts a comment.
    #[default]
    Lines,
    /// A JSON array of samples, or an array of such arrays for a batch of spectra.
    Json,
}

/// Determines what is written for each spectrum.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputKind {
    /// The baseline.
    #[default]
    Baseline,
    /// The spectrum with the baseline subtracted.
    Corrected,
    /// The minima, maxima and baseline, together with the radii used.
    Stages,
}

/// Encapsulates the window radii common to every strategy.
#[derive(Default, Debug, Clone, Parser)]
pub(crate) struct WindowParameters {
    /// Radius, in samples, of the minimization and maximization windows. Defaults to 4% of the spectrum length.
    #[clap(long)]
    pub(crate) window_m: Option<usize>,

    /// Radius, in samples, of the smoothing window. The default depends on the strategy.
    #[clap(long)]
    pub(crate) window_s: Option<usize>,

    /// JSON file containing `window-m` and/or `window-s`. Radii given on the command line take precedence.
    #[clap(long)]
    pub(crate) window_config: Option<PathBuf>,

    /// If set, spectra which are not longer than a window radius are rejected, rather than processed with clipped windows.
    #[clap(long)]
    pub(crate) reject_degenerate: bool,
}

impl WindowParameters {
    /// Merges the radii from the command line with those of the window config, if any.
    pub(crate) fn window_options(&self) -> Result<WindowOptions, WindowConfigError> {
        let from_file = match &self.window_config {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|source| WindowConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                serde_json::from_str(&text).map_err(|source| WindowConfigError::Json {
                    path: path.clone(),
                    source,
                })?
            }
            None => WindowOptions::default(),
        };
        Ok(WindowOptions::new(
            self.window_m.or(from_file.window_m),
            self.window_s.or(from_file.window_s),
        ))
    }

    fn degenerate_policy(&self) -> DegenerateWindowPolicy {
        if self.reject_degenerate {
            DegenerateWindowPolicy::Reject
        } else {
            DegenerateWindowPolicy::Clamp
        }
    }
}

/// Specifies which strategy is to be used, and wraps the window options in each variant.
#[derive(Subcommand, Debug)]
pub(crate) enum Mode {
    /// Scans every window directly. The smoothing radius defaults to 8% of the spectrum length.
    Windowed(WindowParameters),
    /// Reuses the previous window's extremum or sum. The smoothing radius defaults to 4% of the spectrum length.
    Incremental(WindowParameters),
}

impl Mode {
    /// Builds the engine described by the subcommand.
    pub(crate) fn engine(&self) -> Result<RollingBall, WindowConfigError> {
        let (strategy, parameters) = match self {
            Self::Windowed(parameters) => (Strategy::Windowed, parameters),
            Self::Incremental(parameters) => (Strategy::Incremental, parameters),
        };
        Ok(RollingBall::new(strategy)
            .with_options(parameters.window_options()?)
            .with_degenerate_policy(parameters.degenerate_policy()))
    }
}

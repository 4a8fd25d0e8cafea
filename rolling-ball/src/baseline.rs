//! Runs the three stages of the rolling ball over whole spectra.
use crate::{
    InvalidInput, Real, Stage,
    error::validate,
    parameters::{DegenerateWindowPolicy, Strategy, WindowOptions, Windows},
    stage::{Correction, Stages},
    window::{Direction, Reduction, SlidingExtremum, SlidingMean, SlidingWindow},
};
use metrics::counter;
use rayon::iter::{
    IndexedParallelIterator, IntoParallelIterator, IntoParallelRefIterator, ParallelIterator,
};
use rolling_ball_common::metrics::{
    failures,
    names::{FAILURES, SPECTRA_PROCESSED},
    strategy,
};
use tracing::{Span, debug, instrument, trace};

/// Computes rolling ball baselines with a fixed strategy and window options.
///
/// The engine holds no state between calls, and may be shared between threads.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollingBall {
    strategy: Strategy,
    options: WindowOptions,
    policy: DegenerateWindowPolicy,
}

impl RollingBall {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    /// Sets the radius of the minimization and maximization windows.
    pub fn with_window_m(mut self, radius: usize) -> Self {
        self.options.window_m = Some(radius);
        self
    }

    /// Sets the radius of the smoothing window.
    pub fn with_window_s(mut self, radius: usize) -> Self {
        self.options.window_s = Some(radius);
        self
    }

    pub fn with_options(mut self, options: WindowOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_degenerate_policy(mut self, policy: DegenerateWindowPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn options(&self) -> &WindowOptions {
        &self.options
    }

    /// The window radii which would be applied to a spectrum of length `len`.
    pub fn resolve(&self, len: usize) -> Result<Windows, InvalidInput> {
        Windows::resolve(len, &self.options, self.strategy, self.policy)
    }

    /// Computes the minima, maxima and baseline of `signal`.
    ///
    /// # Parameters
    /// - signal: a non-empty spectrum of finite samples.
    #[instrument(
        skip_all,
        fields(strategy = %self.strategy, len = signal.len(), window_m, window_s),
        err(level = "debug")
    )]
    pub fn stages(&self, signal: &[Real]) -> Result<Stages, InvalidInput> {
        let windows = self.prepare(signal)?;
        Ok(self.compute(signal, windows))
    }

    /// Computes the baseline of `signal`.
    pub fn baseline(&self, signal: &[Real]) -> Result<Vec<Real>, InvalidInput> {
        self.stages(signal).map(|stages| stages.baseline)
    }

    /// Computes the baseline of `signal`, and subtracts it from `signal`.
    pub fn correct(&self, signal: &[Real]) -> Result<Correction, InvalidInput> {
        self.baseline(signal)
            .map(|baseline| Correction::new(signal, baseline))
    }

    /// Computes the baseline of every spectrum, processing spectra in parallel.
    ///
    /// Every spectrum is validated before any is processed,
    /// the first invalid spectrum's error is returned and no baselines are computed.
    ///
    /// # Parameters
    /// - spectra: the spectra, which may have differing lengths.
    #[instrument(
        skip_all,
        fields(strategy = %self.strategy, num_spectra = spectra.len()),
        err(level = "debug")
    )]
    pub fn baseline_batch<S>(&self, spectra: &[S]) -> Result<Vec<Vec<Real>>, InvalidInput>
    where
        S: AsRef<[Real]> + Sync,
    {
        let windows = spectra
            .iter()
            .map(|signal| self.prepare(signal.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let span = Span::current();
        Ok(spectra
            .par_iter()
            .zip(windows.into_par_iter())
            .map(|(signal, windows)| {
                span.in_scope(|| self.compute(signal.as_ref(), windows).baseline)
            })
            .collect())
    }

    /// Validates `signal` and resolves the windows to apply to it.
    fn prepare(&self, signal: &[Real]) -> Result<Windows, InvalidInput> {
        validate(signal)
            .and_then(|_| self.resolve(signal.len()))
            .inspect_err(|e| {
                counter!(FAILURES, &[failures::get_label(e.failure_kind())]).increment(1);
            })
    }

    /// Runs the stages in order, each reading only the previous stage's output.
    fn compute(&self, signal: &[Real], windows: Windows) -> Stages {
        Span::current()
            .record("window_m", windows.minmax)
            .record("window_s", windows.smoothing);
        debug!(?windows, "Resolved windows");

        let minima = self.apply_stage(Stage::Minimize, signal, windows);
        let maxima = self.apply_stage(Stage::Maximize, &minima, windows);
        let baseline = self.apply_stage(Stage::Smooth, &maxima, windows);

        counter!(SPECTRA_PROCESSED, &[strategy::get_label(self.strategy.name())]).increment(1);
        Stages {
            windows,
            minima,
            maxima,
            baseline,
        }
    }

    fn apply_stage(&self, stage: Stage, data: &[Real], windows: Windows) -> Vec<Real> {
        let radius = windows.radius(stage);
        let output = match (self.strategy, stage) {
            (Strategy::Windowed, Stage::Minimize) => Reduction::Min.apply(data, radius),
            (Strategy::Windowed, Stage::Maximize) => Reduction::Max.apply(data, radius),
            (Strategy::Windowed, Stage::Smooth) => Reduction::Mean.apply(data, radius),
            (Strategy::Incremental, Stage::Minimize) => {
                SlidingExtremum::new(Direction::Minimum).apply(data, radius)
            }
            (Strategy::Incremental, Stage::Maximize) => {
                SlidingExtremum::new(Direction::Maximum).apply(data, radius)
            }
            (Strategy::Incremental, Stage::Smooth) => SlidingMean::default().apply(data, radius),
        };
        trace!(%stage, radius, "Stage complete");
        output
    }
}

/// Computes the rolling ball baseline of `signal` with the incremental strategy.
///
/// Radii missing from `options` default to 4% of the spectrum length.
pub fn rolling_ball(signal: &[Real], options: &WindowOptions) -> Result<Vec<Real>, InvalidInput> {
    RollingBall::new(Strategy::Incremental)
        .with_options(*options)
        .baseline(signal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_spectra::{edge_peaked_spectrum, fluctuating_spectrum, peaked_spectrum};
    use assert_approx_eq::assert_approx_eq;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    const STRATEGIES: [Strategy; 2] = [Strategy::Windowed, Strategy::Incremental];

    /// Mean squared difference between neighbouring samples over the given range.
    fn roughness(data: &[Real], range: std::ops::Range<usize>) -> Real {
        let count = range.len() - 1;
        data[range]
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).powi(2))
            .sum::<Real>()
            / count as Real
    }

    #[test]
    fn length_is_preserved() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in [1, 2, 3, 10, 99, 1000] {
            let signal = (0..len)
                .map(|_| rng.random_range(0.0..50.0))
                .collect::<Vec<Real>>();
            for strategy in STRATEGIES {
                for (window_m, window_s) in
                    [(None, None), (Some(0), Some(0)), (Some(3), Some(11))]
                {
                    let baseline = RollingBall::new(strategy)
                        .with_options(WindowOptions::new(window_m, window_s))
                        .baseline(&signal)
                        .expect("valid spectrum");
                    assert_eq!(baseline.len(), len);
                }
            }
        }
    }

    #[test]
    fn constant_signal_is_fixed_point() {
        let signal = [1.0; 10];
        for strategy in STRATEGIES {
            for (window_m, window_s) in [(0, 0), (1, 2), (2, 3), (4, 9), (20, 20)] {
                let baseline = RollingBall::new(strategy)
                    .with_window_m(window_m)
                    .with_window_s(window_s)
                    .baseline(&signal)
                    .expect("valid spectrum");
                for value in baseline {
                    assert_approx_eq!(value, 1.0, 1e-9);
                }
            }
        }
    }

    #[test]
    fn incremental_matches_windowed() {
        let signal = peaked_spectrum(2000);
        for (window_m, window_s) in [(20, 40), (40, 80), (5, 5)] {
            let windowed = RollingBall::new(Strategy::Windowed)
                .with_window_m(window_m)
                .with_window_s(window_s)
                .baseline(&signal)
                .expect("valid spectrum");
            let incremental = RollingBall::new(Strategy::Incremental)
                .with_window_m(window_m)
                .with_window_s(window_s)
                .baseline(&signal)
                .expect("valid spectrum");
            for (incremental, windowed) in incremental.iter().zip(&windowed) {
                assert!((incremental - windowed).abs() / windowed < 0.02);
            }
            // Away from the edges the extremum stages agree exactly.
            let interior = 2 * window_m + window_s..signal.len() - 2 * window_m - window_s;
            for index in interior {
                assert_approx_eq!(incremental[index], windowed[index], 1e-6);
            }
        }
    }

    #[test]
    fn incremental_matches_windowed_near_edges() {
        let signal = edge_peaked_spectrum(2000);
        for (window_m, window_s) in [(20, 40), (40, 80), (5, 5)] {
            let baselines = STRATEGIES.map(|strategy| {
                RollingBall::new(strategy)
                    .with_window_m(window_m)
                    .with_window_s(window_s)
                    .baseline(&signal)
                    .expect("valid spectrum")
            });
            let [windowed, incremental] = &baselines;
            assert!(
                incremental
                    .iter()
                    .zip(windowed)
                    .any(|(incremental, windowed)| incremental != windowed)
            );
            for (incremental, windowed) in incremental.iter().zip(windowed) {
                assert!((incremental - windowed).abs() / windowed < 0.02);
            }
            let interior = 2 * window_m + window_s..signal.len() - 2 * window_m - window_s;
            for index in interior {
                assert_approx_eq!(incremental[index], windowed[index], 1e-6);
            }
        }
    }

    #[test]
    fn default_windows_match_explicit_windows() {
        let signal = peaked_spectrum(1234);
        for strategy in STRATEGIES {
            let defaults = strategy.default_windows(signal.len());
            let implicit = RollingBall::new(strategy)
                .baseline(&signal)
                .expect("valid spectrum");
            let explicit = RollingBall::new(strategy)
                .with_window_m(defaults.minmax)
                .with_window_s(defaults.smoothing)
                .baseline(&signal)
                .expect("valid spectrum");
            assert_eq!(implicit, explicit);
        }
        assert_eq!(
            RollingBall::new(Strategy::Windowed)
                .resolve(1234)
                .expect("valid length"),
            Windows::new(49, 99)
        );
        assert_eq!(
            rolling_ball(&signal, &WindowOptions::default()).expect("valid spectrum"),
            RollingBall::new(Strategy::Incremental)
                .with_window_m(49)
                .with_window_s(49)
                .baseline(&signal)
                .expect("valid spectrum")
        );
    }

    #[test]
    fn wider_smoothing_window_is_smoother() {
        let signal = fluctuating_spectrum(500);
        for strategy in STRATEGIES {
            let roughnesses = [1, 5, 15].map(|window_s| {
                let baseline = RollingBall::new(strategy)
                    .with_window_m(2)
                    .with_window_s(window_s)
                    .baseline(&signal)
                    .expect("valid spectrum");
                roughness(&baseline, 50..450)
            });
            assert!(roughnesses[0] > roughnesses[1], "{roughnesses:?}");
            assert!(roughnesses[1] > roughnesses[2], "{roughnesses:?}");
        }
    }

    #[test]
    fn short_spectra_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        for len in 1..=12 {
            let signal = (0..len)
                .map(|_| rng.random_range(-5.0..5.0))
                .collect::<Vec<Real>>();
            let lowest = signal.iter().copied().fold(Real::INFINITY, Real::min);
            let highest = signal.iter().copied().fold(Real::NEG_INFINITY, Real::max);
            for strategy in STRATEGIES {
                for window_m in 0..=8 {
                    for window_s in 0..=8 {
                        let stages = RollingBall::new(strategy)
                            .with_window_m(window_m)
                            .with_window_s(window_s)
                            .stages(&signal)
                            .expect("valid spectrum");
                        for stage in Stage::ALL {
                            assert_eq!(stages.output(stage).len(), len);
                        }
                        for value in stages.baseline {
                            assert!(value >= lowest - 1e-9 && value <= highest + 1e-9);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn stages_are_chained() {
        let signal = peaked_spectrum(300);
        let stages = RollingBall::new(Strategy::Windowed)
            .with_window_m(6)
            .with_window_s(10)
            .stages(&signal)
            .expect("valid spectrum");
        assert_eq!(stages.windows, Windows::new(6, 10));
        assert_eq!(stages.minima, Reduction::Min.apply(&signal, 6));
        assert_eq!(stages.maxima, Reduction::Max.apply(&stages.minima, 6));
        assert_eq!(stages.baseline, Reduction::Mean.apply(&stages.maxima, 10));
        for (value, minimum) in signal.iter().zip(&stages.minima) {
            assert!(minimum <= value);
        }
    }

    #[test]
    fn correction_subtracts_baseline() {
        let signal = peaked_spectrum(400);
        let engine = RollingBall::new(Strategy::Incremental).with_window_m(10);
        let correction = engine.correct(&signal).expect("valid spectrum");
        assert_eq!(correction.baseline, engine.baseline(&signal).expect("valid spectrum"));
        for ((value, baseline), corrected) in signal
            .iter()
            .zip(&correction.baseline)
            .zip(&correction.corrected)
        {
            assert_approx_eq!(corrected, value - baseline, 1e-12);
        }
    }

    #[test]
    fn invalid_spectra_are_rejected() {
        let engine = RollingBall::default();
        assert_eq!(engine.baseline(&[]), Err(InvalidInput::EmptySequence));
        assert!(matches!(
            engine.baseline(&[1.0, Real::NAN, 2.0]),
            Err(InvalidInput::NotASequence { index: 1, .. })
        ));
        assert_eq!(
            engine
                .with_window_m(3)
                .with_degenerate_policy(DegenerateWindowPolicy::Reject)
                .baseline(&[1.0, 2.0, 3.0]),
            Err(InvalidInput::DegenerateWindow {
                stage: Stage::Minimize,
                radius: 3,
                len: 3
            })
        );
        assert!(engine.with_window_m(3).baseline(&[1.0, 2.0, 3.0]).is_ok());
    }

    #[test]
    fn batch_matches_individual_spectra() {
        let spectra = vec![peaked_spectrum(500), fluctuating_spectrum(300), vec![4.0; 7]];
        for strategy in STRATEGIES {
            let engine = RollingBall::new(strategy).with_window_s(9);
            let batch = engine.baseline_batch(&spectra).expect("valid spectra");
            assert_eq!(batch.len(), spectra.len());
            for (signal, baseline) in spectra.iter().zip(batch) {
                assert_eq!(baseline, engine.baseline(signal).expect("valid spectrum"));
            }
        }
    }

    #[test]
    fn batch_fails_on_first_invalid_spectrum() {
        let spectra: Vec<Vec<Real>> = vec![vec![1.0, 2.0], vec![], vec![Real::INFINITY]];
        assert_eq!(
            RollingBall::default().baseline_batch(&spectra),
            Err(InvalidInput::EmptySequence)
        );
        let empty: [Vec<Real>; 0] = [];
        assert_eq!(RollingBall::default().baseline_batch(&empty), Ok(vec![]));
    }

    #[test]
    fn concurrent_calls_share_input() {
        let signal = peaked_spectrum(1500);
        let engine = RollingBall::new(Strategy::Incremental);
        let expected = engine.baseline(&signal).expect("valid spectrum");
        std::thread::scope(|scope| {
            let handles = (0..4)
                .map(|_| scope.spawn(|| engine.baseline(&signal)))
                .collect::<Vec<_>>();
            for handle in handles {
                let baseline = handle.join().expect("thread completes");
                assert_eq!(baseline.as_ref(), Ok(&expected));
            }
        });
    }
}

//! # Rolling Ball
//!
//! Estimates the baseline of a spectrum by rolling a ball underneath it.
//! The elevation of the top of the ball at each sample is the baseline, which can be subtracted
//! from the spectrum to leave only its peaks.
//!
//! The baseline is computed in three stages, each a sliding window over the previous stage's output:
//! * the minimum of the spectrum over a window of radius `window_m`,
//! * the maximum of the minima over a window of the same radius,
//! * the mean of the maxima over a window of radius `window_s`.
//!
//! Two [Strategy]s are provided. [Strategy::Windowed] scans every window directly,
//! [Strategy::Incremental] reuses the previous window's extremum or sum.
//!
//! # Example
//! ```rust
//! use rolling_ball::{RollingBall, Strategy, WindowOptions, rolling_ball};
//!
//! let spectrum = vec![1.0; 10];
//! let baseline = rolling_ball(&spectrum, &WindowOptions::default())?;
//! assert_eq!(baseline.len(), spectrum.len());
//!
//! let correction = RollingBall::new(Strategy::Windowed)
//!     .with_window_m(2)
//!     .with_window_s(3)
//!     .correct(&spectrum)?;
//! assert!(correction.corrected.iter().all(|value| value.abs() < 1e-9));
//! # Ok::<(), rolling_ball::InvalidInput>(())
//! ```
mod baseline;
mod error;
mod parameters;
mod stage;
#[cfg(test)]
mod test_spectra;
pub mod window;

pub use baseline::{RollingBall, rolling_ball};
pub use error::InvalidInput;
pub use parameters::{
    DegenerateWindowPolicy, INCREMENTAL_SMOOTHING_FRACTION, MINMAX_WINDOW_FRACTION, Strategy,
    WINDOWED_SMOOTHING_FRACTION, WindowOptions, Windows,
};
pub use rolling_ball_common::Real;
pub use stage::{Correction, Stage, Stages};

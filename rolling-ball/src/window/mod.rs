//! Defines the sliding windows which perform the minimization, maximization and smoothing stages.
//!
//! Every window maps an array to an array of the same length, where the value at position `i`
//! summarises the input over the window of radius `r` centred at `i`, clipped to the array bounds.
//!
//! # Example
//!
//! The following example applies the three stages of the incremental strategy by hand.
//! ```rust
//! use rolling_ball::window::{SlidingExtremum, SlidingMean, SlidingWindow};
//!
//! let spectrum = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
//! let minima = SlidingExtremum::minimum().apply(&spectrum, 1);
//! let maxima = SlidingExtremum::maximum().apply(&minima, 1);
//! let baseline = SlidingMean::default().apply(&maxima, 2);
//! assert_eq!(baseline.len(), spectrum.len());
//! ```
mod extremum;
mod schedule;
mod smoothing;
mod windowed;

use crate::Real;
use std::ops::Range;

pub use extremum::{Direction, SlidingExtremum};
pub use smoothing::{RESYNC_INTERVAL, SlidingMean};
pub use windowed::{Reduction, windowed_reduce};

/// Implemented by every algorithm which computes a windowed summary of an array.
pub trait SlidingWindow {
    /// Returns an array of `data.len()` values, one for the window of `radius` around each position.
    fn apply(&self, data: &[Real], radius: usize) -> Vec<Real>;
}

/// The indices `[max(0, index - radius), min(len, index + radius + 1))` of a clipped window.
pub fn window_bounds(index: usize, radius: usize, len: usize) -> Range<usize> {
    index.saturating_sub(radius)..index.saturating_add(radius).saturating_add(1).min(len)
}

/// Whether an array of length `len` is too short to contain a single unclipped window of `radius`.
pub(crate) fn lacks_full_window(len: usize, radius: usize) -> bool {
    radius > len.saturating_sub(1) / 2
}

//! Direct evaluation of every window, used by the windowed strategy and as a reference.
use super::{SlidingWindow, window_bounds};
use crate::Real;

/// The summary computed over each window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Min,
    Max,
    Mean,
}

impl Reduction {
    /// Reduces a non-empty window to a single value.
    pub fn reduce(self, window: &[Real]) -> Real {
        match self {
            Self::Min => window.iter().copied().fold(Real::INFINITY, Real::min),
            Self::Max => window.iter().copied().fold(Real::NEG_INFINITY, Real::max),
            Self::Mean => window.iter().sum::<Real>() / window.len() as Real,
        }
    }
}

/// Applies `reduction` to the clipped window of `radius` around every position of `data`.
///
/// This costs `O(len * radius)`.
pub fn windowed_reduce(data: &[Real], radius: usize, reduction: Reduction) -> Vec<Real> {
    (0..data.len())
        .map(|index| reduction.reduce(&data[window_bounds(index, radius, data.len())]))
        .collect()
}

impl SlidingWindow for Reduction {
    fn apply(&self, data: &[Real], radius: usize) -> Vec<Real> {
        windowed_reduce(data, radius, *self)
    }
}

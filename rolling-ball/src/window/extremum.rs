//! Incremental sliding minimum and maximum, sharing a single implementation.
use super::{
    Reduction, SlidingWindow, lacks_full_window, schedule::EdgeSchedule, windowed_reduce,
};
use crate::Real;
use metrics::counter;
use rolling_ball_common::metrics::names::EXTREMUM_RESCANS;
use tracing::debug;

/// Whether a [SlidingExtremum] tracks the smallest or the largest value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Minimum,
    Maximum,
}

impl Direction {
    /// Returns true if `candidate` is at least as extreme as `current`.
    pub fn at_least_as_extreme(self, candidate: Real, current: Real) -> bool {
        match self {
            Self::Minimum => candidate <= current,
            Self::Maximum => candidate >= current,
        }
    }

    /// Folds `values` into `current`, returning the most extreme value seen.
    pub fn fold(self, current: Real, values: &[Real]) -> Real {
        values.iter().copied().fold(current, |current, value| {
            if self.at_least_as_extreme(value, current) {
                value
            } else {
                current
            }
        })
    }

    /// The value which every other value is at least as extreme as.
    fn identity(self) -> Real {
        match self {
            Self::Minimum => Real::INFINITY,
            Self::Maximum => Real::NEG_INFINITY,
        }
    }

    /// The equivalent reduction of the windowed strategy.
    pub fn reduction(self) -> Reduction {
        match self {
            Self::Minimum => Reduction::Min,
            Self::Maximum => Reduction::Max,
        }
    }
}

/// Computes the extremum of every window, reusing the previous window's extremum where possible.
///
/// The array is processed in three segments:
/// * The start segment, the first `radius` positions, whose windows are clipped on the left.
///   Window lengths follow [EdgeSchedule], and the extremum is folded forward with the newly entered samples.
/// * The main segment, in which the window has its full width and slides one sample per position.
/// * The end segment, the last `radius` positions, the mirror image of the start segment.
///
/// If no full window fits in the array the clipped windows are scanned directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlidingExtremum {
    direction: Direction,
}

impl SlidingExtremum {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }

    pub fn minimum() -> Self {
        Self::new(Direction::Minimum)
    }

    pub fn maximum() -> Self {
        Self::new(Direction::Maximum)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Applies the window, also returning the number of times the main segment had to re-scan.
    pub(crate) fn sweep(&self, data: &[Real], radius: usize) -> (Vec<Real>, u64) {
        if radius == 0 {
            return (data.to_vec(), 0);
        }
        if lacks_full_window(data.len(), radius) {
            debug!(
                len = data.len(),
                radius, "No full window fits, scanning clipped windows"
            );
            return (windowed_reduce(data, radius, self.direction.reduction()), 0);
        }

        let mut output = vec![0.0; data.len()];
        self.start_segment(data, radius, &mut output);
        let rescans = self.main_segment(data, radius, &mut output);
        self.end_segment(data, radius, &mut output);
        (output, rescans)
    }

    fn start_segment(&self, data: &[Real], radius: usize, output: &mut [Real]) {
        let mut current = self.direction.identity();
        let mut covered = 0;
        for (position, span) in EdgeSchedule::new(radius).enumerate() {
            current = self.direction.fold(current, &data[covered..span]);
            covered = span;
            output[position] = current;
        }
    }

    /// Requires the start segment to have been computed, and `data.len() >= 2 * radius + 1`.
    fn main_segment(&self, data: &[Real], radius: usize, output: &mut [Real]) -> u64 {
        let mut rescans = 0;
        // The last start window is exactly the clipped window `[0, 2 * radius)`.
        let mut current = output[radius - 1];
        for position in radius..data.len() - radius {
            let incoming = data[position + radius];
            if self.direction.at_least_as_extreme(incoming, current) {
                current = incoming;
            } else if position > radius && data[position - radius - 1] == current {
                // The outgoing sample may have been the only one holding the extremum.
                current = self.direction.fold(
                    self.direction.identity(),
                    &data[position - radius..=position + radius],
                );
                rescans += 1;
            }
            output[position] = current;
        }
        rescans
    }

    fn end_segment(&self, data: &[Real], radius: usize, output: &mut [Real]) {
        let len = data.len();
        let mut current = self.direction.identity();
        let mut covered = 0;
        for (position, span) in EdgeSchedule::new(radius).enumerate() {
            current = self.direction.fold(current, &data[len - span..len - covered]);
            covered = span;
            output[len - 1 - position] = current;
        }
    }
}

impl SlidingWindow for SlidingExtremum {
    fn apply(&self, data: &[Real], radius: usize) -> Vec<Real> {
        let (output, rescans) = self.sweep(data, radius);
        counter!(EXTREMUM_RESCANS).increment(rescans);
        output
    }
}

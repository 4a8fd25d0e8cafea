//! Sliding mean maintained as a running sum.
use super::SlidingWindow;
use crate::Real;
use metrics::counter;
use rolling_ball_common::metrics::names::RUNNING_SUM_RESYNCS;

/// Number of main segment positions after which the running sum is recomputed from scratch.
pub const RESYNC_INTERVAL: usize = 4096;

/// Computes the mean of every clipped window from a running sum.
///
/// The array is processed in three segments:
/// * The start segment, where the window grows on the right and the divisor grows with it.
/// * The main segment, where the window has its full width of `2 * radius + 1` samples,
///   and each step adds the incoming sample and subtracts the outgoing one.
/// * The end segment, where the window shrinks from the left and the divisor shrinks with it.
///
/// The running sum is recomputed by direct summation on entering the main and end segments,
/// and every `resync_interval` positions of the main segment, which bounds rounding drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlidingMean {
    resync_interval: usize,
}

impl Default for SlidingMean {
    fn default() -> Self {
        Self {
            resync_interval: RESYNC_INTERVAL,
        }
    }
}

impl SlidingMean {
    /// Creates a sliding mean which resynchronises every `resync_interval` positions, at least every position.
    pub fn with_resync_interval(resync_interval: usize) -> Self {
        Self {
            resync_interval: resync_interval.max(1),
        }
    }

    pub fn resync_interval(&self) -> usize {
        self.resync_interval
    }

    /// Applies the window, also returning the number of times the running sum was recomputed.
    pub(crate) fn sweep(&self, data: &[Real], radius: usize) -> (Vec<Real>, u64) {
        let len = data.len();
        if radius == 0 {
            return (data.to_vec(), 0);
        }
        let mut output = Vec::with_capacity(len);
        let mut resyncs = 0;

        // Start segment: the window is `[0, hi)`.
        let mut hi = radius.min(len);
        let mut sum: Real = data[..hi].iter().sum();
        for _ in 0..radius.min(len) {
            if hi < len {
                sum += data[hi];
                hi += 1;
            }
            output.push(sum / hi as Real);
        }

        // Main segment: the window is `[position - radius, position + radius]`.
        for position in radius..len.saturating_sub(radius) {
            let window = &data[position - radius..=position + radius];
            if (position - radius) % self.resync_interval == 0 {
                sum = window.iter().sum();
                resyncs += 1;
            } else {
                sum += data[position + radius] - data[position - radius - 1];
            }
            output.push(sum / window.len() as Real);
        }

        // End segment: the window is `[position - radius, len)`.
        let end = radius.max(len.saturating_sub(radius));
        for position in end..len {
            let lo = position - radius;
            if position == end {
                sum = data[lo..].iter().sum();
                resyncs += 1;
            } else {
                sum -= data[lo - 1];
            }
            output.push(sum / (len - lo) as Real);
        }
        (output, resyncs)
    }
}

impl SlidingWindow for SlidingMean {
    fn apply(&self, data: &[Real], radius: usize) -> Vec<Real> {
        let (output, resyncs) = self.sweep(data, radius);
        counter!(RUNNING_SUM_RESYNCS).increment(resyncs);
        output
    }
}

//! The step schedule of the edge segments of the incremental extremum passes.

/// Yields the lengths of the windows used at the `radius` positions nearest an edge of the array.
///
/// The window nearest the edge spans `ceil((radius + 1) / 2) + 1` samples. Moving the k-th position
/// away from the edge adds `1 + (k + 1) % 2` samples, alternately one and two, so the window
/// of the last edge position spans exactly `2 * radius` samples, the same as its clipped window.
/// Earlier edge windows are never longer than their clipped windows.
#[derive(Clone, Debug)]
pub(crate) struct EdgeSchedule {
    radius: usize,
    position: usize,
    span: usize,
}

impl EdgeSchedule {
    pub(crate) fn new(radius: usize) -> Self {
        Self {
            radius,
            position: 0,
            span: (radius + 1).div_ceil(2) + 1,
        }
    }

    /// The number of samples entering the window when moving to `position`.
    fn step(position: usize) -> usize {
        1 + (position + 1) % 2
    }
}

impl Iterator for EdgeSchedule {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.position >= self.radius {
            return None;
        }
        let span = self.span;
        self.position += 1;
        self.span += Self::step(self.position);
        Some(span)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.radius - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for EdgeSchedule {}

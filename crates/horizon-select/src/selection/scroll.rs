//! Scroll-to-selection tracking.

/// Remembers the previous selection bounds and reports which option must be
/// scrolled into view when they change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollTracker {
    last: Option<(usize, usize)>,
}

impl ScrollTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current (first, last) selected indices.
    ///
    /// Returns the index to reveal: the first index if it moved, otherwise
    /// the last one if it moved. Nothing is revealed for an empty selection.
    pub fn update(&mut self, bounds: Option<(usize, usize)>) -> Option<usize> {
        let previous = std::mem::replace(&mut self.last, bounds);
        let (start, end) = bounds?;
        if previous == bounds {
            return None;
        }
        if previous.map(|(start, _)| start) != Some(start) {
            Some(start)
        } else {
            Some(end)
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_moved_end() {
        let mut tracker = ScrollTracker::new();
        assert_eq!(tracker.update(Some((2, 2))), Some(2));
        assert_eq!(tracker.update(Some((2, 2))), None);
        assert_eq!(tracker.update(Some((2, 5))), Some(5));
        assert_eq!(tracker.update(Some((1, 5))), Some(1));
        assert_eq!(tracker.update(None), None);
        assert_eq!(tracker.update(Some((1, 5))), Some(1));
    }
}

//! Hover state derived from per-frame hit-testing.

use crate::model::note::NoteId;

/// Highlight transition a renderer must apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverChange {
    Entered(NoteId),
    Left(NoteId),
    Switched { from: NoteId, to: NoteId },
}

#[derive(Debug, Default)]
pub struct HoverTracker {
    current: Option<NoteId>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<NoteId> {
        self.current
    }

    /// Records this frame's hit and reports a transition if it differs.
    pub fn observe(&mut self, hit: Option<NoteId>) -> Option<HoverChange> {
        let change = match (self.current, hit) {
            (None, Some(to)) => Some(HoverChange::Entered(to)),
            (Some(from), None) => Some(HoverChange::Left(from)),
            (Some(from), Some(to)) if from != to => Some(HoverChange::Switched { from, to }),
            _ => None,
        };
        self.current = hit;
        change
    }

    /// Drops hover for a note that no longer exists.
    pub fn forget(&mut self, id: NoteId) {
        if self.current == Some(id) {
            self.current = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{HoverChange, HoverTracker};

    #[test]
    fn reports_only_transitions() {
        let mut tracker = HoverTracker::new();
        assert_eq!(tracker.observe(None), None);
        assert_eq!(tracker.observe(Some(2)), Some(HoverChange::Entered(2)));
        assert_eq!(tracker.observe(Some(2)), None);
        assert_eq!(
            tracker.observe(Some(3)),
            Some(HoverChange::Switched { from: 2, to: 3 })
        );
        assert_eq!(tracker.observe(None), Some(HoverChange::Left(3)));
        assert_eq!(tracker.current(), None);
    }
}

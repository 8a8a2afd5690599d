//! Tracking of the single quest currently shown in the detail view

use crate::{Quest, QuestId};

/// Holds the id of the selected quest, if any
///
/// The tracker only remembers an id. Whether a result carries the `selected`
/// flag is decided during each recomputation with [`SelectionTracker::is_selected`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    selected: Option<QuestId>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a quest, replacing any previous selection
    pub fn select(&mut self, id: QuestId) {
        if let Some(previous) = self.selected.replace(id) {
            tracing::trace!("Selection moved away from {previous}");
        }
    }

    /// Drop the selection
    pub fn clear(&mut self) {
        self.selected = None;
    }

    #[inline]
    pub fn selected_id(&self) -> Option<&QuestId> {
        self.selected.as_ref()
    }

    /// Predicate used to stamp the `selected` flag of a result
    #[inline]
    pub fn is_selected(quest: &Quest, selected_id: Option<&QuestId>) -> bool {
        selected_id.is_some_and(|id| quest.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LatLng, Owner, Rating, Stop, Theme};

    fn create_test_quest(id: &str) -> Quest {
        Quest::new(
            id,
            "Test",
            Theme::Run,
            20,
            Rating::Rated(3.0),
            vec![Stop {
                name: "Start".to_string(),
                location: LatLng::new(0.0, 0.0),
            }],
            Owner {
                id: "u-1".to_string(),
                username: "tester".to_string(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_tracker_starts_empty() {
        let tracker = SelectionTracker::new();
        assert!(tracker.selected_id().is_none());
    }

    #[test]
    fn test_select_replaces_previous() {
        let mut tracker = SelectionTracker::new();
        tracker.select(QuestId::from("a"));
        tracker.select(QuestId::from("b"));
        assert_eq!(tracker.selected_id(), Some(&QuestId::from("b")));
    }

    #[test]
    fn test_clear() {
        let mut tracker = SelectionTracker::new();
        tracker.select(QuestId::from("a"));
        tracker.clear();
        assert!(tracker.selected_id().is_none());

        // Clearing twice is harmless
        tracker.clear();
        assert!(tracker.selected_id().is_none());
    }

    #[test]
    fn test_is_selected() {
        let a = create_test_quest("a");
        let b = create_test_quest("b");
        let id = QuestId::from("a");

        assert!(SelectionTracker::is_selected(&a, Some(&id)));
        assert!(!SelectionTracker::is_selected(&b, Some(&id)));
        assert!(!SelectionTracker::is_selected(&a, None));
    }
}

// src/tracker.rs
use crate::feed::WarningOccurrence;

/// The only cross-cycle state in the pipeline: the identity of the last
/// bulletin that triggered a notification. Owned by the watcher loop;
/// nothing else writes it.
#[derive(Debug, Clone, Default)]
pub struct OccurrenceTracker {
    last_notified: Option<String>,
}

impl OccurrenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one cycle's extraction result through the dedupe slot.
    /// Returns true when `current` is novel and should be announced.
    ///
    /// A quiet cycle (`None`) clears the slot, so a bulletin whose area
    /// summary transiently stops mentioning the town will announce again
    /// when it returns. That matches the upstream feed contract: an absent
    /// summary means the previous warning no longer stands.
    pub fn observe(&mut self, current: Option<&WarningOccurrence>) -> bool {
        match current {
            None => {
                self.last_notified = None;
                false
            }
            Some(occ) => {
                if self.last_notified.as_deref() == Some(occ.identity.as_str()) {
                    false
                } else {
                    self.last_notified = Some(occ.identity.clone());
                    true
                }
            }
        }
    }

    pub fn last_notified(&self) -> Option<&str> {
        self.last_notified.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occ(id: &str) -> WarningOccurrence {
        WarningOccurrence {
            identity: id.to_string(),
            title: "Severe Thunderstorm Warning".into(),
            message: "heads up".into(),
        }
    }

    #[test]
    fn first_observation_is_novel_second_is_not() {
        let mut t = OccurrenceTracker::new();
        let w = occ("IDQ210372025-11-03T04:30:00Z");
        assert!(t.observe(Some(&w)));
        assert!(!t.observe(Some(&w)));
        assert_eq!(t.last_notified(), Some("IDQ210372025-11-03T04:30:00Z"));
    }

    #[test]
    fn changed_identity_is_novel_again() {
        let mut t = OccurrenceTracker::new();
        assert!(t.observe(Some(&occ("a"))));
        assert!(t.observe(Some(&occ("b"))));
        assert_eq!(t.last_notified(), Some("b"));
    }

    #[test]
    fn quiet_cycle_resets_the_slot() {
        let mut t = OccurrenceTracker::new();
        assert!(t.observe(Some(&occ("a"))));
        assert!(!t.observe(None));
        assert_eq!(t.last_notified(), None);
        // The same identity is fresh again after a reset.
        assert!(t.observe(Some(&occ("a"))));
    }

    #[test]
    fn reset_is_idempotent_from_any_state() {
        let mut t = OccurrenceTracker::new();
        assert!(!t.observe(None));
        assert_eq!(t.last_notified(), None);
    }
}

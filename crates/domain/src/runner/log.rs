//! Append-only transition log
//!
//! The visible scene history is never edited in place. Entries are only
//! appended, and the history is derived by replaying them: a `Rewound`
//! entry cuts the derived history back to just before the last visit of its
//! target, so the retried scene is then entered fresh.

use crate::ids::SceneId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    Entered(SceneId),
    Rewound { to: SceneId },
    Restarted,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionLog {
    entries: Vec<LogEntry>,
}

impl TransitionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a persisted history.
    pub fn from_history(history: impl IntoIterator<Item = SceneId>) -> Self {
        Self {
            entries: history.into_iter().map(LogEntry::Entered).collect(),
        }
    }

    pub fn record_entry(&mut self, scene_id: SceneId) {
        self.entries.push(LogEntry::Entered(scene_id));
    }

    pub fn rewind_to(&mut self, marker: SceneId) {
        self.entries.push(LogEntry::Rewound { to: marker });
    }

    pub fn restart(&mut self) {
        self.entries.push(LogEntry::Restarted);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Total scene entries ever recorded. Monotonic.
    pub fn entry_count(&self) -> u64 {
        self.entries
            .iter()
            .filter(|e| matches!(e, LogEntry::Entered(_)))
            .count() as u64
    }

    /// The history stack the log describes.
    pub fn history(&self) -> Vec<SceneId> {
        let mut stack: Vec<SceneId> = Vec::new();
        for entry in &self.entries {
            match entry {
                LogEntry::Entered(id) => stack.push(id.clone()),
                LogEntry::Rewound { to } => {
                    if let Some(pos) = stack.iter().rposition(|id| id == to) {
                        stack.truncate(pos);
                    }
                }
                LogEntry::Restarted => stack.clear(),
            }
        }
        stack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<SceneId> {
        names.iter().map(|n| SceneId::new(*n)).collect()
    }

    #[test]
    fn rewind_drops_the_failed_branch() {
        let mut log = TransitionLog::from_history(ids(&["a", "choice", "setback"]));
        log.rewind_to(SceneId::new("choice"));
        log.record_entry(SceneId::new("choice"));
        assert_eq!(log.history(), ids(&["a", "choice"]));
        assert_eq!(log.entries().len(), 5);
    }

    #[test]
    fn rewind_targets_the_latest_visit() {
        let mut log = TransitionLog::from_history(ids(&["c", "x", "c", "y"]));
        log.rewind_to(SceneId::new("c"));
        assert_eq!(log.history(), ids(&["c", "x"]));
    }

    #[test]
    fn restart_clears_history_but_keeps_counting() {
        let mut log = TransitionLog::from_history(ids(&["a", "b"]));
        log.restart();
        log.record_entry(SceneId::new("a"));
        assert_eq!(log.history(), ids(&["a"]));
        assert_eq!(log.entry_count(), 3);
    }
}

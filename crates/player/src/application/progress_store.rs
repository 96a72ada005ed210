//! Progress persistence
//!
//! Local storage is the source of truth and is written synchronously on
//! every save. The engine mirror is best effort: the push runs on its own
//! task and its failures are only logged.

use std::sync::Arc;

use chronoquest_domain::{ChapterId, ProgressSnapshot};

use crate::ports::outbound::{ProgressSyncPort, StorageProvider, TimeProvider};

pub struct ProgressStore {
    storage: Arc<dyn StorageProvider>,
    remote: Option<Arc<dyn ProgressSyncPort>>,
    clock: Arc<dyn TimeProvider>,
}

impl ProgressStore {
    pub fn new(
        storage: Arc<dyn StorageProvider>,
        remote: Option<Arc<dyn ProgressSyncPort>>,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            storage,
            remote,
            clock,
        }
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    pub fn save(&self, snapshot: &ProgressSnapshot) {
        let key = ProgressSnapshot::storage_key(&snapshot.chapter_id);
        match serde_json::to_string(snapshot) {
            Ok(json) => self.storage.save(&key, &json),
            Err(e) => {
                tracing::error!(chapter_id = %snapshot.chapter_id, error = %e, "Failed to serialize progress");
                return;
            }
        }

        let Some(remote) = self.remote.clone() else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("No runtime for progress mirror; skipping remote save");
            return;
        };
        let snapshot = snapshot.clone();
        runtime.spawn(async move {
            if let Err(e) = remote.push(&snapshot).await {
                tracing::debug!(chapter_id = %snapshot.chapter_id, error = %e, "Remote progress save failed");
            }
        });
    }

    /// The saved snapshot for `chapter_id`, if one exists, parses, belongs to
    /// that chapter and is younger than 24 hours. Unusable snapshots are
    /// removed from storage.
    pub fn load(&self, chapter_id: &ChapterId) -> Option<ProgressSnapshot> {
        let raw = self
            .storage
            .load(&ProgressSnapshot::storage_key(chapter_id))?;

        let snapshot: ProgressSnapshot = match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(chapter_id = %chapter_id, error = %e, "Discarding unreadable progress");
                self.clear(chapter_id);
                return None;
            }
        };

        if !snapshot.is_usable_for(chapter_id, self.now_millis()) {
            tracing::debug!(chapter_id = %chapter_id, "Saved progress is stale or foreign");
            self.clear(chapter_id);
            return None;
        }
        Some(snapshot)
    }

    pub fn clear(&self, chapter_id: &ChapterId) {
        self.storage
            .remove(&ProgressSnapshot::storage_key(chapter_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronoquest_domain::{
        JobId, Player, PlayerStats, SceneId, SNAPSHOT_TTL_MS,
    };

    use crate::infrastructure::clock::FixedTimeProvider;
    use crate::infrastructure::storage::MemoryStorageProvider;
    use crate::ports::outbound::{ClientError, MockProgressSyncPort};

    const NOW: i64 = 1_760_000_000_000;

    fn snapshot(chapter: &str, timestamp: i64) -> ProgressSnapshot {
        ProgressSnapshot {
            chapter_id: ChapterId::new(chapter),
            player: Player::new("Ana"),
            stats: PlayerStats {
                health: 80,
                max_health: 100,
                money: 12,
                currency: "mon".into(),
                inventory: vec!["Rice".into()],
            },
            scene_history: vec![SceneId::new("a"), SceneId::new("b")],
            current_scene_id: Some(SceneId::new("b")),
            jobs_done: vec![JobId::new("j")],
            timestamp,
        }
    }

    fn store(storage: Arc<MemoryStorageProvider>) -> ProgressStore {
        ProgressStore::new(storage, None, Arc::new(FixedTimeProvider(NOW)))
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = store(Arc::new(MemoryStorageProvider::new()));
        let saved = snapshot("1", NOW - 1000);
        store.save(&saved);
        assert_eq!(store.load(&ChapterId::new("1")), Some(saved));
    }

    #[test]
    fn stale_foreign_and_corrupt_snapshots_are_absent() {
        let storage = Arc::new(MemoryStorageProvider::new());
        let store = store(storage.clone());

        store.save(&snapshot("1", NOW - SNAPSHOT_TTL_MS - 1));
        assert_eq!(store.load(&ChapterId::new("1")), None);
        assert_eq!(storage.load(&ProgressSnapshot::storage_key(&ChapterId::new("1"))), None);

        // A snapshot for chapter 3 filed under chapter 2's key
        let foreign = serde_json::to_string(&snapshot("3", NOW)).unwrap();
        storage.save(&ProgressSnapshot::storage_key(&ChapterId::new("2")), &foreign);
        assert_eq!(store.load(&ChapterId::new("2")), None);

        storage.save(&ProgressSnapshot::storage_key(&ChapterId::new("4")), "{oops");
        assert_eq!(store.load(&ChapterId::new("4")), None);
        assert_eq!(storage.load(&ProgressSnapshot::storage_key(&ChapterId::new("4"))), None);
    }

    #[test]
    fn clear_removes_the_snapshot() {
        let store = store(Arc::new(MemoryStorageProvider::new()));
        store.save(&snapshot("1", NOW));
        store.clear(&ChapterId::new("1"));
        assert_eq!(store.load(&ChapterId::new("1")), None);
    }

    #[tokio::test]
    async fn remote_failure_does_not_affect_local_save() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut remote = MockProgressSyncPort::new();
        remote.expect_push().times(1).returning(move |_| {
            let _ = tx.send(());
            Err(ClientError::Timeout)
        });

        let store = ProgressStore::new(
            Arc::new(MemoryStorageProvider::new()),
            Some(Arc::new(remote)),
            Arc::new(FixedTimeProvider(NOW)),
        );
        store.save(&snapshot("1", NOW));

        rx.recv().await.unwrap();
        assert!(store.load(&ChapterId::new("1")).is_some());
    }
}

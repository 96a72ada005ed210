//! Progress snapshots - enough state to resume a session
//!
//! A snapshot is written after every stat change and scene transition and
//! read once at session start. Snapshots for another chapter or older than
//! [`SNAPSHOT_TTL_MS`] are ignored.

use serde::{Deserialize, Serialize};

use crate::aggregates::{Chapter, StatEngine};
use crate::entities::Player;
use crate::ids::{ChapterId, JobId, SceneId};
use crate::runner::{ResumePoint, SceneRunner};
use crate::value_objects::PlayerStats;

/// Only the most recent scenes are kept in a snapshot.
pub const HISTORY_WINDOW: usize = 20;

/// Snapshots older than 24 hours are treated as absent.
pub const SNAPSHOT_TTL_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub chapter_id: ChapterId,
    #[serde(default)]
    pub player: Player,
    pub stats: PlayerStats,
    #[serde(default, alias = "history")]
    pub scene_history: Vec<SceneId>,
    #[serde(default, alias = "scene")]
    pub current_scene_id: Option<SceneId>,
    #[serde(default)]
    pub jobs_done: Vec<JobId>,
    /// Milliseconds since the Unix epoch.
    #[serde(alias = "ts")]
    pub timestamp: i64,
}

/// What to do with a loaded snapshot at session start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumePlan {
    /// No usable snapshot: start fresh at the entry scene.
    Fresh,
    /// Saved position is the entry scene: restore stats and jobs silently.
    RestoreAtEntry,
    /// Saved position is elsewhere: ask the player before resuming there.
    Ask { scene_id: SceneId },
}

impl ProgressSnapshot {
    pub fn capture(runner: &SceneRunner, stats: &StatEngine, now_ms: i64) -> Self {
        let history = runner.history();
        let start = history.len().saturating_sub(HISTORY_WINDOW);
        Self {
            chapter_id: runner.chapter().id.clone(),
            player: runner.player().clone(),
            stats: stats.stats().clone(),
            scene_history: history[start..].to_vec(),
            current_scene_id: Some(runner.current_scene_id().clone()),
            jobs_done: runner.jobs_done().to_vec(),
            timestamp: now_ms,
        }
    }

    pub fn is_fresh(&self, now_ms: i64) -> bool {
        self.timestamp > now_ms - SNAPSHOT_TTL_MS
    }

    /// Whether this snapshot may be used for `chapter` at `now_ms`.
    pub fn is_usable_for(&self, chapter_id: &ChapterId, now_ms: i64) -> bool {
        &self.chapter_id == chapter_id && self.is_fresh(now_ms)
    }

    pub fn plan(&self, chapter: &Chapter) -> ResumePlan {
        let entry = &chapter.scenes.entry_scene().id;
        match &self.current_scene_id {
            Some(scene) if chapter.scenes.contains(scene) && scene != entry => ResumePlan::Ask {
                scene_id: scene.clone(),
            },
            _ => ResumePlan::RestoreAtEntry,
        }
    }

    /// Resume point for [`SceneRunner::resume`], if the snapshot names a scene.
    pub fn resume_point(&self) -> Option<ResumePoint> {
        self.current_scene_id.as_ref().map(|scene| ResumePoint {
            current_scene_id: scene.clone(),
            history: self.scene_history.clone(),
            jobs_done: self.jobs_done.clone(),
            player: self.player.clone(),
        })
    }

    pub fn storage_key(chapter_id: &ChapterId) -> String {
        format!("cq_progress_{}", chapter_id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::runner::Action;

    const NOW: i64 = 1_760_000_000_000;

    fn chapter() -> Arc<Chapter> {
        Arc::new(
            Chapter::from_json(
                r#"{"id": 4, "title": "Rome", "startingStats": {"health": 100, "money": 5},
                    "scenes": [
                        {"id": "a", "type": "narrative", "next": "b"},
                        {"id": "b", "type": "minigame", "next": "c", "jobs": [{"id": "j", "title": "J", "pay": 3}]},
                        {"id": "c", "type": "summary"}
                    ]}"#,
            )
            .expect("chapter"),
        )
    }

    fn played() -> (SceneRunner, StatEngine) {
        let chapter = chapter();
        let mut stats = StatEngine::new(chapter.starting_player_stats());
        let mut runner = SceneRunner::new(chapter, Player::new("Ana"));
        let t = runner.ticket();
        runner.perform(&t, Action::Continue, &mut stats).expect("continue");
        let t = runner.ticket();
        runner
            .perform(&t, Action::Work(JobId::new("j")), &mut stats)
            .expect("work");
        (runner, stats)
    }

    #[test]
    fn round_trip_preserves_stats_history_and_jobs() {
        let (runner, stats) = played();
        let snapshot = ProgressSnapshot::capture(&runner, &stats, NOW);
        let json = serde_json::to_string(&snapshot).expect("serialize");
        let loaded: ProgressSnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(loaded, snapshot);
        assert_eq!(loaded.stats.money, 8);
        assert_eq!(loaded.scene_history, vec![SceneId::new("a"), SceneId::new("b")]);
        assert_eq!(loaded.jobs_done, vec![JobId::new("j")]);
    }

    #[test]
    fn reads_short_key_form() {
        let loaded: ProgressSnapshot = serde_json::from_str(
            r#"{"chapterId": 4, "player": {"name": "Ana"},
                "stats": {"health": 90, "maxHealth": 100, "money": 3, "currency": "coins", "inventory": []},
                "history": ["a", "b"], "scene": "b", "jobsDone": ["j"], "ts": 1760000000000}"#,
        )
        .expect("legacy snapshot");
        assert_eq!(loaded.current_scene_id, Some(SceneId::new("b")));
        assert_eq!(loaded.scene_history.len(), 2);
        assert_eq!(loaded.timestamp, NOW);
    }

    #[test]
    fn history_is_windowed() {
        let chapter = Arc::new(
            Chapter::from_json(
                r#"{"id": 1, "title": "Loop", "scenes": [
                    {"id": "s", "type": "setback", "next": "s"}
                ]}"#,
            )
            .expect("chapter"),
        );
        let mut stats = StatEngine::new(chapter.starting_player_stats());
        let mut runner = SceneRunner::new(chapter, Player::default());
        for _ in 0..30 {
            let t = runner.ticket();
            runner.perform(&t, Action::Continue, &mut stats).expect("loop");
        }
        let snapshot = ProgressSnapshot::capture(&runner, &stats, NOW);
        assert_eq!(snapshot.scene_history.len(), HISTORY_WINDOW);
    }

    #[test]
    fn stale_or_foreign_snapshots_are_unusable() {
        let (runner, stats) = played();
        let snapshot = ProgressSnapshot::capture(&runner, &stats, NOW - SNAPSHOT_TTL_MS - 1);
        assert!(!snapshot.is_usable_for(&ChapterId::new("4"), NOW));

        let fresh = ProgressSnapshot::capture(&runner, &stats, NOW - 1000);
        assert!(fresh.is_usable_for(&ChapterId::new("4"), NOW));
        assert!(!fresh.is_usable_for(&ChapterId::new("5"), NOW));
    }

    #[test]
    fn plan_asks_only_when_position_differs_from_entry() {
        let (runner, stats) = played();
        let snapshot = ProgressSnapshot::capture(&runner, &stats, NOW);
        assert_eq!(
            snapshot.plan(runner.chapter()),
            ResumePlan::Ask {
                scene_id: SceneId::new("b")
            }
        );

        let mut at_entry = snapshot.clone();
        at_entry.current_scene_id = Some(SceneId::new("a"));
        assert_eq!(at_entry.plan(runner.chapter()), ResumePlan::RestoreAtEntry);

        let mut unknown = snapshot;
        unknown.current_scene_id = Some(SceneId::new("deleted"));
        assert_eq!(unknown.plan(runner.chapter()), ResumePlan::RestoreAtEntry);
    }

    #[test]
    fn storage_key_is_namespaced_by_chapter() {
        assert_eq!(
            ProgressSnapshot::storage_key(&ChapterId::new("7")),
            "cq_progress_7"
        );
    }
}

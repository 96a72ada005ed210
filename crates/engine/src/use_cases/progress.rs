//! Server-side mirror of player progress, keyed by anonymous session id.

use std::sync::Arc;

use chronoquest_domain::ProgressSnapshot;

use crate::infrastructure::ports::{ProgressRepo, RepoError};

pub struct ProgressMirror {
    repo: Arc<dyn ProgressRepo>,
}

impl ProgressMirror {
    pub fn new(repo: Arc<dyn ProgressRepo>) -> Self {
        Self { repo }
    }

    pub async fn save(&self, session_id: &str, snapshot: &ProgressSnapshot) -> Result<(), RepoError> {
        tracing::debug!(
            session_id,
            chapter_id = %snapshot.chapter_id,
            scene_id = snapshot.current_scene_id.as_ref().map(|s| s.as_str()).unwrap_or(""),
            "Mirroring progress"
        );
        self.repo.save(session_id, snapshot).await
    }

    pub async fn load(&self, session_id: &str) -> Result<Option<ProgressSnapshot>, RepoError> {
        self.repo.load(session_id).await
    }
}

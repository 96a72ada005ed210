//! Chapter and glossary for one session.

use std::sync::Arc;

use chronoquest_domain::{Chapter, ChapterId, DomainError, Glossary, Scene, SceneId};

use crate::ports::outbound::{ClientError, ContentSource};

#[derive(Debug, thiserror::Error)]
pub enum ChapterStoreError {
    #[error("could not load chapter: {0}")]
    Client(#[from] ClientError),
    #[error("chapter is invalid: {0}")]
    Invalid(#[from] DomainError),
}

/// Immutable content for the session: loaded once, never refreshed.
#[derive(Debug, Clone)]
pub struct ChapterStore {
    chapter: Arc<Chapter>,
    glossary: Glossary,
}

impl ChapterStore {
    /// Load `chapter_id` and the glossary from `source`.
    ///
    /// Authoring issues are logged and play continues; a glossary that
    /// cannot be loaded leaves definitions empty.
    pub async fn load(
        source: &dyn ContentSource,
        chapter_id: &ChapterId,
    ) -> Result<Self, ChapterStoreError> {
        let document = source.chapter(chapter_id).await?;
        let chapter = Chapter::from_value(document)?;

        for issue in chapter.content_issues() {
            tracing::warn!(chapter_id = %chapter.id, issue = %issue, "Chapter content issue");
        }

        let glossary = match source.glossary().await {
            Ok(glossary) => glossary,
            Err(e) => {
                tracing::warn!(error = %e, "Glossary unavailable");
                Glossary::default()
            }
        };

        tracing::info!(
            chapter_id = %chapter.id,
            scenes = chapter.scenes.len(),
            terms = glossary.len(),
            "Chapter loaded"
        );

        Ok(Self::from_parts(Arc::new(chapter), glossary))
    }

    pub fn from_parts(chapter: Arc<Chapter>, glossary: Glossary) -> Self {
        Self { chapter, glossary }
    }

    pub fn chapter(&self) -> &Arc<Chapter> {
        &self.chapter
    }

    pub fn glossary(&self) -> &Glossary {
        &self.glossary
    }

    pub fn scene(&self, id: &SceneId) -> Option<&Scene> {
        self.chapter.scenes.get(id)
    }
}

//! Chapter content use cases: the catalog players read from and the
//! authoring path that writes new chapter files.

use std::sync::Arc;

use chronoquest_domain::{Chapter, ChapterId, ChapterSummary, Glossary};
use chronoquest_shared::{AdminChapterRequest, AdminChapterResponse};

use crate::infrastructure::ports::{ContentError, ContentRepo};

pub struct ChapterCatalog {
    content: Arc<dyn ContentRepo>,
}

impl ChapterCatalog {
    pub fn new(content: Arc<dyn ContentRepo>) -> Self {
        Self { content }
    }

    pub async fn list(&self) -> Result<Vec<ChapterSummary>, ContentError> {
        self.content.list_chapters().await
    }

    pub async fn get(&self, id: &ChapterId) -> Result<Option<serde_json::Value>, ContentError> {
        self.content.get_chapter(id).await
    }

    pub async fn glossary(&self) -> Result<Glossary, ContentError> {
        self.content.glossary().await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthoringError {
    #[error("Invalid chapter data")]
    MissingChapter,
    #[error("Chapter failed validation")]
    Invalid(Vec<String>),
    #[error(transparent)]
    Content(#[from] ContentError),
}

/// Validates an authored chapter and writes it to the content directory.
pub struct SaveChapter {
    content: Arc<dyn ContentRepo>,
}

impl SaveChapter {
    pub fn new(content: Arc<dyn ContentRepo>) -> Self {
        Self { content }
    }

    pub async fn execute(
        &self,
        request: AdminChapterRequest,
    ) -> Result<AdminChapterResponse, AuthoringError> {
        let document = request
            .chapter
            .filter(|doc| doc.get("id").is_some_and(|id| !id.is_null()))
            .ok_or(AuthoringError::MissingChapter)?;

        let chapter = Chapter::from_value(document.clone())
            .map_err(|e| AuthoringError::Invalid(vec![e.to_string()]))?;

        let (blocking, advisory): (Vec<_>, Vec<_>) = chapter
            .content_issues()
            .into_iter()
            .partition(|issue| issue.is_dangling_reference());
        for issue in &advisory {
            tracing::warn!(chapter_id = %chapter.id, issue = %issue, "Chapter content issue");
        }
        if !blocking.is_empty() {
            return Err(AuthoringError::Invalid(
                blocking.iter().map(ToString::to_string).collect(),
            ));
        }

        let path = self.content.save_chapter(&chapter.id, &document).await?;
        Ok(AdminChapterResponse {
            success: true,
            message: format!("Chapter {} saved", chapter.id),
            path,
        })
    }
}

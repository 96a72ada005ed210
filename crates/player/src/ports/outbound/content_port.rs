//! Chapter content source (the engine API, or a local directory)

use async_trait::async_trait;

use chronoquest_domain::{ChapterId, ChapterSummary, Glossary};

use super::ClientError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn list_chapters(&self) -> Result<Vec<ChapterSummary>, ClientError>;

    /// The chapter document as authored.
    async fn chapter(&self, id: &ChapterId) -> Result<serde_json::Value, ClientError>;

    async fn glossary(&self) -> Result<Glossary, ClientError>;
}

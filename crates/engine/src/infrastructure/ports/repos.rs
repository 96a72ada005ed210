//! Repository port traits for the local cache and chapter content.

use async_trait::async_trait;

use chronoquest_domain::{ChapterId, ChapterSummary, Glossary, ProgressSnapshot};
use chronoquest_shared::ImageRecord;

use super::error::{ContentError, RepoError};

// =============================================================================
// Image Cache
// =============================================================================

/// A generated image about to be cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImageRecord {
    /// The full prompt the hash was computed from.
    pub prompt: String,
    pub prompt_hash: String,
    pub r2_key: Option<String>,
    pub url: String,
    pub model: String,
    pub chapter_id: Option<String>,
    pub scene_id: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageCacheRepo: Send + Sync {
    async fn find_by_hash(&self, prompt_hash: &str) -> Result<Option<ImageRecord>, RepoError>;
    /// Inserting an already-cached hash is a no-op.
    async fn insert(&self, record: NewImageRecord) -> Result<(), RepoError>;
    /// Newest first.
    async fn list(
        &self,
        chapter_id: Option<String>,
        limit: u32,
    ) -> Result<Vec<ImageRecord>, RepoError>;
    async fn count(&self) -> Result<u64, RepoError>;
}

// =============================================================================
// Conversations
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationRecord {
    pub chapter_id: String,
    pub npc_name: String,
    pub user_msg: String,
    pub npc_reply: String,
    pub model: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversationRepo: Send + Sync {
    /// Most recent exchanges with one NPC in one chapter, newest first.
    async fn recent(
        &self,
        chapter_id: &str,
        npc_name: &str,
        limit: u32,
    ) -> Result<Vec<ConversationRecord>, RepoError>;
    async fn record(&self, record: ConversationRecord) -> Result<(), RepoError>;
    async fn count(&self) -> Result<u64, RepoError>;
}

// =============================================================================
// Progress Mirror
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressRepo: Send + Sync {
    /// Replaces whatever was stored for the session.
    async fn save(&self, session_id: &str, snapshot: &ProgressSnapshot) -> Result<(), RepoError>;
    async fn load(&self, session_id: &str) -> Result<Option<ProgressSnapshot>, RepoError>;
}

// =============================================================================
// Chapter Content
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepo: Send + Sync {
    /// Listing entries of every chapter file, in chapter order.
    async fn list_chapters(&self) -> Result<Vec<ChapterSummary>, ContentError>;
    /// The chapter document exactly as authored.
    async fn get_chapter(&self, id: &ChapterId) -> Result<Option<serde_json::Value>, ContentError>;
    async fn glossary(&self) -> Result<Glossary, ContentError>;
    /// Writes the document and returns the path written.
    async fn save_chapter(
        &self,
        id: &ChapterId,
        document: &serde_json::Value,
    ) -> Result<String, ContentError>;
}

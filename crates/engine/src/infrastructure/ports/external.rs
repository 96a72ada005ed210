//! External service port traits (AI worker).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use chronoquest_shared::ImageResponse;

use super::error::WorkerError;

// =============================================================================
// Chat Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One prior message sent to the worker as conversation context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// `POST {worker}/chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerChatRequest {
    pub user_message: String,
    pub npc_name: String,
    pub era: String,
    pub chapter_title: String,
    pub history: Vec<ChatTurn>,
    pub chapter_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkerChatReply {
    pub reply: String,
    #[serde(default)]
    pub model: Option<String>,
}

// =============================================================================
// Image Types
// =============================================================================

/// `POST {worker}/image`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerImageRequest {
    pub prompt: String,
    pub era: String,
    pub region: String,
    pub chapter_id: String,
    pub scene_id: String,
    pub width: u32,
    pub height: u32,
}

/// `GET {worker}/stats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct WorkerStats {
    #[serde(default)]
    pub images: u64,
    #[serde(default)]
    pub conversations: u64,
}

// =============================================================================
// Worker Port
// =============================================================================

/// The AI worker generates dialogue and images and owns the durable stores
/// behind them. The engine only ever talks to it through this port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiWorkerPort: Send + Sync {
    async fn chat(&self, request: WorkerChatRequest) -> Result<WorkerChatReply, WorkerError>;
    async fn image(&self, request: WorkerImageRequest) -> Result<ImageResponse, WorkerError>;
    async fn stats(&self) -> Result<WorkerStats, WorkerError>;
}

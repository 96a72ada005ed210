//! Response bodies returned by the engine

use serde::{Deserialize, Serialize};

/// `POST /api/ai/chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub model: String,
}

/// `POST /api/ai/image` and `POST /api/ai/portrait`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResponse {
    pub url: String,
    #[serde(default)]
    pub r2_key: Option<String>,
    #[serde(default)]
    pub cached: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Local cache row id, present on cache hits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveProgressResponse {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminChapterResponse {
    pub success: bool,
    pub message: String,
    pub path: String,
}

/// `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub server: String,
    pub worker_url: String,
    pub worker_ok: bool,
    pub local_images: u64,
    pub local_convos: u64,
}

/// `GET /api/images/stats`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageStatsResponse {
    pub local_images: u64,
    pub local_convos: u64,
    /// `None` when the worker stats endpoint is unreachable.
    pub worker_images: Option<u64>,
    pub worker_convos: Option<u64>,
    pub worker_url: String,
}

/// One row of the local image cache, as listed by `GET /api/images`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: i64,
    pub prompt_hash: String,
    pub prompt: String,
    pub chapter_id: Option<String>,
    pub scene_id: Option<String>,
    pub r2_key: Option<String>,
    pub url: String,
    pub model: Option<String>,
    pub created_at: String,
}

/// JSON error body: `{ "error": "..." }` plus optional detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            issues: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_issues(mut self, issues: Vec<String>) -> Self {
        self.issues = issues;
        self
    }
}

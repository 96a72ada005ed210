//! ChronoQuest Shared - wire types for the engine HTTP API
//!
//! This crate contains the types both sides of the HTTP API agree on:
//! - Request bodies (`POST /api/ai/*`, admin authoring)
//! - Response bodies (health, image cache records, error bodies)
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde, serde_json and the domain vocabulary
//! 2. **No business logic** - Pure data types and serialization
//! 3. **Field names match the wire** - request bodies are camelCase, cache
//!    records and stats are snake_case

pub mod requests;
pub mod responses;

pub use requests::{
    AdminChapterRequest, ChatRequest, ImageRequest, PortraitRequest, DEFAULT_IMAGE_HEIGHT,
    DEFAULT_IMAGE_WIDTH,
};
pub use responses::{
    AdminChapterResponse, ChatResponse, ErrorBody, HealthResponse, ImageRecord, ImageResponse,
    ImageStatsResponse, SaveProgressResponse,
};

// Vocabulary re-exported so clients need not depend on the domain directly
pub use chronoquest_domain::{ChapterSummary, ProgressSnapshot};

/// Header carrying the anonymous session id.
pub const SESSION_HEADER: &str = "x-session-id";

/// Cookie carrying the anonymous session id when the header is absent.
pub const SESSION_COOKIE: &str = "cq_sid";

//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - The local cache (could swap SQLite -> Postgres)
//! - The AI worker (could swap the HTTP worker -> a direct provider)
//! - Chapter content (could swap the data directory -> object storage)
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{
    ContentRepo, ConversationRecord, ConversationRepo, ImageCacheRepo, NewImageRecord,
    ProgressRepo,
};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{
    AiWorkerPort, ChatRole, ChatTurn, WorkerChatReply, WorkerChatRequest, WorkerImageRequest,
    WorkerStats,
};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::MockAiWorkerPort;
#[cfg(test)]
pub use repos::{MockContentRepo, MockConversationRepo, MockImageCacheRepo, MockProgressRepo};
#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{ContentError, RepoError, WorkerError};

//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing the game session to reach content, the AI worker proxy and local
//! storage without depending on concrete implementations.

pub mod ai_port;
pub mod content_port;
pub mod error;
pub mod platform;
pub mod progress_port;

pub use ai_port::AiContentPort;
pub use content_port::ContentSource;
pub use error::ClientError;
pub use platform::{storage_keys, ResumeConsent, StorageProvider, TimeProvider};
pub use progress_port::ProgressSyncPort;

#[cfg(test)]
pub use ai_port::MockAiContentPort;
#[cfg(test)]
pub use content_port::MockContentSource;
#[cfg(test)]
pub use progress_port::MockProgressSyncPort;

//! Errors crossing the player's outbound ports.

/// Failure reaching the engine or the local content directory.
///
/// The session never shows these to the player: content errors abort
/// loading, everything else degrades to offline content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out")]
    Timeout,

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("I/O error at {path}: {message}")]
    Io { path: String, message: String },
}

impl ClientError {
    pub fn io(path: impl std::fmt::Display, e: impl ToString) -> Self {
        Self::Io {
            path: path.to_string(),
            message: e.to_string(),
        }
    }

    pub fn invalid(e: impl ToString) -> Self {
        Self::InvalidResponse(e.to_string())
    }
}

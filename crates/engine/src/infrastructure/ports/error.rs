//! Error types for port operations.

/// Repository operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Entity not found - includes entity type and ID for actionable error messages.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Database operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepoError {
    /// Create a NotFound error with entity type and ID context.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors from the AI worker.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WorkerError {
    #[error("Worker request failed: {0}")]
    RequestFailed(String),
    #[error("Worker request timed out")]
    Timeout,
    #[error("Worker returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid worker response: {0}")]
    InvalidResponse(String),
}

impl WorkerError {
    /// Client errors fail the same way on every attempt. Timeouts are not
    /// retried so a request never waits longer than its configured bound.
    pub fn is_retryable(&self) -> bool {
        match self {
            WorkerError::RequestFailed(_) => true,
            WorkerError::Timeout => false,
            WorkerError::Status { status, .. } => *status >= 500 || *status == 429,
            WorkerError::InvalidResponse(_) => true,
        }
    }
}

/// Errors reading or writing chapter content on disk.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },
    #[error("Malformed content in {path}: {message}")]
    Parse { path: String, message: String },
}

impl ContentError {
    pub fn io(path: impl std::fmt::Display, e: impl ToString) -> Self {
        Self::Io {
            path: path.to_string(),
            message: e.to_string(),
        }
    }

    pub fn parse(path: impl std::fmt::Display, e: impl ToString) -> Self {
        Self::Parse {
            path: path.to_string(),
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_not_retried() {
        let bad_request = WorkerError::Status {
            status: 400,
            body: "bad".into(),
        };
        assert!(!bad_request.is_retryable());
        assert!(WorkerError::Status {
            status: 503,
            body: String::new()
        }
        .is_retryable());
        assert!(!WorkerError::Timeout.is_retryable());
    }
}

//! Unified error types for the domain layer
//!
//! Content problems come in two flavours: hard errors that prevent a chapter
//! from loading at all (`DomainError`) and authoring issues that are collected
//! and logged but never stop play (`ContentIssue`).

use std::fmt;

use thiserror::Error;

use crate::ids::SceneId;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Validation failed (e.g., duplicate scene ids)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Malformed chapter or snapshot document
    #[error("Parse error: {0}")]
    Parse(String),

    /// State transition not allowed
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

impl DomainError {
    /// Creates a validation error for content that violates a load-time
    /// invariant (empty scene list, duplicate ids, ...).
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid state transition error
    pub fn invalid_state_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// A non-fatal authoring problem found while validating a chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentIssue {
    pub scene_id: Option<SceneId>,
    pub kind: ContentIssueKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentIssueKind {
    /// A `next`, `outcome` or `quizScene` reference names no scene.
    DanglingReference { field: &'static str, target: SceneId },
    /// A quiz question's correct index is outside its options.
    AnswerOutOfRange { question: usize, answer: usize },
    /// A character-select scene exists but the chapter has no characters.
    NoCharacters,
    /// The same job id appears twice in one scene.
    DuplicateJob { job_id: String },
}

impl ContentIssue {
    pub fn new(scene_id: Option<SceneId>, kind: ContentIssueKind) -> Self {
        Self { scene_id, kind }
    }

    pub fn dangling(scene_id: &SceneId, field: &'static str, target: &SceneId) -> Self {
        Self::new(
            Some(scene_id.clone()),
            ContentIssueKind::DanglingReference {
                field,
                target: target.clone(),
            },
        )
    }

    /// Dangling references strand the player mid-chapter.
    pub fn is_dangling_reference(&self) -> bool {
        matches!(self.kind, ContentIssueKind::DanglingReference { .. })
    }
}

impl fmt::Display for ContentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scene) = &self.scene_id {
            write!(f, "scene '{}': ", scene)?;
        }
        match &self.kind {
            ContentIssueKind::DanglingReference { field, target } => {
                write!(f, "{} references missing scene '{}'", field, target)
            }
            ContentIssueKind::AnswerOutOfRange { question, answer } => {
                write!(
                    f,
                    "question {} marks option {} correct but has fewer options",
                    question + 1,
                    answer
                )
            }
            ContentIssueKind::NoCharacters => {
                f.write_str("character select scene but chapter defines no characters")
            }
            ContentIssueKind::DuplicateJob { job_id } => {
                write!(f, "job '{}' is listed more than once", job_id)
            }
        }
    }
}

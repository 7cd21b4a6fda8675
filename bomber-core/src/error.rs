//! Error types for the bomber engine

use thiserror::Error;

/// Main error type for attack engine operations
#[derive(Debug, Error, Clone)]
pub enum BomberError {
    #[error("Invalid task: {reason}")]
    InvalidTask { reason: String },

    #[error("Request build failed at index {index}: {reason}")]
    RequestBuild { index: usize, reason: String },

    #[error("Value generation failed: {reason}")]
    GeneratorFailed { reason: String },

    #[error("An attack is already in progress on this node")]
    AttackInProgress,

    #[error("Publish to topic '{topic}' failed: {reason}")]
    PublishFailed { topic: String, reason: String },

    #[error("Request execution failed: {reason}")]
    ExecutionFailed { reason: String },
}

impl BomberError {
    /// Create an invalid task error
    pub fn invalid_task(reason: impl Into<String>) -> Self {
        Self::InvalidTask {
            reason: reason.into(),
        }
    }

    /// Create a request build error for a specific plan index
    pub fn request_build(index: usize, reason: impl Into<String>) -> Self {
        Self::RequestBuild {
            index,
            reason: reason.into(),
        }
    }

    /// Create a generator error
    pub fn generator(reason: impl Into<String>) -> Self {
        Self::GeneratorFailed {
            reason: reason.into(),
        }
    }

    /// Create a publish error
    pub fn publish(topic: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PublishFailed {
            topic: topic.into(),
            reason: reason.into(),
        }
    }

    /// Create an execution error
    pub fn execution(reason: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            reason: reason.into(),
        }
    }

    /// Errors that abort an operation before any request is dispatched.
    pub fn is_fail_fast(&self) -> bool {
        matches!(
            self,
            BomberError::InvalidTask { .. } | BomberError::AttackInProgress
        )
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = std::result::Result<T, BomberError>;

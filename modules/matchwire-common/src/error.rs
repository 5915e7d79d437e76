//! Typed errors for the curation and generation pipelines.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The pipeline error taxonomy.
///
/// Curation recovers `Completion` and `Parse` into a fallback record;
/// generation treats them as terminal. `Store` is always fatal and
/// propagates to the invoking framework.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Required input field absent. Handled by skip, never retried.
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    /// Caller is missing, inactive, or under-privileged. Checked before
    /// any side effect.
    #[error("unauthorized: {reason}")]
    Unauthorized {
        /// Whether the caller exists in the admin registry at all. An
        /// unknown caller is an authentication failure, a known one a
        /// permission failure.
        known_caller: bool,
        reason: String,
    },

    /// The request itself is malformed (bad content type, zero quantity).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The completion API call failed.
    #[error("completion call failed: {0}")]
    Completion(String),

    /// The model reply could not be parsed into the expected shape.
    #[error("unparseable model reply: {0}")]
    Parse(String),

    /// Persistence failed. Fatal for the invocation.
    #[error("store error: {0}")]
    Store(String),
}

impl PipelineError {
    /// Structured error category exposed by the callable surface.
    pub fn code(&self) -> ErrorCode {
        match self {
            PipelineError::Unauthorized {
                known_caller: false, ..
            } => ErrorCode::Unauthenticated,
            PipelineError::Unauthorized { .. } => ErrorCode::PermissionDenied,
            PipelineError::MissingField { .. } | PipelineError::InvalidRequest(_) => {
                ErrorCode::InvalidArgument
            }
            PipelineError::Completion(_) | PipelineError::Parse(_) | PipelineError::Store(_) => {
                ErrorCode::Internal
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    Unauthenticated,
    PermissionDenied,
    InvalidArgument,
    Internal,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::Unauthenticated => write!(f, "unauthenticated"),
            ErrorCode::PermissionDenied => write!(f, "permission-denied"),
            ErrorCode::InvalidArgument => write!(f, "invalid-argument"),
            ErrorCode::Internal => write!(f, "internal"),
        }
    }
}

//! Compilation errors.

use bastion_core::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of compiler error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompilationErrorCode {
    /// No capability is mapped for the request
    UnknownCapability,
    /// Any internal fault
    CompilationFailure,
}

impl fmt::Display for CompilationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCapability => f.write_str("UNKNOWN_CAPABILITY"),
            Self::CompilationFailure => f.write_str("COMPILATION_FAILURE"),
        }
    }
}

/// A compilation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{error_code}: {message}")]
pub struct CompilationError {
    /// Error code
    pub error_code: CompilationErrorCode,
    /// Human-readable message
    pub message: String,
}

impl CompilationError {
    /// No capability for `key`
    #[must_use]
    pub fn unknown_capability(key: &str) -> Self {
        Self {
            error_code: CompilationErrorCode::UnknownCapability,
            message: format!("No capability found for: {key}"),
        }
    }

    /// Internal fault
    #[must_use]
    pub fn failure(reason: impl fmt::Display) -> Self {
        Self {
            error_code: CompilationErrorCode::CompilationFailure,
            message: format!("Compilation failed: {reason}"),
        }
    }
}

impl From<CoreError> for CompilationError {
    fn from(err: CoreError) -> Self {
        Self::failure(err)
    }
}

impl From<serde_json::Error> for CompilationError {
    fn from(err: serde_json::Error) -> Self {
        Self::failure(err)
    }
}

/// Result type for the compiler
pub type CompileOutcome<T> = Result<T, CompilationError>;

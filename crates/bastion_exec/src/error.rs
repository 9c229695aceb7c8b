//! Execution and signature errors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of executor error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionErrorCode {
    /// The executor does not implement the manifest's capability
    UnsupportedCapability,
    /// Bad lease signature or lease issued for another task
    InvalidLease,
    /// Lease window not open at the current time
    LeaseExpired,
    /// Capability-specific input validation failed
    InvalidInput,
    /// The side effect itself failed
    ExecutionFailed,
}

impl fmt::Display for ExecutionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::UnsupportedCapability => "UNSUPPORTED_CAPABILITY",
            Self::InvalidLease => "INVALID_LEASE",
            Self::LeaseExpired => "LEASE_EXPIRED",
            Self::InvalidInput => "INVALID_INPUT",
            Self::ExecutionFailed => "EXECUTION_FAILED",
        };
        f.write_str(s)
    }
}

/// Why an execution did not happen or did not succeed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{error_code}: {message}")]
pub struct ExecutionError {
    /// Error code
    pub error_code: ExecutionErrorCode,
    /// Human-readable message
    pub message: String,
}

impl ExecutionError {
    /// Create an error
    #[must_use]
    pub fn new(error_code: ExecutionErrorCode, message: impl Into<String>) -> Self {
        Self {
            error_code,
            message: message.into(),
        }
    }

    /// `INVALID_INPUT` with a message
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ExecutionErrorCode::InvalidInput, message)
    }

    /// `EXECUTION_FAILED` with a message
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(ExecutionErrorCode::ExecutionFailed, message)
    }
}

/// Key and signature handling errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// Secret seed is not 32 bytes
    #[error("invalid secret key")]
    InvalidSecretKey,
    /// Public key bytes do not decode to a curve point
    #[error("invalid public key")]
    InvalidPublicKey,
    /// Invalid hex encoding
    #[error("invalid hex encoding")]
    InvalidHex,
}

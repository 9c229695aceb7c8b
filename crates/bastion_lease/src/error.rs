//! Lease denial taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of lease denial codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaseErrorCode {
    /// Manifest or trust snapshot is structurally defective
    InvalidManifest,
    /// No valid clock reading
    LeaseExpired,
    /// Trust below threshold, or trust values of the wrong type
    InsufficientTrust,
    /// Hardware confirmation required but not given
    HrcRequired,
}

impl LeaseErrorCode {
    /// Wire spelling
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidManifest => "INVALID_MANIFEST",
            Self::LeaseExpired => "LEASE_EXPIRED",
            Self::InsufficientTrust => "INSUFFICIENT_TRUST",
            Self::HrcRequired => "HRC_REQUIRED",
        }
    }
}

impl fmt::Display for LeaseErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a lease was denied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{error_code}: {message}")]
pub struct LeaseError {
    /// Denial code
    pub error_code: LeaseErrorCode,
    /// Human-readable message
    pub message: String,
}

impl LeaseError {
    /// Create an error
    #[must_use]
    pub fn new(error_code: LeaseErrorCode, message: impl Into<String>) -> Self {
        Self {
            error_code,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_manifest(message: impl Into<String>) -> Self {
        Self::new(LeaseErrorCode::InvalidManifest, message)
    }

    pub(crate) fn expired(message: impl Into<String>) -> Self {
        Self::new(LeaseErrorCode::LeaseExpired, message)
    }

    pub(crate) fn insufficient_trust(message: impl Into<String>) -> Self {
        Self::new(LeaseErrorCode::InsufficientTrust, message)
    }

    pub(crate) fn hrc_required(message: impl Into<String>) -> Self {
        Self::new(LeaseErrorCode::HrcRequired, message)
    }
}

/// Result of one gate
pub type GateResult<T> = Result<T, LeaseError>;

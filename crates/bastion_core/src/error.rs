//! Core error types for BASTION.

/// Core result type
pub type CoreResult<T> = Result<T, CoreError>;

/// Core error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A value could not be encoded
    #[error("Encoding failed: {message}")]
    Encoding {
        /// Underlying encoder message
        message: String,
    },

    /// A floating point number has no canonical form
    #[error("Non-canonical number: {value}")]
    NonCanonicalNumber {
        /// The offending number as rendered by the encoder
        value: String,
    },

    /// Invalid hex encoding
    #[error("Invalid hex encoding")]
    InvalidHex,

    /// Invalid digest length
    #[error("Invalid hash length: {0} (expected 32)")]
    InvalidLength(usize),

    /// Unusable signing key
    #[error("Invalid key: {reason}")]
    InvalidKey {
        /// Why the key was rejected
        reason: String,
    },
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encoding {
            message: err.to_string(),
        }
    }
}

//! Validation error taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of validator error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationErrorCode {
    /// Text does not match the declaration grammar
    SyntaxError,
    /// `SUBJECT` type outside `USER`/`SYSTEM`
    UnknownSubjectType,
    /// `OBJECT` type outside the object enum
    UnknownObjectType,
    /// `VERB` class outside the verb enum
    UnknownVerbClass,
    /// One of the four declarations is absent
    MissingRequiredField,
    /// Metadata sensitivity outside the sensitivity enum
    InvalidMetadataValue,
    /// Scope empty or outside the identifier charset
    AmbiguousScope,
    /// A Hard-No invariant blocks the request
    HardNoViolation,
}

impl ValidationErrorCode {
    /// Wire spelling
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SyntaxError => "SYNTAX_ERROR",
            Self::UnknownSubjectType => "UNKNOWN_SUBJECT_TYPE",
            Self::UnknownObjectType => "UNKNOWN_OBJECT_TYPE",
            Self::UnknownVerbClass => "UNKNOWN_VERB_CLASS",
            Self::MissingRequiredField => "MISSING_REQUIRED_FIELD",
            Self::InvalidMetadataValue => "INVALID_METADATA_VALUE",
            Self::AmbiguousScope => "AMBIGUOUS_SCOPE",
            Self::HardNoViolation => "HARD_NO_VIOLATION",
        }
    }
}

impl fmt::Display for ValidationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position in the source text, 1-based.
///
/// Both fields are null for errors that concern the request as a whole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Line number
    pub line: Option<usize>,
    /// Column number (characters)
    pub column: Option<usize>,
}

impl Location {
    /// A concrete source position
    #[must_use]
    pub const fn at(line: usize, column: usize) -> Self {
        Self {
            line: Some(line),
            column: Some(column),
        }
    }

    /// No position
    #[must_use]
    pub const fn none() -> Self {
        Self {
            line: None,
            column: None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(f, "{line}:{column}"),
            (Some(line), None) => write!(f, "{line}"),
            _ => f.write_str("-"),
        }
    }
}

/// A validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{error_code} at {location}: {message}")]
pub struct ValidationError {
    /// Error code
    pub error_code: ValidationErrorCode,
    /// Human-readable message
    pub message: String,
    /// Source position, if any
    pub location: Location,
}

impl ValidationError {
    /// Create an error
    #[must_use]
    pub fn new(error_code: ValidationErrorCode, message: impl Into<String>, location: Location) -> Self {
        Self {
            error_code,
            message: message.into(),
            location,
        }
    }

    /// Shorthand for a located syntax error
    #[must_use]
    pub fn syntax(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::new(ValidationErrorCode::SyntaxError, message, Location::at(line, column))
    }
}

/// Result type for validator internals
pub type ValidationOutcome<T> = Result<T, ValidationError>;

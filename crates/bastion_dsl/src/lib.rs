//! BASTION DSL Validator
//!
//! Turns capability request text into a validated [`bastion_core::Ast`]
//! or a located validation error:
//!
//! ```text
//! SUBJECT(USER, user123)
//! VERB(MUTATE, move)
//! OBJECT(FILE, /docs/receipt.pdf)
//! META(tax_2024, true, MEDIUM, false)
//! ```
//!
//! Validation is pure: identical text always yields an identical result.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod hard_no;
pub mod lexer;
pub mod parser;
pub mod validator;

pub use error::{Location, ValidationError, ValidationErrorCode, ValidationOutcome};
pub use hard_no::HardNoRule;
pub use validator::{DslValidator, ValidationResult, validate};

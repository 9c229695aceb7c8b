//! BASTION Authorization Kernel
//!
//! Turns a declarative capability request into a time-bounded, signed
//! permission token:
//!
//! ```text
//! DSL text -> DslValidator -> Ast -> BlueprintCompiler -> TaskManifest
//!          -> LeaseManager (+ TrustSnapshot, now, HrcToken?) -> LeaseToken
//! ```
//!
//! Each stage is pure and synchronous; a [`Kernel`] holds only the
//! configuration injected at construction and may be shared across
//! threads freely. Nothing here performs side effects; executors consume
//! the resulting leases through `bastion_exec`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod kernel;

pub use kernel::{Authorization, Kernel};

// Stage re-exports
pub use bastion_blueprint::{BlueprintCompiler, CompilationError, CompilationErrorCode, CompilationResult};
pub use bastion_core::{HrcToken, KernelConfig, LeaseKey, LeaseToken, TaskManifest, TrustSnapshot};
pub use bastion_dsl::{DslValidator, ValidationError, ValidationErrorCode, ValidationResult};
pub use bastion_lease::{LeaseDecision, LeaseError, LeaseErrorCode, LeaseManager};

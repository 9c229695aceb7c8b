//! BASTION Blueprint Compiler
//!
//! Compiles a validated AST into a [`bastion_core::TaskManifest`]: the
//! capability is resolved from a closed table, identifiers and metadata
//! are copied verbatim, and the task id and provenance hash are both
//! derived from one canonical encoding of the AST. Two ASTs with equal
//! content compile to byte-identical manifests.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compiler;
pub mod error;

pub use compiler::{BlueprintCompiler, CompilationResult, Fingerprint, bind_inputs, resolve_capability};
pub use error::{CompilationError, CompilationErrorCode, CompileOutcome};

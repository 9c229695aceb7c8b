//! Compiler from validated AST to task manifest.

use crate::error::{CompilationError, CompileOutcome};
use bastion_core::id::DEFAULT_NAMESPACE;
use bastion_core::manifest::input_keys;
use bastion_core::{
    Ast, Capability, Constraints, ContentHash, KernelConfig, Provenance, TaskId, TaskManifest, to_canonical_bytes,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Outcome of compiling an AST
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompilationResult {
    /// The AST compiled to a manifest
    Success {
        /// The manifest
        manifest: TaskManifest,
    },
    /// Compilation failed
    Failure {
        /// Why
        error: CompilationError,
    },
}

impl CompilationResult {
    /// Whether compilation succeeded
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The manifest, if any
    #[must_use]
    pub const fn manifest(&self) -> Option<&TaskManifest> {
        match self {
            Self::Success { manifest } => Some(manifest),
            Self::Failure { .. } => None,
        }
    }

    /// The error, if any
    #[must_use]
    pub const fn error(&self) -> Option<&CompilationError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }

    /// Convert into a `Result`
    ///
    /// # Errors
    ///
    /// Returns the compilation error on failure
    pub fn into_result(self) -> CompileOutcome<TaskManifest> {
        match self {
            Self::Success { manifest } => Ok(manifest),
            Self::Failure { error } => Err(error),
        }
    }
}

impl From<CompileOutcome<TaskManifest>> for CompilationResult {
    fn from(outcome: CompileOutcome<TaskManifest>) -> Self {
        match outcome {
            Ok(manifest) => Self::Success { manifest },
            Err(error) => Self::Failure { error },
        }
    }
}

/// Canonical encoding and the two identifiers derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    /// Canonical bytes of the AST
    pub canonical: Vec<u8>,
    /// Name-based task id over `canonical`
    pub task_id: TaskId,
    /// SHA-256 over `canonical`
    pub ast_hash: ContentHash,
}

/// Deterministic AST to manifest compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlueprintCompiler {
    namespace: Uuid,
}

impl BlueprintCompiler {
    /// Create a compiler deriving task ids under `namespace`
    #[must_use]
    pub const fn new(namespace: Uuid) -> Self {
        Self { namespace }
    }

    /// Create a compiler for a kernel configuration
    #[must_use]
    pub const fn from_config(config: &KernelConfig) -> Self {
        Self::new(config.namespace())
    }

    /// Task-id namespace
    #[must_use]
    pub const fn namespace(&self) -> Uuid {
        self.namespace
    }

    /// Compile a validated AST
    #[must_use]
    pub fn compile(&self, ast: &Ast) -> CompilationResult {
        let outcome = self.try_compile(ast);
        match &outcome {
            Ok(manifest) => tracing::debug!(
                task_id = %manifest.task_id,
                capability = %manifest.capability_id,
                "manifest compiled"
            ),
            Err(err) => tracing::debug!(error_code = %err.error_code, "compilation failed"),
        }
        outcome.into()
    }

    /// Compile an AST received as JSON.
    ///
    /// The value is decoded strictly; unknown keys, wrong types or unknown
    /// enum members are a `COMPILATION_FAILURE`.
    #[must_use]
    pub fn compile_json(&self, ast: &Value) -> CompilationResult {
        match Ast::deserialize(ast) {
            Ok(ast) => self.compile(&ast),
            Err(err) => {
                tracing::debug!("AST rejected by decoder");
                CompilationResult::Failure {
                    error: CompilationError::from(err),
                }
            }
        }
    }

    /// Compile a validated AST
    ///
    /// # Errors
    ///
    /// Returns `UNKNOWN_CAPABILITY` if the request maps to no capability,
    /// `COMPILATION_FAILURE` if the AST cannot be encoded
    pub fn try_compile(&self, ast: &Ast) -> CompileOutcome<TaskManifest> {
        let capability_id = resolve_capability(ast)?;
        let inputs = bind_inputs(ast);
        let constraints = Constraints::from(&ast.metadata);
        let Fingerprint { task_id, ast_hash, .. } = self.fingerprint(ast)?;

        Ok(TaskManifest {
            task_id,
            capability_id,
            inputs,
            constraints,
            provenance: Provenance { ast_hash },
        })
    }

    /// Canonically encode `ast` and derive its identifiers
    ///
    /// # Errors
    ///
    /// Returns error if the AST cannot be encoded
    pub fn fingerprint(&self, ast: &Ast) -> CompileOutcome<Fingerprint> {
        let canonical = to_canonical_bytes(ast)?;
        let task_id = TaskId::derive(&self.namespace, &canonical);
        let ast_hash = ContentHash::compute(&canonical);
        Ok(Fingerprint {
            canonical,
            task_id,
            ast_hash,
        })
    }
}

impl Default for BlueprintCompiler {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

/// Map `(class, object, action)` to its capability
///
/// # Errors
///
/// Returns `UNKNOWN_CAPABILITY` for an unmapped combination
pub fn resolve_capability(ast: &Ast) -> CompileOutcome<Capability> {
    let (class, object, action) = (ast.verb.class, ast.object.kind, ast.verb.action.as_str());
    Capability::resolve(class, object, action)
        .ok_or_else(|| CompilationError::unknown_capability(&Capability::lookup_key(class, object, action)))
}

/// Copy request identifiers into manifest inputs, verbatim
#[must_use]
pub fn bind_inputs(ast: &Ast) -> BTreeMap<String, String> {
    [
        (input_keys::SUBJECT_IDENTIFIER, ast.subject.identifier.clone()),
        (input_keys::OBJECT_IDENTIFIER, ast.object.identifier.clone()),
        (input_keys::ACTION, ast.verb.action.clone()),
        (input_keys::SUBJECT_TYPE, ast.subject.kind.as_str().to_string()),
        (input_keys::OBJECT_TYPE, ast.object.kind.as_str().to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

//! The validate, compile, lease pipeline.

use bastion_blueprint::{BlueprintCompiler, CompilationError, CompilationResult};
use bastion_core::{Ast, CoreResult, HrcToken, KernelConfig, LeaseToken, TaskManifest, TrustSnapshot};
use bastion_dsl::{DslValidator, ValidationError, ValidationResult};
use bastion_lease::{LeaseDecision, LeaseError, LeaseManager};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where an authorization request ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Authorization {
    /// The text failed validation
    Rejected(ValidationError),
    /// The request is valid but maps to no capability
    Uncompilable(CompilationError),
    /// Compiled, but a lease gate failed
    Denied {
        /// The compiled request
        manifest: TaskManifest,
        /// First failing gate
        error: LeaseError,
    },
    /// Compiled and leased
    Granted {
        /// The compiled request
        manifest: TaskManifest,
        /// Lease to present to an executor
        lease: LeaseToken,
    },
}

impl Authorization {
    /// Whether a lease was issued
    #[must_use]
    pub const fn is_granted(&self) -> bool {
        matches!(self, Self::Granted { .. })
    }

    /// Compiled manifest, if compilation was reached and succeeded
    #[must_use]
    pub const fn manifest(&self) -> Option<&TaskManifest> {
        match self {
            Self::Denied { manifest, .. } | Self::Granted { manifest, .. } => Some(manifest),
            Self::Rejected(_) | Self::Uncompilable(_) => None,
        }
    }

    /// Issued lease
    #[must_use]
    pub const fn lease(&self) -> Option<&LeaseToken> {
        match self {
            Self::Granted { lease, .. } => Some(lease),
            _ => None,
        }
    }

    /// Wire code of the failure, if any
    #[must_use]
    pub fn error_code(&self) -> Option<String> {
        match self {
            Self::Rejected(e) => Some(e.error_code.to_string()),
            Self::Uncompilable(e) => Some(e.error_code.to_string()),
            Self::Denied { error, .. } => Some(error.error_code.to_string()),
            Self::Granted { .. } => None,
        }
    }
}

/// One authorization kernel instance.
///
/// All three stages are built from a single [`KernelConfig`]. Kernels
/// with different keys or namespaces coexist in one process; a lease from
/// one never verifies under another.
#[derive(Debug, Clone)]
pub struct Kernel {
    validator: DslValidator,
    compiler: BlueprintCompiler,
    leases: LeaseManager,
}

impl Kernel {
    /// Build a kernel
    ///
    /// # Errors
    ///
    /// Returns error if the configured lease key is unusable
    pub fn new(config: KernelConfig) -> CoreResult<Self> {
        let kernel = Self {
            validator: DslValidator::new(),
            compiler: BlueprintCompiler::from_config(&config),
            leases: LeaseManager::from_config(&config)?,
        };
        tracing::debug!(namespace = %config.namespace(), "kernel ready");
        Ok(kernel)
    }

    /// Task-id namespace
    #[must_use]
    pub const fn namespace(&self) -> Uuid {
        self.compiler.namespace()
    }

    /// Lease manager, for handing to executors as their authority
    #[must_use]
    pub const fn lease_manager(&self) -> &LeaseManager {
        &self.leases
    }

    /// Validate DSL text
    #[must_use]
    pub fn validate(&self, text: &str) -> ValidationResult {
        self.validator.validate(text)
    }

    /// Compile a validated AST
    #[must_use]
    pub fn compile(&self, ast: &Ast) -> CompilationResult {
        self.compiler.compile(ast)
    }

    /// Evaluate a manifest for a lease
    #[must_use]
    pub fn evaluate(
        &self,
        manifest: &TaskManifest,
        trust: &TrustSnapshot,
        now: i64,
        hrc: Option<&HrcToken>,
    ) -> LeaseDecision {
        self.leases.evaluate(manifest, trust, now, hrc)
    }

    /// Check a lease at time `now`
    #[must_use]
    pub fn verify_lease(&self, lease: &LeaseToken, now: i64) -> bool {
        self.leases.verify_lease(lease, now)
    }

    /// Run DSL text through every stage, stopping at the first failure
    #[must_use]
    pub fn authorize(&self, text: &str, trust: &TrustSnapshot, now: i64, hrc: Option<&HrcToken>) -> Authorization {
        let ast = match self.validate(text) {
            ValidationResult::Valid { ast } => ast,
            ValidationResult::Invalid { error } => return Authorization::Rejected(error),
        };
        let manifest = match self.compile(&ast) {
            CompilationResult::Success { manifest } => manifest,
            CompilationResult::Failure { error } => return Authorization::Uncompilable(error),
        };
        match self.evaluate(&manifest, trust, now, hrc) {
            LeaseDecision::Granted { lease } => Authorization::Granted { manifest, lease },
            LeaseDecision::Denied { error } => Authorization::Denied { manifest, error },
        }
    }
}

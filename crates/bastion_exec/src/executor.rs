//! Executor trait

use crate::error::ExecutionError;
use crate::result::ExecutionOutput;
use bastion_core::{Capability, TaskManifest};

/// A component that performs the side effect of a capability.
///
/// Implementations are only ever called through
/// [`AdmissionGuard`](crate::guard::AdmissionGuard), after the lease has
/// been verified and the capability checked against
/// [`capabilities`](Executor::capabilities).
pub trait Executor: Send + Sync {
    /// Capabilities this executor implements
    fn capabilities(&self) -> &[Capability];

    /// Whether `capability` is implemented
    fn supports(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Capability-specific input checks, run before any side effect
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` if the manifest inputs are unacceptable
    fn validate_inputs(&self, manifest: &TaskManifest) -> Result<(), ExecutionError>;

    /// Perform the side effect
    ///
    /// # Errors
    ///
    /// Returns an error if the effect fails; the guard reports it as
    /// `EXECUTION_FAILED`
    fn perform(&self, manifest: &TaskManifest) -> Result<ExecutionOutput, ExecutionError>;
}

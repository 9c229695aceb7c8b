//! Lease admission and signed execution.
//!
//! [`AdmissionGuard`] is the only path from a lease to a side effect. It
//! checks the lease, then the executor, and signs whatever happens with
//! the executor's [`ResultSigner`].

use crate::authority::LeaseAuthority;
use crate::error::{ExecutionError, ExecutionErrorCode};
use crate::executor::Executor;
use crate::result::ExecutionResult;
use crate::signer::{ExecutorPublicKey, ResultSigner};
use bastion_core::{CoreResult, LeaseToken, TaskManifest};

/// Wraps an executor with lease enforcement
#[derive(Debug)]
pub struct AdmissionGuard<A, E> {
    authority: A,
    executor: E,
    signer: ResultSigner,
}

impl<A: LeaseAuthority, E: Executor> AdmissionGuard<A, E> {
    /// Create a guard
    #[must_use]
    pub fn new(authority: A, executor: E, signer: ResultSigner) -> Self {
        Self {
            authority,
            executor,
            signer,
        }
    }

    /// Key that verifies this guard's results
    #[must_use]
    pub fn public_key(&self) -> ExecutorPublicKey {
        self.signer.public_key()
    }

    /// Wrapped executor
    #[must_use]
    pub const fn executor(&self) -> &E {
        &self.executor
    }

    /// Decide whether `manifest` may run under `lease` at `now`
    ///
    /// # Errors
    ///
    /// - `INVALID_LEASE` on a bad signature or a lease for another task
    /// - `LEASE_EXPIRED` when the window is not open at `now`
    /// - `UNSUPPORTED_CAPABILITY` when the executor lacks the capability
    /// - `INVALID_INPUT` when the executor rejects the inputs
    pub fn admit(&self, manifest: &TaskManifest, lease: &LeaseToken, now: i64) -> Result<(), ExecutionError> {
        if !self.authority.verify_signature(lease) {
            return Err(ExecutionError::new(
                ExecutionErrorCode::InvalidLease,
                "Lease signature verification failed",
            ));
        }
        if !self.authority.window_open(lease, now) {
            return Err(ExecutionError::new(
                ExecutionErrorCode::LeaseExpired,
                format!("Lease not valid at {now}"),
            ));
        }
        if manifest.task_id != *lease.task_id.as_str() {
            return Err(ExecutionError::new(
                ExecutionErrorCode::InvalidLease,
                format!("Lease issued for {}, not {}", lease.task_id, manifest.task_id),
            ));
        }
        if !self.executor.supports(manifest.capability_id) {
            return Err(ExecutionError::new(
                ExecutionErrorCode::UnsupportedCapability,
                format!("Executor does not implement {}", manifest.capability_id),
            ));
        }
        self.executor.validate_inputs(manifest).map_err(|e| match e.error_code {
            ExecutionErrorCode::InvalidInput => e,
            _ => ExecutionError::invalid_input(e.message),
        })
    }

    /// Admit, perform and sign.
    ///
    /// Admission and executor failures come back as signed `FAILURE`
    /// results; an executor error of any code is reported as
    /// `EXECUTION_FAILED`.
    ///
    /// # Errors
    ///
    /// Returns error only if the result cannot be encoded for signing
    pub fn execute(&self, manifest: &TaskManifest, lease: &LeaseToken, now: i64) -> CoreResult<ExecutionResult> {
        if let Err(error) = self.admit(manifest, lease, now) {
            tracing::debug!(task_id = %manifest.task_id, error_code = %error.error_code, "execution refused");
            return self.signer.failure(error);
        }

        match self.executor.perform(manifest) {
            Ok(output) => {
                tracing::debug!(task_id = %manifest.task_id, capability = %manifest.capability_id, "execution succeeded");
                self.signer.success(output)
            }
            Err(e) => {
                tracing::debug!(task_id = %manifest.task_id, error = %e, "execution failed");
                self.signer.failure(ExecutionError::failed(e.message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{ExecutionOutput, ExecutionStatus};
    use crate::signer::ResultVerifier;
    use bastion_core::manifest::input_keys;
    use bastion_core::{Capability, Constraints, ContentHash, LeaseKey, Provenance, Sensitivity, TaskId, TrustSnapshot};
    use bastion_lease::LeaseManager;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const NOW: i64 = 1_700_000_000;

    /// Records how often `perform` runs
    struct FileMover {
        performed: AtomicUsize,
        fail_with: Option<&'static str>,
    }

    impl FileMover {
        fn new() -> Self {
            Self {
                performed: AtomicUsize::new(0),
                fail_with: None,
            }
        }

        fn failing(reason: &'static str) -> Self {
            Self {
                fail_with: Some(reason),
                ..Self::new()
            }
        }

        fn count(&self) -> usize {
            self.performed.load(Ordering::SeqCst)
        }
    }

    impl Executor for FileMover {
        fn capabilities(&self) -> &[Capability] {
            &[Capability::FileMove, Capability::FileRename]
        }

        fn validate_inputs(&self, manifest: &TaskManifest) -> Result<(), ExecutionError> {
            match manifest.input(input_keys::OBJECT_IDENTIFIER) {
                Some(path) if path.starts_with('/') => Ok(()),
                Some(path) => Err(ExecutionError::invalid_input(format!("Not an absolute path: {path}"))),
                None => Err(ExecutionError::failed("missing object")),
            }
        }

        fn perform(&self, manifest: &TaskManifest) -> Result<ExecutionOutput, ExecutionError> {
            self.performed.fetch_add(1, Ordering::SeqCst);
            if let Some(reason) = self.fail_with {
                return Err(ExecutionError::invalid_input(reason));
            }
            let mut undo = BTreeMap::new();
            undo.insert("restore".to_string(), manifest.input(input_keys::OBJECT_IDENTIFIER).unwrap_or_default().to_string());
            Ok(ExecutionOutput::new(manifest.task_id.to_string(), manifest.capability_id)
                .with_summary("moved", "true")
                .with_undo(undo))
        }
    }

    fn manager() -> LeaseManager {
        LeaseManager::new(&LeaseKey::new("guard-test-key").unwrap()).unwrap()
    }

    fn manifest(capability: Capability, object: &str) -> TaskManifest {
        let mut inputs = BTreeMap::new();
        inputs.insert(input_keys::OBJECT_IDENTIFIER.to_string(), object.to_string());
        inputs.insert(input_keys::ACTION.to_string(), "move".to_string());
        TaskManifest {
            task_id: TaskId::derive(&bastion_core::id::DEFAULT_NAMESPACE, object.as_bytes()),
            capability_id: capability,
            inputs,
            constraints: Constraints {
                scope: "docs".to_string(),
                reversible: true,
                sensitivity: Sensitivity::Low,
                hrc_required: false,
            },
            provenance: Provenance {
                ast_hash: ContentHash::compute(object.as_bytes()),
            },
        }
    }

    fn lease_for(mgr: &LeaseManager, m: &TaskManifest) -> LeaseToken {
        mgr.evaluate(m, &TrustSnapshot::new(0.9, 0.5), NOW, None)
            .into_result()
            .unwrap()
    }

    fn guard(executor: FileMover) -> AdmissionGuard<LeaseManager, FileMover> {
        AdmissionGuard::new(manager(), executor, ResultSigner::from_seed(&[3u8; 32]).unwrap())
    }

    fn code(result: &ExecutionResult) -> ExecutionErrorCode {
        result.error.as_ref().unwrap().error_code
    }

    #[test]
    fn test_execute_success_is_signed() {
        let g = guard(FileMover::new());
        let m = manifest(Capability::FileMove, "/a.pdf");
        let lease = lease_for(&manager(), &m);

        let result = g.execute(&m, &lease, NOW + 10).unwrap();
        assert_eq!(result.status, ExecutionStatus::Success);
        let output = result.output.as_ref().unwrap();
        assert_eq!(output.task_id, m.task_id.to_string());
        assert_eq!(output.undo_metadata.as_ref().unwrap()["restore"], "/a.pdf");
        assert!(ResultVerifier::new(g.public_key()).unwrap().verify(&result));
        assert_eq!(g.executor().count(), 1);
    }

    #[test]
    fn test_forged_lease_never_performs() {
        let g = guard(FileMover::new());
        let m = manifest(Capability::FileMove, "/a.pdf");
        let mut lease = lease_for(&manager(), &m);
        lease.expires_at += 1;

        let result = g.execute(&m, &lease, NOW).unwrap();
        assert_eq!(result.status, ExecutionStatus::Failure);
        assert_eq!(code(&result), ExecutionErrorCode::InvalidLease);
        assert!(ResultVerifier::new(g.public_key()).unwrap().verify(&result));
        assert_eq!(g.executor().count(), 0);
    }

    #[test]
    fn test_lease_from_other_kernel_rejected() {
        let g = guard(FileMover::new());
        let m = manifest(Capability::FileMove, "/a.pdf");
        let other = LeaseManager::new(&LeaseKey::new("another-key").unwrap()).unwrap();
        let lease = lease_for(&other, &m);
        assert_eq!(g.admit(&m, &lease, NOW).unwrap_err().error_code, ExecutionErrorCode::InvalidLease);
    }

    #[test]
    fn test_window_boundaries() {
        let g = guard(FileMover::new());
        let m = manifest(Capability::FileMove, "/a.pdf");
        let lease = lease_for(&manager(), &m);

        assert!(g.admit(&m, &lease, NOW).is_ok());
        assert!(g.admit(&m, &lease, NOW + 299).is_ok());
        assert_eq!(g.admit(&m, &lease, NOW + 300).unwrap_err().error_code, ExecutionErrorCode::LeaseExpired);
        assert_eq!(g.admit(&m, &lease, NOW - 1).unwrap_err().error_code, ExecutionErrorCode::LeaseExpired);
    }

    #[test]
    fn test_lease_for_other_task_rejected() {
        let g = guard(FileMover::new());
        let m = manifest(Capability::FileMove, "/a.pdf");
        let other = manifest(Capability::FileMove, "/b.pdf");
        let lease = lease_for(&manager(), &other);
        assert_eq!(g.admit(&m, &lease, NOW).unwrap_err().error_code, ExecutionErrorCode::InvalidLease);
    }

    #[test]
    fn test_unsupported_capability() {
        let g = guard(FileMover::new());
        let m = manifest(Capability::FileDelete, "/a.pdf");
        let lease = lease_for(&manager(), &m);
        let result = g.execute(&m, &lease, NOW).unwrap();
        assert_eq!(code(&result), ExecutionErrorCode::UnsupportedCapability);
        assert_eq!(g.executor().count(), 0);
    }

    #[test]
    fn test_input_validation_precedes_perform() {
        let g = guard(FileMover::new());
        let m = manifest(Capability::FileRename, "relative.txt");
        let lease = lease_for(&manager(), &m);
        let result = g.execute(&m, &lease, NOW).unwrap();
        assert_eq!(code(&result), ExecutionErrorCode::InvalidInput);
        assert_eq!(g.executor().count(), 0);
    }

    #[test]
    fn test_validation_errors_normalized_to_invalid_input() {
        let g = guard(FileMover::new());
        let mut m = manifest(Capability::FileMove, "/a.pdf");
        m.inputs.remove(input_keys::OBJECT_IDENTIFIER);
        let lease = lease_for(&manager(), &m);
        let err = g.admit(&m, &lease, NOW).unwrap_err();
        assert_eq!(err.error_code, ExecutionErrorCode::InvalidInput);
        assert_eq!(err.message, "missing object");
    }

    #[test]
    fn test_perform_failure_maps_to_execution_failed() {
        let g = guard(FileMover::failing("disk full"));
        let m = manifest(Capability::FileMove, "/a.pdf");
        let lease = lease_for(&manager(), &m);
        let result = g.execute(&m, &lease, NOW).unwrap();
        assert_eq!(result.status, ExecutionStatus::Failure);
        assert_eq!(code(&result), ExecutionErrorCode::ExecutionFailed);
        assert_eq!(result.error.as_ref().unwrap().message, "disk full");
        assert!(result.output.is_none());
        assert_eq!(g.executor().count(), 1);
    }
}

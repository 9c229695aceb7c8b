//! Lease evaluation and verification.

use crate::error::{LeaseError, LeaseErrorCode};
use crate::gate::{self, DecisionTrail, GateState};
use crate::signer::LeaseSigner;
use bastion_core::{CoreResult, HrcToken, KernelConfig, LeaseKey, LeaseToken, LeaseWindow, TaskManifest, TrustSnapshot};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a lease evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaseDecision {
    /// All gates passed
    Granted {
        /// The issued lease
        lease: LeaseToken,
    },
    /// A gate failed
    Denied {
        /// The first failing gate's reason
        error: LeaseError,
    },
}

impl LeaseDecision {
    /// Whether a lease was issued
    #[must_use]
    pub const fn is_granted(&self) -> bool {
        matches!(self, Self::Granted { .. })
    }

    /// The lease, if granted
    #[must_use]
    pub const fn lease(&self) -> Option<&LeaseToken> {
        match self {
            Self::Granted { lease } => Some(lease),
            Self::Denied { .. } => None,
        }
    }

    /// The denial, if denied
    #[must_use]
    pub const fn error(&self) -> Option<&LeaseError> {
        match self {
            Self::Granted { .. } => None,
            Self::Denied { error } => Some(error),
        }
    }

    /// Convert into a `Result`
    ///
    /// # Errors
    ///
    /// Returns the denial
    pub fn into_result(self) -> Result<LeaseToken, LeaseError> {
        match self {
            Self::Granted { lease } => Ok(lease),
            Self::Denied { error } => Err(error),
        }
    }
}

/// Fail-closed lease manager.
///
/// Holds only its signing key; every evaluation depends on its arguments
/// alone, so one manager can serve concurrent callers without locking.
#[derive(Debug, Clone)]
pub struct LeaseManager {
    signer: LeaseSigner,
}

impl LeaseManager {
    /// Create a manager signing with `key`
    ///
    /// # Errors
    ///
    /// Returns error if the key is unusable
    pub fn new(key: &LeaseKey) -> CoreResult<Self> {
        Ok(Self {
            signer: LeaseSigner::new(key)?,
        })
    }

    /// Create a manager for a kernel configuration
    ///
    /// # Errors
    ///
    /// Returns error if the configured key is unusable
    pub fn from_config(config: &KernelConfig) -> CoreResult<Self> {
        Self::new(config.lease_key())
    }

    /// Evaluate a compiled manifest
    #[must_use]
    pub fn evaluate(
        &self,
        manifest: &TaskManifest,
        trust: &TrustSnapshot,
        now: i64,
        hrc: Option<&HrcToken>,
    ) -> LeaseDecision {
        self.evaluate_traced(manifest, trust, now, hrc).0
    }

    /// Evaluate a compiled manifest, returning the visited gate states
    #[must_use]
    pub fn evaluate_traced(
        &self,
        manifest: &TaskManifest,
        trust: &TrustSnapshot,
        now: i64,
        hrc: Option<&HrcToken>,
    ) -> (LeaseDecision, DecisionTrail) {
        let projected = (
            serde_json::to_value(manifest),
            serde_json::to_value(trust),
            hrc.map(serde_json::to_value).transpose(),
        );
        match projected {
            (Ok(manifest), Ok(trust), Ok(hrc)) => self.evaluate_json_traced(&manifest, &trust, &Value::from(now), hrc.as_ref()),
            _ => {
                let mut trail = DecisionTrail::new();
                trail.record(GateState::CheckingIntegrity);
                trail.record(GateState::Denied);
                let error = LeaseError::new(LeaseErrorCode::InvalidManifest, "Request could not be encoded");
                (LeaseDecision::Denied { error }, trail)
            }
        }
    }

    /// Evaluate wire values
    #[must_use]
    pub fn evaluate_json(&self, manifest: &Value, trust: &Value, now: &Value, hrc: Option<&Value>) -> LeaseDecision {
        self.evaluate_json_traced(manifest, trust, now, hrc).0
    }

    /// Evaluate wire values, returning the visited gate states
    #[must_use]
    pub fn evaluate_json_traced(
        &self,
        manifest: &Value,
        trust: &Value,
        now: &Value,
        hrc: Option<&Value>,
    ) -> (LeaseDecision, DecisionTrail) {
        let mut trail = DecisionTrail::new();
        let mut state = GateState::INITIAL;
        let mut window: Option<LeaseWindow> = None;

        while !state.is_terminal() {
            trail.record(state);
            let passed = match state {
                GateState::CheckingIntegrity => gate::check_integrity(manifest),
                GateState::CheckingTime => gate::check_time(now).map(|w| window = Some(w)),
                GateState::CheckingTrust => gate::check_trust(trust),
                GateState::CheckingHrc => gate::check_hrc(manifest, hrc),
                GateState::Granted | GateState::Denied => Ok(()),
            };
            if let Err(error) = passed {
                tracing::debug!(gate = %state, error_code = %error.error_code, "lease denied");
                trail.record(GateState::Denied);
                return (LeaseDecision::Denied { error }, trail);
            }
            state = state.advance();
        }

        let task_id = manifest.get("task_id").and_then(Value::as_str);
        let (Some(task_id), Some(window)) = (task_id, window) else {
            trail.record(GateState::Denied);
            let error = LeaseError::new(LeaseErrorCode::InvalidManifest, "Gate chain ended without a grant");
            return (LeaseDecision::Denied { error }, trail);
        };

        trail.record(GateState::Granted);
        let lease = self.issue(task_id, window);
        tracing::debug!(task_id = %lease.task_id, expires_at = lease.expires_at, "lease granted");
        (LeaseDecision::Granted { lease }, trail)
    }

    fn issue(&self, task_id: &str, window: LeaseWindow) -> LeaseToken {
        LeaseToken {
            task_id: task_id.to_string(),
            issued_at: window.issued_at(),
            expires_at: window.expires_at(),
            signature: self.signer.sign(task_id, window.issued_at(), window.expires_at()),
        }
    }

    /// Check that `lease` carries a valid signature over its own fields
    #[must_use]
    pub fn verify_signature(&self, lease: &LeaseToken) -> bool {
        self.signer.verify(lease)
    }

    /// Check a lease at time `now`.
    ///
    /// False on a bad signature, on bounds other than a 300 second
    /// window, before `issued_at`, and from `expires_at` onwards.
    #[must_use]
    pub fn verify_lease(&self, lease: &LeaseToken, now: i64) -> bool {
        let valid = self.verify_signature(lease) && lease.window().is_some_and(|w| w.contains(now));
        tracing::trace!(task_id = %lease.task_id, valid, "lease verified");
        valid
    }

    /// Check a wire lease at wire time `now`; false on any structural defect
    #[must_use]
    pub fn verify_lease_json(&self, lease: &Value, now: &Value) -> bool {
        match (LeaseToken::deserialize(lease), now.as_i64()) {
            (Ok(lease), Some(now)) => self.verify_lease(&lease, now),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_core::{Constraints, ContentHash, Provenance, Sensitivity, TaskId};
    use serde_json::json;
    use std::collections::BTreeMap;

    const NOW: i64 = 1_700_000_000;

    fn manager() -> LeaseManager {
        LeaseManager::new(&LeaseKey::new("test-lease-key").unwrap()).unwrap()
    }

    fn manifest(hrc_required: bool) -> TaskManifest {
        let mut inputs = BTreeMap::new();
        inputs.insert("action".to_string(), "move".to_string());
        TaskManifest {
            task_id: TaskId::derive(&bastion_core::id::DEFAULT_NAMESPACE, b"{}"),
            capability_id: bastion_core::Capability::FileMove,
            inputs,
            constraints: Constraints {
                scope: "test".to_string(),
                reversible: true,
                sensitivity: Sensitivity::Medium,
                hrc_required,
            },
            provenance: Provenance {
                ast_hash: ContentHash::compute(b"{}"),
            },
        }
    }

    fn wire_manifest() -> Value {
        json!({
            "task_id": "test-task-123",
            "capability_id": "FILE_MOVE",
            "inputs": {"subject_identifier": "user123", "object_identifier": "/docs/test.pdf", "action": "move"},
            "constraints": {"scope": "test", "reversible": true, "sensitivity": "MEDIUM", "hrc_required": false},
            "provenance": {"ast_hash": "abc123"}
        })
    }

    fn trust(score: f64, minimum: f64) -> TrustSnapshot {
        TrustSnapshot::new(score, minimum)
    }

    #[test]
    fn test_grant() {
        let m = manifest(false);
        let decision = manager().evaluate(&m, &trust(0.8, 0.5), NOW, None);
        let lease = decision.lease().unwrap();
        assert_eq!(m.task_id, *lease.task_id.as_str());
        assert_eq!(lease.issued_at, NOW);
        assert_eq!(lease.expires_at, NOW + 300);
        assert_eq!(lease.signature.len(), 64);
    }

    #[test]
    fn test_trust_boundary_is_inclusive() {
        let mgr = manager();
        let m = manifest(false);
        assert!(mgr.evaluate(&m, &trust(0.5, 0.5), NOW, None).is_granted());
        let denied = mgr.evaluate(&m, &trust(0.3, 0.5), NOW, None);
        assert_eq!(denied.error().unwrap().error_code, LeaseErrorCode::InsufficientTrust);
    }

    #[test]
    fn test_nan_trust_is_wrong_type() {
        let denied = manager().evaluate(&manifest(false), &trust(f64::NAN, 0.5), NOW, None);
        assert_eq!(denied.error().unwrap().error_code, LeaseErrorCode::InsufficientTrust);
    }

    #[test]
    fn test_hrc_required() {
        let mgr = manager();
        let m = manifest(true);
        let denied = mgr.evaluate(&m, &trust(0.9, 0.5), NOW, None);
        assert_eq!(denied.error().unwrap().error_code, LeaseErrorCode::HrcRequired);

        let refused = HrcToken {
            confirmed: false,
            confirmed_at: NOW - 10,
        };
        let denied = mgr.evaluate(&m, &trust(0.9, 0.5), NOW, Some(&refused));
        assert_eq!(denied.error().unwrap().error_code, LeaseErrorCode::HrcRequired);

        let confirmed = HrcToken::confirmed(NOW - 10);
        assert!(mgr.evaluate(&m, &trust(0.9, 0.5), NOW, Some(&confirmed)).is_granted());
    }

    #[test]
    fn test_hrc_token_ignored_when_not_required() {
        let refused = HrcToken {
            confirmed: false,
            confirmed_at: 0,
        };
        assert!(manager().evaluate(&manifest(false), &trust(0.9, 0.5), NOW, Some(&refused)).is_granted());
    }

    #[test]
    fn test_negative_now() {
        let denied = manager().evaluate(&manifest(false), &trust(0.9, 0.5), -1, None);
        assert_eq!(denied.error().unwrap().error_code, LeaseErrorCode::LeaseExpired);
    }

    #[test]
    fn test_wire_now_must_be_integer() {
        let mgr = manager();
        let t = json!({"trust_score": 0.9, "minimum_required": 0.5});
        for now in [json!(1.5), json!("1"), json!(null), json!(-5)] {
            let d = mgr.evaluate_json(&wire_manifest(), &t, &now, None);
            assert_eq!(d.error().unwrap().error_code, LeaseErrorCode::LeaseExpired, "{now}");
        }
        assert!(mgr.evaluate_json(&wire_manifest(), &t, &json!(0), None).is_granted());
    }

    #[test]
    fn test_fail_closed_ordering() {
        let mgr = manager();
        let mut broken = wire_manifest();
        broken.as_object_mut().unwrap().remove("provenance");

        // every later gate would also fail
        let (decision, trail) = mgr.evaluate_json_traced(
            &broken,
            &json!({"trust_score": 0.0, "minimum_required": 1.0}),
            &json!(-1),
            None,
        );
        assert_eq!(decision.error().unwrap().error_code, LeaseErrorCode::InvalidManifest);
        assert_eq!(trail.states(), &[GateState::CheckingIntegrity, GateState::Denied]);

        let (decision, trail) = mgr.evaluate_json_traced(&wire_manifest(), &json!({}), &json!(-1), None);
        assert_eq!(decision.error().unwrap().error_code, LeaseErrorCode::LeaseExpired);
        assert!(!trail.visited(GateState::CheckingTrust));

        let mut needs_hrc = wire_manifest();
        needs_hrc["constraints"]["hrc_required"] = json!(true);
        let (decision, trail) = mgr.evaluate_json_traced(&needs_hrc, &json!({"trust_score": 0.1}), &json!(NOW), None);
        assert_eq!(decision.error().unwrap().error_code, LeaseErrorCode::InvalidManifest);
        assert!(!trail.visited(GateState::CheckingHrc));
    }

    #[test]
    fn test_granted_trail_visits_every_gate() {
        let (decision, trail) = manager().evaluate_traced(&manifest(false), &trust(1.0, 0.0), NOW, None);
        assert!(decision.is_granted());
        assert_eq!(
            trail.states(),
            &[
                GateState::CheckingIntegrity,
                GateState::CheckingTime,
                GateState::CheckingTrust,
                GateState::CheckingHrc,
                GateState::Granted,
            ]
        );
    }

    #[test]
    fn test_non_boolean_hrc_flag_is_invalid_manifest() {
        let mut m = wire_manifest();
        m["constraints"]["hrc_required"] = json!(1);
        let d = manager().evaluate_json(&m, &json!({"trust_score": 1, "minimum_required": 0}), &json!(NOW), None);
        assert_eq!(d.error().unwrap().error_code, LeaseErrorCode::InvalidManifest);
    }

    #[test]
    fn test_deterministic_signature() {
        let mgr = manager();
        let m = manifest(false);
        let a = mgr.evaluate(&m, &trust(0.8, 0.5), NOW, None);
        let b = mgr.evaluate(&m, &trust(0.8, 0.5), NOW, None);
        assert_eq!(a.lease().unwrap().signature, b.lease().unwrap().signature);
    }

    #[test]
    fn test_inputs_not_mutated() {
        let mgr = manager();
        let m = wire_manifest();
        let t = json!({"trust_score": 0.8, "minimum_required": 0.5});
        let h = json!({"confirmed": true, "confirmed_at": 1});
        let (m0, t0, h0) = (m.clone(), t.clone(), h.clone());
        let _ = mgr.evaluate_json(&m, &t, &json!(NOW), Some(&h));
        assert_eq!((m, t, h), (m0, t0, h0));
    }

    #[test]
    fn test_verify_lease_window() {
        let mgr = manager();
        let lease = mgr
            .evaluate(&manifest(false), &trust(0.8, 0.5), NOW, None)
            .into_result()
            .unwrap();
        assert!(mgr.verify_lease(&lease, NOW));
        assert!(mgr.verify_lease(&lease, lease.expires_at - 1));
        assert!(!mgr.verify_lease(&lease, lease.expires_at));
        assert!(!mgr.verify_lease(&lease, lease.expires_at + 1));
        assert!(!mgr.verify_lease(&lease, NOW - 1));
    }

    #[test]
    fn test_verify_lease_rejects_tampering() {
        let mgr = manager();
        let lease = mgr
            .evaluate(&manifest(false), &trust(0.8, 0.5), NOW, None)
            .into_result()
            .unwrap();

        let mut extended = lease.clone();
        extended.expires_at += 3_600;
        assert!(!mgr.verify_lease(&extended, NOW));

        let mut other_task = lease.clone();
        other_task.task_id = "another-task".to_string();
        assert!(!mgr.verify_lease(&other_task, NOW));

        let foreign = LeaseManager::new(&LeaseKey::new("other-key").unwrap()).unwrap();
        assert!(!foreign.verify_lease(&lease, NOW));
    }

    #[test]
    fn test_verify_lease_json_structural_defects() {
        let mgr = manager();
        let lease = mgr
            .evaluate(&manifest(false), &trust(0.8, 0.5), NOW, None)
            .into_result()
            .unwrap();
        let wire = serde_json::to_value(&lease).unwrap();
        assert!(mgr.verify_lease_json(&wire, &json!(NOW)));
        assert!(!mgr.verify_lease_json(&wire, &json!(1.5)));

        let mut missing = wire.clone();
        missing.as_object_mut().unwrap().remove("signature");
        assert!(!mgr.verify_lease_json(&missing, &json!(NOW)));

        let mut wrong_type = wire.clone();
        wrong_type["issued_at"] = json!("now");
        assert!(!mgr.verify_lease_json(&wrong_type, &json!(NOW)));

        assert!(!mgr.verify_lease_json(&json!("lease"), &json!(NOW)));
    }

    #[test]
    fn test_decision_envelope() {
        let json = serde_json::to_value(manager().evaluate(&manifest(true), &trust(0.8, 0.5), NOW, None)).unwrap();
        assert_eq!(json["status"], "DENIED");
        assert_eq!(json["error"]["error_code"], "HRC_REQUIRED");

        let json = serde_json::to_value(manager().evaluate(&manifest(false), &trust(0.8, 0.5), NOW, None)).unwrap();
        assert_eq!(json["status"], "GRANTED");
        assert_eq!(json["lease"]["expires_at"], NOW + 300);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_trust_threshold_monotone(score in 0.0f64..1.0, minimum in 0.0f64..1.0) {
                let decision = manager().evaluate(&manifest(false), &trust(score, minimum), NOW, None);
                prop_assert_eq!(decision.is_granted(), score >= minimum);
            }

            #[test]
            fn prop_granted_lease_verifies_inside_window(now in 0i64..4_000_000_000, offset in 0i64..300) {
                let mgr = manager();
                let lease = mgr.evaluate(&manifest(false), &trust(1.0, 0.0), now, None).into_result().unwrap();
                prop_assert!(mgr.verify_lease(&lease, now + offset));
                prop_assert!(!mgr.verify_lease(&lease, now + 300 + offset));
            }
        }
    }
}

//! Lease tokens and the inputs of an authorization decision.

use crate::time::LeaseWindow;
use serde::{Deserialize, Serialize};

/// Caller-supplied trust reading, evaluated at grant time only
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrustSnapshot {
    /// Current trust score
    pub trust_score: f64,
    /// Threshold the score must reach
    pub minimum_required: f64,
}

impl TrustSnapshot {
    /// Create a snapshot
    #[must_use]
    pub const fn new(trust_score: f64, minimum_required: f64) -> Self {
        Self {
            trust_score,
            minimum_required,
        }
    }
}

/// Out-of-band hardware confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HrcToken {
    /// Whether the user confirmed on the device
    pub confirmed: bool,
    /// When the confirmation happened (Unix seconds)
    pub confirmed_at: i64,
}

impl HrcToken {
    /// A positive confirmation at `confirmed_at`
    #[must_use]
    pub const fn confirmed(confirmed_at: i64) -> Self {
        Self {
            confirmed: true,
            confirmed_at,
        }
    }
}

/// A short-lived, signed permission to execute one manifest
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeaseToken {
    /// Task the lease authorizes
    pub task_id: String,
    /// Issue time (Unix seconds)
    pub issued_at: i64,
    /// Expiry time, always `issued_at + 300`
    pub expires_at: i64,
    /// Hex keyed digest over `task_id:issued_at:expires_at`
    pub signature: String,
}

impl LeaseToken {
    /// The lease's validity window, if its bounds are well formed
    #[must_use]
    pub fn window(&self) -> Option<LeaseWindow> {
        LeaseWindow::from_bounds(self.issued_at, self.expires_at)
    }

    /// The message covered by the signature
    #[must_use]
    pub fn signing_payload(&self) -> String {
        signing_payload(&self.task_id, self.issued_at, self.expires_at)
    }
}

/// Build the signed message `task_id:issued_at:expires_at`
#[must_use]
pub fn signing_payload(task_id: &str, issued_at: i64, expires_at: i64) -> String {
    format!("{task_id}:{issued_at}:{expires_at}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_payload() {
        let lease = LeaseToken {
            task_id: "abc".to_string(),
            issued_at: 10,
            expires_at: 310,
            signature: String::new(),
        };
        assert_eq!(lease.signing_payload(), "abc:10:310");
    }

    #[test]
    fn test_window_of_tampered_bounds() {
        let mut lease = LeaseToken {
            task_id: "abc".to_string(),
            issued_at: 10,
            expires_at: 310,
            signature: String::new(),
        };
        assert!(lease.window().is_some());
        lease.expires_at = 10_000;
        assert!(lease.window().is_none());
    }

    #[test]
    fn test_hrc_confirmed() {
        let token = HrcToken::confirmed(42);
        assert!(token.confirmed);
        assert_eq!(token.confirmed_at, 42);
    }

    #[test]
    fn test_trust_snapshot_wire_shape() {
        let json = serde_json::to_value(TrustSnapshot::new(0.5, 0.25)).unwrap();
        assert_eq!(json["trust_score"], 0.5);
        assert_eq!(json["minimum_required"], 0.25);
    }
}

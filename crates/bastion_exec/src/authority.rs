//! Lease verification seam.
//!
//! Executors never trust a lease on sight. They check it through a
//! [`LeaseAuthority`]: in process that is the kernel's own
//! [`LeaseManager`]; a distributed deployment substitutes an asymmetric
//! verifier holding only the kernel's public key.

use bastion_core::LeaseToken;
use bastion_lease::LeaseManager;

/// Something that can vouch for leases
pub trait LeaseAuthority: Send + Sync {
    /// Whether the lease's signature matches its fields
    fn verify_signature(&self, lease: &LeaseToken) -> bool;

    /// Whether the lease's window is well formed and open at `now`
    fn window_open(&self, lease: &LeaseToken, now: i64) -> bool {
        lease.window().is_some_and(|w| w.contains(now))
    }
}

impl LeaseAuthority for LeaseManager {
    fn verify_signature(&self, lease: &LeaseToken) -> bool {
        LeaseManager::verify_signature(self, lease)
    }
}

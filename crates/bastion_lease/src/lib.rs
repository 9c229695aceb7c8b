//! BASTION Lease Manager
//!
//! Decides whether a compiled manifest may run, and if so issues a
//! short-lived signed [`bastion_core::LeaseToken`]. Four gates run in a
//! fixed order and the first failure denies:
//!
//! 1. manifest integrity (`INVALID_MANIFEST`)
//! 2. clock reading (`LEASE_EXPIRED`)
//! 3. trust threshold (`INSUFFICIENT_TRUST`, or `INVALID_MANIFEST` for a
//!    missing field)
//! 4. hardware-rooted confirmation when required (`HRC_REQUIRED`)
//!
//! Leases last exactly 300 seconds and are signed with HMAC-SHA256 under
//! the key held by the [`LeaseManager`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod gate;
pub mod manager;
pub mod signer;

pub use error::{GateResult, LeaseError, LeaseErrorCode};
pub use gate::{DecisionTrail, GateState};
pub use manager::{LeaseDecision, LeaseManager};
pub use signer::LeaseSigner;

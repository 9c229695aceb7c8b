//! BASTION Executor Contract
//!
//! What an execution layer must do with a lease before touching the world:
//! verify it through a [`LeaseAuthority`], match it to the manifest, check
//! the capability and inputs, and only then perform. Every outcome,
//! including refusals, is returned as an [`ExecutionResult`] signed with
//! the executor's own Ed25519 key.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod authority;
pub mod error;
pub mod executor;
pub mod guard;
pub mod result;
pub mod signer;

pub use authority::LeaseAuthority;
pub use error::{ExecutionError, ExecutionErrorCode, SignatureError};
pub use executor::Executor;
pub use guard::AdmissionGuard;
pub use result::{ExecutionOutput, ExecutionResult, ExecutionStatus};
pub use signer::{ExecutorPublicKey, ResultSigner, ResultVerifier};

//! BASTION Core Types
//!
//! Wire types shared by the validator, compiler, lease manager and
//! executors. This crate contains pure types and logic with no I/O.
//! Every type serializes to the exact field names and enum spellings of
//! the kernel's wire contract.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod canonical;
pub mod capability;
pub mod config;
pub mod error;
pub mod hash;
pub mod id;
pub mod lease;
pub mod manifest;
pub mod time;

// Re-exports
pub use ast::{Ast, MetadataNode, ObjectNode, ObjectType, Sensitivity, SubjectNode, SubjectType, VerbClass, VerbNode};
pub use canonical::to_canonical_bytes;
pub use capability::Capability;
pub use config::{KernelConfig, LeaseKey};
pub use error::{CoreError, CoreResult};
pub use hash::ContentHash;
pub use id::TaskId;
pub use lease::{HrcToken, LeaseToken, TrustSnapshot};
pub use manifest::{Constraints, Provenance, TaskManifest};
pub use time::{LEASE_DURATION_SECS, LeaseWindow};

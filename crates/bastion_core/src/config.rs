//! Kernel configuration.
//!
//! Everything a kernel instance needs beyond its inputs is injected here
//! at construction: the task-id namespace and the lease signing key. Two
//! kernels built from different configurations share no state.

use crate::error::{CoreError, CoreResult};
use crate::id::DEFAULT_NAMESPACE;
use secrecy::{ExposeSecret, SecretBox};
use std::fmt;
use uuid::Uuid;

/// Secret key for lease signatures.
///
/// Zeroized on drop and never printed.
pub struct LeaseKey(SecretBox<[u8]>);

impl LeaseKey {
    /// Wrap raw key material
    ///
    /// # Errors
    ///
    /// Returns error if the key is empty
    pub fn new(bytes: impl Into<Vec<u8>>) -> CoreResult<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(CoreError::InvalidKey {
                reason: "lease key must not be empty".to_string(),
            });
        }
        Ok(Self(SecretBox::new(bytes.into_boxed_slice())))
    }

    /// Borrow the key material
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.0.expose_secret()
    }
}

impl Clone for LeaseKey {
    fn clone(&self) -> Self {
        Self(SecretBox::new(self.expose().to_vec().into_boxed_slice()))
    }
}

impl fmt::Debug for LeaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LeaseKey([REDACTED])")
    }
}

/// Immutable configuration of one kernel instance
#[derive(Debug, Clone)]
pub struct KernelConfig {
    namespace: Uuid,
    lease_key: LeaseKey,
}

impl KernelConfig {
    /// Create a configuration with the default task-id namespace
    #[must_use]
    pub fn new(lease_key: LeaseKey) -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE,
            lease_key,
        }
    }

    /// Use a different task-id namespace
    #[must_use]
    pub fn with_namespace(mut self, namespace: Uuid) -> Self {
        self.namespace = namespace;
        self
    }

    /// Task-id namespace
    #[must_use]
    pub const fn namespace(&self) -> Uuid {
        self.namespace
    }

    /// Lease signing key
    #[must_use]
    pub const fn lease_key(&self) -> &LeaseKey {
        &self.lease_key
    }
}

//! Content-addressed task identifiers.
//!
//! A [`TaskId`] is a name-based UUID (version 5) over the canonical
//! encoding of an AST. The same request always yields the same id; no
//! randomness or clock is involved.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default namespace for task ids (RFC 4122 DNS namespace)
pub const DEFAULT_NAMESPACE: Uuid = Uuid::NAMESPACE_DNS;

/// Task identifier - identifies one compiled capability request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Derive from canonical bytes under a namespace
    #[must_use]
    pub fn derive(namespace: &Uuid, canonical: &[u8]) -> Self {
        Self(Uuid::new_v5(namespace, canonical))
    }

    /// Get as UUID
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl PartialEq<str> for TaskId {
    fn eq(&self, other: &str) -> bool {
        Uuid::parse_str(other).is_ok_and(|uuid| uuid == self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_is_deterministic() {
        let a = TaskId::derive(&DEFAULT_NAMESPACE, b"{\"k\":1}");
        let b = TaskId::derive(&DEFAULT_NAMESPACE, b"{\"k\":1}");
        assert_eq!(a, b);
    }

    #[test]
    fn test_derive_is_version_5() {
        let id = TaskId::derive(&DEFAULT_NAMESPACE, b"payload");
        assert_eq!(id.as_uuid().get_version_num(), 5);
    }

    #[test]
    fn test_namespace_changes_id() {
        let other = Uuid::from_bytes([7u8; 16]);
        let a = TaskId::derive(&DEFAULT_NAMESPACE, b"payload");
        let b = TaskId::derive(&other, b"payload");
        assert_ne!(a, b);
    }

    #[test]
    fn test_known_v5_vector() {
        // uuid5(NAMESPACE_DNS, "python.org")
        let id = TaskId::derive(&DEFAULT_NAMESPACE, b"python.org");
        assert_eq!(id.to_string(), "886313e1-3b8a-5372-9b90-0c9aee199e5d");
    }

    #[test]
    fn test_compare_with_str() {
        let id = TaskId::derive(&DEFAULT_NAMESPACE, b"payload");
        let text = id.to_string();
        assert!(id == *text.as_str());
        assert!(id == *text.to_uppercase().as_str());
        assert!(id != *"not-a-uuid");
        assert!(id != *TaskId::derive(&DEFAULT_NAMESPACE, b"other").to_string().as_str());
    }

    #[test]
    fn test_serializes_as_string() {
        let id = TaskId::derive(&DEFAULT_NAMESPACE, b"payload");
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, id.to_string());
    }
}

//! Task manifests: the compiled form of a capability request.

use crate::ast::{MetadataNode, Sensitivity};
use crate::capability::Capability;
use crate::hash::ContentHash;
use crate::id::TaskId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Keys of [`TaskManifest::inputs`]
pub mod input_keys {
    /// `subject.identifier`
    pub const SUBJECT_IDENTIFIER: &str = "subject_identifier";
    /// `object.identifier`
    pub const OBJECT_IDENTIFIER: &str = "object_identifier";
    /// `verb.action`, case preserved
    pub const ACTION: &str = "action";
    /// `subject.type`
    pub const SUBJECT_TYPE: &str = "subject_type";
    /// `object.type`
    pub const OBJECT_TYPE: &str = "object_type";
}

/// Execution constraints, copied verbatim from the AST metadata
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Constraints {
    /// Scope label
    pub scope: String,
    /// Whether the effect can be undone
    pub reversible: bool,
    /// Sensitivity level
    pub sensitivity: Sensitivity,
    /// Whether hardware-rooted confirmation is required
    pub hrc_required: bool,
}

impl From<&MetadataNode> for Constraints {
    fn from(meta: &MetadataNode) -> Self {
        Self {
            scope: meta.scope.clone(),
            reversible: meta.reversible,
            sensitivity: meta.sensitivity,
            hrc_required: meta.hrc_required,
        }
    }
}

/// Where a manifest came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Provenance {
    /// SHA-256 of the canonical AST encoding
    pub ast_hash: ContentHash,
}

/// A compiled, identified capability request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskManifest {
    /// Content-addressed task id
    pub task_id: TaskId,
    /// Resolved capability
    pub capability_id: Capability,
    /// Bound inputs, see [`input_keys`]
    pub inputs: BTreeMap<String, String>,
    /// Execution constraints
    pub constraints: Constraints,
    /// Provenance fingerprint
    pub provenance: Provenance,
}

impl TaskManifest {
    /// Look up a bound input
    #[must_use]
    pub fn input(&self, key: &str) -> Option<&str> {
        self.inputs.get(key).map(String::as_str)
    }
}

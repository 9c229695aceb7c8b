//! Signed execution results.

use crate::error::ExecutionError;
use bastion_core::{Capability, CoreResult, to_canonical_bytes};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Overall outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    /// The side effect happened
    Success,
    /// It did not
    Failure,
}

/// What a successful execution produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutput {
    /// Task executed
    pub task_id: String,
    /// Capability performed
    pub capability_id: Capability,
    /// Executor-defined summary
    pub result_summary: BTreeMap<String, String>,
    /// What is needed to undo the effect, if reversible
    pub undo_metadata: Option<BTreeMap<String, String>>,
}

impl ExecutionOutput {
    /// Output with an empty summary
    #[must_use]
    pub fn new(task_id: impl Into<String>, capability_id: Capability) -> Self {
        Self {
            task_id: task_id.into(),
            capability_id,
            result_summary: BTreeMap::new(),
            undo_metadata: None,
        }
    }

    /// Add a summary entry
    #[must_use]
    pub fn with_summary(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.result_summary.insert(key.into(), value.into());
        self
    }

    /// Attach undo metadata
    #[must_use]
    pub fn with_undo(mut self, undo: BTreeMap<String, String>) -> Self {
        self.undo_metadata = Some(undo);
        self
    }
}

/// An execution outcome signed by the executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Outcome
    pub status: ExecutionStatus,
    /// Output, on success
    pub output: Option<ExecutionOutput>,
    /// Error, on failure
    pub error: Option<ExecutionError>,
    /// Hex Ed25519 signature over [`ExecutionResult::signing_bytes`]
    pub signature: String,
}

#[derive(Serialize)]
struct SignedBody<'a> {
    status: ExecutionStatus,
    output: Option<&'a ExecutionOutput>,
    error: Option<&'a ExecutionError>,
}

impl ExecutionResult {
    /// Canonical encoding of `{status, output, error}`
    ///
    /// # Errors
    ///
    /// Returns error if the body cannot be encoded
    pub fn signing_bytes(&self) -> CoreResult<Vec<u8>> {
        body_bytes(self.status, self.output.as_ref(), self.error.as_ref())
    }

    /// Whether the executor reports success
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, ExecutionStatus::Success)
    }
}

pub(crate) fn body_bytes(
    status: ExecutionStatus,
    output: Option<&ExecutionOutput>,
    error: Option<&ExecutionError>,
) -> CoreResult<Vec<u8>> {
    to_canonical_bytes(&SignedBody { status, output, error })
}

//! The four authorization gates and the state machine that chains them.
//!
//! ```text
//! CHECKING_INTEGRITY -> CHECKING_TIME -> CHECKING_TRUST -> CHECKING_HRC -> GRANTED
//!         |                   |                |                |
//!         +-------------------+----------------+----------------+--> DENIED
//! ```
//!
//! Gates read wire values so that every malformed input has a defined
//! denial. A failing gate ends evaluation; later gates never see the
//! request.

use crate::error::{GateResult, LeaseError};
use bastion_core::LeaseWindow;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// Manifest fields every gate may rely on
pub const REQUIRED_MANIFEST_FIELDS: [&str; 5] = ["task_id", "capability_id", "inputs", "constraints", "provenance"];

/// State of one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateState {
    /// Manifest integrity
    CheckingIntegrity,
    /// Clock reading
    CheckingTime,
    /// Trust threshold
    CheckingTrust,
    /// Hardware-rooted confirmation
    CheckingHrc,
    /// Terminal: lease issued
    Granted,
    /// Terminal: request denied
    Denied,
}

impl GateState {
    /// Initial state
    pub const INITIAL: Self = Self::CheckingIntegrity;

    /// Whether no further transition is possible
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Granted | Self::Denied)
    }

    /// State after the current gate passes
    #[must_use]
    pub const fn advance(&self) -> Self {
        match self {
            Self::CheckingIntegrity => Self::CheckingTime,
            Self::CheckingTime => Self::CheckingTrust,
            Self::CheckingTrust => Self::CheckingHrc,
            Self::CheckingHrc | Self::Granted => Self::Granted,
            Self::Denied => Self::Denied,
        }
    }

    /// Wire spelling
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CheckingIntegrity => "CHECKING_INTEGRITY",
            Self::CheckingTime => "CHECKING_TIME",
            Self::CheckingTrust => "CHECKING_TRUST",
            Self::CheckingHrc => "CHECKING_HRC",
            Self::Granted => "GRANTED",
            Self::Denied => "DENIED",
        }
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// States visited by one evaluation, in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionTrail(Vec<GateState>);

impl DecisionTrail {
    /// Empty trail
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub(crate) fn record(&mut self, state: GateState) {
        self.0.push(state);
    }

    /// Visited states
    #[must_use]
    pub fn states(&self) -> &[GateState] {
        &self.0
    }

    /// Whether `state` was entered
    #[must_use]
    pub fn visited(&self, state: GateState) -> bool {
        self.0.contains(&state)
    }
}

/// Gate 1: manifest integrity
///
/// # Errors
///
/// `INVALID_MANIFEST` on a missing field, an empty or non-string
/// `task_id`, or a non-boolean `constraints.hrc_required`
pub fn check_integrity(manifest: &Value) -> GateResult<()> {
    let Some(fields) = manifest.as_object() else {
        return Err(LeaseError::invalid_manifest("Manifest must be an object"));
    };
    if let Some(missing) = REQUIRED_MANIFEST_FIELDS.iter().find(|f| !fields.contains_key(**f)) {
        return Err(LeaseError::invalid_manifest(format!("Missing required field: {missing}")));
    }
    match fields.get("task_id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => {}
        _ => return Err(LeaseError::invalid_manifest("task_id must be a non-empty string")),
    }
    let Some(constraints) = fields.get("constraints").and_then(Value::as_object) else {
        return Err(LeaseError::invalid_manifest("constraints must be an object"));
    };
    if constraints.get("hrc_required").is_some_and(|v| !v.is_boolean()) {
        return Err(LeaseError::invalid_manifest("hrc_required must be boolean"));
    }
    Ok(())
}

/// Gate 2: clock reading.
///
/// A reading that is not a non-negative integer is classified as
/// `LEASE_EXPIRED`.
///
/// # Errors
///
/// `LEASE_EXPIRED` for a non-integer or negative `now`, or one whose
/// lease expiry would overflow
pub fn check_time(now: &Value) -> GateResult<LeaseWindow> {
    let Some(now) = now.as_i64() else {
        return Err(LeaseError::expired(format!("Current time must be integer, got {now}")));
    };
    if now < 0 {
        return Err(LeaseError::expired(format!("Current time cannot be negative: {now}")));
    }
    LeaseWindow::starting_at(now).ok_or_else(|| LeaseError::expired(format!("Current time out of range: {now}")))
}

/// Gate 3: trust threshold, inclusive.
///
/// # Errors
///
/// `INVALID_MANIFEST` if a field is missing, `INSUFFICIENT_TRUST` if a
/// field is not a finite number or the score is below the minimum
pub fn check_trust(trust: &Value) -> GateResult<()> {
    let field = |name: &str| {
        trust
            .get(name)
            .ok_or_else(|| LeaseError::invalid_manifest(format!("Missing trust snapshot field: {name}")))
    };
    let score = field("trust_score")?;
    let minimum = field("minimum_required")?;

    let score = finite(score).ok_or_else(|| LeaseError::insufficient_trust(format!("Invalid trust score type: {score}")))?;
    let minimum =
        finite(minimum).ok_or_else(|| LeaseError::insufficient_trust(format!("Invalid minimum required type: {minimum}")))?;

    if !meets_minimum(score, minimum) {
        return Err(LeaseError::insufficient_trust(format!(
            "Trust score {score} below minimum {minimum}"
        )));
    }
    Ok(())
}

fn finite(value: &Value) -> Option<&Number> {
    match value {
        Value::Number(n) if n.as_f64().is_some_and(f64::is_finite) => Some(n),
        _ => None,
    }
}

fn integer(n: &Number) -> Option<i128> {
    n.as_i64().map(i128::from).or_else(|| n.as_u64().map(i128::from))
}

// Integers compare exactly; f64 only once either side is fractional.
fn meets_minimum(score: &Number, minimum: &Number) -> bool {
    match (integer(score), integer(minimum)) {
        (Some(s), Some(m)) => s >= m,
        _ => match (score.as_f64(), minimum.as_f64()) {
            (Some(s), Some(m)) => s >= m,
            _ => false,
        },
    }
}

/// Gate 4: hardware-rooted confirmation.
///
/// Applies only when `constraints.hrc_required` is exactly `true`. A
/// JSON `null` token counts as absent.
///
/// # Errors
///
/// `HRC_REQUIRED` if the token is absent, lacks `confirmed`, or
/// `confirmed` is not boolean `true`
pub fn check_hrc(manifest: &Value, hrc: Option<&Value>) -> GateResult<()> {
    let required = manifest
        .get("constraints")
        .and_then(|c| c.get("hrc_required"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !required {
        return Ok(());
    }

    let Some(token) = hrc.filter(|t| !t.is_null()) else {
        return Err(LeaseError::hrc_required("HRC token required but not provided"));
    };
    match token.get("confirmed") {
        None => Err(LeaseError::hrc_required("HRC token missing 'confirmed' field")),
        Some(Value::Bool(true)) => Ok(()),
        Some(Value::Bool(false)) => Err(LeaseError::hrc_required("HRC token not confirmed")),
        Some(_) => Err(LeaseError::hrc_required("HRC token 'confirmed' field must be boolean")),
    }
}

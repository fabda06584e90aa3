//! Guard decisions
//!
//! Every write or delete is judged Allow, Drop (denied quietly) or Reject
//! (denied loudly). The caller acts on it: store, discard, or raise.

use fieldlock_core::PolicyViolation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// Go ahead
    Allow,

    /// Denied; discard the operation without raising
    Drop {
        /// What would have been raised under a strict policy
        violation: PolicyViolation,
    },

    /// Denied; raise the violation
    Reject { violation: PolicyViolation },
}

impl Decision {
    /// Deny according to the policy's quiet flag
    pub fn deny(quiet: bool, violation: PolicyViolation) -> Self {
        if quiet {
            Decision::Drop { violation }
        } else {
            Decision::Reject { violation }
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn is_dropped(&self) -> bool {
        matches!(self, Decision::Drop { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Decision::Reject { .. })
    }

    pub fn kind(&self) -> DecisionKind {
        match self {
            Decision::Allow => DecisionKind::Allow,
            Decision::Drop { .. } => DecisionKind::Drop,
            Decision::Reject { .. } => DecisionKind::Reject,
        }
    }

    /// The violation behind a denial
    pub fn violation(&self) -> Option<&PolicyViolation> {
        match self {
            Decision::Allow => None,
            Decision::Drop { violation } | Decision::Reject { violation } => Some(violation),
        }
    }

    /// What the caller should do: apply, skip, or fail
    pub fn into_result(self) -> Result<Effect, PolicyViolation> {
        match self {
            Decision::Allow => Ok(Effect::Applied),
            Decision::Drop { .. } => Ok(Effect::Ignored),
            Decision::Reject { violation } => Err(violation),
        }
    }
}

/// What happened to an operation that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// The write was stored / the record was removed
    Applied,
    /// The operation was silently dropped
    Ignored,
}

/// Severity of a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionKind {
    Allow = 0,
    Drop = 1,
    Reject = 2,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Decision::Allow => write!(f, "ALLOW"),
            Decision::Drop { violation } => write!(f, "DROP: {}", violation),
            Decision::Reject { violation } => write!(f, "REJECT: {}", violation),
        }
    }
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecisionKind::Allow => write!(f, "allow"),
            DecisionKind::Drop => write!(f, "drop"),
            DecisionKind::Reject => write!(f, "reject"),
        }
    }
}

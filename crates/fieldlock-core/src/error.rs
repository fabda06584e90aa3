//! Unified Error Model
//!
//! Two families: [`ConfigError`] is raised while models are being defined and
//! aborts registration; [`PolicyViolation`] is raised while instances are
//! being mutated and is recoverable by the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bad immutability declarations. Always a programming error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("CONFIG/{model}: declare either locked_fields or mutable_fields, not both")]
    ConflictingFieldSets { model: String },

    #[error("CONFIG/{model}: `{option}` must be a list of field names, got {found}")]
    NotAFieldList {
        model: String,
        option: String,
        found: String,
    },

    #[error("CONFIG/{model}: `lock_field` must be a field name or null, got {found}")]
    InvalidLockField { model: String, found: String },

    #[error("CONFIG/{model}: `{option}` must be a boolean, got {found}")]
    NotABool {
        model: String,
        option: String,
        found: String,
    },

    #[error("CONFIG/{model}: unknown option `{option}`")]
    UnknownOption { model: String, option: String },

    #[error("CONFIG/{model}: `{option}` declared more than once (via `{alias}`)")]
    DuplicateOption {
        model: String,
        option: String,
        alias: String,
    },

    #[error("CONFIG/{model}: `{option}` names unknown field `{field}`")]
    UnknownField {
        model: String,
        option: String,
        field: String,
    },

    #[error("CONFIG/{model}: parent model `{parent}` is not registered")]
    UnknownParent { model: String, parent: String },

    #[error("CONFIG/{model}: model already registered")]
    AlreadyRegistered { model: String },

    #[error("CONFIG/PARSE: {0}")]
    Parse(String),
}

/// A write or delete denied by policy.
///
/// Strict policies raise it; quiet policies record it and move on.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyViolation {
    #[error("{model}.{field} is immutable and cannot be changed")]
    ImmutableField { model: String, field: String },

    #[error("{model}.{field} cannot be set: related objects not locked yet ({})", blockers.join(", "))]
    CascadeBlocked {
        model: String,
        field: String,
        blockers: Vec<String>,
    },

    #[error("{model} is immutable and cannot be deleted")]
    ImmutableDelete { model: String },
}

impl PolicyViolation {
    /// Name of the field the violation concerns, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            PolicyViolation::ImmutableField { field, .. }
            | PolicyViolation::CascadeBlocked { field, .. } => Some(field),
            PolicyViolation::ImmutableDelete { .. } => None,
        }
    }
}

/// Umbrella error for callers that drive the whole stack.
#[derive(Error, Debug)]
pub enum FieldlockError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Violation(#[from] PolicyViolation),

    #[error("NOT_FOUND/{0}")]
    NotFound(String),

    #[error("ABSTRACT/{0} cannot be instantiated")]
    AbstractModel(String),

    #[error("DUPLICATE/{0} is already saved")]
    DuplicateKey(String),
}

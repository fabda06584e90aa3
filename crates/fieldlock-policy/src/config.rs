//! Resolved per-model policy
//!
//! A `PolicyConfig` is built once by [`crate::ConfigResolver`] and never
//! changes afterwards. Fields are private so the complement invariant
//! between locked and mutable fields cannot be broken from outside.

use crate::options::DeclaredOptions;
use serde::Serialize;
use std::collections::BTreeSet;

/// Immutability rules for one model type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyConfig {
    model: String,
    is_abstract: bool,
    locked_fields: BTreeSet<String>,
    mutable_fields: BTreeSet<String>,
    lock_field: Option<String>,
    quiet: bool,
    deletable_when_locked: bool,
    cascade_lock: bool,
    /// Effective declarations, folded across parents, for children to inherit
    #[serde(skip)]
    declared: DeclaredOptions,
}

impl PolicyConfig {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        model: String,
        is_abstract: bool,
        locked_fields: BTreeSet<String>,
        mutable_fields: BTreeSet<String>,
        lock_field: Option<String>,
        quiet: bool,
        deletable_when_locked: bool,
        cascade_lock: bool,
        declared: DeclaredOptions,
    ) -> Self {
        debug_assert!(locked_fields.is_disjoint(&mutable_fields));
        Self {
            model,
            is_abstract,
            locked_fields,
            mutable_fields,
            lock_field,
            quiet,
            deletable_when_locked,
            cascade_lock,
            declared,
        }
    }

    /// Model this policy belongs to
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Fields subject to the lock
    pub fn locked_fields(&self) -> &BTreeSet<String> {
        &self.locked_fields
    }

    /// Complement of [`Self::locked_fields`] over the model's fields
    pub fn mutable_fields(&self) -> &BTreeSet<String> {
        &self.mutable_fields
    }

    /// Field whose truth value gates the lock. `None` means always locked.
    pub fn lock_field(&self) -> Option<&str> {
        self.lock_field.as_deref()
    }

    /// Drop denied operations silently instead of raising
    pub fn quiet(&self) -> bool {
        self.quiet
    }

    pub fn deletable_when_locked(&self) -> bool {
        self.deletable_when_locked
    }

    /// Locking requires related lockable objects to be locked first
    pub fn cascade_lock(&self) -> bool {
        self.cascade_lock
    }

    pub fn is_field_locked(&self, field: &str) -> bool {
        self.locked_fields.contains(field)
    }

    /// Whether objects of this model can be told apart as locked or unlocked
    pub fn has_lock_concept(&self) -> bool {
        !self.is_abstract && self.lock_field.is_some()
    }

    /// Declarations that children of this model inherit
    pub fn declared(&self) -> &DeclaredOptions {
        &self.declared
    }
}

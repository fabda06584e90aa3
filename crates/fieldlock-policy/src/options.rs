//! Declared immutability options
//!
//! What one model (or one abstract parent) says about itself, before
//! defaults and inheritance are applied. Every field is optional: `None`
//! means "not declared here, inherit".

use fieldlock_core::value::describe;
use fieldlock_core::{ConfigError, Value};
use serde_json::Map;
use std::collections::BTreeSet;

/// One recognized option, whatever spelling it was declared under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKey {
    LockedFields,
    MutableFields,
    LockField,
    Quiet,
    DeletableWhenLocked,
    CascadeLock,
}

impl OptionKey {
    /// Resolve a declared key, canonical or legacy alias
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "locked_fields" | "immutable" | "immutable_fields" => Some(OptionKey::LockedFields),
            "mutable_fields" => Some(OptionKey::MutableFields),
            "lock_field" | "sign_off_field" | "immutable_sign_off_field" | "immutable_lock_field" => {
                Some(OptionKey::LockField)
            }
            "quiet" | "immutable_quiet" => Some(OptionKey::Quiet),
            "deletable_when_locked" | "immutable_is_deletable" => Some(OptionKey::DeletableWhenLocked),
            "cascade_lock" => Some(OptionKey::CascadeLock),
            _ => None,
        }
    }

    /// Canonical spelling
    pub fn name(&self) -> &'static str {
        match self {
            OptionKey::LockedFields => "locked_fields",
            OptionKey::MutableFields => "mutable_fields",
            OptionKey::LockField => "lock_field",
            OptionKey::Quiet => "quiet",
            OptionKey::DeletableWhenLocked => "deletable_when_locked",
            OptionKey::CascadeLock => "cascade_lock",
        }
    }
}

/// Options declared by a single model definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredOptions {
    pub locked_fields: Option<BTreeSet<String>>,
    pub mutable_fields: Option<BTreeSet<String>>,
    /// `Some(None)` is an explicit "no lock field": always locked
    pub lock_field: Option<Option<String>>,
    pub quiet: Option<bool>,
    pub deletable_when_locked: Option<bool>,
    pub cascade_lock: Option<bool>,
}

impl DeclaredOptions {
    /// Nothing declared
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse loosely typed options, rejecting anything of the wrong shape.
    ///
    /// A bare string where a list of field names is expected is an error,
    /// not a list of characters.
    pub fn from_value(model: &str, options: &Map<String, Value>) -> Result<Self, ConfigError> {
        let mut declared = DeclaredOptions::new();
        let mut seen: Vec<(OptionKey, &str)> = Vec::new();

        for (key, value) in options {
            let canonical = OptionKey::parse(key).ok_or_else(|| ConfigError::UnknownOption {
                model: model.to_string(),
                option: key.clone(),
            })?;

            if let Some((_, first)) = seen.iter().find(|(c, _)| *c == canonical) {
                return Err(ConfigError::DuplicateOption {
                    model: model.to_string(),
                    option: first.to_string(),
                    alias: key.clone(),
                });
            }
            seen.push((canonical, key.as_str()));

            match canonical {
                OptionKey::LockedFields => declared.locked_fields = Some(field_list(model, key, value)?),
                OptionKey::MutableFields => declared.mutable_fields = Some(field_list(model, key, value)?),
                OptionKey::LockField => declared.lock_field = Some(lock_field(model, value)?),
                OptionKey::Quiet => declared.quiet = Some(boolean(model, key, value)?),
                OptionKey::DeletableWhenLocked => {
                    declared.deletable_when_locked = Some(boolean(model, key, value)?)
                }
                OptionKey::CascadeLock => declared.cascade_lock = Some(boolean(model, key, value)?),
            }
        }

        Ok(declared)
    }

    /// Declare the locked field set
    pub fn locked_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locked_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Declare the mutable field set
    pub fn mutable_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mutable_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Gate locking on a boolean field
    pub fn lock_field(mut self, field: impl Into<String>) -> Self {
        self.lock_field = Some(Some(field.into()));
        self
    }

    /// Locked from the first value on, with no lock field
    pub fn always_locked(mut self) -> Self {
        self.lock_field = Some(None);
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = Some(quiet);
        self
    }

    pub fn deletable_when_locked(mut self, deletable: bool) -> Self {
        self.deletable_when_locked = Some(deletable);
        self
    }

    pub fn cascade_lock(mut self, cascade: bool) -> Self {
        self.cascade_lock = Some(cascade);
        self
    }

    /// Whether this layer says anything about field sets
    pub fn declares_field_sets(&self) -> bool {
        self.locked_fields.is_some() || self.mutable_fields.is_some()
    }

    /// Both field sets non-empty in one layer is a contradiction
    pub fn check_exclusive(&self, model: &str) -> Result<(), ConfigError> {
        let locked = self.locked_fields.as_ref().map_or(false, |s| !s.is_empty());
        let mutable = self.mutable_fields.as_ref().map_or(false, |s| !s.is_empty());
        if locked && mutable {
            return Err(ConfigError::ConflictingFieldSets {
                model: model.to_string(),
            });
        }
        Ok(())
    }

    /// Merge with another layer (other takes precedence).
    ///
    /// The two field sets travel as a pair: a layer declaring either one
    /// replaces whatever field-set declaration it inherited.
    pub fn merge(mut self, other: &DeclaredOptions) -> Self {
        if other.declares_field_sets() {
            self.locked_fields = other.locked_fields.clone();
            self.mutable_fields = other.mutable_fields.clone();
        }
        if other.lock_field.is_some() { self.lock_field = other.lock_field.clone(); }
        if other.quiet.is_some() { self.quiet = other.quiet; }
        if other.deletable_when_locked.is_some() { self.deletable_when_locked = other.deletable_when_locked; }
        if other.cascade_lock.is_some() { self.cascade_lock = other.cascade_lock; }
        self
    }
}

fn field_list(model: &str, key: &str, value: &Value) -> Result<BTreeSet<String>, ConfigError> {
    let not_a_list = |found: String| ConfigError::NotAFieldList {
        model: model.to_string(),
        option: key.to_string(),
        found,
    };

    let items = value.as_array().ok_or_else(|| not_a_list(describe(value)))?;
    items
        .iter()
        .map(|item| match item {
            Value::String(name) if !name.is_empty() => Ok(name.clone()),
            other => Err(not_a_list(format!("list containing {}", describe(other)))),
        })
        .collect()
}

fn lock_field(model: &str, value: &Value) -> Result<Option<String>, ConfigError> {
    match value {
        Value::Null => Ok(None),
        Value::String(name) if !name.is_empty() => Ok(Some(name.clone())),
        other => Err(ConfigError::InvalidLockField {
            model: model.to_string(),
            found: describe(other),
        }),
    }
}

fn boolean(model: &str, key: &str, value: &Value) -> Result<bool, ConfigError> {
    value.as_bool().ok_or_else(|| ConfigError::NotABool {
        model: model.to_string(),
        option: key.to_string(),
        found: describe(value),
    })
}

//! Configuration resolution
//!
//! Builds a [`PolicyConfig`] from a model's own declarations and the
//! configs of its parents:
//!
//! ```text
//! defaults ← parent[0] ← parent[1] ← … ← own declarations
//!                                              ↓
//!                       derive locked/mutable complement
//!                                              ↓
//!                                    validate → PolicyConfig
//! ```

use crate::config::PolicyConfig;
use crate::options::DeclaredOptions;
use fieldlock_core::{ConfigError, ModelSchema, Settings};
use std::collections::BTreeSet;

/// Resolves declarations into validated policies
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigResolver {
    settings: Settings,
}

impl ConfigResolver {
    /// Resolver using built-in defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver using the given global settings
    pub fn with_settings(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Resolve a model's policy.
    ///
    /// `parents` are folded in declaration order; later parents override
    /// earlier ones and the model's own declarations override them all.
    pub fn resolve(
        &self,
        schema: &dyn ModelSchema,
        declared: &DeclaredOptions,
        parents: &[&PolicyConfig],
    ) -> Result<PolicyConfig, ConfigError> {
        let model = schema.model_name();
        declared.check_exclusive(model)?;

        let folded = parents
            .iter()
            .fold(DeclaredOptions::new(), |acc, parent| acc.merge(parent.declared()))
            .merge(declared);
        folded.check_exclusive(model)?;

        let all_fields: BTreeSet<String> =
            schema.field_names().into_iter().map(str::to_string).collect();

        let lock_field = match &folded.lock_field {
            None => Some(schema.primary_key().to_string()),
            Some(declared) => declared.clone(),
        };

        let locked_decl = folded.locked_fields.clone().unwrap_or_default();
        let mutable_decl = folded.mutable_fields.clone().unwrap_or_default();

        if !schema.is_abstract() {
            check_known(model, "locked_fields", &locked_decl, &all_fields)?;
            check_known(model, "mutable_fields", &mutable_decl, &all_fields)?;
            if let Some(field) = &lock_field {
                if !all_fields.contains(field) {
                    return Err(ConfigError::UnknownField {
                        model: model.to_string(),
                        option: "lock_field".to_string(),
                        field: field.clone(),
                    });
                }
            }
        }

        let locked_fields: BTreeSet<String> = if !mutable_decl.is_empty() {
            all_fields.difference(&mutable_decl).cloned().collect()
        } else {
            locked_decl
        };
        let mutable_fields: BTreeSet<String> =
            all_fields.difference(&locked_fields).cloned().collect();

        let config = PolicyConfig::new(
            model.to_string(),
            schema.is_abstract(),
            locked_fields,
            mutable_fields,
            lock_field,
            folded.quiet.unwrap_or(self.settings.quiet_default),
            folded.deletable_when_locked.unwrap_or(true),
            folded.cascade_lock.unwrap_or(false),
            folded,
        );

        tracing::debug!(
            model,
            locked = ?config.locked_fields(),
            lock_field = ?config.lock_field(),
            quiet = config.quiet(),
            deletable_when_locked = config.deletable_when_locked(),
            cascade_lock = config.cascade_lock(),
            "resolved immutability policy"
        );

        Ok(config)
    }
}

fn check_known(
    model: &str,
    option: &str,
    declared: &BTreeSet<String>,
    all_fields: &BTreeSet<String>,
) -> Result<(), ConfigError> {
    match declared.iter().find(|f| !all_fields.contains(*f)) {
        Some(field) => Err(ConfigError::UnknownField {
            model: model.to_string(),
            option: option.to_string(),
            field: field.clone(),
        }),
        None => Ok(()),
    }
}

/// Minimal schema for resolving without a registry
#[derive(Debug, Clone)]
pub struct StaticSchema {
    pub name: String,
    pub fields: Vec<String>,
    pub primary_key: String,
    pub is_abstract: bool,
}

impl StaticSchema {
    /// Concrete model with an `id` primary key plus `fields`
    pub fn new<I, S>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let primary_key = fieldlock_core::DEFAULT_PRIMARY_KEY.to_string();
        let mut all = vec![primary_key.clone()];
        all.extend(fields.into_iter().map(Into::into));
        Self {
            name: name.into(),
            fields: all,
            primary_key,
            is_abstract: false,
        }
    }

    pub fn abstract_model(mut self) -> Self {
        self.is_abstract = true;
        self
    }
}

impl ModelSchema for StaticSchema {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(String::as_str).collect()
    }

    fn primary_key(&self) -> &str {
        &self.primary_key
    }

    fn is_abstract(&self) -> bool {
        self.is_abstract
    }
}

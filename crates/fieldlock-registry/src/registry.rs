//! Model registry
//!
//! Models are registered parents first. Each registration resolves the
//! model's policy exactly once; the finished [`Registry`] is read-only and
//! can be shared between threads.

use crate::model_type::{ModelType, PendingShape};
use fieldlock_core::{ConfigError, Instance, ModelCatalog, ModelDef, Settings, Value};
use fieldlock_policy::{
    authorize_delete, authorize_write, can_change_field, is_locked, obstacles_for_signoff,
    ConfigResolver, Decision, DeclaredOptions, PolicyConfig, PolicyLookup,
};
use serde_json::Map;
use std::collections::{BTreeMap, HashMap};

/// Collects model definitions into a [`Registry`]
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    resolver: ConfigResolver,
    models: HashMap<String, ModelType>,
    order: Vec<String>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            resolver: ConfigResolver::with_settings(settings),
            ..Self::default()
        }
    }

    /// Register one model. Its parents must already be registered.
    pub fn register(&mut self, def: ModelDef) -> Result<&PolicyConfig, ConfigError> {
        if self.models.contains_key(&def.name) {
            return Err(ConfigError::AlreadyRegistered { model: def.name });
        }

        let parents = def
            .parents
            .iter()
            .map(|parent| {
                self.models.get(parent).ok_or_else(|| ConfigError::UnknownParent {
                    model: def.name.clone(),
                    parent: parent.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut fields = vec![def.primary_key.clone()];
        let mut defaults = Map::new();
        for parent in &parents {
            for field in &parent.fields {
                if *field != parent.primary_key && !fields.contains(field) {
                    fields.push(field.clone());
                }
            }
            for (field, value) in &parent.defaults {
                defaults.insert(field.clone(), value.clone());
            }
        }
        for field in &def.fields {
            if !fields.contains(field) {
                fields.push(field.clone());
            }
        }
        for (field, value) in &def.defaults {
            if !fields.contains(field) {
                return Err(ConfigError::UnknownField {
                    model: def.name.clone(),
                    option: "defaults".to_string(),
                    field: field.clone(),
                });
            }
            defaults.insert(field.clone(), value.clone());
        }

        let declared = DeclaredOptions::from_value(&def.name, &def.options)?;
        let parent_policies: Vec<&PolicyConfig> = parents.iter().map(|p| &p.policy).collect();
        let shape = PendingShape {
            name: &def.name,
            fields: &fields,
            primary_key: &def.primary_key,
            is_abstract: def.is_abstract,
        };
        let policy = self.resolver.resolve(&shape, &declared, &parent_policies)?;

        tracing::info!(
            model = %def.name,
            is_abstract = def.is_abstract,
            fields = fields.len(),
            lock_field = ?policy.lock_field(),
            quiet = policy.quiet(),
            "registered model"
        );

        let name = def.name.clone();
        let model = ModelType {
            name: def.name,
            fields,
            primary_key: def.primary_key,
            is_abstract: def.is_abstract,
            parents: def.parents,
            defaults,
            policy,
        };
        self.order.push(name.clone());
        Ok(&self.models.entry(name).or_insert(model).policy)
    }

    /// Register every model of a catalog in listed order
    pub fn register_catalog(&mut self, catalog: ModelCatalog) -> Result<(), ConfigError> {
        for def in catalog.models {
            self.register(def)?;
        }
        Ok(())
    }

    pub fn build(self) -> Registry {
        Registry {
            settings: *self.resolver.settings(),
            models: self.models,
            order: self.order,
        }
    }
}

/// Read-only set of registered models and their policies
#[derive(Debug, Clone, Default)]
pub struct Registry {
    settings: Settings,
    models: HashMap<String, ModelType>,
    order: Vec<String>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Build a registry from a YAML model catalog
    pub fn from_yaml(yaml: &str, settings: Settings) -> Result<Self, ConfigError> {
        let catalog = ModelCatalog::from_yaml(yaml)?;
        let mut builder = RegistryBuilder::with_settings(settings);
        builder.register_catalog(catalog)?;
        Ok(builder.build())
    }

    pub fn model(&self, name: &str) -> Option<&ModelType> {
        self.models.get(name)
    }

    /// Models in registration order
    pub fn models(&self) -> impl Iterator<Item = &ModelType> {
        self.order.iter().filter_map(|name| self.models.get(name))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Judge a write. Instances of unregistered models are never restricted.
    pub fn authorize_write(&self, instance: &dyn Instance, field: &str, value: &Value) -> Decision {
        match self.policy(instance.model()) {
            Some(config) => authorize_write(config, instance, field, value, self),
            None => Decision::Allow,
        }
    }

    /// Judge a delete. Instances of unregistered models are never restricted.
    pub fn authorize_delete(&self, instance: &dyn Instance) -> Decision {
        match self.policy(instance.model()) {
            Some(config) => authorize_delete(config, instance),
            None => Decision::Allow,
        }
    }

    pub fn is_locked(&self, instance: &dyn Instance) -> bool {
        self.policy(instance.model())
            .map(|config| is_locked(config, instance))
            .unwrap_or(false)
    }

    pub fn can_change_field(&self, instance: &dyn Instance, field: &str) -> bool {
        self.policy(instance.model())
            .map(|config| can_change_field(config, instance, field))
            .unwrap_or(true)
    }

    /// What still blocks signing `instance` off, keyed by relation
    pub fn obstacles_for_signoff(&self, instance: &dyn Instance) -> BTreeMap<String, String> {
        obstacles_for_signoff(instance, self)
    }
}

impl PolicyLookup for Registry {
    fn policy(&self, model: &str) -> Option<&PolicyConfig> {
        self.models.get(model).map(ModelType::policy)
    }
}

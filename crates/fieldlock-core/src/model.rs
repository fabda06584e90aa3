//! Model definitions
//!
//! A `ModelDef` is what the object mapper knows about a model type before
//! the policy layer looks at it: its own fields, its primary key, its
//! parents and the raw immutability options it declares.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Primary key name used when a definition does not name one
pub const DEFAULT_PRIMARY_KEY: &str = "id";

fn default_primary_key() -> String {
    DEFAULT_PRIMARY_KEY.to_string()
}

/// Definition of one model type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDef {
    /// Model name, unique within a registry
    pub name: String,

    /// Fields declared by this model itself (not inherited ones)
    #[serde(default)]
    pub fields: Vec<String>,

    /// Primary key field name
    #[serde(default = "default_primary_key")]
    pub primary_key: String,

    /// Abstract models only carry options and fields for their children
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,

    /// Parent models in declaration order
    #[serde(default)]
    pub parents: Vec<String>,

    /// Raw immutability options, validated at registration
    #[serde(default)]
    pub options: Map<String, Value>,

    /// Field defaults applied by the mapper on construction
    #[serde(default)]
    pub defaults: Map<String, Value>,
}

impl ModelDef {
    /// Create a concrete model with only a primary key
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            primary_key: default_primary_key(),
            is_abstract: false,
            parents: Vec::new(),
            options: Map::new(),
            defaults: Map::new(),
        }
    }

    /// Add a field
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(name.into());
        self
    }

    /// Add several fields
    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(names.into_iter().map(Into::into));
        self
    }

    /// Use a different primary key field
    pub fn primary_key(mut self, name: impl Into<String>) -> Self {
        self.primary_key = name.into();
        self
    }

    /// Mark the model abstract
    pub fn abstract_model(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Inherit from a registered model
    pub fn parent(mut self, name: impl Into<String>) -> Self {
        self.parents.push(name.into());
        self
    }

    /// Declare an immutability option
    pub fn option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Declare a field default
    pub fn default_value(mut self, field: impl Into<String>, value: Value) -> Self {
        self.defaults.insert(field.into(), value);
        self
    }
}

/// Shape of a model type as the object mapper sees it after inheritance
pub trait ModelSchema {
    /// Model name
    fn model_name(&self) -> &str;

    /// Every field of the model, inherited ones included, in declaration order
    fn field_names(&self) -> Vec<&str>;

    /// Primary key field name
    fn primary_key(&self) -> &str;

    /// Whether the model is abstract
    fn is_abstract(&self) -> bool {
        false
    }
}

/// A set of model definitions loaded from YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelCatalog {
    #[serde(default)]
    pub models: Vec<ModelDef>,
}

impl ModelCatalog {
    /// Load a catalog from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load a catalog from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

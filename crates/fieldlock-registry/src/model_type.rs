//! Registered model types

use fieldlock_core::{ModelSchema, Value};
use fieldlock_policy::PolicyConfig;
use serde_json::Map;

/// A model type after registration: inherited fields merged in and its
/// policy resolved.
#[derive(Debug, Clone)]
pub struct ModelType {
    pub(crate) name: String,
    pub(crate) fields: Vec<String>,
    pub(crate) primary_key: String,
    pub(crate) is_abstract: bool,
    pub(crate) parents: Vec<String>,
    pub(crate) defaults: Map<String, Value>,
    pub(crate) policy: PolicyConfig,
}

impl ModelType {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All fields, inherited ones first, primary key leading
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    /// Field defaults, own ones overriding inherited ones
    pub fn defaults(&self) -> &Map<String, Value> {
        &self.defaults
    }

    /// Resolved immutability policy
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }
}

impl ModelSchema for ModelType {
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

/// Shape used while the policy is still being resolved
pub(crate) struct PendingShape<'a> {
    pub name: &'a str,
    pub fields: &'a [String],
    pub primary_key: &'a str,
    pub is_abstract: bool,
}

impl ModelSchema for PendingShape<'_> {
    fn model_name(&self) -> &str {
        self.name
    }

    fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(String::as_str).collect()
    }

    fn primary_key(&self) -> &str {
        self.primary_key
    }

    fn is_abstract(&self) -> bool {
        self.is_abstract
    }
}

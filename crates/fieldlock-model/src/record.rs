//! In-memory records

use fieldlock_core::{Instance, Relation, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
enum Related {
    Single(Option<Box<Record>>),
    Multi(Vec<Record>),
}

/// One object of a model: field values plus the related objects it holds.
///
/// Values can only be written through [`crate::MemoryStore`], which runs
/// the write guard first.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    model: String,
    primary_key: String,
    values: BTreeMap<String, Value>,
    relations: Vec<(String, Related)>,
    persisted: bool,
}

impl Record {
    pub(crate) fn new(model: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            primary_key: primary_key.into(),
            values: BTreeMap::new(),
            relations: Vec::new(),
            persisted: false,
        }
    }

    /// Current value of a field, `None` if never set
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Primary key, once saved
    pub fn id(&self) -> Option<&Value> {
        self.values.get(&self.primary_key).filter(|v| !v.is_null())
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Whether this record has been saved before
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    pub(crate) fn mark_persisted(&mut self) {
        self.persisted = true;
    }

    pub(crate) fn store_value(&mut self, field: &str, value: Value) {
        self.values.insert(field.to_string(), value);
    }

    /// Point a single-valued relation at `other`
    pub fn relate(&mut self, name: &str, other: Record) {
        self.set_relation(name, Related::Single(Some(Box::new(other))));
    }

    /// Replace the objects behind a multi-valued relation
    pub fn relate_many(&mut self, name: &str, others: Vec<Record>) {
        self.set_relation(name, Related::Multi(others));
    }

    pub fn related_mut(&mut self, name: &str) -> Option<&mut Record> {
        self.relations.iter_mut().find(|(n, _)| n == name).and_then(|(_, r)| match r {
            Related::Single(object) => object.as_deref_mut(),
            Related::Multi(_) => None,
        })
    }

    pub fn related_many_mut(&mut self, name: &str) -> Option<&mut Vec<Record>> {
        self.relations.iter_mut().find(|(n, _)| n == name).and_then(|(_, r)| match r {
            Related::Multi(objects) => Some(objects),
            Related::Single(_) => None,
        })
    }

    fn set_relation(&mut self, name: &str, related: Related) {
        match self.relations.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = related,
            None => self.relations.push((name.to_string(), related)),
        }
    }
}

impl Instance for Record {
    fn model(&self) -> &str {
        &self.model
    }

    fn value(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    fn relations(&self) -> Vec<Relation<'_>> {
        self.relations
            .iter()
            .map(|(name, related)| match related {
                Related::Single(object) => {
                    Relation::single(name, object.as_deref().map(|r| r as &dyn Instance))
                }
                Related::Multi(objects) => {
                    Relation::multi(name, objects.iter().map(|r| r as &dyn Instance).collect())
                }
            })
            .collect()
    }
}

//! In-memory object mapper
//!
//! Plays the part of the persistence layer: every field assignment goes
//! through [`MemoryStore::set`] and every removal through
//! [`MemoryStore::delete`], which consult the registry before touching data.

use crate::record::Record;
use fieldlock_core::{FieldlockError, Instance, ModelSchema, PolicyViolation, Value};
use fieldlock_policy::{AuditLog, Effect, Operation};
use fieldlock_registry::{ModelType, Registry};
use std::collections::BTreeMap;

/// Tables of saved records, keyed by model name
#[derive(Debug)]
pub struct MemoryStore<'r> {
    registry: &'r Registry,
    tables: BTreeMap<String, Vec<Record>>,
    next_ids: BTreeMap<String, u64>,
    audit: AuditLog,
}

impl<'r> MemoryStore<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            tables: BTreeMap::new(),
            next_ids: BTreeMap::new(),
            audit: AuditLog::new(),
        }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Denied writes and deletes seen so far
    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    fn model_type(&self, model: &str) -> Result<&'r ModelType, FieldlockError> {
        let registry = self.registry;
        registry
            .model(model)
            .ok_or_else(|| FieldlockError::NotFound(format!("model {}", model)))
    }

    /// Build a record, assign every field in declaration order and save it.
    ///
    /// Fields missing from `values` get their default, if any. Assignments
    /// run through the write guard like any other.
    pub fn create<I, S>(&mut self, model: &str, values: I) -> Result<Record, FieldlockError>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let model_type = self.model_type(model)?;
        if model_type.is_abstract() {
            return Err(FieldlockError::AbstractModel(model.to_string()));
        }

        let mut given: BTreeMap<String, Value> =
            values.into_iter().map(|(k, v)| (k.into(), v)).collect();
        if let Some(unknown) = given.keys().find(|f| !model_type.has_field(f)) {
            return Err(FieldlockError::NotFound(format!("{}.{}", model, unknown)));
        }

        let mut record = Record::new(model, model_type.primary_key());
        for field in model_type.fields() {
            let value = given
                .remove(field)
                .or_else(|| model_type.defaults().get(field).cloned());
            if let Some(value) = value {
                self.set(&mut record, field, value)?;
            }
        }

        self.save(&mut record)?;
        Ok(record)
    }

    /// Assignment hook: judge the write, then store, discard or raise.
    pub fn set(
        &mut self,
        record: &mut Record,
        field: &str,
        value: Value,
    ) -> Result<Effect, PolicyViolation> {
        let decision = self.registry.authorize_write(&*record, field, &value);
        self.audit.record(
            record.model(),
            record.id(),
            Operation::Write {
                field: field.to_string(),
            },
            &decision,
        );

        let effect = decision.into_result()?;
        if effect == Effect::Applied {
            record.store_value(field, value);
        }
        Ok(effect)
    }

    /// Persist the record's current values, assigning a primary key if needed.
    ///
    /// A record that was never saved may not take over the id of a saved
    /// one; that would bypass the write guard for every field of the row.
    pub fn save(&mut self, record: &mut Record) -> Result<(), FieldlockError> {
        let model = record.model().to_string();
        self.model_type(&model)?;

        let next = self.next_ids.entry(model.clone()).or_insert(0);
        match record.id().map(Value::as_u64) {
            None => {
                *next += 1;
                let pk = record.primary_key().to_string();
                record.store_value(&pk, Value::from(*next));
            }
            Some(Some(explicit)) => *next = (*next).max(explicit),
            Some(None) => {}
        }

        let table = self.tables.entry(model).or_default();
        match table.iter_mut().find(|saved| saved.id() == record.id()) {
            Some(_) if !record.is_persisted() => {
                return Err(FieldlockError::DuplicateKey(format!(
                    "{}.{}={}",
                    record.model(),
                    record.primary_key(),
                    record.id().map(Value::to_string).unwrap_or_default()
                )));
            }
            Some(saved) => {
                record.mark_persisted();
                *saved = record.clone();
            }
            None => {
                record.mark_persisted();
                table.push(record.clone());
            }
        }
        tracing::debug!(model = record.model(), id = ?record.id(), "saved record");
        Ok(())
    }

    /// Admin sign-off: set the lock field to `true` and save.
    pub fn sign_off(&mut self, record: &mut Record) -> Result<Effect, FieldlockError> {
        let lock_field = self
            .model_type(record.model())?
            .policy()
            .lock_field()
            .ok_or_else(|| FieldlockError::NotFound(format!("lock field of {}", record.model())))?
            .to_string();

        let effect = self.set(record, &lock_field, Value::Bool(true))?;
        self.save(record)?;
        Ok(effect)
    }

    /// Delete hook: judge the delete, then remove, skip or raise.
    pub fn delete(&mut self, record: &Record) -> Result<Effect, FieldlockError> {
        let decision = self.registry.authorize_delete(record);
        self.audit
            .record(record.model(), record.id(), Operation::Delete, &decision);

        let effect = decision.into_result()?;
        if effect == Effect::Applied {
            if let Some(table) = self.tables.get_mut(record.model()) {
                table.retain(|saved| saved.id() != record.id());
            }
        }
        Ok(effect)
    }

    /// Saved copy of a record
    pub fn get(&self, model: &str, id: &Value) -> Option<Record> {
        self.tables
            .get(model)?
            .iter()
            .find(|saved| saved.id() == Some(id))
            .cloned()
    }

    /// All saved records of a model
    pub fn all(&self, model: &str) -> &[Record] {
        self.tables.get(model).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count(&self, model: &str) -> usize {
        self.all(model).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldlock_core::ModelDef;
    use serde_json::json;

    fn registry() -> Registry {
        let mut builder = Registry::builder();
        builder
            .register(
                ModelDef::new("Invoice")
                    .fields(["special_id", "name"])
                    .option("immutable", json!(["special_id"])),
            )
            .unwrap();
        builder
            .register(ModelDef::new("Base").abstract_model().field("name"))
            .unwrap();
        builder.build()
    }

    #[test]
    fn test_create_assigns_ids() {
        let registry = registry();
        let mut store = MemoryStore::new(&registry);
        let a = store.create("Invoice", [("special_id", json!(1))]).unwrap();
        let b = store.create("Invoice", [("special_id", json!(2))]).unwrap();

        assert_eq!(a.id(), Some(&json!(1)));
        assert_eq!(b.id(), Some(&json!(2)));
        assert_eq!(store.count("Invoice"), 2);
        assert_eq!(store.get("Invoice", &json!(2)).unwrap().get("special_id"), Some(&json!(2)));
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let registry = registry();
        let mut store = MemoryStore::new(&registry);

        let err = store.create("Nope", Vec::<(&str, Value)>::new()).unwrap_err();
        assert!(matches!(err, FieldlockError::NotFound(_)));

        let err = store.create("Base", Vec::<(&str, Value)>::new()).unwrap_err();
        assert!(matches!(err, FieldlockError::AbstractModel(_)));

        let err = store.create("Invoice", [("colour", json!("red"))]).unwrap_err();
        assert_eq!(err.to_string(), "NOT_FOUND/Invoice.colour");
    }

    #[test]
    fn test_dropped_write_is_audited() {
        let registry = registry();
        let mut store = MemoryStore::new(&registry);
        let mut invoice = store.create("Invoice", [("special_id", json!(1))]).unwrap();

        assert_eq!(store.set(&mut invoice, "special_id", json!(9)), Ok(Effect::Ignored));
        assert_eq!(invoice.get("special_id"), Some(&json!(1)));

        let entries = store.audit().dropped_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].record_id, Some(json!(1)));
    }

    #[test]
    fn test_sign_off_needs_lock_field() {
        let mut builder = Registry::builder();
        builder
            .register(ModelDef::new("Log").option("lock_field", Value::Null))
            .unwrap();
        let registry = builder.build();
        let mut store = MemoryStore::new(&registry);
        let mut log = store.create("Log", Vec::<(&str, Value)>::new()).unwrap();
        assert!(matches!(store.sign_off(&mut log), Err(FieldlockError::NotFound(_))));
    }
}

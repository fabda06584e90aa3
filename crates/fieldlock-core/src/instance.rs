//! Instance: what the policy engine needs to see of a live object
//!
//! The object mapper owns storage. The engine only reads field values and
//! walks direct relations through this trait.

use serde_json::Value;

/// Read access to one object held by the object mapper.
pub trait Instance {
    /// Name of the model type this object belongs to
    fn model(&self) -> &str;

    /// Current value of a field. `None` means the field was never set.
    fn value(&self, field: &str) -> Option<&Value>;

    /// Whether the field was ever set
    fn has_value(&self, field: &str) -> bool {
        self.value(field).is_some()
    }

    /// Directly related objects, one entry per relation.
    ///
    /// Objects without relations keep the default empty list.
    fn relations(&self) -> Vec<Relation<'_>> {
        Vec::new()
    }
}

/// Cardinality of a relation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// Foreign key or one-to-one
    Single,
    /// Many-to-many or reverse foreign key
    Multi,
}

/// One relation of an instance and the objects currently behind it
pub struct Relation<'a> {
    pub name: &'a str,
    pub kind: RelationKind,
    pub objects: Vec<&'a dyn Instance>,
}

impl<'a> Relation<'a> {
    /// A single-valued relation; `None` when the pointer is empty
    pub fn single(name: &'a str, object: Option<&'a dyn Instance>) -> Self {
        Self {
            name,
            kind: RelationKind::Single,
            objects: object.into_iter().collect(),
        }
    }

    /// A multi-valued relation
    pub fn multi(name: &'a str, objects: Vec<&'a dyn Instance>) -> Self {
        Self {
            name,
            kind: RelationKind::Multi,
            objects,
        }
    }

    /// Display label for the object at `index`, e.g. `customer` or `lines[2]`
    pub fn label(&self, index: usize) -> String {
        match self.kind {
            RelationKind::Single => self.name.to_string(),
            RelationKind::Multi => format!("{}[{}]", self.name, index),
        }
    }
}

impl std::fmt::Debug for Relation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Relation")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("objects", &self.objects.len())
            .finish()
    }
}

//! Fieldlock Core: values, instances, model definitions and errors
//!
//! Vocabulary shared by the policy engine, the registry and object mappers
//! that plug into them.

pub mod error;
pub mod instance;
pub mod model;
pub mod settings;
pub mod value;

pub use error::{ConfigError, FieldlockError, PolicyViolation};
pub use instance::{Instance, Relation, RelationKind};
pub use model::{ModelCatalog, ModelDef, ModelSchema, DEFAULT_PRIMARY_KEY};
pub use settings::Settings;

/// Field value type used throughout fieldlock
pub use serde_json::Value;

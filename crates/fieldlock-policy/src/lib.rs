//! Fieldlock Policy: immutability rules for persisted records
//!
//! Resolves per-model immutability declarations into a [`PolicyConfig`] and
//! judges field writes and deletes against it.
//!
//! # Architecture
//!
//! ```text
//! declarations ─→ ConfigResolver ─→ PolicyConfig (once per model)
//!                                        │
//!        write(field, value) ─→ WriteGuard ─┤─→ ALLOW / DROP / REJECT
//!        delete()            ─→ DeleteGuard ┘
//!                                   │
//!                           SignoffCascade (lock transitions only)
//! ```
//!
//! # Example
//!
//! ```
//! use fieldlock_policy::{
//!     authorize_write, ConfigResolver, DeclaredOptions, NoPolicies, StaticSchema,
//! };
//! use fieldlock_core::{Instance, Value};
//! use serde_json::json;
//! use std::collections::HashMap;
//!
//! struct Row(HashMap<String, Value>);
//!
//! impl Instance for Row {
//!     fn model(&self) -> &str { "Invoice" }
//!     fn value(&self, field: &str) -> Option<&Value> { self.0.get(field) }
//! }
//!
//! let schema = StaticSchema::new("Invoice", ["special_id", "sign_off"]);
//! let declared = DeclaredOptions::new()
//!     .locked_fields(["special_id"])
//!     .lock_field("sign_off");
//! let config = ConfigResolver::new().resolve(&schema, &declared, &[]).unwrap();
//!
//! let mut row = Row(HashMap::new());
//! row.0.insert("special_id".into(), json!(1));
//! row.0.insert("sign_off".into(), json!(true));
//!
//! let decision = authorize_write(&config, &row, "special_id", &json!(2), &NoPolicies);
//! assert!(decision.is_dropped());
//! ```

pub mod audit;
pub mod cascade;
pub mod config;
pub mod decision;
pub mod delete_guard;
pub mod lock;
pub mod options;
pub mod resolver;
pub mod write_guard;

pub use audit::{AuditEntry, AuditLog, AuditStats, Operation};
pub use cascade::{
    all_dependencies_locked, obstacles_for_signoff, unlocked_dependencies, NoPolicies,
    PolicyLookup,
};
pub use config::PolicyConfig;
pub use decision::{Decision, DecisionKind, Effect};
pub use delete_guard::authorize_delete;
pub use lock::{can_change_field, is_locked};
pub use options::{DeclaredOptions, OptionKey};
pub use resolver::{ConfigResolver, StaticSchema};
pub use write_guard::authorize_write;

//! Fieldlock Registry: model registration and policy lookup
//!
//! Turns [`ModelDef`](fieldlock_core::ModelDef)s into [`ModelType`]s with
//! resolved policies, and answers write and delete questions for any
//! [`Instance`](fieldlock_core::Instance) by model name.
pub mod global;
pub mod model_type;
pub mod registry;

pub use global::{global, install};
pub use model_type::ModelType;
pub use registry::{Registry, RegistryBuilder};

//! Lock predicate
//!
//! Lock state is never stored; it is read from the instance every time.

use crate::config::PolicyConfig;
use fieldlock_core::value::is_truthy;
use fieldlock_core::Instance;

/// Whether the instance is currently locked under `config`.
///
/// Without a lock field the instance is always locked; first population
/// still goes through because writes over empty values are never denied.
/// With a lock field, a never-set lock field reads as unlocked so a
/// freshly constructed object can be populated.
pub fn is_locked(config: &PolicyConfig, instance: &dyn Instance) -> bool {
    match config.lock_field() {
        None => true,
        Some(lock_field) => instance.value(lock_field).map(is_truthy).unwrap_or(false),
    }
}

/// Whether a write to `field` could currently change it
pub fn can_change_field(config: &PolicyConfig, instance: &dyn Instance, field: &str) -> bool {
    !config.is_field_locked(field) || !is_locked(config, instance)
}

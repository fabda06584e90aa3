//! Delete guard

use crate::config::PolicyConfig;
use crate::decision::Decision;
use crate::lock::is_locked;
use fieldlock_core::{Instance, PolicyViolation};

/// Decide whether `instance` may be deleted.
///
/// Only models declaring `deletable_when_locked: false` are ever denied,
/// and only while the instance is locked.
pub fn authorize_delete(config: &PolicyConfig, instance: &dyn Instance) -> Decision {
    if config.deletable_when_locked() || !is_locked(config, instance) {
        return Decision::Allow;
    }

    let decision = Decision::deny(
        config.quiet(),
        PolicyViolation::ImmutableDelete {
            model: config.model().to_string(),
        },
    );
    if decision.is_rejected() {
        tracing::warn!(model = config.model(), "rejected delete of locked record");
    } else {
        tracing::debug!(model = config.model(), "dropped delete of locked record");
    }
    decision
}

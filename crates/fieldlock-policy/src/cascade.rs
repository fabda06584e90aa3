//! Sign-off cascade
//!
//! With `cascade_lock`, an object may only become locked once every
//! directly related object that has a lock concept of its own is locked.
//! Related objects whose model has no lock field (or no policy at all) are
//! ignored. Nothing is cached: relations are walked on every call.

use crate::config::PolicyConfig;
use crate::lock::is_locked;
use fieldlock_core::Instance;
use std::collections::{BTreeMap, HashMap};

/// Finds the policy of a model by name
pub trait PolicyLookup {
    fn policy(&self, model: &str) -> Option<&PolicyConfig>;
}

impl PolicyLookup for HashMap<String, PolicyConfig> {
    fn policy(&self, model: &str) -> Option<&PolicyConfig> {
        self.get(model)
    }
}

impl PolicyLookup for BTreeMap<String, PolicyConfig> {
    fn policy(&self, model: &str) -> Option<&PolicyConfig> {
        self.get(model)
    }
}

/// Lookup that knows no policies; every relation is ignored
pub struct NoPolicies;

impl PolicyLookup for NoPolicies {
    fn policy(&self, _model: &str) -> Option<&PolicyConfig> {
        None
    }
}

/// True iff every lockable related object is locked
pub fn all_dependencies_locked(instance: &dyn Instance, lookup: &dyn PolicyLookup) -> bool {
    unlocked_dependencies(instance, lookup).is_empty()
}

/// Labels (`customer`, `lines[1]`) of related objects that are still unlocked
pub fn unlocked_dependencies(instance: &dyn Instance, lookup: &dyn PolicyLookup) -> Vec<String> {
    let mut blockers = Vec::new();
    for relation in instance.relations() {
        for (index, related) in relation.objects.iter().enumerate() {
            if is_blocking(*related, lookup) {
                blockers.push(relation.label(index));
            }
        }
    }
    blockers
}

/// Per relation, a message naming what still has to be signed off.
///
/// Relations with nothing outstanding are left out, so an empty map means
/// the instance may be signed off.
pub fn obstacles_for_signoff(
    instance: &dyn Instance,
    lookup: &dyn PolicyLookup,
) -> BTreeMap<String, String> {
    let mut obstacles = BTreeMap::new();
    for relation in instance.relations() {
        let pending: Vec<String> = relation
            .objects
            .iter()
            .enumerate()
            .filter(|(_, related)| is_blocking(**related, lookup))
            .map(|(index, _)| relation.label(index))
            .collect();

        if !pending.is_empty() {
            obstacles.insert(
                relation.name.to_string(),
                format!("must be signed off first: {}", pending.join(", ")),
            );
        }
    }
    obstacles
}

fn is_blocking(related: &dyn Instance, lookup: &dyn PolicyLookup) -> bool {
    match lookup.policy(related.model()) {
        Some(config) if config.has_lock_concept() => !is_locked(config, related),
        _ => false,
    }
}

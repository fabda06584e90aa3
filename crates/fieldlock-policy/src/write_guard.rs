//! Write guard
//!
//! Judges a single attribute write before the object mapper stores it.

use crate::cascade::{unlocked_dependencies, PolicyLookup};
use crate::config::PolicyConfig;
use crate::decision::Decision;
use crate::lock::is_locked;
use fieldlock_core::value::{is_empty, is_truthy, same_value};
use fieldlock_core::{Instance, PolicyViolation, Value};

/// Decide whether `field` on `instance` may be set to `new_value`.
///
/// `lookup` supplies the policies of related objects for the sign-off
/// cascade; it is only consulted when the write would lock a
/// `cascade_lock` model.
pub fn authorize_write(
    config: &PolicyConfig,
    instance: &dyn Instance,
    field: &str,
    new_value: &Value,
    lookup: &dyn PolicyLookup,
) -> Decision {
    let locked = is_locked(config, instance);

    // Becoming locked in this very write
    if config.cascade_lock()
        && !locked
        && config.lock_field() == Some(field)
        && is_truthy(new_value)
    {
        let blockers = unlocked_dependencies(instance, lookup);
        if !blockers.is_empty() {
            tracing::warn!(
                model = config.model(),
                field,
                blockers = ?blockers,
                "lock blocked by unlocked related objects"
            );
            return Decision::Reject {
                violation: PolicyViolation::CascadeBlocked {
                    model: config.model().to_string(),
                    field: field.to_string(),
                    blockers,
                },
            };
        }
    }

    if !config.is_field_locked(field) || !locked {
        return Decision::Allow;
    }

    let current = instance.value(field);
    if is_empty(current) || current.map_or(false, |v| same_value(v, new_value)) {
        return Decision::Allow;
    }

    let decision = Decision::deny(
        config.quiet(),
        PolicyViolation::ImmutableField {
            model: config.model().to_string(),
            field: field.to_string(),
        },
    );
    if decision.is_rejected() {
        tracing::warn!(model = config.model(), field, "rejected write to immutable field");
    } else {
        tracing::debug!(model = config.model(), field, "dropped write to immutable field");
    }
    decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::NoPolicies;
    use crate::options::DeclaredOptions;
    use crate::resolver::{ConfigResolver, StaticSchema};
    use fieldlock_core::Relation;
    use serde_json::json;
    use std::collections::{BTreeMap, HashMap};

    #[derive(Default)]
    struct Obj {
        model: &'static str,
        values: BTreeMap<String, Value>,
        parts: Vec<Obj>,
    }

    impl Obj {
        fn new(model: &'static str) -> Self {
            Self { model, ..Default::default() }
        }

        fn with(mut self, field: &str, value: Value) -> Self {
            self.values.insert(field.to_string(), value);
            self
        }
    }

    impl Instance for Obj {
        fn model(&self) -> &str {
            self.model
        }

        fn value(&self, field: &str) -> Option<&Value> {
            self.values.get(field)
        }

        fn relations(&self) -> Vec<Relation<'_>> {
            vec![Relation::multi("parts", self.parts.iter().map(|p| p as &dyn Instance).collect())]
        }
    }

    fn resolve(name: &str, fields: &[&str], declared: DeclaredOptions) -> PolicyConfig {
        ConfigResolver::new()
            .resolve(&StaticSchema::new(name, fields.iter().copied()), &declared, &[])
            .unwrap()
    }

    fn no_sign_off(quiet: bool) -> PolicyConfig {
        resolve(
            "Simple",
            &["special_id", "name"],
            DeclaredOptions::new().locked_fields(["special_id"]).always_locked().quiet(quiet),
        )
    }

    fn sign_off(quiet: bool) -> PolicyConfig {
        resolve(
            "Signed",
            &["special_id", "name", "sign_off"],
            DeclaredOptions::new().locked_fields(["special_id"]).lock_field("sign_off").quiet(quiet),
        )
    }

    #[test]
    fn test_unlocked_field_always_allowed() {
        let config = no_sign_off(false);
        let obj = Obj::new("Simple").with("special_id", json!(1)).with("name", json!("Vader"));
        assert!(authorize_write(&config, &obj, "name", &json!("Luke"), &NoPolicies).is_allowed());
    }

    #[test]
    fn test_first_write_allowed_without_lock_field() {
        let config = no_sign_off(false);
        let fresh = Obj::new("Simple");
        assert!(authorize_write(&config, &fresh, "special_id", &json!(1), &NoPolicies).is_allowed());

        let blank = Obj::new("Simple").with("special_id", json!(""));
        assert!(authorize_write(&config, &blank, "special_id", &json!(1), &NoPolicies).is_allowed());
    }

    #[test]
    fn test_change_denied_without_lock_field() {
        let obj = Obj::new("Simple").with("special_id", json!(1));

        let quiet = authorize_write(&no_sign_off(true), &obj, "special_id", &json!(1000), &NoPolicies);
        assert!(quiet.is_dropped());

        let strict = authorize_write(&no_sign_off(false), &obj, "special_id", &json!(1000), &NoPolicies);
        assert_eq!(
            strict.into_result(),
            Err(PolicyViolation::ImmutableField {
                model: "Simple".into(),
                field: "special_id".into(),
            })
        );
    }

    #[test]
    fn test_same_value_is_idempotent() {
        let obj = Obj::new("Simple").with("special_id", json!(1));
        assert!(authorize_write(&no_sign_off(false), &obj, "special_id", &json!(1), &NoPolicies).is_allowed());
    }

    #[test]
    fn test_numeric_rewrite_is_idempotent() {
        let obj = Obj::new("Simple").with("special_id", json!(1));
        let config = no_sign_off(false);
        assert!(authorize_write(&config, &obj, "special_id", &json!(1.0), &NoPolicies).is_allowed());
        assert!(authorize_write(&config, &obj, "special_id", &json!(1.5), &NoPolicies).is_rejected());
    }

    #[test]
    fn test_sign_off_gates_lock() {
        let config = sign_off(true);
        let open = Obj::new("Signed").with("special_id", json!(1)).with("sign_off", json!(false));
        assert!(authorize_write(&config, &open, "special_id", &json!(1337), &NoPolicies).is_allowed());

        let unset = Obj::new("Signed").with("special_id", json!(1));
        assert!(authorize_write(&config, &unset, "special_id", &json!(1337), &NoPolicies).is_allowed());

        let signed = open.with("sign_off", json!(true));
        assert!(authorize_write(&config, &signed, "special_id", &json!(1338), &NoPolicies).is_dropped());
        assert!(authorize_write(&config, &signed, "name", &json!("Obi-Wan"), &NoPolicies).is_allowed());
    }

    fn cascade_lookup() -> HashMap<String, PolicyConfig> {
        let order = resolve(
            "Order",
            &["total", "signed"],
            DeclaredOptions::new().mutable_fields(["total"]).lock_field("signed").cascade_lock(true),
        );
        let part = resolve("Part", &["signed"], DeclaredOptions::new().lock_field("signed"));
        HashMap::from([("Order".to_string(), order), ("Part".to_string(), part)])
    }

    #[test]
    fn test_cascade_blocks_lock_transition() {
        let lookup = cascade_lookup();
        let config = &lookup["Order"];
        let mut order = Obj::new("Order").with("signed", json!(false));
        order.parts = vec![
            Obj::new("Part").with("signed", json!(true)),
            Obj::new("Part").with("signed", json!(false)),
        ];

        let decision = authorize_write(config, &order, "signed", &json!(true), &lookup);
        match decision {
            Decision::Reject { violation: PolicyViolation::CascadeBlocked { blockers, .. } } => {
                assert_eq!(blockers, vec!["parts[1]"]);
            }
            other => panic!("expected cascade rejection, got {:?}", other),
        }

        // Writing false, or some other field, is not a lock transition
        assert!(authorize_write(config, &order, "signed", &json!(false), &lookup).is_allowed());
        assert!(authorize_write(config, &order, "total", &json!(10), &lookup).is_allowed());
    }

    #[test]
    fn test_cascade_rejects_even_when_quiet() {
        let lookup = cascade_lookup();
        assert!(lookup["Order"].quiet());
        let mut order = Obj::new("Order");
        order.parts = vec![Obj::new("Part")];
        assert!(authorize_write(&lookup["Order"], &order, "signed", &json!(true), &lookup).is_rejected());
    }

    #[test]
    fn test_cascade_allows_once_dependencies_locked() {
        let lookup = cascade_lookup();
        let mut order = Obj::new("Order").with("signed", json!(false));
        order.parts = vec![Obj::new("Part").with("signed", json!(true))];
        assert!(authorize_write(&lookup["Order"], &order, "signed", &json!(true), &lookup).is_allowed());
    }

    #[test]
    fn test_lock_field_cannot_be_unset_when_locked() {
        let lookup = cascade_lookup();
        let order = Obj::new("Order").with("signed", json!(true));
        let decision = authorize_write(&lookup["Order"], &order, "signed", &json!(false), &lookup);
        assert!(decision.is_dropped());
    }
}

//! Field values
//!
//! Field values are plain `serde_json::Value`s. A field that has never been
//! assigned has no value at all (`None` from [`crate::Instance::value`]),
//! which is distinct from an explicit `null`.

use serde_json::Value;

/// Truth value of a field, used to read lock fields.
///
/// `null`, `false`, `0`, `""`, `[]` and `{}` are false; everything else is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Whether a stored value counts as "nothing there yet".
///
/// Writing over an empty value is initial population, never a mutation.
pub fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Whether a write of `new` over `current` changes nothing.
///
/// Numbers compare by value, so `1` and `1.0` are the same.
pub fn same_value(current: &Value, new: &Value) -> bool {
    match (current, new) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
        _ => current == new,
    }
}

/// Short type name for error messages.
pub fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string {:?}", s),
        Value::Array(items) => format!("list of {}", items.len()),
        Value::Object(_) => "map".to_string(),
    }
}

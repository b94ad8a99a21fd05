//! Lenient JSON value coercion shared by the normalizer.

use serde_json::Value;

/// Coerce a JSON number or numeric string to a finite `f64`.
///
/// Strings are trimmed and parsed with `str::parse`, which is
/// locale-independent. `NaN` and infinities count as absent.
pub(crate) fn coerce_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Coerce a JSON string or number to non-empty trimmed text.
///
/// NUL characters are removed first; Postgres rejects them in `TEXT`.
pub(crate) fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let cleaned = s.replace('\0', "");
            let trimmed = cleaned.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First alias in `keys` whose value on `object` coerces to `f64`.
pub(crate) fn first_f64(object: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find_map(coerce_f64)
}

/// First alias in `keys` whose value on `object` coerces to text.
pub(crate) fn first_text(object: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find_map(coerce_text)
}

/// First alias in `keys` whose value on `object` is itself a JSON object.
pub(crate) fn first_object<'a>(object: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|v| v.is_object())
}

/// Human-readable name of a value's JSON type, for diagnostics.
pub(crate) fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

//! Query parameters and their rendering.

use serde_json::Value;

/// Named parameters for one resolution, ordered by key.
///
/// Built from JSON so callers can use `serde_json::json!` directly:
///
/// ```
/// use dynsql_core::ParamMap;
/// use serde_json::json;
///
/// let params: ParamMap = json!({ "status": 1, "name": "alice" })
///     .as_object()
///     .cloned()
///     .unwrap_or_default();
/// assert_eq!(params.len(), 2);
/// ```
pub type ParamMap = serde_json::Map<String, Value>;

/// Renders a scalar value as a condition-language literal.
///
/// Strings are single-quoted with embedded quotes doubled, so the
/// result always lexes back to the original value. Arrays and objects
/// have no literal form and return `None`.
pub(crate) fn render_literal(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some("null".to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(format!("'{}'", s.replace('\'', "''"))),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Key substrings that mark a parameter as sensitive.
const SENSITIVE_MARKERS: [&str; 4] = ["password", "secret", "token", "key"];

/// Returns a copy of the parameters with sensitive values replaced by
/// `***`, for logging.
#[must_use]
pub fn mask_params(params: &ParamMap) -> ParamMap {
    params
        .iter()
        .map(|(key, value)| {
            let lowered = key.to_lowercase();
            if SENSITIVE_MARKERS.iter().any(|m| lowered.contains(m)) {
                (key.clone(), Value::String("***".to_string()))
            } else {
                (key.clone(), value.clone())
            }
        })
        .collect()
}

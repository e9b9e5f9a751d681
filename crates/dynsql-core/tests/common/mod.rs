#![allow(dead_code)]

use dynsql_core::{ParamMap, Template};

pub fn params(value: serde_json::Value) -> ParamMap {
    value
        .as_object()
        .cloned()
        .unwrap_or_else(|| panic!("params must be a JSON object, got: {value}"))
}

pub fn template(fragment: &str) -> Template {
    Template::parse(fragment)
        .unwrap_or_else(|e| panic!("Failed to parse template: {fragment}\nError: {e}"))
}

/// Parses and resolves a fragment in one step.
pub fn resolve(fragment: &str, p: &ParamMap) -> String {
    template(fragment).resolve(p)
}

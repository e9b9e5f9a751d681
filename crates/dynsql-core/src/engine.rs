//! Resolution pipeline: node tree in, executable SQL text out.

use tracing::debug;

use crate::normalize;
use crate::params::{mask_params, ParamMap};
use crate::resolve::resolve_nodes;
use crate::template::Template;

/// Resolves a template against parameters.
#[must_use]
pub fn resolve(template: &Template, params: &ParamMap) -> String {
    resolve_with(template, params, &[])
}

/// Resolves a template, then applies literal replacements to the
/// normalized SQL.
///
/// Replacements run in slice order against the whole string, after
/// entity decoding, so a token like `__ORDER__` lands in the final
/// text exactly once per occurrence. They are verbatim text splices;
/// parameter values never pass through here.
#[must_use]
pub fn resolve_with(
    template: &Template,
    params: &ParamMap,
    replacements: &[(String, String)],
) -> String {
    let resolved = resolve_nodes(template.nodes(), params);
    let mut sql = normalize::normalize(&resolved);
    for (token, replacement) in replacements {
        sql = sql.replace(token.as_str(), replacement.as_str());
    }
    let sql = sql.trim().to_string();
    debug!(sql = %sql, params = ?mask_params(params), "Resolved template");
    sql
}

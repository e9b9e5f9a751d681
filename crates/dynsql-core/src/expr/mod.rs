//! Safe condition evaluation for `test` attributes.
//!
//! Conditions are evaluated in four steps: a bare parameter name is
//! rewritten to a null check, parameter names are substituted with
//! literal values, the result is parsed against a small allow-listed
//! grammar, and the tree is interpreted. Every failure along the way
//! makes the condition false; nothing in a `test` attribute can abort
//! template resolution.

mod ast;
mod error;
mod eval;
mod lexer;
mod parser;
mod pratt;
mod token;

pub use ast::{BinaryOp, Expr, Literal, UnaryOp};
pub use error::ExprError;
pub use lexer::Lexer;
pub use parser::{parse, Parser};
pub use token::{Keyword, Span, Token, TokenKind};

use regex::{NoExpand, Regex};
use tracing::warn;

use crate::params::{render_literal, ParamMap};

/// Evaluates a condition against the given parameters.
///
/// Never fails: syntax errors, unsupported constructs, unresolved
/// identifiers and type errors all yield `false` after logging a
/// warning.
#[must_use]
pub fn evaluate(condition: &str, params: &ParamMap) -> bool {
    match try_evaluate(condition, params) {
        Ok(result) => result,
        Err(err) => {
            warn!(
                condition = %condition,
                error = %err,
                "Condition failed to evaluate, treating as false"
            );
            false
        }
    }
}

/// Evaluates a condition, surfacing the failure reason.
pub fn try_evaluate(condition: &str, params: &ParamMap) -> Result<bool, ExprError> {
    let trimmed = condition.trim();

    // A condition that is just a parameter name asks "is it set and
    // non-null", not "is it truthy": `<if test="status">` must pass
    // for status = 0.
    let rewritten = if is_bare_identifier(trimmed) && params.contains_key(trimmed) {
        format!("{trimmed} != null")
    } else {
        trimmed.to_string()
    };

    let substituted = substitute_params(&rewritten, params);
    let expr = parse(&substituted)?;
    let value = eval::eval_expr(&expr)?;
    Ok(value.is_truthy())
}

/// True if the whole string is one word: letters, digits, underscores.
fn is_bare_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Replaces whole-word occurrences of parameter names with rendered
/// literal values.
///
/// Longer names substitute first so `user_id` is never clobbered by a
/// shorter overlapping key; ties break alphabetically to keep the
/// result deterministic. Non-scalar values (arrays, objects) are left
/// alone and the name stays an identifier.
fn substitute_params(expr: &str, params: &ParamMap) -> String {
    let mut keys: Vec<&String> = params.keys().collect();
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut result = expr.to_string();
    for key in keys {
        let Some(value) = params.get(key.as_str()) else {
            continue;
        };
        let Some(rendered) = render_literal(value) else {
            continue;
        };
        let Ok(pattern) = Regex::new(&format!(r"\b{}\b", regex::escape(key))) else {
            continue;
        };
        result = pattern
            .replace_all(&result, NoExpand(&rendered))
            .into_owned();
    }
    result
}

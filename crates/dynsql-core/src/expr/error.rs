//! Condition evaluation errors.
//!
//! These are never fatal to template resolution: the resolver treats
//! any failed condition as false. They surface through
//! [`try_evaluate`](super::try_evaluate) for callers that want the
//! reason.

use super::token::{Span, TokenKind};

/// An error raised while parsing or evaluating a condition.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExprError {
    /// The condition is not valid syntax.
    #[error("{message} at position {}..{}", .span.start, .span.end)]
    Syntax {
        /// Description of the problem.
        message: String,
        /// Where in the substituted condition it occurred.
        span: Span,
    },

    /// The condition parsed past a construct outside the supported
    /// grammar, e.g. a function call or attribute access.
    #[error("Unsupported construct: {found} at position {}..{}", .span.start, .span.end)]
    Unsupported {
        /// Description of the offending token.
        found: String,
        /// Where in the substituted condition it occurred.
        span: Span,
    },

    /// An identifier had no matching parameter.
    #[error("Unresolved identifier: {name}")]
    Unresolved {
        /// The identifier as written.
        name: String,
    },

    /// An operator was applied to operands it does not support.
    #[error("Type mismatch: cannot apply '{op}' to {lhs} and {rhs}")]
    TypeMismatch {
        /// The operator as written.
        op: &'static str,
        /// Type name of the left operand.
        lhs: &'static str,
        /// Type name of the right operand.
        rhs: &'static str,
    },
}

impl ExprError {
    /// Creates a syntax error for an unexpected token.
    #[must_use]
    pub fn unexpected(expected: &str, found: &TokenKind, span: Span) -> Self {
        Self::Syntax {
            message: format!("Unexpected token: expected {expected}, found {found:?}"),
            span,
        }
    }

    /// Creates a syntax error for running out of input.
    #[must_use]
    pub fn unexpected_eof(expected: &str, span: Span) -> Self {
        Self::Syntax {
            message: format!("Unexpected end of condition: expected {expected}"),
            span,
        }
    }
}

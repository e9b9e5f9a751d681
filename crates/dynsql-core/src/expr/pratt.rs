//! Pratt parser binding powers for condition operators.
//!
//! Precedence from loosest to tightest: `or`, `and`, `not`,
//! comparisons, unary minus.

use super::ast::{BinaryOp, UnaryOp};
use super::token::{Keyword, TokenKind};

/// Returns the prefix binding power for a token, or `None` if the
/// token cannot start an expression.
#[must_use]
pub const fn prefix_binding_power(kind: &TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Minus => Some(15),
        TokenKind::Keyword(Keyword::Not) => Some(4),
        _ => None,
    }
}

/// Returns the (left, right) infix binding powers for a token, or
/// `None` if the token is not an infix operator.
///
/// Left < right makes the operator left-associative: a chain like
/// `a and b and c` parses as `(a and b) and c`.
#[must_use]
pub const fn infix_binding_power(kind: &TokenKind) -> Option<(u8, u8)> {
    match kind {
        TokenKind::Keyword(Keyword::Or) => Some((1, 2)),
        TokenKind::Keyword(Keyword::And) => Some((3, 4)),
        TokenKind::EqEq
        | TokenKind::NotEq
        | TokenKind::Lt
        | TokenKind::LtEq
        | TokenKind::Gt
        | TokenKind::GtEq
        | TokenKind::Keyword(Keyword::Is) => Some((5, 6)),
        _ => None,
    }
}

/// Maps a token to its binary operator, if it is one.
#[must_use]
pub const fn token_to_binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::EqEq => Some(BinaryOp::Eq),
        TokenKind::NotEq => Some(BinaryOp::NotEq),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::LtEq => Some(BinaryOp::LtEq),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::GtEq => Some(BinaryOp::GtEq),
        TokenKind::Keyword(Keyword::And) => Some(BinaryOp::And),
        TokenKind::Keyword(Keyword::Or) => Some(BinaryOp::Or),
        _ => None,
    }
}

/// Maps a token to its unary operator, if it is one.
#[must_use]
pub const fn token_to_unary_op(kind: &TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Minus => Some(UnaryOp::Neg),
        TokenKind::Keyword(Keyword::Not) => Some(UnaryOp::Not),
        _ => None,
    }
}

//! Pratt parser for the condition language.
//!
//! Grammar (loosest to tightest): `or`, `and`, `not`, comparisons
//! (`==` `!=` `<` `<=` `>` `>=` `is` `is not`), unary minus. Operands
//! are literals, identifiers and parenthesized expressions. Anything
//! else is rejected.

use super::ast::{BinaryOp, Expr, Literal};
use super::error::ExprError;
use super::lexer::Lexer;
use super::pratt::{
    infix_binding_power, prefix_binding_power, token_to_binary_op, token_to_unary_op,
};
use super::token::{Keyword, Token, TokenKind};

/// Parses a full condition into an expression tree.
///
/// The entire input must be consumed: trailing tokens after a valid
/// expression (e.g. the `(` of a call) are rejected.
pub fn parse(input: &str) -> Result<Expr, ExprError> {
    let mut parser = Parser::new(input);
    let expr = parser.parse_expression(0)?;
    match &parser.current.kind {
        TokenKind::Eof => Ok(expr),
        TokenKind::Error(message) => Err(ExprError::Syntax {
            message: message.clone(),
            span: parser.current.span,
        }),
        kind => Err(ExprError::Unsupported {
            found: format!("{kind:?}"),
            span: parser.current.span,
        }),
    }
}

/// Recursive-descent parser with Pratt-style operator precedence.
#[derive(Debug)]
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Creates a parser and primes it with the first token.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self { lexer, current }
    }

    /// Parses an expression with at least the given binding power.
    pub fn parse_expression(&mut self, min_bp: u8) -> Result<Expr, ExprError> {
        let mut left = self.parse_prefix()?;

        loop {
            let Some((l_bp, r_bp)) = infix_binding_power(&self.current.kind) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }

            // `is` and `is not` get their own handling so the optional
            // `not` binds to the operator rather than the operand.
            if self.current.as_keyword() == Some(Keyword::Is) {
                self.advance();
                let op = if self.current.as_keyword() == Some(Keyword::Not) {
                    self.advance();
                    BinaryOp::IsNot
                } else {
                    BinaryOp::Is
                };
                let right = self.parse_expression(r_bp)?;
                left = Expr::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                };
                continue;
            }

            let Some(op) = token_to_binary_op(&self.current.kind) else {
                break;
            };
            self.advance();
            let right = self.parse_expression(r_bp)?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ExprError> {
        if let Some(op) = token_to_unary_op(&self.current.kind) {
            let bp = prefix_binding_power(&self.current.kind).unwrap_or(15);
            self.advance();
            let operand = self.parse_expression(bp)?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ExprError> {
        let token = self.current.clone();
        match token.kind {
            TokenKind::Integer(n) => {
                self.advance();
                Ok(Expr::Literal(Literal::Integer(n)))
            }
            TokenKind::Float(f) => {
                self.advance();
                Ok(Expr::Literal(Literal::Float(f)))
            }
            TokenKind::String(s) => {
                self.advance();
                Ok(Expr::Literal(Literal::String(s)))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Expr::Identifier(name))
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                Ok(Expr::Literal(Literal::Boolean(true)))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                Ok(Expr::Literal(Literal::Boolean(false)))
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                Ok(Expr::Literal(Literal::Null))
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expression(0)?;
                self.expect(&TokenKind::RightParen, ")")?;
                Ok(inner)
            }
            TokenKind::Error(message) => Err(ExprError::Syntax {
                message,
                span: token.span,
            }),
            TokenKind::Eof => Err(ExprError::unexpected_eof("expression", token.span)),
            kind => Err(ExprError::unexpected("expression", &kind, token.span)),
        }
    }

    // --- Helper methods ---

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<(), ExprError> {
        if std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind) {
            self.advance();
            Ok(())
        } else {
            Err(ExprError::unexpected(
                expected,
                &self.current.kind,
                self.current.span,
            ))
        }
    }
}

//! AST for the condition language.

use std::fmt;

/// A literal value produced by parameter substitution or written
/// directly in a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Integer literal, e.g. `42`.
    Integer(i64),
    /// Float literal, e.g. `3.5`.
    Float(f64),
    /// String literal, e.g. `'active'`.
    String(String),
    /// Boolean literal: `true` or `false`.
    Boolean(bool),
    /// The `null` literal.
    Null,
}

impl Literal {
    /// Returns the type name used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Boolean(_) => "boolean",
            Self::Null => "null",
        }
    }

    /// Returns the truth value of the literal.
    ///
    /// `null`, `false`, `0`, `0.0` and the empty string are falsy;
    /// everything else is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null | Self::Boolean(false) => false,
            Self::Boolean(true) => true,
            Self::Integer(n) => *n != 0,
            Self::Float(f) => *f != 0.0,
            Self::String(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Null => write!(f, "null"),
        }
    }
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `is`
    Is,
    /// `is not`
    IsNot,
    /// `and`
    And,
    /// `or`
    Or,
}

impl BinaryOp {
    /// Returns the operator as written in a condition.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Is => "is",
            Self::IsNot => "is not",
            Self::And => "and",
            Self::Or => "or",
        }
    }

    /// Returns true for the ordering comparisons `<`, `<=`, `>`, `>=`.
    #[must_use]
    pub const fn is_ordering(&self) -> bool {
        matches!(self, Self::Lt | Self::LtEq | Self::Gt | Self::GtEq)
    }
}

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-` (numeric negation)
    Neg,
    /// `not` (logical negation)
    Not,
}

impl UnaryOp {
    /// Returns the operator as written in a condition.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "not",
        }
    }
}

/// A parsed condition expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal(Literal),
    /// An identifier that survived substitution, i.e. a name with no
    /// matching parameter.
    Identifier(String),
    /// A unary operation, e.g. `not x` or `-1`.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expr>,
    },
    /// A binary operation, e.g. `a and b` or `x >= 10`.
    Binary {
        /// Left-hand side.
        left: Box<Expr>,
        /// The operator.
        op: BinaryOp,
        /// Right-hand side.
        right: Box<Expr>,
    },
}

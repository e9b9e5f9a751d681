//! Tree-walking evaluator for parsed conditions.
//!
//! `and`/`or` evaluate truthiness and return the deciding operand, so
//! `0 or 'fallback'` yields `'fallback'`. Comparisons return booleans.
//! Equality across mismatched types is false rather than an error;
//! ordering across mismatched types is a type error, which the caller
//! turns into a false condition.

use super::ast::{BinaryOp, Expr, Literal, UnaryOp};
use super::error::ExprError;

use std::cmp::Ordering;

/// Evaluates an expression to a literal value.
pub fn eval_expr(expr: &Expr) -> Result<Literal, ExprError> {
    match expr {
        Expr::Literal(lit) => Ok(lit.clone()),
        Expr::Identifier(name) => Err(ExprError::Unresolved { name: name.clone() }),
        Expr::Unary { op, operand } => eval_unary(*op, operand),
        Expr::Binary { left, op, right } => eval_binary(left, *op, right),
    }
}

fn eval_unary(op: UnaryOp, operand: &Expr) -> Result<Literal, ExprError> {
    let value = eval_expr(operand)?;
    match op {
        UnaryOp::Not => Ok(Literal::Boolean(!value.is_truthy())),
        UnaryOp::Neg => match value {
            Literal::Integer(n) => Ok(Literal::Integer(-n)),
            Literal::Float(f) => Ok(Literal::Float(-f)),
            other => Err(ExprError::TypeMismatch {
                op: op.as_str(),
                lhs: other.type_name(),
                rhs: other.type_name(),
            }),
        },
    }
}

fn eval_binary(left: &Expr, op: BinaryOp, right: &Expr) -> Result<Literal, ExprError> {
    // Logical operators short-circuit: the right side is only
    // evaluated when the left side does not decide the result.
    match op {
        BinaryOp::And => {
            let lhs = eval_expr(left)?;
            if lhs.is_truthy() {
                eval_expr(right)
            } else {
                Ok(lhs)
            }
        }
        BinaryOp::Or => {
            let lhs = eval_expr(left)?;
            if lhs.is_truthy() {
                Ok(lhs)
            } else {
                eval_expr(right)
            }
        }
        BinaryOp::Eq | BinaryOp::Is => {
            let lhs = eval_expr(left)?;
            let rhs = eval_expr(right)?;
            Ok(Literal::Boolean(literal_eq(&lhs, &rhs)))
        }
        BinaryOp::NotEq | BinaryOp::IsNot => {
            let lhs = eval_expr(left)?;
            let rhs = eval_expr(right)?;
            Ok(Literal::Boolean(!literal_eq(&lhs, &rhs)))
        }
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            let lhs = eval_expr(left)?;
            let rhs = eval_expr(right)?;
            let ordering = literal_cmp(&lhs, &rhs, op)?;
            let result = match op {
                BinaryOp::Lt => ordering == Ordering::Less,
                BinaryOp::LtEq => ordering != Ordering::Greater,
                BinaryOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            };
            Ok(Literal::Boolean(result))
        }
    }
}

/// Equality across literals. Integers and floats compare numerically;
/// any other cross-type comparison is simply unequal.
fn literal_eq(lhs: &Literal, rhs: &Literal) -> bool {
    match (lhs, rhs) {
        (Literal::Integer(a), Literal::Integer(b)) => a == b,
        (Literal::Float(a), Literal::Float(b)) => a == b,
        #[allow(clippy::cast_precision_loss)]
        (Literal::Integer(a), Literal::Float(b)) | (Literal::Float(b), Literal::Integer(a)) => {
            (*a as f64) == *b
        }
        (Literal::String(a), Literal::String(b)) => a == b,
        (Literal::Boolean(a), Literal::Boolean(b)) => a == b,
        (Literal::Null, Literal::Null) => true,
        _ => false,
    }
}

/// Ordering across literals. Only numbers order against numbers and
/// strings against strings.
fn literal_cmp(lhs: &Literal, rhs: &Literal, op: BinaryOp) -> Result<Ordering, ExprError> {
    let mismatch = || ExprError::TypeMismatch {
        op: op.as_str(),
        lhs: lhs.type_name(),
        rhs: rhs.type_name(),
    };

    match (lhs, rhs) {
        (Literal::Integer(a), Literal::Integer(b)) => Ok(a.cmp(b)),
        (Literal::String(a), Literal::String(b)) => Ok(a.cmp(b)),
        (
            Literal::Integer(_) | Literal::Float(_),
            Literal::Integer(_) | Literal::Float(_),
        ) => {
            let a = as_f64(lhs);
            let b = as_f64(rhs);
            a.partial_cmp(&b).ok_or_else(mismatch)
        }
        _ => Err(mismatch()),
    }
}

#[allow(clippy::cast_precision_loss)]
fn as_f64(value: &Literal) -> f64 {
    match value {
        Literal::Integer(n) => *n as f64,
        Literal::Float(f) => *f,
        _ => 0.0,
    }
}

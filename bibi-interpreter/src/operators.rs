// Operator semantics on runtime values
//
// Integer arithmetic is checked and `int / int` truncates. An int meeting a
// float is widened to float. Comparisons go through `Value::compare`.

use crate::error::RuntimeErrorKind;
use bibi_parser::{BinaryOperator, UnaryOperator};
use bibi_typechecker::Value;
use std::cmp::Ordering;

pub(crate) fn unary(operator: UnaryOperator, operand: Value) -> Result<Value, RuntimeErrorKind> {
    match (operator, operand) {
        (UnaryOperator::Negate, Value::Int(value)) => value
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| overflow(operator.to_string())),
        (UnaryOperator::Negate, Value::Float(value)) => Ok(Value::Float(-value)),
        (UnaryOperator::Not, Value::Bool(value)) => Ok(Value::Bool(!value)),
        (operator, operand) => Err(RuntimeErrorKind::InvalidOperation {
            operation: operator.to_string(),
            operands: operand.type_name().to_string(),
        }),
    }
}

/// Apply a non-short-circuiting binary operator
pub(crate) fn binary(
    operator: BinaryOperator,
    left: &Value,
    right: &Value,
) -> Result<Value, RuntimeErrorKind> {
    if operator.is_arithmetic() {
        return arithmetic(operator, left, right);
    }
    if operator.is_logical() {
        return match (left, right) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(match operator {
                BinaryOperator::And => *a && *b,
                _ => *a || *b,
            })),
            _ => Err(invalid(operator, left, right)),
        };
    }

    let ordering = left
        .compare(right)
        .ok_or_else(|| invalid(operator, left, right))?;
    let result = match operator {
        BinaryOperator::Equal => ordering == Ordering::Equal,
        BinaryOperator::NotEqual => ordering != Ordering::Equal,
        BinaryOperator::Less => ordering == Ordering::Less,
        BinaryOperator::LessEqual => ordering != Ordering::Greater,
        BinaryOperator::Greater => ordering == Ordering::Greater,
        BinaryOperator::GreaterEqual => ordering != Ordering::Less,
        _ => return Err(invalid(operator, left, right)),
    };
    Ok(Value::Bool(result))
}

fn arithmetic(
    operator: BinaryOperator,
    left: &Value,
    right: &Value,
) -> Result<Value, RuntimeErrorKind> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => integer_arithmetic(operator, *a, *b),
        (Value::Str(a), Value::Str(b)) if operator == BinaryOperator::Add => {
            Ok(Value::Str(format!("{a}{b}")))
        }
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => float_arithmetic(operator, a, b),
            _ => Err(invalid(operator, left, right)),
        },
    }
}

fn integer_arithmetic(operator: BinaryOperator, a: i64, b: i64) -> Result<Value, RuntimeErrorKind> {
    let result = match operator {
        BinaryOperator::Add => a.checked_add(b),
        BinaryOperator::Subtract => a.checked_sub(b),
        BinaryOperator::Multiply => a.checked_mul(b),
        BinaryOperator::Divide if b == 0 => return Err(RuntimeErrorKind::DivisionByZero),
        BinaryOperator::Divide => a.checked_div(b),
        _ => {
            return Err(RuntimeErrorKind::Internal {
                message: format!("'{operator}' is not an arithmetic operator"),
            });
        }
    };
    result
        .map(Value::Int)
        .ok_or_else(|| overflow(operator.to_string()))
}

fn float_arithmetic(operator: BinaryOperator, a: f64, b: f64) -> Result<Value, RuntimeErrorKind> {
    let result = match operator {
        BinaryOperator::Add => a + b,
        BinaryOperator::Subtract => a - b,
        BinaryOperator::Multiply => a * b,
        BinaryOperator::Divide if b == 0.0 => return Err(RuntimeErrorKind::DivisionByZero),
        BinaryOperator::Divide => a / b,
        _ => {
            return Err(RuntimeErrorKind::Internal {
                message: format!("'{operator}' is not an arithmetic operator"),
            });
        }
    };
    Ok(Value::Float(result))
}

fn overflow(operation: String) -> RuntimeErrorKind {
    RuntimeErrorKind::IntegerOverflow { operation }
}

fn invalid(operator: BinaryOperator, left: &Value, right: &Value) -> RuntimeErrorKind {
    RuntimeErrorKind::InvalidOperation {
        operation: operator.to_string(),
        operands: format!("{} and {}", left.type_name(), right.type_name()),
    }
}

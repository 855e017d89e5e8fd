use crate::error::RuntimeErrorKind;
use crate::operators::{binary, unary};
use bibi_parser::{BinaryOperator, UnaryOperator};
use bibi_typechecker::Value;
use pretty_assertions::assert_eq;

#[test]
fn test_integer_division_truncates() {
    assert_eq!(
        binary(BinaryOperator::Divide, &Value::Int(7), &Value::Int(2)),
        Ok(Value::Int(3))
    );
    assert_eq!(
        binary(BinaryOperator::Divide, &Value::Int(-7), &Value::Int(2)),
        Ok(Value::Int(-3))
    );
}

#[test]
fn test_division_by_zero() {
    assert_eq!(
        binary(BinaryOperator::Divide, &Value::Int(1), &Value::Int(0)),
        Err(RuntimeErrorKind::DivisionByZero)
    );
    assert_eq!(
        binary(BinaryOperator::Divide, &Value::Float(1.0), &Value::Float(0.0)),
        Err(RuntimeErrorKind::DivisionByZero)
    );
    assert_eq!(
        binary(BinaryOperator::Divide, &Value::Int(1), &Value::Float(0.0)),
        Err(RuntimeErrorKind::DivisionByZero)
    );
}

#[test]
fn test_overflow_is_reported() {
    assert_eq!(
        unary(UnaryOperator::Negate, Value::Int(i64::MIN)),
        Err(RuntimeErrorKind::IntegerOverflow {
            operation: "-".to_string()
        })
    );
    assert_eq!(
        binary(BinaryOperator::Divide, &Value::Int(i64::MIN), &Value::Int(-1)),
        Err(RuntimeErrorKind::IntegerOverflow {
            operation: "/".to_string()
        })
    );
    assert_eq!(
        binary(BinaryOperator::Multiply, &Value::Int(i64::MAX), &Value::Int(2)),
        Err(RuntimeErrorKind::IntegerOverflow {
            operation: "*".to_string()
        })
    );
}

#[test]
fn test_mixed_numbers_widen_to_float() {
    assert_eq!(
        binary(BinaryOperator::Add, &Value::Int(1), &Value::Float(0.5)),
        Ok(Value::Float(1.5))
    );
    assert_eq!(
        binary(BinaryOperator::Less, &Value::Int(1), &Value::Float(1.5)),
        Ok(Value::Bool(true))
    );
}

#[test]
fn test_comparisons() {
    let cases = [
        (BinaryOperator::Equal, false),
        (BinaryOperator::NotEqual, true),
        (BinaryOperator::Less, true),
        (BinaryOperator::LessEqual, true),
        (BinaryOperator::Greater, false),
        (BinaryOperator::GreaterEqual, false),
    ];
    for (operator, expected) in cases {
        assert_eq!(
            binary(operator, &Value::Char('a'), &Value::Char('b')),
            Ok(Value::Bool(expected)),
            "'a' {operator} 'b'"
        );
    }
}

#[test]
fn test_invalid_operands() {
    assert_eq!(
        binary(BinaryOperator::Add, &Value::Null, &Value::Int(1)),
        Err(RuntimeErrorKind::InvalidOperation {
            operation: "+".to_string(),
            operands: "null and int".to_string(),
        })
    );
    assert_eq!(
        binary(BinaryOperator::Equal, &Value::Null, &Value::Null),
        Err(RuntimeErrorKind::InvalidOperation {
            operation: "==".to_string(),
            operands: "null and null".to_string(),
        })
    );
    assert_eq!(
        unary(UnaryOperator::Not, Value::Int(1)),
        Err(RuntimeErrorKind::InvalidOperation {
            operation: "not".to_string(),
            operands: "int".to_string(),
        })
    );
}

#[test]
fn test_string_concatenation() {
    assert_eq!(
        binary(
            BinaryOperator::Add,
            &Value::Str("ab".to_string()),
            &Value::Str("cd".to_string())
        ),
        Ok(Value::Str("abcd".to_string()))
    );
}

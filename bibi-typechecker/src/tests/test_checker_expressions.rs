use super::{assert_checks, errors};
use crate::error::SemanticError;
use crate::types::Type;
use pretty_assertions::assert_eq;

fn array(element: Type) -> Type {
    Type::Array(Box::new(element))
}

#[test]
fn test_int_arithmetic_stays_int() {
    for operator in ["+", "-", "*", "/"] {
        assert_checks(&format!("int a = 6; int b = 3; int c = a {operator} b;"));
    }
}

#[test]
fn test_float_operand_promotes_arithmetic() {
    for operator in ["+", "-", "*", "/"] {
        assert_checks(&format!(
            "int a = 6; float b = 3.0; float c = a {operator} b; float d = b {operator} a;"
        ));

        let found = errors(&format!("int a = 6; float b = 3.0; int c = a {operator} b;"));
        assert_eq!(
            found,
            vec![SemanticError::TypeMismatch {
                context: "declaration of 'c'".to_string(),
                expected: Type::Int,
                found: Type::Float,
            }]
        );
    }
}

#[test]
fn test_string_concatenation() {
    assert_checks(r#"str greeting = "hello, " + "world";"#);
}

#[test]
fn test_string_mixed_with_int_is_rejected() {
    let found = errors(r#"str s = "a"; int n = 1; print s + n;"#);
    assert_eq!(
        found,
        vec![SemanticError::ConcatenationMismatch {
            left: Type::Str,
            right: Type::Int,
        }]
    );
}

#[test]
fn test_strings_only_support_addition() {
    let found = errors(r#"str s = "a" * "b";"#);
    assert_eq!(
        found,
        vec![SemanticError::NonNumericOperand {
            operator: "*".to_string(),
            left: Type::Str,
            right: Type::Str,
        }]
    );
}

#[test]
fn test_comparison_requires_equal_types() {
    assert_checks(r#"bool a = 1 < 2; bool b = "x" == "y"; bool c = 'a' != 'b';"#);

    let found = errors("bool b = 1 < 2.0;");
    assert_eq!(
        found,
        vec![SemanticError::ComparisonMismatch {
            left: Type::Int,
            right: Type::Float,
        }]
    );
}

#[test]
fn test_logical_operators_require_bool() {
    assert_checks("bool b = true and not false or 1 < 2;");

    let found = errors("bool b = 1 and true;");
    assert_eq!(
        found,
        vec![SemanticError::LogicalOperand {
            operator: "and".to_string(),
            left: Type::Int,
            right: Type::Bool,
        }]
    );
}

#[test]
fn test_unary_operators() {
    assert_checks("int a = -5; float b = -2.5; bool c = not true;");

    assert_eq!(
        errors("int x = -true;"),
        vec![SemanticError::UnaryOperand {
            operator: "-".to_string(),
            expected: "numeric",
            found: Type::Bool,
        }]
    );
    assert_eq!(
        errors("bool b = not 1;"),
        vec![SemanticError::UnaryOperand {
            operator: "not".to_string(),
            expected: "boolean",
            found: Type::Int,
        }]
    );
}

#[test]
fn test_undefined_variable_does_not_cascade() {
    let found = errors("int x = y + 1 * 2;");
    assert_eq!(
        found,
        vec![SemanticError::UndefinedVariable {
            name: "y".to_string()
        }]
    );
}

#[test]
fn test_parenthesized_expression() {
    assert_checks("int x = (1 + 2) * 3;");
}

#[test]
fn test_array_literal_types() {
    assert_checks(
        r#"
        int[] xs = [1, 2, 3];
        float[] ys = [1, 2.5];
        char[] cs = ['a', 'b'];
        str[] ss = ["a", "b"];
        "#,
    );

    assert_eq!(
        errors("int[] xs = [1, 2.5];"),
        vec![SemanticError::TypeMismatch {
            context: "declaration of 'xs'".to_string(),
            expected: array(Type::Int),
            found: array(Type::Float),
        }]
    );
}

#[test]
fn test_scalar_is_not_wrapped_into_array() {
    assert_eq!(
        errors("int[] xs = 5;"),
        vec![SemanticError::TypeMismatch {
            context: "declaration of 'xs'".to_string(),
            expected: array(Type::Int),
            found: Type::Int,
        }]
    );
}

#[test]
fn test_index_access_yields_base_type() {
    assert_checks("int[] xs = [1, 2, 3]; int i = 1; int v = xs[i + 1]; print xs[0];");
    assert_checks(r#"str[] names = ["ann", "bo"]; str first = names[0];"#);
}

#[test]
fn test_index_must_be_int() {
    assert_eq!(
        errors("int[] xs = [1, 2, 3]; int v = xs[1.5];"),
        vec![SemanticError::NonIntIndex { found: Type::Float }]
    );
}

#[test]
fn test_indexing_a_non_array() {
    assert_eq!(
        errors("int n = 5; int v = n[0];"),
        vec![SemanticError::NotAnArray {
            name: "n".to_string(),
            found: Type::Int,
        }]
    );
}

#[test]
fn test_error_accessor_outside_recover() {
    assert_eq!(
        errors("print get_error;"),
        vec![SemanticError::ErrorAccessorOutsideRecover {
            name: "get_error".to_string()
        }]
    );
}

#[test]
fn test_error_accessor_inside_recover() {
    assert_checks(
        r#"
        try {
            int x = 1 / 0;
        } recover {
            print get_error;
            str message = get_error();
        }
        "#,
    );
}

#[test]
fn test_function_is_not_a_value() {
    assert_eq!(
        errors("func f() int { return 1; } int x = f;"),
        vec![SemanticError::NotAValue {
            name: "f".to_string(),
            kind: "function",
        }]
    );
}

#[test]
fn test_void_call_in_operator() {
    assert_eq!(
        errors("func g() { } int x = g() + 1;"),
        vec![SemanticError::VoidValue {
            context: "an operator expression"
        }]
    );
}

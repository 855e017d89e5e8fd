use super::{output, runtime_failure};
use crate::RuntimeErrorKind;
use bibi_typechecker::Value;
use pretty_assertions::assert_eq;

#[test]
fn test_print_sum() {
    assert_eq!(output("int x = 5; int y = 2; print x + y;"), "7");
}

#[test]
fn test_output_lines_are_newline_joined() {
    assert_eq!(output(r#"print 1; print "two"; print 3.5;"#), "1\ntwo\n3.5");
}

#[test]
fn test_empty_program() {
    assert_eq!(output(""), "");
}

#[test]
fn test_default_initialization() {
    assert_eq!(
        output("int a; float b; str c; bool d; int[] e; print a; print b; print c; print d; print e;"),
        "0\n0.0\n\nfalse\n[]"
    );
}

#[test]
fn test_integer_and_float_arithmetic() {
    assert_eq!(output("print 7 / 2;"), "3");
    assert_eq!(output("print -7 / 2;"), "-3");
    assert_eq!(output("print 7 / 2.0;"), "3.5");
    assert_eq!(output("float f = 1.5 * 2.0; print f;"), "3.0");
    assert_eq!(output("print (1 + 2) * 3 - 4;"), "5");
}

#[test]
fn test_string_operations() {
    assert_eq!(output(r#"str s = "foo" + "bar"; print s;"#), "foobar");
    assert_eq!(output(r#"print "a" < "b"; print "a" == "a";"#), "true\ntrue");
}

#[test]
fn test_array_literals() {
    assert_eq!(output("float[] xs = [1, 2.5]; print xs;"), "[1.0, 2.5]");
    assert_eq!(output("char[] cs = ['a', 'b']; print cs;"), "['a', 'b']");
    assert_eq!(output(r#"str[] ss = ["x", "y"]; print ss[1];"#), "y");
    assert_eq!(output("int[] xs = [-1, 2, 3]; print xs[0] + xs[2];"), "2");
}

#[test]
fn test_index_out_of_bounds_is_fatal() {
    let (error, printed) = runtime_failure(crate::run_source(
        "int[] arr = [1,2,3]; print arr[5];",
    ));
    assert_eq!(
        error.kind,
        RuntimeErrorKind::IndexOutOfBounds {
            name: "arr".to_string(),
            index: 5,
            length: 3,
        }
    );
    assert_eq!(printed, "");
    assert_eq!(
        error.to_string(),
        "[Runtime Error] Line 1:28 - Index 5 out of bounds for 'arr' of length 3"
    );
}

#[test]
fn test_negative_index_is_out_of_bounds() {
    let (error, _) = runtime_failure(crate::run_source("int[] arr = [1]; int i = -1; print arr[i];"));
    assert!(matches!(
        error.kind,
        RuntimeErrorKind::IndexOutOfBounds { index: -1, .. }
    ));
}

#[test]
fn test_records() {
    assert_eq!(
        output("type Point { int x; int y; } Point p; p.x = 3; p.y = p.x * 2; print p.x + p.y;"),
        "9"
    );
    assert_eq!(output("type P { str name; } P p; print p.name;"), "null");
}

#[test]
fn test_unset_field_in_arithmetic() {
    let (error, _) = runtime_failure(crate::run_source(
        "type P { int x; } P p; int y = p.x + 1;",
    ));
    assert_eq!(
        error.kind,
        RuntimeErrorKind::InvalidOperation {
            operation: "+".to_string(),
            operands: "null and int".to_string(),
        }
    );
}

#[test]
fn test_fatal_error_keeps_earlier_output() {
    let (error, printed) = runtime_failure(crate::run_source(
        r#"print "before"; int x = 5 / 0; print "after";"#,
    ));
    assert_eq!(error.kind, RuntimeErrorKind::DivisionByZero);
    assert_eq!(printed, "before");
}

#[test]
fn test_integer_overflow() {
    let (error, _) = runtime_failure(crate::run_source(
        "int big = 9223372036854775807; print big + 1;",
    ));
    assert_eq!(
        error.kind,
        RuntimeErrorKind::IntegerOverflow {
            operation: "+".to_string()
        }
    );
}

#[test]
fn test_last_expression_value() {
    let outcome = crate::run_source("int x = 4; x * 2;").unwrap();
    assert_eq!(outcome.last_value, Some(Value::Int(8)));
    assert_eq!(outcome.output, "");

    let outcome = crate::run_source("func noop() { } noop();").unwrap();
    assert_eq!(outcome.last_value, None);
}

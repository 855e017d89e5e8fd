use super::{assert_checks, check, errors};
use crate::error::SemanticError;
use crate::scope::ScopeStore;
use crate::symbol::Symbol;
use crate::types::Type;
use crate::{check_program, register_builtins};
use pretty_assertions::assert_eq;

#[test]
fn test_well_typed_program_has_no_diagnostics() {
    let warnings = check("int x = 5; int y = 2; print x + y;").unwrap();
    assert!(warnings.is_empty());
}

#[test]
fn test_declarations_without_initializer() {
    assert_checks("int a; float b; str c; char d; bool e; int[] f; print a;");
}

#[test]
fn test_redeclaration_in_same_scope() {
    assert_eq!(
        errors("int x = 1; int x = 2;"),
        vec![SemanticError::DuplicateDefinition {
            name: "x".to_string()
        }]
    );
}

#[test]
fn test_shadowing_in_nested_scopes() {
    assert_checks(
        r#"
        int x = 1;
        { int x = 2; }
        if true { str x = "branch"; } else { bool x = false; }
        while false { float x = 1.5; }
        try { char x = 'c'; } recover { int x = 0; }
        "#,
    );
}

#[test]
fn test_block_locals_end_with_block() {
    assert_eq!(
        errors("{ int inner = 1; } print inner;"),
        vec![SemanticError::UndefinedVariable {
            name: "inner".to_string()
        }]
    );
}

#[test]
fn test_assignment_requires_declaration() {
    assert_eq!(
        errors("y = 3;"),
        vec![SemanticError::UndeclaredAssignment {
            name: "y".to_string()
        }]
    );
}

#[test]
fn test_assignment_type_must_match() {
    assert_eq!(
        errors(r#"int x = 0; x = "s";"#),
        vec![SemanticError::TypeMismatch {
            context: "assignment to 'x'".to_string(),
            expected: Type::Int,
            found: Type::Str,
        }]
    );
}

#[test]
fn test_conditions_must_be_bool() {
    assert_eq!(
        errors(r#"if 1 { } while "s" { }"#),
        vec![
            SemanticError::ConditionNotBool {
                construct: "If",
                found: Type::Int,
            },
            SemanticError::ConditionNotBool {
                construct: "While",
                found: Type::Str,
            },
        ]
    );
}

#[test]
fn test_else_if_condition_is_checked() {
    assert_eq!(
        errors("int x = 1; if x > 0 { } else if x { }"),
        vec![SemanticError::ConditionNotBool {
            construct: "If",
            found: Type::Int,
        }]
    );
}

#[test]
fn test_loop_control_placement() {
    assert_checks(
        r#"
        int i = 0;
        while i < 10 {
            i = i + 1;
            if i == 2 { continue; }
            if i == 5 { break; }
        }
        "#,
    );

    assert_eq!(
        errors("break; continue;"),
        vec![
            SemanticError::LoopControlOutsideLoop { keyword: "Break" },
            SemanticError::LoopControlOutsideLoop {
                keyword: "Continue"
            },
        ]
    );
}

#[test]
fn test_loop_control_does_not_cross_function_boundary() {
    assert_eq!(
        errors("func f() { break; } while true { f(); }"),
        vec![SemanticError::LoopControlOutsideLoop { keyword: "Break" }]
    );
}

#[test]
fn test_print_rejects_void() {
    assert_eq!(
        errors("func g() { } print g();"),
        vec![SemanticError::VoidValue { context: "print" }]
    );
}

#[test]
fn test_error_accessor_is_not_assignable() {
    assert_eq!(
        errors(r#"try { } recover { get_error = "x"; }"#),
        vec![SemanticError::AssignToBuiltin {
            name: "get_error".to_string()
        }]
    );
}

#[test]
fn test_error_accessor_cannot_be_redeclared_in_recovery() {
    assert_eq!(
        errors(r#"try { int a = 1 / 0; } recover { str get_error = "mine"; print get_error; }"#),
        vec![SemanticError::DuplicateDefinition {
            name: "get_error".to_string()
        }]
    );
}

#[test]
fn test_error_accessor_is_not_assignable_from_nested_block() {
    assert_eq!(
        errors(r#"try { } recover { if true { get_error = "x"; } }"#),
        vec![SemanticError::AssignToBuiltin {
            name: "get_error".to_string()
        }]
    );
}

#[test]
fn test_error_accessor_may_be_shadowed_inside_recovery_blocks() {
    assert_checks(r#"try { } recover { { str get_error = "own"; print get_error; } }"#);
}

#[test]
fn test_checking_continues_after_errors() {
    let found = errors(r#"int a = "x"; int b = true; print c;"#);
    assert_eq!(found.len(), 3);
    assert!(matches!(found[0], SemanticError::TypeMismatch { .. }));
    assert!(matches!(found[1], SemanticError::TypeMismatch { .. }));
    assert_eq!(
        found[2],
        SemanticError::UndefinedVariable {
            name: "c".to_string()
        }
    );
}

#[test]
fn test_failed_check_rolls_back_globals() {
    let program =
        bibi_parser::parse_program("int x = 1; func f() { } type P { int a; } print y;").unwrap();
    let mut store = ScopeStore::new();
    register_builtins(&mut store);

    assert!(check_program(&program, &mut store).is_err());

    let global = store.global();
    assert!(!global.contains("x"));
    assert!(!global.contains("f"));
    assert!(!global.contains("P"));
    assert!(global.contains("get_error"));
}

#[test]
fn test_successful_check_keeps_declarations_only() {
    let program =
        bibi_parser::parse_program("int x = 1; func f() { } type P { int a; } P p;").unwrap();
    let mut store = ScopeStore::new();
    register_builtins(&mut store);

    let checked = check_program(&program, &mut store).unwrap();
    assert!(checked.warnings().is_empty());
    assert_eq!(checked.program().statements.len(), 4);

    let global = store.global();
    assert!(matches!(global.get("f"), Some(Symbol::Function(_))));
    assert!(matches!(global.get("P"), Some(Symbol::RecordType(_))));
    assert!(!global.contains("x"));
    assert!(!global.contains("p"));
    assert_eq!(store.depth(), 1);
}

#[test]
fn test_functions_persist_across_checks() {
    let mut store = ScopeStore::new();
    register_builtins(&mut store);

    let first = bibi_parser::parse_program("func double(int n) int { return n * 2; }").unwrap();
    check_program(&first, &mut store).unwrap();

    let second = bibi_parser::parse_program("int r = double(4);").unwrap();
    assert!(check_program(&second, &mut store).is_ok());

    let again = bibi_parser::parse_program("func double(int n) int { return n; }").unwrap();
    let diagnostics = check_program(&again, &mut store).unwrap_err();
    assert_eq!(
        diagnostics.iter().next().map(|d| d.error.clone()),
        Some(SemanticError::FunctionRedefined {
            name: "double".to_string()
        })
    );
    assert!(store.global().contains("double"));
}

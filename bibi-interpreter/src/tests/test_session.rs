use crate::{InterpreterSession, SessionError};
use bibi_typechecker::{SemanticError, Value};
use pretty_assertions::assert_eq;

#[test]
fn test_declarations_persist_between_runs() {
    let mut session = InterpreterSession::new();
    session
        .run_source("func sq(int n) int { return n * n; }")
        .unwrap();
    session.run_source("int r = sq(4);").unwrap();

    assert_eq!(session.variable("r"), Some(Value::Int(16)));
    assert_eq!(session.run_source("print r + 1;").unwrap().output, "17");
}

#[test]
fn test_type_error_prevents_execution() {
    let mut session = InterpreterSession::new();
    let result =
        session.run_source(r#"print "side effect"; str s = "a"; int n = 1; print s + n;"#);

    match result {
        Err(SessionError::Check(diagnostics)) => {
            assert_eq!(diagnostics.error_count(), 1);
            assert!(matches!(
                diagnostics.iter().next().map(|d| &d.error),
                Some(SemanticError::ConcatenationMismatch { .. })
            ));
        }
        other => panic!("expected a check failure, got {other:?}"),
    }
    assert_eq!(session.variable("s"), None);
}

#[test]
fn test_failed_check_leaves_session_unchanged() {
    let mut session = InterpreterSession::new();
    assert!(session.run_source("int q = 1; print missing;").is_err());
    assert_eq!(session.variable("q"), None);

    session.run_source("int q = 2;").unwrap();
    assert_eq!(session.variable("q"), Some(Value::Int(2)));
}

#[test]
fn test_runtime_failure_keeps_output() {
    let mut session = InterpreterSession::new();
    match session.run_source("print 1; print 2; int z = 1 / 0;") {
        Err(SessionError::Runtime { output, .. }) => assert_eq!(output, "1\n2"),
        other => panic!("expected a runtime failure, got {other:?}"),
    }
}

#[test]
fn test_parse_error() {
    let mut session = InterpreterSession::new();
    assert!(matches!(
        session.run_source("int = ;"),
        Err(SessionError::Parse(_))
    ));
}

#[test]
fn test_clear_forgets_declarations() {
    let mut session = InterpreterSession::new();
    session
        .run_source("int kept = 1; func f() int { return 1; }")
        .unwrap();
    session.clear();

    assert_eq!(session.variable("kept"), None);
    assert!(matches!(
        session.run_source("print f();"),
        Err(SessionError::Check(_))
    ));
    assert_eq!(session.variable("get_error"), Some(Value::Null));
}

#[test]
fn test_check_source_does_not_register_anything() {
    let mut session = InterpreterSession::new();
    assert!(session.check_source("int w = 1; func h() { }").is_ok());
    assert_eq!(session.variable("w"), None);

    assert!(matches!(
        session.run_source("h();"),
        Err(SessionError::Check(_))
    ));
}

#[test]
fn test_symbols_lists_globals() {
    let mut session = InterpreterSession::new();
    session.run_source("int answer = 42;").unwrap();

    let symbols = session.symbols();
    assert!(symbols.contains("answer: int = 42"));
    assert!(symbols.contains("get_error: str = null"));
}

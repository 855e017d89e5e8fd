// Whole-program checks through the public API

use bibi_parser::parse_program;
use bibi_typechecker::{
    check_program, register_builtins, ScopeStore, SemanticError, Severity, Symbol, Type,
};

const INVENTORY: &str = r#"
type Item {
    str name;
    int count;
}

func restock(int current, int amount) int {
    if current + amount > 100 {
        return 100;
    }
    return current + amount;
}

Item apple;
apple.name = "apple";
apple.count = restock(40, 25);

try {
    int[] bins = [1, 2];
    print bins[apple.count];
} recover {
    print "no bin: " + get_error;
}
"#;

fn store() -> ScopeStore {
    let mut store = ScopeStore::new();
    register_builtins(&mut store);
    store
}

#[test]
fn test_well_typed_program_checks_cleanly() {
    let program = parse_program(INVENTORY).unwrap();
    let mut store = store();

    let checked = check_program(&program, &mut store).unwrap();
    assert!(checked.warnings().is_empty());

    // Declarations survive the pass, runtime-defined globals do not
    assert!(matches!(store.lookup("restock"), Ok(Symbol::Function(_))));
    assert!(matches!(store.lookup("Item"), Ok(Symbol::RecordType(_))));
    assert!(store.lookup("apple").is_err());
}

#[test]
fn test_every_error_is_collected() {
    let source = r#"
        int a = "one";
        print missing;
        func f() int { return true; }
        break;
    "#;
    let program = parse_program(source).unwrap();
    let mut store = store();

    let diagnostics = check_program(&program, &mut store).unwrap_err();
    let errors: Vec<&SemanticError> = diagnostics.errors().map(|d| &d.error).collect();

    assert_eq!(errors.len(), 4);
    assert!(matches!(errors[0], SemanticError::TypeMismatch { .. }));
    assert!(matches!(errors[1], SemanticError::UndefinedVariable { .. }));
    assert!(matches!(errors[2], SemanticError::ReturnTypeMismatch { .. }));
    assert!(matches!(errors[3], SemanticError::LoopControlOutsideLoop { .. }));

    // Nothing from a failed pass is left behind
    assert!(store.lookup("f").is_err());
}

#[test]
fn test_warnings_do_not_block() {
    let program = parse_program("func sign(int n) int { if n > 0 { return 1; } }").unwrap();
    let mut store = store();

    let checked = check_program(&program, &mut store).unwrap();
    let warnings: Vec<_> = checked.warnings().iter().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].severity, Severity::Warning);
    assert!(matches!(
        store.lookup("sign"),
        Ok(Symbol::Function(function)) if function.return_type == Type::Int
    ));
}

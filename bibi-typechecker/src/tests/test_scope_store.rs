use crate::scope::{ScopeError, ScopeKind, ScopeStore};
use crate::symbol::{RecordTypeSymbol, Symbol, SymbolUpdate};
use crate::types::Type;
use crate::value::Value;
use indexmap::IndexMap;
use pretty_assertions::assert_eq;

fn int(value: i64) -> Symbol {
    Symbol::variable(Type::Int, Value::Int(value))
}

fn value_of(store: &ScopeStore, name: &str) -> Value {
    match store.lookup(name) {
        Ok(Symbol::Variable { value, .. }) => value.clone(),
        other => panic!("expected variable '{name}', got {other:?}"),
    }
}

#[test]
fn test_new_store_has_only_global_scope() {
    let store = ScopeStore::new();
    assert_eq!(store.depth(), 1);
    assert!(store.is_global());
    assert_eq!(store.current().kind, ScopeKind::Global);
}

#[test]
fn test_redeclaration_in_same_scope_fails() {
    let mut store = ScopeStore::new();
    store.define("x", int(1)).unwrap();

    let result = store.define("x", int(2));
    assert_eq!(
        result,
        Err(ScopeError::DuplicateDefinition {
            name: "x".to_string(),
            scope: "global".to_string(),
        })
    );
    assert_eq!(value_of(&store, "x"), Value::Int(1));
}

#[test]
fn test_shadowing_in_nested_scope() {
    let mut store = ScopeStore::new();
    store.define("x", int(1)).unwrap();
    store.push("block", ScopeKind::Block);
    store.define("x", int(2)).unwrap();

    assert_eq!(value_of(&store, "x"), Value::Int(2));

    store.pop().unwrap();
    assert_eq!(value_of(&store, "x"), Value::Int(1));
}

#[test]
fn test_lookup_missing_name() {
    let store = ScopeStore::new();
    assert_eq!(
        store.lookup("missing"),
        Err(ScopeError::NotFound {
            name: "missing".to_string()
        })
    );
}

#[test]
fn test_function_scope_hides_caller_locals() {
    let mut store = ScopeStore::new();
    store.define("global_count", int(10)).unwrap();
    store.push("block", ScopeKind::Block);
    store.define("caller_local", int(1)).unwrap();
    store.push("f", ScopeKind::Function);

    assert!(store.lookup("caller_local").is_err());
    assert_eq!(value_of(&store, "global_count"), Value::Int(10));
    assert_eq!(store.resolving_kind("global_count"), Some(ScopeKind::Global));
    assert_eq!(store.resolving_kind("caller_local"), None);
}

#[test]
fn test_update_merges_into_nearest_definition() {
    let mut store = ScopeStore::new();
    store.define("x", int(1)).unwrap();
    store.push("loop", ScopeKind::Loop);

    store.update("x", SymbolUpdate::Value(Value::Int(5))).unwrap();
    store.pop().unwrap();

    match store.lookup("x").unwrap() {
        Symbol::Variable { ty, value } => {
            assert_eq!(ty, &Type::Int);
            assert_eq!(value, &Value::Int(5));
        }
        other => panic!("expected variable, got {other:?}"),
    }
}

#[test]
fn test_update_undefined_symbol() {
    let mut store = ScopeStore::new();
    assert_eq!(
        store.update("ghost", SymbolUpdate::Value(Value::Int(1))),
        Err(ScopeError::UndefinedSymbol {
            name: "ghost".to_string()
        })
    );
}

#[test]
fn test_update_record_field() {
    let mut fields = IndexMap::new();
    fields.insert("x".to_string(), Type::Int);
    let point = RecordTypeSymbol {
        name: "Point".to_string(),
        fields,
    };

    let mut store = ScopeStore::new();
    store
        .define("p", Symbol::RecordInstance(point.instantiate()))
        .unwrap();

    store
        .update(
            "p",
            SymbolUpdate::Field {
                name: "x".to_string(),
                value: Value::Int(3),
            },
        )
        .unwrap();
    let missing = store.update(
        "p",
        SymbolUpdate::Field {
            name: "z".to_string(),
            value: Value::Int(3),
        },
    );

    assert!(matches!(missing, Err(ScopeError::FieldNotFound { .. })));
    match store.lookup("p").unwrap() {
        Symbol::RecordInstance(instance) => {
            assert_eq!(instance.fields["x"].value, Value::Int(3));
        }
        other => panic!("expected record instance, got {other:?}"),
    }
}

#[test]
fn test_value_update_on_record_instance_is_rejected() {
    let point = RecordTypeSymbol {
        name: "Point".to_string(),
        fields: IndexMap::new(),
    };
    let mut store = ScopeStore::new();
    store
        .define("p", Symbol::RecordInstance(point.instantiate()))
        .unwrap();

    assert_eq!(
        store.update("p", SymbolUpdate::Value(Value::Int(1))),
        Err(ScopeError::InvalidUpdate {
            name: "p".to_string(),
            kind: "record instance",
        })
    );
}

#[test]
fn test_global_scope_cannot_be_popped() {
    let mut store = ScopeStore::new();
    assert!(matches!(store.pop(), Err(ScopeError::CannotPopGlobal)));
}

#[test]
fn test_reset_to_global_drops_nested_scopes() {
    let mut store = ScopeStore::new();
    store.define("kept", int(1)).unwrap();
    store.push("f", ScopeKind::Function);
    store.push("while", ScopeKind::Loop);
    store.define("dropped", int(2)).unwrap();

    store.reset_to_global();

    assert_eq!(store.depth(), 1);
    assert!(store.lookup("dropped").is_err());
    assert!(store.lookup("kept").is_ok());
}

#[test]
fn test_history_keeps_popped_scopes() {
    let mut store = ScopeStore::new();
    store.push("if", ScopeKind::Branch);
    store.define("inner", int(1)).unwrap();
    store.pop().unwrap();

    let records: Vec<_> = store.history().collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].name, "if");
    assert_eq!(records[1].depth, 1);
    assert!(records[1].closed);
    assert_eq!(records[1].symbols, vec!["inner".to_string()]);
    assert!(!records[0].closed);
}

#[test]
fn test_history_is_bounded() {
    let mut store = ScopeStore::with_history_limit(3);
    for i in 0..10 {
        store.push(format!("block{i}"), ScopeKind::Block);
        store.pop().unwrap();
    }

    let names: Vec<_> = store.history().map(|r| r.name.clone()).collect();
    assert_eq!(names, vec!["block7", "block8", "block9"]);
}

#[test]
fn test_remove_global() {
    let mut store = ScopeStore::new();
    store.define("x", int(1)).unwrap();

    assert_eq!(store.remove_global("x"), Some(int(1)));
    assert_eq!(store.remove_global("x"), None);
    store.define("x", int(2)).unwrap();
}

#[test]
fn test_describe_lists_scopes_and_symbols() {
    let mut store = ScopeStore::new();
    store.define("x", int(7)).unwrap();
    store.push("block", ScopeKind::Block);

    let description = store.describe();
    assert!(description.contains("[global] Global"));
    assert!(description.contains("x: int = 7"));
    assert!(description.contains("  [block] Block"));
}

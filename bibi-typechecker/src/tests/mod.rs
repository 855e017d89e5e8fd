//! Unit tests for the Bibi typechecker

mod test_checker_expressions;
mod test_checker_statements;
mod test_diagnostics;
mod test_scope_store;

use crate::{check_program, register_builtins, Diagnostics, ScopeStore, SemanticError};

/// Check `source` against a fresh store; `Ok` carries the warnings
pub(crate) fn check(source: &str) -> Result<Diagnostics, Diagnostics> {
    let program = bibi_parser::parse_program(source).expect("test source should parse");
    let mut store = ScopeStore::new();
    register_builtins(&mut store);
    check_program(&program, &mut store).map(|checked| checked.warnings().clone())
}

/// Error-severity diagnostics for a program expected to fail
pub(crate) fn errors(source: &str) -> Vec<SemanticError> {
    match check(source) {
        Ok(warnings) => panic!("expected checking to fail, got warnings: {warnings}"),
        Err(diagnostics) => diagnostics.errors().map(|d| d.error.clone()).collect(),
    }
}

pub(crate) fn assert_checks(source: &str) {
    if let Err(diagnostics) = check(source) {
        panic!("expected program to check, got:\n{diagnostics}");
    }
}

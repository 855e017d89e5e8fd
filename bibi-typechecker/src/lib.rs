//! Bibi Typechecker
//!
//! Static checking for Bibi programs, run to completion before anything executes.
//!
//! ## Architecture
//!
//! - **Scope Store**: the stack of lexical scopes, shared with the evaluator
//! - **Type Checker**: one tree walk typing every expression and validating every statement
//! - **Diagnostics**: ordered, positioned errors and warnings for the CLI to render
//!
//! Symbols and runtime values live here as well, since both phases read and
//! write the same scope store.

pub mod checker;
pub mod diagnostics;
pub mod error;
pub mod scope;
pub mod symbol;
pub mod types;
pub mod value;

// Re-export public API
pub use checker::{
    check_program, register_builtins, CheckContext, CheckedProgram, TypeChecker, ERROR_ACCESSOR,
};
pub use diagnostics::{Diagnostic, DiagnosticSummary, Diagnostics, Severity};
pub use error::SemanticError;
pub use scope::{
    Scope, ScopeError, ScopeId, ScopeKind, ScopeRecord, ScopeStore, DEFAULT_HISTORY_LIMIT,
};
pub use symbol::{
    FieldSlot, FunctionParameter, FunctionSymbol, RecordInstance, RecordTypeSymbol, Symbol,
    SymbolUpdate,
};
pub use types::Type;
pub use value::Value;

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;

//! Interpreter session
//!
//! Owns a scope store that persists between runs, so a REPL can declare a
//! function on one line and call it on the next. Each run goes through the
//! whole pipeline: parse, check, and only then evaluate.

use crate::config::EvaluatorConfig;
use crate::error::RuntimeError;
use crate::evaluator::Evaluator;
use bibi_parser::{parse_program, ParseError};
use bibi_typechecker::{check_program, register_builtins, Diagnostics, ScopeStore, Symbol, Value};
use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while running source in a session
#[derive(Debug, Error, Diagnostic)]
pub enum SessionError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error("Type checking failed with {}", .0.summary())]
    #[diagnostic(code(bibi::session::check_failed))]
    Check(Diagnostics),

    #[error("{error}")]
    #[diagnostic(code(bibi::session::runtime_failed))]
    Runtime {
        error: RuntimeError,
        /// Output printed before the failure
        output: String,
    },
}

/// What a successful run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub output: String,
    pub last_value: Option<Value>,
    /// Non-blocking diagnostics from checking
    pub warnings: Diagnostics,
}

pub struct InterpreterSession {
    store: ScopeStore,
    config: EvaluatorConfig,
}

impl Default for InterpreterSession {
    fn default() -> Self {
        Self::new()
    }
}

impl InterpreterSession {
    pub fn new() -> Self {
        Self::with_config(EvaluatorConfig::default())
    }

    pub fn with_config(config: EvaluatorConfig) -> Self {
        Self {
            store: fresh_store(),
            config,
        }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Parse, check and execute `source` against the session's store
    pub fn run_source(&mut self, source: &str) -> Result<RunOutcome, SessionError> {
        let program = parse_program(source)?;
        let checked = check_program(&program, &mut self.store).map_err(SessionError::Check)?;
        let warnings = checked.warnings().clone();

        let execution = Evaluator::new(&mut self.store, self.config.clone())
            .run(&checked)
            .map_err(|failure| SessionError::Runtime {
                error: failure.error,
                output: failure.output,
            })?;

        Ok(RunOutcome {
            output: execution.output,
            last_value: execution.last_value,
            warnings,
        })
    }

    /// Parse and check `source` without executing it or touching the session
    pub fn check_source(&self, source: &str) -> Result<Diagnostics, SessionError> {
        let program = parse_program(source)?;
        let mut scratch = self.store.clone();
        let checked = check_program(&program, &mut scratch).map_err(SessionError::Check)?;
        Ok(checked.warnings().clone())
    }

    /// Forget every declaration made in this session
    pub fn clear(&mut self) {
        self.store = fresh_store();
    }

    /// Current value of a variable visible at the top level
    pub fn variable(&self, name: &str) -> Option<Value> {
        match self.store.lookup(name) {
            Ok(Symbol::Variable { value, .. }) => Some(value.clone()),
            _ => None,
        }
    }

    /// Human-readable dump of the active scopes
    pub fn symbols(&self) -> String {
        self.store.describe()
    }

    pub fn store(&self) -> &ScopeStore {
        &self.store
    }
}

fn fresh_store() -> ScopeStore {
    let mut store = ScopeStore::new();
    register_builtins(&mut store);
    store
}

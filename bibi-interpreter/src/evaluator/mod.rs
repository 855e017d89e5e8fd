//! Tree-walking evaluator
//!
//! Runs a [`CheckedProgram`] against the scope store the checker validated it
//! with. Statements return a [`ControlSignal`]; runtime errors travel as an
//! `Unwind`, recoverable only while a guarded block is executing.

mod calls;
mod expressions;
mod statements;

use crate::config::EvaluatorConfig;
use crate::control::ControlSignal;
use crate::error::{RuntimeError, RuntimeErrorKind, Unwind};
use bibi_parser::{Span, StatementKind};
use bibi_typechecker::{CheckedProgram, ScopeKind, ScopeStore, Value};
use std::time::Instant;
use tracing::{debug, error};

pub(crate) type Flow = Result<ControlSignal, Unwind>;

/// Result of a run that finished normally
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    /// Printed lines, newline-joined
    pub output: String,
    /// Value of the last top-level expression statement, if it produced one
    pub last_value: Option<Value>,
}

/// A run stopped by a fatal runtime error
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionFailure {
    pub error: RuntimeError,
    /// Output printed before the failure
    pub output: String,
}

pub struct Evaluator<'s> {
    store: &'s mut ScopeStore,
    config: EvaluatorConfig,
    /// `None` when the timeout is too large to represent
    deadline: Option<Instant>,
    guarded: bool,
    call_depth: usize,
    output: Vec<String>,
    last_value: Option<Value>,
}

impl<'s> Evaluator<'s> {
    pub fn new(store: &'s mut ScopeStore, config: EvaluatorConfig) -> Self {
        let deadline = Instant::now().checked_add(config.timeout);
        Self {
            store,
            config,
            deadline,
            guarded: false,
            call_depth: 0,
            output: Vec::new(),
            last_value: None,
        }
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(mut self, checked: &CheckedProgram<'_>) -> Result<Execution, ExecutionFailure> {
        self.deadline = Instant::now().checked_add(self.config.timeout);
        let depth = self.store.depth();

        for statement in &checked.program().statements {
            let result = match &statement.kind {
                StatementKind::Expression(expression) => {
                    self.evaluate(expression).map(|value| {
                        if !value.is_null() {
                            self.last_value = Some(value);
                        }
                        ControlSignal::Normal
                    })
                }
                _ => self.execute(statement),
            };

            let error = match result {
                Ok(ControlSignal::Normal) => continue,
                Ok(signal) => RuntimeError::new(
                    RuntimeErrorKind::Internal {
                        message: format!("'{signal}' escaped the program"),
                    },
                    &statement.span,
                ),
                Err(unwind) => unwind.into_error(),
            };

            self.store.truncate(depth);
            error!(%error, "execution failed");
            return Err(ExecutionFailure {
                error,
                output: self.output.join("\n"),
            });
        }

        debug!(lines = self.output.len(), "execution finished");
        Ok(Execution {
            output: self.output.join("\n"),
            last_value: self.last_value,
        })
    }

    /// Build the unwind for `kind`, catchable only inside a guarded block
    pub(crate) fn fail(&self, kind: RuntimeErrorKind, span: &Span) -> Unwind {
        let recoverable = self.guarded && kind.is_recoverable();
        let error = RuntimeError::new(kind, span);
        if recoverable {
            Unwind::Recoverable(error)
        } else {
            Unwind::Fatal(error)
        }
    }

    /// Run `body` inside a fresh scope, popping it on every exit path
    pub(crate) fn in_scope<T>(
        &mut self,
        name: &str,
        kind: ScopeKind,
        body: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let depth = self.store.depth();
        self.store.push(name, kind);
        let result = body(self);
        self.store.truncate(depth);
        result
    }
}

//! Statement execution
//!
//! Declarations, assignments, blocks, conditionals, loops and try/recover

use super::{Evaluator, Flow};
use crate::control::ControlSignal;
use crate::stack::ensure_sufficient_stack;
use crate::error::{LoopLimit, RuntimeErrorKind, Unwind};
use bibi_parser::{
    Assignment, AssignmentTarget, Expression, Identifier, IfStatement, RecordInstanceDeclaration,
    Span, Statement, StatementKind, TryStatement, VariableDeclaration, WhileStatement,
};
use bibi_typechecker::{
    ERROR_ACCESSOR, ScopeError, ScopeKind, Symbol, SymbolUpdate, Type, Value,
};
use std::time::Instant;
use tracing::{debug, trace};

impl Evaluator<'_> {
    pub(crate) fn execute(&mut self, statement: &Statement) -> Flow {
        ensure_sufficient_stack(|| self.execute_statement(statement))
    }

    fn execute_statement(&mut self, statement: &Statement) -> Flow {
        let span = &statement.span;
        match &statement.kind {
            StatementKind::VariableDeclaration(declaration) => {
                self.execute_variable_declaration(declaration, span)
            }
            StatementKind::Assignment(assignment) => self.execute_assignment(assignment, span),
            // Registered in the global scope while checking
            StatementKind::FunctionDeclaration(_) | StatementKind::RecordTypeDeclaration(_) => {
                Ok(ControlSignal::Normal)
            }
            StatementKind::Block(block) => self.in_scope("block", ScopeKind::Block, |evaluator| {
                evaluator.execute_block(&block.statements)
            }),
            StatementKind::If(statement) => self.execute_if(statement),
            StatementKind::While(statement) => self.execute_while(statement, span),
            StatementKind::Break => Ok(ControlSignal::Break),
            StatementKind::Continue => Ok(ControlSignal::Continue),
            StatementKind::Return(value) => {
                let value = match value {
                    Some(expression) => self.evaluate(expression)?,
                    None => Value::Null,
                };
                Ok(ControlSignal::Return(value))
            }
            StatementKind::Print(expression) => {
                let value = self.evaluate(expression)?;
                trace!(%value, "print");
                self.output.push(value.to_string());
                Ok(ControlSignal::Normal)
            }
            StatementKind::Try(statement) => self.execute_try(statement),
            StatementKind::RecordInstanceDeclaration(declaration) => {
                self.execute_record_instance_declaration(declaration, span)
            }
            StatementKind::Expression(expression) => {
                self.evaluate(expression)?;
                Ok(ControlSignal::Normal)
            }
        }
    }

    /// Execute statements in order, stopping at the first non-normal signal
    pub(crate) fn execute_block(&mut self, statements: &[Statement]) -> Flow {
        for statement in statements {
            match self.execute(statement)? {
                ControlSignal::Normal => {}
                signal => return Ok(signal),
            }
        }
        Ok(ControlSignal::Normal)
    }

    /// Define `name` in the innermost scope
    pub(crate) fn define(&mut self, name: &Identifier, symbol: Symbol) -> Result<(), Unwind> {
        self.store
            .define(name.name.clone(), symbol)
            .map_err(|error| {
                self.fail(
                    RuntimeErrorKind::Internal {
                        message: error.to_string(),
                    },
                    &name.span,
                )
            })
    }

    fn execute_variable_declaration(
        &mut self,
        declaration: &VariableDeclaration,
        span: &Span,
    ) -> Flow {
        let ty = Type::from_type_name(&declaration.type_name);
        let value = match &declaration.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => ty.default_value(),
        };
        trace!(name = %declaration.name.name, line = span.line, "declare");
        self.define(&declaration.name, Symbol::variable(ty, value))?;
        Ok(ControlSignal::Normal)
    }

    fn execute_assignment(&mut self, assignment: &Assignment, span: &Span) -> Flow {
        let value = self.evaluate(&assignment.value)?;
        let (name, update) = match &assignment.target {
            AssignmentTarget::Variable(name) => (name, SymbolUpdate::Value(value)),
            AssignmentTarget::Field { record, field } => (
                record,
                SymbolUpdate::Field {
                    name: field.name.clone(),
                    value,
                },
            ),
        };

        self.store.update(&name.name, update).map_err(|error| {
            let kind = match error {
                ScopeError::FieldNotFound { record, field } => {
                    RuntimeErrorKind::FieldNotFound { record, field }
                }
                ScopeError::InvalidUpdate { name, .. } => RuntimeErrorKind::NotARecord { name },
                _ => RuntimeErrorKind::UndefinedVariable {
                    name: name.name.clone(),
                },
            };
            self.fail(kind, span)
        })?;
        Ok(ControlSignal::Normal)
    }

    fn execute_record_instance_declaration(
        &mut self,
        declaration: &RecordInstanceDeclaration,
        span: &Span,
    ) -> Flow {
        let instance = match self.store.lookup(&declaration.record_type.name) {
            Ok(Symbol::RecordType(schema)) => schema.instantiate(),
            _ => {
                return Err(self.fail(
                    RuntimeErrorKind::Internal {
                        message: format!(
                            "record type '{}' is not registered",
                            declaration.record_type.name
                        ),
                    },
                    span,
                ));
            }
        };
        self.define(&declaration.name, Symbol::RecordInstance(instance))?;
        Ok(ControlSignal::Normal)
    }

    pub(crate) fn evaluate_condition(&mut self, condition: &Expression) -> Result<bool, Unwind> {
        match self.evaluate(condition)? {
            Value::Bool(value) => Ok(value),
            other => Err(self.fail(
                RuntimeErrorKind::TypeMismatch {
                    expected: "bool",
                    found: other.type_name(),
                },
                &condition.span,
            )),
        }
    }

    fn execute_if(&mut self, statement: &IfStatement) -> Flow {
        for branch in &statement.branches {
            if self.evaluate_condition(&branch.condition)? {
                return self.in_scope("if", ScopeKind::Branch, |evaluator| {
                    evaluator.execute_block(&branch.body.statements)
                });
            }
        }
        match &statement.else_block {
            Some(else_block) => self.in_scope("else", ScopeKind::Branch, |evaluator| {
                evaluator.execute_block(&else_block.statements)
            }),
            None => Ok(ControlSignal::Normal),
        }
    }

    fn execute_while(&mut self, statement: &WhileStatement, span: &Span) -> Flow {
        let mut iterations = 0usize;
        while self.evaluate_condition(&statement.condition)? {
            iterations += 1;
            if iterations > self.config.max_iterations {
                let reason = LoopLimit::Iterations(self.config.max_iterations);
                return Err(self.fail(RuntimeErrorKind::LoopLimitExceeded { reason }, span));
            }
            if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                let reason = LoopLimit::Timeout(self.config.timeout);
                return Err(self.fail(RuntimeErrorKind::LoopLimitExceeded { reason }, span));
            }

            let signal = self.in_scope("while", ScopeKind::Loop, |evaluator| {
                evaluator.execute_block(&statement.body.statements)
            })?;
            match signal {
                ControlSignal::Normal | ControlSignal::Continue => {}
                ControlSignal::Break => break,
                ControlSignal::Return(_) => return Ok(signal),
            }
        }
        Ok(ControlSignal::Normal)
    }

    fn execute_try(&mut self, statement: &TryStatement) -> Flow {
        let outer = self.guarded;
        self.guarded = true;
        let result = self.in_scope("try", ScopeKind::Guarded, |evaluator| {
            evaluator.execute_block(&statement.protected.statements)
        });
        self.guarded = outer;

        let error = match result {
            Err(Unwind::Recoverable(error)) => error,
            other => return other,
        };
        debug!(%error, "recovering from runtime error");

        // Failures inside the recovery block are fatal
        self.guarded = false;
        let result = self.in_scope("recover", ScopeKind::Recovery, |evaluator| {
            let message = Value::Str(error.message());
            evaluator
                .store
                .define(ERROR_ACCESSOR, Symbol::variable(Type::Str, message))
                .map_err(|scope_error| {
                    evaluator.fail(
                        RuntimeErrorKind::Internal {
                            message: scope_error.to_string(),
                        },
                        &statement.recovery.span,
                    )
                })?;
            evaluator.execute_block(&statement.recovery.statements)
        });
        self.guarded = outer;
        result
    }
}

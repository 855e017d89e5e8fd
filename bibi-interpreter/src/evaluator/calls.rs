//! Function call protocol

use super::Evaluator;
use crate::control::ControlSignal;
use crate::error::{RuntimeErrorKind, Unwind};
use bibi_parser::{FunctionCall, Span};
use bibi_typechecker::{ERROR_ACCESSOR, ScopeKind, Symbol, Value};
use std::rc::Rc;
use tracing::debug;

impl Evaluator<'_> {
    pub(crate) fn call_function(&mut self, call: &FunctionCall, span: &Span) -> Result<Value, Unwind> {
        let name = &call.name;
        if name.name == ERROR_ACCESSOR && call.arguments.is_empty() {
            return self.read_variable(name);
        }

        let function = match self.store.lookup(&name.name) {
            Ok(Symbol::Function(function)) => Rc::clone(function),
            Ok(other) => {
                let kind = RuntimeErrorKind::NotAFunction {
                    name: name.name.clone(),
                    kind: other.kind_name(),
                };
                return Err(self.fail(kind, &name.span));
            }
            Err(_) => {
                let kind = RuntimeErrorKind::UndefinedFunction {
                    name: name.name.clone(),
                };
                return Err(self.fail(kind, &name.span));
            }
        };

        // Arguments are evaluated left to right in the caller's scope
        let mut arguments = Vec::with_capacity(call.arguments.len());
        for argument in &call.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        if arguments.len() != function.parameters.len() {
            let kind = RuntimeErrorKind::ArityMismatch {
                function: function.name.clone(),
                expected: function.parameters.len(),
                found: arguments.len(),
            };
            return Err(self.fail(kind, span));
        }
        if self.call_depth >= self.config.max_call_depth {
            let kind = RuntimeErrorKind::StackOverflow {
                max_depth: self.config.max_call_depth,
            };
            return Err(self.fail(kind, span));
        }

        debug!(function = %function.name, depth = self.call_depth, "call");
        self.call_depth += 1;
        let result = self.in_scope(&function.name, ScopeKind::Function, |evaluator| {
            for (parameter, value) in function.parameters.iter().zip(arguments) {
                let symbol = Symbol::variable(parameter.ty.clone(), value);
                evaluator
                    .store
                    .define(parameter.name.clone(), symbol)
                    .map_err(|error| {
                        evaluator.fail(
                            RuntimeErrorKind::Internal {
                                message: error.to_string(),
                            },
                            span,
                        )
                    })?;
            }
            evaluator.execute_block(&function.body.statements)
        });
        self.call_depth -= 1;

        match result? {
            ControlSignal::Return(value) => Ok(value),
            ControlSignal::Normal => Ok(Value::Null),
            signal @ (ControlSignal::Break | ControlSignal::Continue) => {
                let kind = RuntimeErrorKind::ControlFlowEscaped {
                    signal: signal.name(),
                    function: function.name.clone(),
                };
                Err(self.fail(kind, span))
            }
        }
    }
}

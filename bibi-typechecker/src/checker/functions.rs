//! Function declarations, calls and return statements

use super::TypeChecker;
use crate::error::SemanticError;
use crate::scope::ScopeKind;
use crate::symbol::{FunctionParameter, FunctionSymbol, Symbol};
use crate::types::Type;
use bibi_parser::{Expression, FunctionCall, FunctionDeclaration, Span, Statement, StatementKind};
use std::rc::Rc;

impl TypeChecker<'_> {
    pub(crate) fn check_function_declaration(&mut self, function: &FunctionDeclaration) {
        let name = &function.name;
        if !self.context.is_top_level() {
            self.report(
                SemanticError::NestedFunction {
                    name: name.name.clone(),
                },
                &name.span,
            );
            return;
        }

        let return_type = Type::from_return_type(function.return_type.as_ref());
        let symbol = FunctionSymbol {
            name: name.name.clone(),
            parameters: function
                .parameters
                .iter()
                .map(|parameter| FunctionParameter {
                    name: parameter.name.name.clone(),
                    ty: Type::from_type_name(&parameter.type_name),
                })
                .collect(),
            return_type: return_type.clone(),
            body: Rc::new(function.body.clone()),
        };

        // Registered before the body is checked so recursive calls resolve
        match self.store.global().get(&name.name) {
            Some(Symbol::Function(_)) => self.report(
                SemanticError::FunctionRedefined {
                    name: name.name.clone(),
                },
                &name.span,
            ),
            Some(_) => self.report(
                SemanticError::DuplicateDefinition {
                    name: name.name.clone(),
                },
                &name.span,
            ),
            None => self.declare(name, Symbol::Function(Rc::new(symbol)), false),
        }

        let depth = self.store.depth();
        self.store.push(name.name.clone(), ScopeKind::Function);
        let function_context = self.context.for_function(&name.name, return_type.clone());
        let outer = std::mem::replace(&mut self.context, function_context);

        for parameter in &function.parameters {
            let ty = Type::from_type_name(&parameter.type_name);
            let value = ty.default_value();
            self.declare(&parameter.name, Symbol::variable(ty, value), false);
        }
        for statement in &function.body.statements {
            self.check_statement(statement);
        }

        self.context = outer;
        self.store.truncate(depth);

        if return_type != Type::Void && !always_returns(&function.body.statements) {
            self.report(
                SemanticError::MissingReturn {
                    function: name.name.clone(),
                    expected: return_type,
                },
                &name.span,
            );
        }
    }

    pub(crate) fn check_return(&mut self, value: Option<&Expression>, span: &Span) {
        let found = value.map(|expression| self.type_of(expression));
        let Some(function) = self.context.current_function.clone() else {
            self.report(SemanticError::ReturnOutsideFunction, span);
            return;
        };

        match (found, function.return_type) {
            (None, Type::Void) => {}
            (None, expected) => self.report(
                SemanticError::MissingReturnValue {
                    function: function.name,
                    expected,
                },
                span,
            ),
            (Some(_), Type::Void) => self.report(
                SemanticError::VoidReturnsValue {
                    function: function.name,
                },
                span,
            ),
            (Some(Some(found)), expected) if found != expected => self.report(
                SemanticError::ReturnTypeMismatch {
                    function: function.name,
                    expected,
                    found,
                },
                span,
            ),
            _ => {}
        }
    }

    pub(crate) fn type_of_call(&mut self, call: &FunctionCall) -> Option<Type> {
        let name = &call.name;
        if call.arguments.is_empty() && self.is_error_accessor(&name.name) {
            return self.type_of_error_accessor(&name.span);
        }

        let arguments: Vec<Option<Type>> = call
            .arguments
            .iter()
            .map(|argument| self.type_of(argument))
            .collect();

        let function = match self.lookup(&name.name) {
            Some(Symbol::Function(function)) => function,
            Some(other) => {
                self.report(
                    SemanticError::NotAFunction {
                        name: name.name.clone(),
                        kind: other.kind_name(),
                    },
                    &name.span,
                );
                return None;
            }
            None => {
                self.report(
                    SemanticError::UndefinedFunction {
                        name: name.name.clone(),
                    },
                    &name.span,
                );
                return None;
            }
        };

        if arguments.len() != function.parameters.len() {
            self.report(
                SemanticError::ArgumentCount {
                    function: function.name.clone(),
                    expected: function.parameters.len(),
                    found: arguments.len(),
                },
                &name.span,
            );
            return Some(function.return_type.clone());
        }

        let checks = arguments
            .into_iter()
            .zip(&function.parameters)
            .zip(&call.arguments)
            .enumerate();
        for (position, ((found, parameter), argument)) in checks {
            if let Some(found) = found {
                if found != parameter.ty {
                    self.report(
                        SemanticError::ArgumentType {
                            function: function.name.clone(),
                            position: position + 1,
                            expected: parameter.ty.clone(),
                            found,
                        },
                        &argument.span,
                    );
                }
            }
        }

        Some(function.return_type.clone())
    }
}

/// Whether every path through `statements` ends in a return
fn always_returns(statements: &[Statement]) -> bool {
    statements.iter().any(statement_always_returns)
}

fn statement_always_returns(statement: &Statement) -> bool {
    match &statement.kind {
        StatementKind::Return(_) => true,
        StatementKind::Block(block) => always_returns(&block.statements),
        StatementKind::If(statement) => match &statement.else_block {
            Some(else_block) => {
                always_returns(&else_block.statements)
                    && statement
                        .branches
                        .iter()
                        .all(|branch| always_returns(&branch.body.statements))
            }
            None => false,
        },
        StatementKind::Try(statement) => {
            always_returns(&statement.protected.statements)
                && always_returns(&statement.recovery.statements)
        }
        _ => false,
    }
}

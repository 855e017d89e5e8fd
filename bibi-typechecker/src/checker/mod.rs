//! Type checker core
//!
//! One recursive walk over the program that computes a type for every
//! expression and validates every statement against the scope store. Errors
//! are collected rather than raised: each expression yields `Some(type)` or
//! `None` when its type could not be determined, and `None` suppresses
//! follow-on errors about the same expression.
//!
//! - `expressions` types literals, operators, identifiers and indexing
//! - `functions` handles declarations, calls and return statements
//! - `records` handles record types, instances and field access

pub mod context;
mod expressions;
mod functions;
mod records;

pub use context::{CheckContext, FunctionContext};

use crate::diagnostics::Diagnostics;
use crate::error::SemanticError;
use crate::scope::{ScopeKind, ScopeStore};
use crate::symbol::Symbol;
use crate::types::Type;
use crate::value::Value;
use bibi_parser::{
    Assignment, AssignmentTarget, Block, Expression, Identifier, IfStatement, Program, Span,
    Statement, StatementKind, TryStatement, VariableDeclaration, WhileStatement,
};

/// Builtin holding the message of the error caught by the enclosing recover block
pub const ERROR_ACCESSOR: &str = "get_error";

/// Pre-register builtin symbols in the global scope
pub fn register_builtins(store: &mut ScopeStore) {
    if store.global().contains(ERROR_ACCESSOR) {
        return;
    }
    if let Err(error) = store.define_global(ERROR_ACCESSOR, Symbol::variable(Type::Str, Value::Null))
    {
        tracing::warn!(%error, "failed to register builtin");
    }
}

/// A program that passed checking; the only input the evaluator accepts
#[derive(Debug)]
pub struct CheckedProgram<'p> {
    program: &'p Program,
    warnings: Diagnostics,
}

impl<'p> CheckedProgram<'p> {
    pub fn program(&self) -> &'p Program {
        self.program
    }

    /// Warning-severity diagnostics from the checking pass
    pub fn warnings(&self) -> &Diagnostics {
        &self.warnings
    }
}

/// Check `program` against `store`.
///
/// On success, functions and record types stay registered in the global
/// scope; globals that the evaluator defines while running (variables and
/// record instances) are removed again. On failure every global the pass
/// defined is rolled back.
pub fn check_program<'p>(
    program: &'p Program,
    store: &mut ScopeStore,
) -> Result<CheckedProgram<'p>, Diagnostics> {
    TypeChecker::new(store).check(program)
}

/// A global defined during the pass
struct DeclaredGlobal {
    name: String,
    defined_at_runtime: bool,
}

pub struct TypeChecker<'s> {
    store: &'s mut ScopeStore,
    diagnostics: Diagnostics,
    context: CheckContext,
    declared_globals: Vec<DeclaredGlobal>,
}

impl<'s> TypeChecker<'s> {
    pub fn new(store: &'s mut ScopeStore) -> Self {
        Self {
            store,
            diagnostics: Diagnostics::new(),
            context: CheckContext::default(),
            declared_globals: Vec::new(),
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(statements = program.statements.len()))]
    pub fn check<'p>(mut self, program: &'p Program) -> Result<CheckedProgram<'p>, Diagnostics> {
        let depth = self.store.depth();
        for statement in &program.statements {
            self.check_statement(statement);
        }
        self.store.truncate(depth);

        if self.diagnostics.has_errors() {
            for global in &self.declared_globals {
                self.store.remove_global(&global.name);
            }
            tracing::debug!(summary = %self.diagnostics.summary(), "checking failed");
            return Err(self.diagnostics);
        }

        for global in self.declared_globals.iter().filter(|g| g.defined_at_runtime) {
            self.store.remove_global(&global.name);
        }
        Ok(CheckedProgram {
            program,
            warnings: self.diagnostics,
        })
    }

    pub(crate) fn report(&mut self, error: SemanticError, span: &Span) {
        tracing::debug!(%error, line = span.line, column = span.column, "semantic error");
        self.diagnostics.push(error, span);
    }

    /// Snapshot of the symbol visible under `name`
    pub(crate) fn lookup(&self, name: &str) -> Option<Symbol> {
        self.store.lookup(name).ok().cloned()
    }

    /// Define `name` in the current scope, reporting redeclaration
    pub(crate) fn declare(&mut self, name: &Identifier, symbol: Symbol, defined_at_runtime: bool) {
        let at_global = self.store.is_global();
        match self.store.define(name.name.clone(), symbol) {
            Ok(()) if at_global => self.declared_globals.push(DeclaredGlobal {
                name: name.name.clone(),
                defined_at_runtime,
            }),
            Ok(()) => {}
            Err(_) => self.report(
                SemanticError::DuplicateDefinition {
                    name: name.name.clone(),
                },
                &name.span,
            ),
        }
    }

    pub(crate) fn check_statement(&mut self, statement: &Statement) {
        match &statement.kind {
            StatementKind::VariableDeclaration(declaration) => {
                self.check_variable_declaration(declaration)
            }
            StatementKind::Assignment(assignment) => self.check_assignment(assignment),
            StatementKind::FunctionDeclaration(function) => {
                self.check_function_declaration(function)
            }
            StatementKind::Block(block) => self.check_block(block, "block", ScopeKind::Block),
            StatementKind::If(statement) => self.check_if(statement),
            StatementKind::While(statement) => self.check_while(statement),
            StatementKind::Break => self.check_loop_control("Break", &statement.span),
            StatementKind::Continue => self.check_loop_control("Continue", &statement.span),
            StatementKind::Return(value) => self.check_return(value.as_ref(), &statement.span),
            StatementKind::Print(expression) => {
                if self.type_of(expression) == Some(Type::Void) {
                    self.report(
                        SemanticError::VoidValue { context: "print" },
                        &expression.span,
                    );
                }
            }
            StatementKind::Try(statement) => self.check_try(statement),
            StatementKind::RecordTypeDeclaration(declaration) => {
                self.check_record_type_declaration(declaration)
            }
            StatementKind::RecordInstanceDeclaration(declaration) => {
                self.check_record_instance_declaration(declaration)
            }
            StatementKind::Expression(expression) => {
                self.type_of(expression);
            }
        }
    }

    /// Check a block's statements inside a fresh scope
    pub(crate) fn check_block(&mut self, block: &Block, name: &str, kind: ScopeKind) {
        let depth = self.enter_block(name, kind);
        self.check_statements(block);
        self.leave_block(depth);
    }

    fn enter_block(&mut self, name: &str, kind: ScopeKind) -> usize {
        let depth = self.store.depth();
        self.store.push(name, kind);
        self.context.nesting += 1;
        depth
    }

    fn check_statements(&mut self, block: &Block) {
        for statement in &block.statements {
            self.check_statement(statement);
        }
    }

    fn leave_block(&mut self, depth: usize) {
        self.context.nesting -= 1;
        self.store.truncate(depth);
    }

    /// Whether `name` refers to the error accessor rather than a user variable
    pub(crate) fn is_error_accessor(&self, name: &str) -> bool {
        name == ERROR_ACCESSOR
            && matches!(
                self.store.resolving_kind(name),
                Some(ScopeKind::Global | ScopeKind::Recovery)
            )
    }

    fn check_variable_declaration(&mut self, declaration: &VariableDeclaration) {
        let declared = Type::from_type_name(&declaration.type_name);
        if let Some(initializer) = &declaration.initializer {
            let found = self.type_of(initializer);
            self.expect_type(found, &declared, &initializer.span, || {
                format!("declaration of '{}'", declaration.name.name)
            });
        }
        let value = declared.default_value();
        self.declare(&declaration.name, Symbol::variable(declared, value), true);
    }

    fn check_assignment(&mut self, assignment: &Assignment) {
        let found = self.type_of(&assignment.value);
        match &assignment.target {
            AssignmentTarget::Variable(name) => {
                if self.is_error_accessor(&name.name) {
                    self.report(
                        SemanticError::AssignToBuiltin {
                            name: name.name.clone(),
                        },
                        &name.span,
                    );
                    return;
                }
                match self.lookup(&name.name) {
                    Some(Symbol::Variable { ty, .. }) => {
                        self.expect_type(found, &ty, &assignment.value.span, || {
                            format!("assignment to '{}'", name.name)
                        });
                    }
                    Some(other) => self.report(
                        SemanticError::NotAValue {
                            name: name.name.clone(),
                            kind: other.kind_name(),
                        },
                        &name.span,
                    ),
                    None => self.report(
                        SemanticError::UndeclaredAssignment {
                            name: name.name.clone(),
                        },
                        &name.span,
                    ),
                }
            }
            AssignmentTarget::Field { record, field } => {
                if let Some(expected) = self.field_type(record, field) {
                    self.expect_type(found, &expected, &assignment.value.span, || {
                        format!("assignment to '{}.{}'", record.name, field.name)
                    });
                }
            }
        }
    }

    /// Report a mismatch unless `found` is unknown or equal to `expected`
    pub(crate) fn expect_type(
        &mut self,
        found: Option<Type>,
        expected: &Type,
        span: &Span,
        context: impl FnOnce() -> String,
    ) {
        if let Some(found) = found {
            if &found != expected {
                self.report(
                    SemanticError::TypeMismatch {
                        context: context(),
                        expected: expected.clone(),
                        found,
                    },
                    span,
                );
            }
        }
    }

    fn check_condition(&mut self, condition: &Expression, construct: &'static str) {
        match self.type_of(condition) {
            Some(Type::Bool) | None => {}
            Some(found) => self.report(
                SemanticError::ConditionNotBool { construct, found },
                &condition.span,
            ),
        }
    }

    fn check_if(&mut self, statement: &IfStatement) {
        for branch in &statement.branches {
            self.check_condition(&branch.condition, "If");
            self.check_block(&branch.body, "if", ScopeKind::Branch);
        }
        if let Some(else_block) = &statement.else_block {
            self.check_block(else_block, "else", ScopeKind::Branch);
        }
    }

    fn check_while(&mut self, statement: &WhileStatement) {
        self.check_condition(&statement.condition, "While");
        self.context.loop_depth += 1;
        self.check_block(&statement.body, "while", ScopeKind::Loop);
        self.context.loop_depth -= 1;
    }

    fn check_loop_control(&mut self, keyword: &'static str, span: &Span) {
        if !self.context.in_loop() {
            self.report(SemanticError::LoopControlOutsideLoop { keyword }, span);
        }
    }

    fn check_try(&mut self, statement: &TryStatement) {
        self.check_block(&statement.protected, "try", ScopeKind::Guarded);
        self.context.recover_depth += 1;
        let depth = self.enter_block("recover", ScopeKind::Recovery);
        // Mirrors the local binding the evaluator makes for the caught message
        if let Err(error) = self
            .store
            .define(ERROR_ACCESSOR, Symbol::variable(Type::Str, Value::Null))
        {
            tracing::warn!(%error, "failed to bind error accessor");
        }
        self.check_statements(&statement.recovery);
        self.leave_block(depth);
        self.context.recover_depth -= 1;
    }
}

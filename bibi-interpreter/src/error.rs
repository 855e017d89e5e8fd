//! Runtime error types for the Bibi interpreter.
//!
//! A [`RuntimeError`] pairs what went wrong with where it happened. Whether
//! it stops the program or is caught by a recover block is decided by the
//! evaluator at the point it is raised.

use bibi_parser::{span_to_source_span, Span};
use miette::{Diagnostic, LabeledSpan, SourceSpan};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Which loop limit was exceeded
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoopLimit {
    Iterations(usize),
    Timeout(Duration),
}

impl fmt::Display for LoopLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopLimit::Iterations(max) => write!(f, "more than {max} iterations"),
            LoopLimit::Timeout(timeout) => write!(f, "timeout of {timeout:?} reached"),
        }
    }
}

/// Runtime errors that can occur during interpretation
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum RuntimeErrorKind {
    #[error("Variable '{name}' is not defined")]
    #[diagnostic(code(bibi::runtime::undefined_variable))]
    UndefinedVariable { name: String },

    #[error("Function '{name}' is not defined")]
    #[diagnostic(code(bibi::runtime::undefined_function))]
    UndefinedFunction { name: String },

    #[error("'{name}' is a {kind}, not a function")]
    #[diagnostic(code(bibi::runtime::not_a_function))]
    NotAFunction { name: String, kind: &'static str },

    #[error("'{name}' is a {kind}, not a value")]
    #[diagnostic(code(bibi::runtime::not_a_value))]
    NotAValue { name: String, kind: &'static str },

    #[error("Division by zero")]
    #[diagnostic(
        code(bibi::runtime::division_by_zero),
        help("Ensure the divisor is not zero before division")
    )]
    DivisionByZero,

    #[error("Index {index} out of bounds for '{name}' of length {length}")]
    #[diagnostic(
        code(bibi::runtime::index_out_of_bounds),
        help("Valid indices are 0 up to the array length minus one")
    )]
    IndexOutOfBounds {
        name: String,
        index: i64,
        length: usize,
    },

    #[error("Array index must be an int, got {found}")]
    #[diagnostic(code(bibi::runtime::invalid_index))]
    InvalidIndex { found: &'static str },

    #[error("Variable '{name}' is not an array")]
    #[diagnostic(code(bibi::runtime::not_an_array))]
    NotAnArray { name: String },

    #[error("Invalid operation: '{operation}' cannot be applied to {operands}")]
    #[diagnostic(
        code(bibi::runtime::invalid_operation),
        help("Unset record fields hold null until assigned")
    )]
    InvalidOperation { operation: String, operands: String },

    #[error("Expected a {expected} value, got {found}")]
    #[diagnostic(code(bibi::runtime::type_mismatch))]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Record '{record}' has no field '{field}'")]
    #[diagnostic(code(bibi::runtime::field_not_found))]
    FieldNotFound { record: String, field: String },

    #[error("'{name}' is not a record instance")]
    #[diagnostic(code(bibi::runtime::not_a_record))]
    NotARecord { name: String },

    #[error("Integer overflow in '{operation}'")]
    #[diagnostic(code(bibi::runtime::integer_overflow))]
    IntegerOverflow { operation: String },

    #[error("loop exceeded limit: {reason}")]
    #[diagnostic(
        code(bibi::runtime::loop_limit_exceeded),
        help("Raise the limit with --max-iterations or --timeout if the loop is intended")
    )]
    LoopLimitExceeded { reason: LoopLimit },

    #[error("Function '{function}' expects {expected} arguments, got {found}")]
    #[diagnostic(code(bibi::runtime::arity_mismatch))]
    ArityMismatch {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("Maximum call depth of {max_depth} exceeded")]
    #[diagnostic(
        code(bibi::runtime::stack_overflow),
        help("Check that recursive functions reach their base case")
    )]
    StackOverflow { max_depth: usize },

    #[error("'{signal}' escaped the body of function '{function}'")]
    #[diagnostic(code(bibi::runtime::control_flow_escaped))]
    ControlFlowEscaped {
        signal: &'static str,
        function: String,
    },

    #[error("Internal error: {message}")]
    #[diagnostic(code(bibi::runtime::internal_error))]
    Internal { message: String },
}

impl RuntimeErrorKind {
    /// Interpreter defects are never handed to a recover block
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            RuntimeErrorKind::ControlFlowEscaped { .. } | RuntimeErrorKind::Internal { .. }
        )
    }
}

/// A runtime error positioned at the node that raised it
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub line: usize,
    pub column: usize,
    pub span: SourceSpan,
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind, span: &Span) -> Self {
        Self {
            kind,
            line: span.line,
            column: span.column,
            span: span_to_source_span(span),
        }
    }

    /// Message without position, as seen through `get_error`
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Runtime Error] Line {}:{} - {}",
            self.line, self.column, self.kind
        )
    }
}

impl std::error::Error for RuntimeError {}

impl Diagnostic for RuntimeError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.kind.code()
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.kind.help()
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some("raised here".to_string()),
            self.span,
        ))))
    }
}

/// How a runtime error leaves the statement that raised it
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Unwind {
    /// Raised inside a guarded block; the nearest try statement recovers it
    Recoverable(RuntimeError),
    /// Stops the whole program
    Fatal(RuntimeError),
}

impl Unwind {
    pub(crate) fn into_error(self) -> RuntimeError {
        match self {
            Unwind::Recoverable(error) | Unwind::Fatal(error) => error,
        }
    }
}

//! Semantic errors found while checking a program
//!
//! Each variant becomes one entry in the diagnostics channel; see
//! [`crate::diagnostics::Diagnostic`] for position and severity.

use crate::types::Type;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum SemanticError {
    #[error("'{name}' is already declared in this scope")]
    #[diagnostic(
        code(bibi::semantic::duplicate_definition),
        help("Choose a different name, or declare it in a nested block to shadow it")
    )]
    DuplicateDefinition { name: String },

    #[error("Function '{name}' already defined.")]
    #[diagnostic(code(bibi::semantic::function_redefined))]
    FunctionRedefined { name: String },

    #[error("Variable '{name}' is not declared.")]
    #[diagnostic(
        code(bibi::semantic::undefined_variable),
        help("Declare the variable with a type before using it, e.g. int {name} = 0;")
    )]
    UndefinedVariable { name: String },

    #[error("Variable '{name}' not declared before assignment.")]
    #[diagnostic(
        code(bibi::semantic::undeclared_assignment),
        help("Declare the variable with a type before assigning to it")
    )]
    UndeclaredAssignment { name: String },

    #[error("Undefined function '{name}'")]
    #[diagnostic(code(bibi::semantic::undefined_function))]
    UndefinedFunction { name: String },

    #[error("'{name}' is a {kind}, not a function")]
    #[diagnostic(code(bibi::semantic::not_a_function))]
    NotAFunction { name: String, kind: &'static str },

    #[error("'{name}' is a {kind} and cannot be used as a value")]
    #[diagnostic(code(bibi::semantic::not_a_value))]
    NotAValue { name: String, kind: &'static str },

    #[error("New type {name} is not declared.")]
    #[diagnostic(
        code(bibi::semantic::undefined_record_type),
        help("Declare it first with: type {name} {{ ... }}")
    )]
    UndefinedRecordType { name: String },

    #[error("Field '{field}' is redeclared in new type '{record}'")]
    #[diagnostic(code(bibi::semantic::duplicate_field))]
    DuplicateField { record: String, field: String },

    #[error("Mismatched types in {context}: expected '{expected}', got '{found}'")]
    #[diagnostic(code(bibi::semantic::type_mismatch))]
    TypeMismatch {
        context: String,
        expected: Type,
        found: Type,
    },

    #[error("Cannot concatenate '{left}' with '{right}'")]
    #[diagnostic(
        code(bibi::semantic::concatenation_mismatch),
        help("String concatenation requires both operands to be 'str'")
    )]
    ConcatenationMismatch { left: Type, right: Type },

    #[error("Arithmetic operation '{operator}' requires numeric operands, got '{left}' and '{right}'")]
    #[diagnostic(code(bibi::semantic::non_numeric_operand))]
    NonNumericOperand {
        operator: String,
        left: Type,
        right: Type,
    },

    #[error("Cannot compare '{left}' with '{right}'")]
    #[diagnostic(
        code(bibi::semantic::comparison_mismatch),
        help("Both sides of a comparison must have the same type")
    )]
    ComparisonMismatch { left: Type, right: Type },

    #[error("Logical operation '{operator}' requires boolean operands, got '{left}' and '{right}'")]
    #[diagnostic(code(bibi::semantic::logical_operand))]
    LogicalOperand {
        operator: String,
        left: Type,
        right: Type,
    },

    #[error("Unary '{operator}' requires a {expected} operand, got '{found}'")]
    #[diagnostic(code(bibi::semantic::unary_operand))]
    UnaryOperand {
        operator: String,
        expected: &'static str,
        found: Type,
    },

    #[error("{construct} condition must be boolean, got '{found}'")]
    #[diagnostic(code(bibi::semantic::condition_not_bool))]
    ConditionNotBool { construct: &'static str, found: Type },

    #[error("Variable '{name}' is not an array (declared as '{found}')")]
    #[diagnostic(code(bibi::semantic::not_an_array))]
    NotAnArray { name: String, found: Type },

    #[error("Array index must be an integer, got '{found}'")]
    #[diagnostic(code(bibi::semantic::non_int_index))]
    NonIntIndex { found: Type },

    #[error("'{name}' is not a record instance")]
    #[diagnostic(code(bibi::semantic::not_a_record))]
    NotARecord { name: String },

    #[error("Type '{record_type}' has no field '{field}'")]
    #[diagnostic(code(bibi::semantic::field_not_found))]
    FieldNotFound { record_type: String, field: String },

    #[error("Function '{function}' expects {expected} arguments, got {found}")]
    #[diagnostic(code(bibi::semantic::argument_count))]
    ArgumentCount {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("Argument {position} of function '{function}' expects type '{expected}', got '{found}'")]
    #[diagnostic(
        code(bibi::semantic::argument_type),
        help("Arguments are not converted between numeric types")
    )]
    ArgumentType {
        function: String,
        position: usize,
        expected: Type,
        found: Type,
    },

    #[error("Return statement outside of function.")]
    #[diagnostic(code(bibi::semantic::return_outside_function))]
    ReturnOutsideFunction,

    #[error("Return type mismatch in '{function}': expected '{expected}', got '{found}'")]
    #[diagnostic(code(bibi::semantic::return_type_mismatch))]
    ReturnTypeMismatch {
        function: String,
        expected: Type,
        found: Type,
    },

    #[error("Cannot return a value from void function '{function}'")]
    #[diagnostic(code(bibi::semantic::void_returns_value))]
    VoidReturnsValue { function: String },

    #[error("Missing return value for non-void function '{function}' (expected '{expected}')")]
    #[diagnostic(code(bibi::semantic::missing_return_value))]
    MissingReturnValue { function: String, expected: Type },

    #[error("Function '{function}' may finish without returning a '{expected}' value")]
    #[diagnostic(
        code(bibi::semantic::missing_return),
        severity(Warning),
        help("Add a return statement at the end of the function body")
    )]
    MissingReturn { function: String, expected: Type },

    #[error("{keyword} statement outside of loop.")]
    #[diagnostic(code(bibi::semantic::loop_control_outside_loop))]
    LoopControlOutsideLoop { keyword: &'static str },

    #[error("Function '{name}' must be declared at the top level")]
    #[diagnostic(code(bibi::semantic::nested_function))]
    NestedFunction { name: String },

    #[error("Type '{name}' must be declared at the top level")]
    #[diagnostic(code(bibi::semantic::nested_record_type))]
    NestedRecordType { name: String },

    #[error("A void value cannot be used in {context}")]
    #[diagnostic(code(bibi::semantic::void_value))]
    VoidValue { context: &'static str },

    #[error("'{name}' can only be used inside a recover block")]
    #[diagnostic(code(bibi::semantic::error_accessor_outside_recover))]
    ErrorAccessorOutsideRecover { name: String },

    #[error("Cannot assign to builtin '{name}'")]
    #[diagnostic(code(bibi::semantic::assign_to_builtin))]
    AssignToBuiltin { name: String },
}

impl SemanticError {
    /// Category shown in the plain-text rendering of a diagnostic
    pub fn category(&self) -> &'static str {
        match self {
            SemanticError::TypeMismatch { .. }
            | SemanticError::ConcatenationMismatch { .. }
            | SemanticError::NonNumericOperand { .. }
            | SemanticError::ComparisonMismatch { .. }
            | SemanticError::LogicalOperand { .. }
            | SemanticError::UnaryOperand { .. }
            | SemanticError::ConditionNotBool { .. }
            | SemanticError::NotAnArray { .. }
            | SemanticError::NonIntIndex { .. }
            | SemanticError::ArgumentType { .. }
            | SemanticError::ReturnTypeMismatch { .. }
            | SemanticError::VoidReturnsValue { .. }
            | SemanticError::MissingReturnValue { .. }
            | SemanticError::VoidValue { .. } => "Type Error",
            SemanticError::MissingReturn { .. } => "Warning",
            _ => "Error",
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, SemanticError::MissingReturn { .. })
    }
}

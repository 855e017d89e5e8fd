//! Expression typing
//!
//! Literals, identifiers, indexing, unary and binary operators

use super::{TypeChecker, ERROR_ACCESSOR};
use crate::error::SemanticError;
use crate::symbol::Symbol;
use crate::types::Type;
use bibi_parser::{
    BinaryOperation, BinaryOperator, Expression, ExpressionKind, Identifier, IndexAccess,
    NumberLiteral, Span, UnaryOperation, UnaryOperator,
};

impl TypeChecker<'_> {
    /// Compute the type of `expression`, or `None` once an error has been reported
    pub(crate) fn type_of(&mut self, expression: &Expression) -> Option<Type> {
        match &expression.kind {
            ExpressionKind::Integer(_) => Some(Type::Int),
            ExpressionKind::Float(_) => Some(Type::Float),
            ExpressionKind::Str(_) => Some(Type::Str),
            ExpressionKind::Char(_) => Some(Type::Char),
            ExpressionKind::Boolean(_) => Some(Type::Bool),
            ExpressionKind::IntArray(elements) => {
                let element = if elements
                    .iter()
                    .any(|element| matches!(element, NumberLiteral::Float(_)))
                {
                    Type::Float
                } else {
                    Type::Int
                };
                Some(Type::Array(Box::new(element)))
            }
            ExpressionKind::CharArray(_) => Some(Type::Array(Box::new(Type::Char))),
            ExpressionKind::StrArray(_) => Some(Type::Array(Box::new(Type::Str))),
            ExpressionKind::Identifier(identifier) => self.type_of_identifier(identifier),
            ExpressionKind::Index(access) => self.type_of_index(access),
            ExpressionKind::FieldAccess(access) => self.field_type(&access.record, &access.field),
            ExpressionKind::Call(call) => self.type_of_call(call),
            ExpressionKind::Unary(operation) => self.type_of_unary(operation),
            ExpressionKind::Binary(operation) => self.type_of_binary(operation, &expression.span),
            ExpressionKind::Parenthesized(inner) => self.type_of(inner),
        }
    }

    /// `get_error` reads the caught error's message; only legal inside a recover block
    pub(crate) fn type_of_error_accessor(&mut self, span: &Span) -> Option<Type> {
        if !self.context.in_recover_block() {
            self.report(
                SemanticError::ErrorAccessorOutsideRecover {
                    name: ERROR_ACCESSOR.to_string(),
                },
                span,
            );
        }
        Some(Type::Str)
    }

    fn type_of_identifier(&mut self, identifier: &Identifier) -> Option<Type> {
        if self.is_error_accessor(&identifier.name) {
            return self.type_of_error_accessor(&identifier.span);
        }

        match self.lookup(&identifier.name) {
            Some(Symbol::Variable { ty, .. }) => Some(ty),
            Some(other) => {
                self.report(
                    SemanticError::NotAValue {
                        name: identifier.name.clone(),
                        kind: other.kind_name(),
                    },
                    &identifier.span,
                );
                None
            }
            None => {
                self.report(
                    SemanticError::UndefinedVariable {
                        name: identifier.name.clone(),
                    },
                    &identifier.span,
                );
                None
            }
        }
    }

    fn type_of_index(&mut self, access: &IndexAccess) -> Option<Type> {
        let index_type = self.type_of(&access.index);
        if let Some(found) = index_type {
            if found != Type::Int {
                self.report(SemanticError::NonIntIndex { found }, &access.index.span);
            }
        }

        let name = &access.array;
        match self.lookup(&name.name) {
            Some(Symbol::Variable {
                ty: Type::Array(element),
                ..
            }) => Some(*element),
            Some(Symbol::Variable { ty, .. }) => {
                self.report(
                    SemanticError::NotAnArray {
                        name: name.name.clone(),
                        found: ty,
                    },
                    &name.span,
                );
                None
            }
            Some(other) => {
                self.report(
                    SemanticError::NotAValue {
                        name: name.name.clone(),
                        kind: other.kind_name(),
                    },
                    &name.span,
                );
                None
            }
            None => {
                self.report(
                    SemanticError::UndefinedVariable {
                        name: name.name.clone(),
                    },
                    &name.span,
                );
                None
            }
        }
    }

    fn type_of_unary(&mut self, operation: &UnaryOperation) -> Option<Type> {
        let operand = self.type_of(&operation.operand)?;
        let span = &operation.operand.span;
        match operation.operator {
            UnaryOperator::Negate if operand.is_numeric() => Some(operand),
            UnaryOperator::Negate => {
                self.report(
                    SemanticError::UnaryOperand {
                        operator: operation.operator.to_string(),
                        expected: "numeric",
                        found: operand,
                    },
                    span,
                );
                None
            }
            UnaryOperator::Not => {
                if operand != Type::Bool {
                    self.report(
                        SemanticError::UnaryOperand {
                            operator: operation.operator.to_string(),
                            expected: "boolean",
                            found: operand,
                        },
                        span,
                    );
                }
                Some(Type::Bool)
            }
        }
    }

    fn type_of_binary(&mut self, operation: &BinaryOperation, span: &Span) -> Option<Type> {
        let left = self.type_of(&operation.left);
        let right = self.type_of(&operation.right);
        let operator = operation.operator;

        // Comparisons and logical operators are boolean even when an operand is unknown
        let (Some(left), Some(right)) = (left, right) else {
            return (!operator.is_arithmetic()).then_some(Type::Bool);
        };

        if left == Type::Void || right == Type::Void {
            self.report(
                SemanticError::VoidValue {
                    context: "an operator expression",
                },
                span,
            );
            return (!operator.is_arithmetic()).then_some(Type::Bool);
        }

        if operator.is_arithmetic() {
            self.type_of_arithmetic(operator, left, right, span)
        } else if operator.is_comparison() {
            if left != right {
                self.report(SemanticError::ComparisonMismatch { left, right }, span);
            }
            Some(Type::Bool)
        } else {
            if left != Type::Bool || right != Type::Bool {
                self.report(
                    SemanticError::LogicalOperand {
                        operator: operator.to_string(),
                        left,
                        right,
                    },
                    span,
                );
            }
            Some(Type::Bool)
        }
    }

    fn type_of_arithmetic(
        &mut self,
        operator: BinaryOperator,
        left: Type,
        right: Type,
        span: &Span,
    ) -> Option<Type> {
        if operator == BinaryOperator::Add && (left == Type::Str || right == Type::Str) {
            if left == right {
                return Some(Type::Str);
            }
            self.report(SemanticError::ConcatenationMismatch { left, right }, span);
            return None;
        }

        if left.is_numeric() && right.is_numeric() {
            if left == Type::Float || right == Type::Float {
                Some(Type::Float)
            } else {
                Some(Type::Int)
            }
        } else {
            self.report(
                SemanticError::NonNumericOperand {
                    operator: operator.to_string(),
                    left,
                    right,
                },
                span,
            );
            None
        }
    }
}

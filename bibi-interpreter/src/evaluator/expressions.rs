//! Expression evaluation

use super::Evaluator;
use crate::error::{RuntimeErrorKind, Unwind};
use crate::operators;
use crate::stack::ensure_sufficient_stack;
use bibi_parser::{
    BinaryOperation, BinaryOperator, Expression, ExpressionKind, FieldAccess, Identifier,
    IndexAccess, NumberLiteral, Span,
};
use bibi_typechecker::{Symbol, Value};

impl Evaluator<'_> {
    pub(crate) fn evaluate(&mut self, expression: &Expression) -> Result<Value, Unwind> {
        ensure_sufficient_stack(|| self.evaluate_expression(expression))
    }

    fn evaluate_expression(&mut self, expression: &Expression) -> Result<Value, Unwind> {
        let span = &expression.span;
        match &expression.kind {
            ExpressionKind::Integer(value) => Ok(Value::Int(*value)),
            ExpressionKind::Float(value) => Ok(Value::Float(*value)),
            ExpressionKind::Str(text) => Ok(Value::Str(text.clone())),
            ExpressionKind::Char(c) => Ok(Value::Char(*c)),
            ExpressionKind::Boolean(value) => Ok(Value::Bool(*value)),
            ExpressionKind::IntArray(elements) => Ok(number_array(elements)),
            ExpressionKind::CharArray(elements) => Ok(Value::Array(
                elements.iter().copied().map(Value::Char).collect(),
            )),
            ExpressionKind::StrArray(elements) => Ok(Value::Array(
                elements.iter().cloned().map(Value::Str).collect(),
            )),
            ExpressionKind::Identifier(identifier) => self.read_variable(identifier),
            ExpressionKind::Index(access) => self.evaluate_index(access, span),
            ExpressionKind::FieldAccess(access) => self.evaluate_field_access(access),
            ExpressionKind::Call(call) => self.call_function(call, span),
            ExpressionKind::Unary(operation) => {
                let operand = self.evaluate(&operation.operand)?;
                operators::unary(operation.operator, operand).map_err(|kind| self.fail(kind, span))
            }
            ExpressionKind::Binary(operation) => self.evaluate_binary(operation, span),
            ExpressionKind::Parenthesized(inner) => self.evaluate(inner),
        }
    }

    pub(crate) fn read_variable(&self, identifier: &Identifier) -> Result<Value, Unwind> {
        let kind = match self.store.lookup(&identifier.name) {
            Ok(Symbol::Variable { value, .. }) => return Ok(value.clone()),
            Ok(other) => RuntimeErrorKind::NotAValue {
                name: identifier.name.clone(),
                kind: other.kind_name(),
            },
            Err(_) => RuntimeErrorKind::UndefinedVariable {
                name: identifier.name.clone(),
            },
        };
        Err(self.fail(kind, &identifier.span))
    }

    fn evaluate_index(&mut self, access: &IndexAccess, span: &Span) -> Result<Value, Unwind> {
        let index = match self.evaluate(&access.index)? {
            Value::Int(index) => index,
            other => {
                return Err(self.fail(
                    RuntimeErrorKind::InvalidIndex {
                        found: other.type_name(),
                    },
                    &access.index.span,
                ));
            }
        };

        let name = &access.array.name;
        let kind = match self.store.lookup(name) {
            Ok(Symbol::Variable {
                value: Value::Array(elements),
                ..
            }) => {
                let element = usize::try_from(index)
                    .ok()
                    .and_then(|position| elements.get(position));
                match element {
                    Some(element) => return Ok(element.clone()),
                    None => RuntimeErrorKind::IndexOutOfBounds {
                        name: name.clone(),
                        index,
                        length: elements.len(),
                    },
                }
            }
            Ok(_) => RuntimeErrorKind::NotAnArray { name: name.clone() },
            Err(_) => RuntimeErrorKind::UndefinedVariable { name: name.clone() },
        };
        Err(self.fail(kind, span))
    }

    fn evaluate_field_access(&self, access: &FieldAccess) -> Result<Value, Unwind> {
        let record = &access.record;
        let kind = match self.store.lookup(&record.name) {
            Ok(Symbol::RecordInstance(instance)) => match instance.fields.get(&access.field.name) {
                Some(slot) => return Ok(slot.value.clone()),
                None => RuntimeErrorKind::FieldNotFound {
                    record: instance.record_type.clone(),
                    field: access.field.name.clone(),
                },
            },
            Ok(_) => RuntimeErrorKind::NotARecord {
                name: record.name.clone(),
            },
            Err(_) => RuntimeErrorKind::UndefinedVariable {
                name: record.name.clone(),
            },
        };
        Err(self.fail(kind, &access.field.span))
    }

    fn evaluate_binary(&mut self, operation: &BinaryOperation, span: &Span) -> Result<Value, Unwind> {
        let left = self.evaluate(&operation.left)?;

        // `and` / `or` skip the right operand once the result is known
        match (operation.operator, &left) {
            (BinaryOperator::And, Value::Bool(false)) => return Ok(Value::Bool(false)),
            (BinaryOperator::Or, Value::Bool(true)) => return Ok(Value::Bool(true)),
            _ => {}
        }

        let right = self.evaluate(&operation.right)?;
        operators::binary(operation.operator, &left, &right).map_err(|kind| self.fail(kind, span))
    }
}

/// Numeric array literal; one float element makes the whole array float
fn number_array(elements: &[NumberLiteral]) -> Value {
    let promote = elements
        .iter()
        .any(|element| matches!(element, NumberLiteral::Float(_)));
    Value::Array(
        elements
            .iter()
            .map(|element| match *element {
                NumberLiteral::Int(value) if promote => Value::Float(value as f64),
                NumberLiteral::Int(value) => Value::Int(value),
                NumberLiteral::Float(value) => Value::Float(value),
            })
            .collect(),
    )
}

//! Symbol records stored in the scope chain

use crate::types::Type;
use crate::value::Value;
use bibi_parser::Block;
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

/// A declared name's metadata and, for variables and record instances, its current value
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Variable { ty: Type, value: Value },
    Function(Rc<FunctionSymbol>),
    RecordType(RecordTypeSymbol),
    RecordInstance(RecordInstance),
}

impl Symbol {
    pub fn variable(ty: Type, value: Value) -> Self {
        Symbol::Variable { ty, value }
    }

    /// Human-readable kind, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Symbol::Variable { .. } => "variable",
            Symbol::Function(_) => "function",
            Symbol::RecordType(_) => "record type",
            Symbol::RecordInstance(_) => "record instance",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionParameter {
    pub name: String,
    pub ty: Type,
}

/// A global function: signature plus the body it executes
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSymbol {
    pub name: String,
    pub parameters: Vec<FunctionParameter>,
    pub return_type: Type,
    pub body: Rc<Block>,
}

impl fmt::Display for FunctionSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parameters: Vec<String> = self
            .parameters
            .iter()
            .map(|parameter| format!("{} {}", parameter.ty, parameter.name))
            .collect();
        write!(f, "func {}({}) {}", self.name, parameters.join(", "), self.return_type)
    }
}

/// Field schema of a declared record type, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct RecordTypeSymbol {
    pub name: String,
    pub fields: IndexMap<String, Type>,
}

impl RecordTypeSymbol {
    /// Fresh instance with every field unset
    pub fn instantiate(&self) -> RecordInstance {
        RecordInstance {
            record_type: self.name.clone(),
            fields: self
                .fields
                .iter()
                .map(|(name, ty)| {
                    (
                        name.clone(),
                        FieldSlot {
                            ty: ty.clone(),
                            value: Value::Null,
                        },
                    )
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSlot {
    pub ty: Type,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordInstance {
    pub record_type: String,
    pub fields: IndexMap<String, FieldSlot>,
}

impl fmt::Display for RecordInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|(name, slot)| format!("{name}: {}", slot.value))
            .collect();
        write!(f, "{} {{ {} }}", self.record_type, fields.join(", "))
    }
}

/// Partial update merged into an existing symbol
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolUpdate {
    /// Replace a variable's current value, keeping its declared type
    Value(Value),
    /// Replace one field of a record instance
    Field { name: String, value: Value },
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Variable { ty, value } => write!(f, "{ty} = {value}"),
            Symbol::Function(function) => write!(f, "{function}"),
            Symbol::RecordType(record) => {
                let fields: Vec<String> = record
                    .fields
                    .iter()
                    .map(|(name, ty)| format!("{ty} {name};"))
                    .collect();
                write!(f, "type {} {{ {} }}", record.name, fields.join(" "))
            }
            Symbol::RecordInstance(instance) => write!(f, "{instance}"),
        }
    }
}

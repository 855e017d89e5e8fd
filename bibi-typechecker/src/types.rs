//! Static types of Bibi values
//!
//! Array types are only ever formed over primitive element types, and `void`
//! appears only as a function return type.

use crate::value::Value;
use bibi_parser::{PrimitiveType, TypeName};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Float,
    Str,
    Char,
    Bool,
    Void,
    Array(Box<Type>),
}

impl Type {
    pub fn from_primitive(primitive: PrimitiveType) -> Self {
        match primitive {
            PrimitiveType::Int => Type::Int,
            PrimitiveType::Float => Type::Float,
            PrimitiveType::Str => Type::Str,
            PrimitiveType::Char => Type::Char,
            PrimitiveType::Bool => Type::Bool,
        }
    }

    pub fn from_type_name(type_name: &TypeName) -> Self {
        let base = Self::from_primitive(type_name.primitive);
        if type_name.is_array {
            Type::Array(Box::new(base))
        } else {
            base
        }
    }

    /// Return type of a function declaration; a missing type means `void`
    pub fn from_return_type(return_type: Option<&TypeName>) -> Self {
        return_type.map(Self::from_type_name).unwrap_or(Type::Void)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    /// Element type of an array type (the type name with its `[]` suffix stripped)
    pub fn base_type(&self) -> Option<&Type> {
        match self {
            Type::Array(element) => Some(element),
            _ => None,
        }
    }

    /// Value a variable of this type holds when declared without an initializer
    pub fn default_value(&self) -> Value {
        match self {
            Type::Int => Value::Int(0),
            Type::Float => Value::Float(0.0),
            Type::Str => Value::Str(String::new()),
            Type::Char => Value::Char('\0'),
            Type::Bool => Value::Bool(false),
            Type::Array(_) => Value::Array(Vec::new()),
            Type::Void => Value::Null,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Str => write!(f, "str"),
            Type::Char => write!(f, "char"),
            Type::Bool => write!(f, "bool"),
            Type::Void => write!(f, "void"),
            Type::Array(element) => write!(f, "{element}[]"),
        }
    }
}

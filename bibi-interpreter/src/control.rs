//! Statement outcomes
//!
//! Every executed statement reports how control leaves it. Blocks stop at the
//! first signal that is not `Normal`; loops consume `Break` and `Continue`;
//! function calls consume `Return`.

use bibi_typechecker::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ControlSignal {
    Normal,
    Return(Value),
    Break,
    Continue,
}

impl ControlSignal {
    pub fn name(&self) -> &'static str {
        match self {
            ControlSignal::Normal => "normal",
            ControlSignal::Return(_) => "return",
            ControlSignal::Break => "break",
            ControlSignal::Continue => "continue",
        }
    }
}

impl fmt::Display for ControlSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

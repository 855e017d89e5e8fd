//! Lexical context tracked while walking the tree
//!
//! Answers the questions the statement rules need: are we inside a function
//! (and which return type does it promise), inside a loop, inside a recover
//! block, or at the top level of the program.

use crate::types::Type;

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionContext {
    pub name: String,
    pub return_type: Type,
}

#[derive(Debug, Clone, Default)]
pub struct CheckContext {
    pub current_function: Option<FunctionContext>,
    pub loop_depth: usize,
    pub recover_depth: usize,
    /// Number of enclosing blocks; zero at the top level of the program
    pub nesting: usize,
}

impl CheckContext {
    pub fn is_top_level(&self) -> bool {
        self.nesting == 0
    }

    pub fn in_loop(&self) -> bool {
        self.loop_depth > 0
    }

    pub fn in_recover_block(&self) -> bool {
        self.recover_depth > 0
    }

    /// Context for a function body: loops and recover blocks outside it do not apply
    pub fn for_function(&self, name: &str, return_type: Type) -> CheckContext {
        CheckContext {
            current_function: Some(FunctionContext {
                name: name.to_string(),
                return_type,
            }),
            loop_depth: 0,
            recover_depth: 0,
            nesting: self.nesting + 1,
        }
    }
}

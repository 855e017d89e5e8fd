// Bibi Parser Library
// Pest-based parser producing a spanned AST for the Bibi language

pub mod ast;
pub mod error;
pub mod parser;

pub use ast::*;
pub use error::*;
pub use parser::BibiParser;

// Re-export parser rule for manual testing
pub use parser::Rule;

#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;

/// Parse a complete Bibi program
pub fn parse_program(input: &str) -> Result<Program, ParseError> {
    BibiParser::parse_program(input)
}

/// Parse a single expression, mainly useful for tests and tooling
pub fn parse_expression(input: &str) -> Result<Expression, ParseError> {
    BibiParser::parse_expression(input)
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

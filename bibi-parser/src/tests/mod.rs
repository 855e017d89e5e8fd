//! Unit tests for the Bibi parser

mod test_errors;
mod test_statements;

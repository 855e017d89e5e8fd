//! Bibi Interpreter
//!
//! Executes checked Bibi programs by walking the syntax tree.
//!
//! - `evaluator` runs statements and expressions against the scope store
//! - `control` defines the signals statements hand back to blocks, loops and calls
//! - `session` ties parsing, checking and evaluation together for the CLI and REPL

#![allow(clippy::result_large_err)]

pub mod config;
pub mod control;
pub mod error;
pub mod evaluator;
mod operators;
pub mod session;
mod stack;

// Include tests directory with all test modules
#[cfg(test)]
#[path = "tests/mod.rs"]
mod tests;

// Re-export public API
pub use config::EvaluatorConfig;
pub use control::ControlSignal;
pub use error::{LoopLimit, RuntimeError, RuntimeErrorKind};
pub use evaluator::{Evaluator, Execution, ExecutionFailure};
pub use session::{InterpreterSession, RunOutcome, SessionError};

/// Run `source` in a fresh session with default limits
///
/// Mainly useful for tests and one-off scripts.
pub fn run_source(source: &str) -> Result<RunOutcome, SessionError> {
    InterpreterSession::new().run_source(source)
}

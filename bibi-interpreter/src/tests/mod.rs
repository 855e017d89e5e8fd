//! Acceptance tests for the Bibi interpreter
//!
//! Programs go through the full parse, check and evaluate pipeline.

mod test_operators;
mod test_programs;
mod test_session;

use crate::{EvaluatorConfig, InterpreterSession, RunOutcome, RuntimeError, SessionError};

pub(crate) fn run_with(config: EvaluatorConfig, source: &str) -> Result<RunOutcome, SessionError> {
    InterpreterSession::with_config(config).run_source(source)
}

/// Output of a program expected to run cleanly
pub(crate) fn output(source: &str) -> String {
    match crate::run_source(source) {
        Ok(outcome) => outcome.output,
        Err(error) => panic!("expected program to run, got: {error}"),
    }
}

/// Fatal runtime error of a program, with the output printed before it
pub(crate) fn runtime_failure(result: Result<RunOutcome, SessionError>) -> (RuntimeError, String) {
    match result {
        Err(SessionError::Runtime { error, output }) => (error, output),
        Err(other) => panic!("expected a runtime error, got: {other}"),
        Ok(outcome) => panic!("expected a runtime error, got output: {}", outcome.output),
    }
}

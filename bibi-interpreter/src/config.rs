//! Evaluator limits

use std::time::Duration;

pub const DEFAULT_MAX_ITERATIONS: usize = 1000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatorConfig {
    /// Iterations a single loop execution may run
    pub max_iterations: usize,
    /// Wall-clock budget for one run, measured from its start
    pub timeout: Duration,
    /// Nested function calls allowed before a stack overflow is reported
    pub max_call_depth: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            timeout: DEFAULT_TIMEOUT,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl EvaluatorConfig {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }
}

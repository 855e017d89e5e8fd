//! REPL (Read-Eval-Print Loop) for the Bibi interpreter
//!
//! Every line goes through the same parse → check → evaluate pipeline as a
//! file run, against a session whose scope store outlives the line. Features:
//! - Declarations persist, so a function typed on one line can be called on the next
//! - Built-in commands for inspection and loading files
//! - Multi-line input while braces, brackets or parentheses are open
//! - History support and line editing with rustyline

use crate::report::{report_session_error, report_warnings};
use bibi_interpreter::{EvaluatorConfig, InterpreterSession, SessionError};
use bibi_typechecker::{Diagnostics, Value};
use miette::Diagnostic;
use rustyline::{DefaultEditor, error::ReadlineError};
use std::fs;
use thiserror::Error;

/// Name used in diagnostics for code typed at the prompt
const REPL_SOURCE: &str = "<repl>";

/// Errors that can occur in the REPL
#[derive(Debug, Error, Diagnostic)]
pub enum ReplError {
    #[error("{error}")]
    Session {
        error: SessionError,
        /// Where the failing code came from (`<repl>` or a file path)
        origin: String,
        text: String,
    },

    #[error("Could not read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Readline error: {source}")]
    Readline {
        #[from]
        source: ReadlineError,
    },

    #[error("{message}")]
    Command { message: String },
}

/// REPL configuration options
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Prompt string for input
    pub prompt: String,

    /// Enable history persistence
    pub persist_history: bool,

    /// History file path
    pub history_file: Option<String>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "bibi> ".to_string(),
            persist_history: true,
            history_file: Some(".bibi_history".to_string()),
        }
    }
}

/// REPL session statistics
#[derive(Debug, Clone, Default)]
pub struct ReplStats {
    /// Snippets and files that ran to completion
    pub runs_completed: usize,

    /// Number of errors encountered
    pub errors_encountered: usize,

    /// Total REPL commands executed
    pub commands_executed: usize,
}

/// Result of evaluating a line in the REPL
#[derive(Debug)]
pub enum ReplResult {
    /// Code ran to completion
    Evaluated {
        output: String,
        last_value: Option<Value>,
        warnings: Diagnostics,
        origin: String,
        text: String,
    },

    /// Executed a REPL command
    Command { message: String },

    /// Empty line or comment
    Empty,

    /// Exit request
    Exit,
}

/// Source read by `load("file")`, waiting for `run_loaded()`
#[derive(Debug, Clone)]
struct LoadedSource {
    path: String,
    text: String,
}

/// REPL session that maintains state across evaluations
pub struct ReplSession {
    session: InterpreterSession,
    config: ReplConfig,
    stats: ReplStats,
    loaded: Option<LoadedSource>,
}

impl ReplSession {
    pub fn new(config: ReplConfig, evaluator: EvaluatorConfig) -> Self {
        Self {
            session: InterpreterSession::with_config(evaluator),
            config,
            stats: ReplStats::default(),
            loaded: None,
        }
    }

    /// Start the REPL main loop
    pub fn run(&mut self) -> Result<(), ReplError> {
        let mut editor = DefaultEditor::new()?;
        if self.config.persist_history {
            if let Some(history_file) = &self.config.history_file {
                // A missing file just means this is the first session
                let _ = editor.load_history(history_file);
            }
        }

        self.print_welcome();

        while let Some(line) = self.read_line(&mut editor)? {
            match self.evaluate_line(&line) {
                Ok(ReplResult::Exit) => break,
                Ok(result) => self.display_result(result),
                Err(error) => {
                    self.stats.errors_encountered += 1;
                    self.display_error(error);
                }
            }
        }

        println!("Goodbye!");
        self.save_history(&mut editor)
    }

    /// Read one complete input, continuing over several lines while it is unbalanced
    fn read_line(&self, editor: &mut DefaultEditor) -> Result<Option<String>, ReplError> {
        let mut complete_input = String::new();

        loop {
            let prompt = if complete_input.is_empty() {
                self.config.prompt.as_str()
            } else {
                "... "
            };

            match editor.readline(prompt) {
                Ok(line) => {
                    if complete_input.is_empty() && line.trim().is_empty() {
                        return Ok(Some(String::new()));
                    }

                    if !complete_input.is_empty() {
                        complete_input.push('\n');
                    }
                    complete_input.push_str(&line);

                    if is_input_complete(&complete_input) {
                        editor.add_history_entry(complete_input.as_str())?;
                        return Ok(Some(complete_input));
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Cancels any partial multi-line input
                    println!("^C");
                    return Ok(Some(String::new()));
                }
                Err(ReadlineError::Eof) => return Ok(None),
                Err(err) => return Err(ReplError::Readline { source: err }),
            }
        }
    }

    /// Evaluate a line of input
    pub fn evaluate_line(&mut self, line: &str) -> Result<ReplResult, ReplError> {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with("//") {
            return Ok(ReplResult::Empty);
        }

        if let Some(result) = self.execute_command(trimmed) {
            self.stats.commands_executed += 1;
            return result;
        }

        self.execute(REPL_SOURCE, trimmed.to_string())
    }

    /// Run a built-in command, or return `None` when the line is ordinary code
    fn execute_command(&mut self, command: &str) -> Option<Result<ReplResult, ReplError>> {
        let result = match command {
            "exit()" => Ok(ReplResult::Exit),
            "help()" => Ok(ReplResult::Command {
                message: help_message(),
            }),
            "clear()" => {
                self.session.clear();
                Ok(ReplResult::Command {
                    message: "Symbol table cleared.".to_string(),
                })
            }
            "symbols()" => Ok(ReplResult::Command {
                message: self.session.symbols(),
            }),
            "stats()" => Ok(ReplResult::Command {
                message: self.format_stats(),
            }),
            "run_loaded()" => match self.loaded.clone() {
                Some(loaded) => self.execute(&loaded.path, loaded.text),
                None => Err(ReplError::Command {
                    message: "No code has been loaded. Use load(\"file.bibi\") first.".to_string(),
                }),
            },
            _ => {
                if let Some(argument) = call_argument(command, "run") {
                    self.run_file(argument)
                } else if let Some(argument) = call_argument(command, "load") {
                    self.load_file(argument)
                } else {
                    return None;
                }
            }
        };
        Some(result)
    }

    fn run_file(&mut self, argument: &str) -> Result<ReplResult, ReplError> {
        let path = file_argument(argument, "run")?;
        let text = read_file(&path)?;
        self.execute(&path, text)
    }

    fn load_file(&mut self, argument: &str) -> Result<ReplResult, ReplError> {
        let path = file_argument(argument, "load")?;
        let text = read_file(&path)?;
        let message = format!("Loaded file: {path}\nType 'run_loaded()' to execute the loaded code");
        self.loaded = Some(LoadedSource { path, text });
        Ok(ReplResult::Command { message })
    }

    fn execute(&mut self, origin: &str, text: String) -> Result<ReplResult, ReplError> {
        match self.session.run_source(&text) {
            Ok(outcome) => {
                self.stats.runs_completed += 1;
                Ok(ReplResult::Evaluated {
                    output: outcome.output,
                    last_value: outcome.last_value,
                    warnings: outcome.warnings,
                    origin: origin.to_string(),
                    text,
                })
            }
            Err(error) => Err(ReplError::Session {
                error,
                origin: origin.to_string(),
                text,
            }),
        }
    }

    /// Display the result of evaluation
    fn display_result(&self, result: ReplResult) {
        match result {
            ReplResult::Evaluated {
                output,
                last_value,
                warnings,
                origin,
                text,
            } => {
                report_warnings(&warnings, &origin, &text);
                if !output.is_empty() {
                    println!("{output}");
                }
                if let Some(value) = last_value {
                    println!("{value}");
                }
            }

            ReplResult::Command { message } => println!("{message}"),

            ReplResult::Empty | ReplResult::Exit => {}
        }
    }

    fn display_error(&self, error: ReplError) {
        match error {
            ReplError::Session {
                error,
                origin,
                text,
            } => report_session_error(error, &origin, &text),
            error => eprintln!("Error: {error}"),
        }
    }

    fn format_stats(&self) -> String {
        format!(
            r#"Session Statistics:
  Runs completed: {}
  Errors encountered: {}
  Commands executed: {}"#,
            self.stats.runs_completed, self.stats.errors_encountered, self.stats.commands_executed
        )
    }

    fn print_welcome(&self) {
        println!("Bibi REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Type help() for commands, exit() to quit");
        println!();
    }

    fn save_history(&self, editor: &mut DefaultEditor) -> Result<(), ReplError> {
        if self.config.persist_history {
            if let Some(history_file) = &self.config.history_file {
                editor.save_history(history_file)?;
            }
        }
        Ok(())
    }
}

/// Argument text of `name(...)`, if `command` has that shape
fn call_argument<'c>(command: &'c str, name: &str) -> Option<&'c str> {
    command
        .strip_prefix(name)?
        .strip_prefix('(')?
        .strip_suffix(')')
}

/// Strip quotes from a file argument, rejecting an empty one
fn file_argument(argument: &str, command: &str) -> Result<String, ReplError> {
    let path = argument.trim().trim_matches(|c| c == '"' || c == '\'');
    if path.is_empty() {
        return Err(ReplError::Command {
            message: format!("Missing filename. Usage: {command}(\"file.bibi\")"),
        });
    }
    Ok(path.to_string())
}

fn read_file(path: &str) -> Result<String, ReplError> {
    fs::read_to_string(path).map_err(|source| ReplError::Io {
        path: path.to_string(),
        source,
    })
}

/// Check whether brackets are balanced outside string and char literals
pub fn is_input_complete(input: &str) -> bool {
    let mut depth: i64 = 0;
    let mut in_string = false;
    let mut in_char = false;
    let mut escaped = false;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if escaped {
            escaped = false;
            continue;
        }

        match ch {
            '\\' if in_string || in_char => escaped = true,
            '"' if !in_char => in_string = !in_string,
            '\'' if !in_string => in_char = !in_char,
            '/' if !in_string && !in_char && chars.peek() == Some(&'/') => {
                // Skip the rest of the line comment
                for next in chars.by_ref() {
                    if next == '\n' {
                        break;
                    }
                }
            }
            '{' | '[' | '(' if !in_string && !in_char => depth += 1,
            '}' | ']' | ')' if !in_string && !in_char => depth -= 1,
            _ => {}
        }
    }

    depth <= 0 && !in_string && !in_char
}

fn help_message() -> String {
    r#"Bibi REPL Commands:
  help()              Show this help message
  symbols()           List every declared symbol with its type and value
  clear()             Forget all declarations and reset the session
  stats()             Show session statistics
  run("file.bibi")    Execute a file in this session
  load("file.bibi")   Read a file without executing it
  run_loaded()        Execute the most recently loaded file
  exit()              Exit the REPL

Examples:
  int x = 42;
  func double(int n) int { return n * 2; }
  print double(x);

Multi-line input continues (with a ... prompt) until every brace is closed.
Use Ctrl+C to cancel input, Ctrl+D to exit."#
        .to_string()
}

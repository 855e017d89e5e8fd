use bibi_interpreter::{EvaluatorConfig, InterpreterSession};
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, MietteHandlerOpts, Result};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

mod logging;
mod repl;
mod report;
mod sexpr;

use repl::{ReplConfig, ReplSession};
use report::{report_session_error, report_warnings};

#[derive(Parser)]
#[command(
    name = "bibi",
    version,
    about = "The Bibi programming language interpreter",
    long_about = "Bibi is a small statically-checked imperative language with records, functions and recoverable runtime errors."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check and execute a Bibi source file
    Run {
        /// Source file to run (use '-' to read from stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Maximum iterations a single loop execution may take
        #[arg(long, value_name = "N")]
        max_iterations: Option<usize>,

        /// Wall-clock limit for loops, in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// Print the symbol table after the run and enable debug logging
        #[arg(short, long)]
        debug: bool,
    },

    /// Type check a Bibi source file without running it
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Parse a Bibi source file and display its AST
    Parse {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Show the full AST with span information
        #[arg(short, long)]
        spans: bool,
    },

    /// Start an interactive session (the default)
    Repl {
        /// Maximum iterations a single loop execution may take
        #[arg(long, value_name = "N")]
        max_iterations: Option<usize>,

        /// Wall-clock limit for loops, in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// Don't read or write the history file
        #[arg(long)]
        no_history: bool,
    },
}

fn main() {
    setup_miette_handler();

    let cli = Cli::parse();
    let debug = matches!(cli.command, Some(Commands::Run { debug: true, .. }));
    logging::init_tracing(debug);

    let success = match cli.command {
        Some(Commands::Run {
            file,
            max_iterations,
            timeout,
            debug,
        }) => handle_run_command(&file, evaluator_config(max_iterations, timeout), debug),
        Some(Commands::Check { file }) => handle_check_command(&file),
        Some(Commands::Parse { file, spans }) => handle_parse_command(&file, spans),
        Some(Commands::Repl {
            max_iterations,
            timeout,
            no_history,
        }) => handle_repl_command(evaluator_config(max_iterations, timeout), !no_history),
        None => handle_repl_command(EvaluatorConfig::default(), true),
    };

    if !success {
        process::exit(1);
    }
}

/// Configure miette for error reporting
fn setup_miette_handler() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .color(true)
                .tab_width(4)
                .with_cause_chain()
                .build(),
        )
    }))
    .ok();
}

fn evaluator_config(max_iterations: Option<usize>, timeout: Option<u64>) -> EvaluatorConfig {
    let mut config = EvaluatorConfig::default();
    if let Some(max_iterations) = max_iterations {
        config = config.with_max_iterations(max_iterations);
    }
    if let Some(seconds) = timeout {
        config = config.with_timeout(Duration::from_secs(seconds));
    }
    config
}

/// Read a source file (or stdin for '-') and the name to show in diagnostics
fn read_source(file_path: &Path) -> Result<(String, String)> {
    if file_path.to_str() == Some("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).into_diagnostic()?;
        return Ok((buffer, "<stdin>".to_string()));
    }

    if !file_path.exists() {
        return Err(miette::miette!("File not found: {}", file_path.display()));
    }

    if file_path.extension().and_then(|s| s.to_str()) != Some("bibi") {
        eprintln!(
            "Warning: expected a .bibi file, got: {}",
            file_path.display()
        );
    }

    let source = fs::read_to_string(file_path).into_diagnostic()?;
    Ok((source, file_path.display().to_string()))
}

fn handle_run_command(file_path: &Path, config: EvaluatorConfig, debug: bool) -> bool {
    let (source, source_name) = match read_source(file_path) {
        Ok(read) => read,
        Err(e) => {
            eprintln!("{e:?}");
            return false;
        }
    };

    let mut session = InterpreterSession::with_config(config);
    let succeeded = match session.run_source(&source) {
        Ok(outcome) => {
            report_warnings(&outcome.warnings, &source_name, &source);
            if !outcome.output.is_empty() {
                println!("{}", outcome.output);
            }
            true
        }
        Err(error) => {
            report_session_error(error, &source_name, &source);
            false
        }
    };

    if debug {
        eprintln!("\nSymbol Table:\n{}", session.symbols());
    }
    succeeded
}

fn handle_check_command(file_path: &Path) -> bool {
    let (source, source_name) = match read_source(file_path) {
        Ok(read) => read,
        Err(e) => {
            eprintln!("{e:?}");
            return false;
        }
    };

    match InterpreterSession::new().check_source(&source) {
        Ok(warnings) => {
            report_warnings(&warnings, &source_name, &source);
            println!("✅ {source_name}: {}", warnings.summary());
            true
        }
        Err(error) => {
            report_session_error(error, &source_name, &source);
            false
        }
    }
}

fn handle_parse_command(file_path: &Path, spans: bool) -> bool {
    let result = read_source(file_path).and_then(|(source, _)| {
        bibi_parser::parse_program(&source).map_err(miette::Report::new)
    });

    match result {
        Ok(ast) if spans => {
            println!("{ast:#?}");
            true
        }
        Ok(ast) => {
            println!("{}", sexpr::format_program_as_sexpr(&ast));
            true
        }
        Err(e) => {
            eprintln!("{e:?}");
            false
        }
    }
}

fn handle_repl_command(evaluator: EvaluatorConfig, persist_history: bool) -> bool {
    let config = ReplConfig {
        persist_history,
        ..ReplConfig::default()
    };

    match ReplSession::new(config, evaluator).run() {
        Ok(()) => true,
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            false
        }
    }
}

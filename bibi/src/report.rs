// Rendering of session failures through miette

use bibi_interpreter::SessionError;
use bibi_typechecker::Diagnostics;
use miette::{NamedSource, Report};

/// Print a failed run to stderr, with labels pointing into `source`.
///
/// Output the program printed before a runtime failure goes to stdout first
/// so the error appears after it.
pub fn report_session_error(error: SessionError, name: &str, source: &str) {
    match error {
        SessionError::Parse(parse_error) => {
            eprintln!("{:?}", Report::new(parse_error));
        }
        SessionError::Check(diagnostics) => {
            for report in diagnostics.create_reports_with_filename(name, source) {
                eprintln!("{report:?}");
            }
            eprintln!("\n📊 Diagnostics Summary: {}", diagnostics.summary());
        }
        SessionError::Runtime { error, output } => {
            if !output.is_empty() {
                println!("{output}");
            }
            let named_source = NamedSource::new(name, source.to_string());
            eprintln!("{:?}", Report::new(error).with_source_code(named_source));
        }
    }
}

/// Print non-blocking diagnostics such as missing-return warnings
pub fn report_warnings(warnings: &Diagnostics, name: &str, source: &str) {
    for report in warnings.create_reports_with_filename(name, source) {
        eprintln!("{report:?}");
    }
}

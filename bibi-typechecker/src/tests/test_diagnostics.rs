use super::check;
use crate::diagnostics::{Diagnostics, Severity};
use crate::error::SemanticError;
use bibi_parser::Span;
use pretty_assertions::assert_eq;

#[test]
fn test_type_error_rendering() {
    let diagnostics = check(r#"int x = "s";"#).unwrap_err();
    assert_eq!(
        diagnostics.to_string(),
        "[Type Error] Line 1:9 - Mismatched types in declaration of 'x': expected 'int', got 'str'"
    );
}

#[test]
fn test_error_rendering_with_position() {
    let diagnostics = check("int x = 1;\nprint y;").unwrap_err();
    let entry = diagnostics.iter().next().unwrap();

    assert_eq!(entry.line, 2);
    assert_eq!(entry.column, 7);
    assert_eq!(entry.severity, Severity::Error);
    assert_eq!(entry.to_string(), "[Error] Line 2:7 - Variable 'y' is not declared.");
}

#[test]
fn test_warning_rendering() {
    let warnings = check("func f() int { }").unwrap();
    let entry = warnings.iter().next().unwrap();

    assert_eq!(entry.severity, Severity::Warning);
    assert_eq!(
        entry.to_string(),
        "[Warning] Line 1:6 - Function 'f' may finish without returning a 'int' value"
    );
}

#[test]
fn test_diagnostics_keep_source_order() {
    let diagnostics = check("print a;\nprint b;\nprint c;").unwrap_err();
    let lines: Vec<usize> = diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![1, 2, 3]);
    assert_eq!(diagnostics.summary().to_string(), "3 errors, 0 warnings");
}

#[test]
fn test_warnings_travel_with_errors() {
    let diagnostics = check("func f() int { } print missing;").unwrap_err();
    assert_eq!(diagnostics.error_count(), 1);
    assert_eq!(diagnostics.warning_count(), 1);
    assert_eq!(diagnostics.summary().to_string(), "1 error, 1 warning");
    assert_eq!(diagnostics.into_warnings().len(), 1);
}

#[test]
fn test_miette_code_and_severity() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.push(
        SemanticError::UndefinedFunction {
            name: "g".to_string(),
        },
        &Span::new(0, 1, 1, 1),
    );
    let entry = diagnostics.iter().next().unwrap();

    let code = miette::Diagnostic::code(entry).map(|c| c.to_string());
    assert_eq!(code.as_deref(), Some("bibi::semantic::undefined_function"));
    assert_eq!(
        miette::Diagnostic::severity(entry),
        Some(miette::Severity::Error)
    );
}

#[test]
fn test_reports_for_every_diagnostic() {
    let source = "print a;\nprint b;";
    let diagnostics = check(source).unwrap_err();
    let reports = diagnostics.create_reports_with_filename("main.bibi", source);
    assert_eq!(reports.len(), 2);
}

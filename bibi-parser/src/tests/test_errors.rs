use crate::error::ParseError;
use crate::parser::BibiParser;

#[test]
fn test_missing_semicolon_reports_position() {
    let error = BibiParser::parse_program("int x = 5\nprint x;").unwrap_err();
    match error {
        ParseError::PestError {
            line, src, message, ..
        } => {
            assert_eq!(line, 2);
            assert!(src.contains("print x;"));
            assert!(!message.is_empty());
        }
        other => panic!("Expected syntax error, got {other:?}"),
    }
}

#[test]
fn test_keyword_cannot_be_identifier() {
    assert!(BibiParser::parse_program("int while = 1;").is_err());
    assert!(BibiParser::parse_program("func if() { }").is_err());
}

#[test]
fn test_integer_overflow_is_reported() {
    let error = BibiParser::parse_program("int x = 99999999999999999999;").unwrap_err();
    match error {
        ParseError::InvalidInteger { found, src, .. } => {
            assert_eq!(found, "99999999999999999999");
            assert!(!src.is_empty());
        }
        other => panic!("Expected invalid integer, got {other:?}"),
    }
}

#[test]
fn test_invalid_escape_is_reported() {
    let error = BibiParser::parse_program(r#"print "bad \q escape";"#).unwrap_err();
    assert!(matches!(error, ParseError::InvalidEscape { ref found, .. } if found == "\\q"));
}

#[test]
fn test_unterminated_block() {
    assert!(BibiParser::parse_program("while true { print 1;").is_err());
}

#[test]
fn test_void_is_not_a_variable_type() {
    assert!(BibiParser::parse_program("void x;").is_err());
}

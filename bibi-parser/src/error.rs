// Bibi Parser Error Handling
// Syntax errors rendered through miette

use crate::ast::Span;
use crate::parser::Rule;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Syntax errors raised while turning source text into an AST
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Syntax error at line {line}, column {column}")]
    #[diagnostic(
        code(bibi::parse::syntax_error),
        help("Check the syntax near the highlighted location")
    )]
    PestError {
        #[source_code]
        src: String,
        #[label("{message}")]
        span: SourceSpan,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Unexpected syntax: expected {expected}")]
    #[diagnostic(code(bibi::parse::unexpected_rule))]
    UnexpectedRule {
        #[source_code]
        src: String,
        #[label("found {found}")]
        span: SourceSpan,
        expected: String,
        found: String,
    },

    #[error("Invalid integer literal '{found}'")]
    #[diagnostic(
        code(bibi::parse::invalid_integer),
        help("Integer literals must fit in a signed 64-bit integer")
    )]
    InvalidInteger {
        #[source_code]
        src: String,
        #[label("invalid integer")]
        span: SourceSpan,
        found: String,
    },

    #[error("Invalid float literal '{found}'")]
    #[diagnostic(
        code(bibi::parse::invalid_float),
        help("Float literals are written with digits on both sides of the point (e.g., 3.14)")
    )]
    InvalidFloat {
        #[source_code]
        src: String,
        #[label("invalid float")]
        span: SourceSpan,
        found: String,
    },

    #[error("Invalid escape sequence '{found}'")]
    #[diagnostic(
        code(bibi::parse::invalid_escape),
        help("Valid escape sequences: \\n, \\t, \\r, \\0, \\\\, \\\", \\'")
    )]
    InvalidEscape {
        #[source_code]
        src: String,
        #[label("invalid escape sequence")]
        span: SourceSpan,
        found: String,
    },
}

impl ParseError {
    /// Create a parse error from a Pest parsing error
    pub fn from_pest_error(error: pest::error::Error<Rule>, src: String) -> Self {
        let span = match error.location {
            pest::error::InputLocation::Pos(pos) => SourceSpan::new(pos.into(), 0),
            pest::error::InputLocation::Span((start, end)) => {
                SourceSpan::new(start.into(), end - start)
            }
        };
        let (line, column) = match error.line_col {
            pest::error::LineColLocation::Pos(position) => position,
            pest::error::LineColLocation::Span(start, _) => start,
        };

        let message = match &error.variant {
            pest::error::ErrorVariant::ParsingError { positives, .. } if !positives.is_empty() => {
                let mut expected: Vec<String> = positives
                    .iter()
                    .map(rule_to_user_friendly_description)
                    .collect();
                expected.sort();
                expected.dedup();
                format!("expected {}", join_alternatives(&expected))
            }
            pest::error::ErrorVariant::ParsingError { .. } => "unexpected input".to_string(),
            pest::error::ErrorVariant::CustomError { message } => message.clone(),
        };

        ParseError::PestError {
            src,
            span,
            line,
            column,
            message,
        }
    }

    pub fn unexpected_rule(expected: &str, found: Rule, span: &Span) -> Self {
        ParseError::UnexpectedRule {
            src: String::new(),
            span: span_to_source_span(span),
            expected: expected.to_string(),
            found: rule_to_user_friendly_description(&found),
        }
    }

    /// A required element was missing from a matched rule
    pub fn missing_element(expected: &str, span: &Span) -> Self {
        ParseError::UnexpectedRule {
            src: String::new(),
            span: span_to_source_span(span),
            expected: expected.to_string(),
            found: "nothing".to_string(),
        }
    }

    pub fn invalid_integer(found: &str, span: &Span) -> Self {
        ParseError::InvalidInteger {
            src: String::new(),
            span: span_to_source_span(span),
            found: found.to_string(),
        }
    }

    pub fn invalid_float(found: &str, span: &Span) -> Self {
        ParseError::InvalidFloat {
            src: String::new(),
            span: span_to_source_span(span),
            found: found.to_string(),
        }
    }

    pub fn invalid_escape(found: &str, span: &Span) -> Self {
        ParseError::InvalidEscape {
            src: String::new(),
            span: span_to_source_span(span),
            found: found.to_string(),
        }
    }

    /// Attach the full source text so miette can render the labelled snippet
    pub fn with_source(mut self, source: &str) -> Self {
        match &mut self {
            ParseError::PestError { src, .. }
            | ParseError::UnexpectedRule { src, .. }
            | ParseError::InvalidInteger { src, .. }
            | ParseError::InvalidFloat { src, .. }
            | ParseError::InvalidEscape { src, .. } => *src = source.to_string(),
        }
        self
    }

    pub fn span(&self) -> SourceSpan {
        match self {
            ParseError::PestError { span, .. }
            | ParseError::UnexpectedRule { span, .. }
            | ParseError::InvalidInteger { span, .. }
            | ParseError::InvalidFloat { span, .. }
            | ParseError::InvalidEscape { span, .. } => *span,
        }
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

pub fn span_to_source_span(span: &Span) -> SourceSpan {
    SourceSpan::new(span.start.into(), span.len())
}

fn join_alternatives(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

/// Convert a parser rule to a user-friendly description
fn rule_to_user_friendly_description(rule: &Rule) -> String {
    match rule {
        Rule::integer => "an integer (like 42)".to_string(),
        Rule::float => "a float (like 3.14)".to_string(),
        Rule::string => "a string (like \"hello\")".to_string(),
        Rule::char_literal => "a character (like 'a')".to_string(),
        Rule::boolean => "a boolean (true or false)".to_string(),
        Rule::int_array | Rule::char_array | Rule::str_array => {
            "an array literal (like [1, 2, 3])".to_string()
        }
        Rule::number_element => "a number".to_string(),

        Rule::identifier => "an identifier".to_string(),
        Rule::type_name => "a type (int, float, str, char, bool, or an array like int[])".to_string(),
        Rule::void_type => "'void'".to_string(),

        Rule::expression => "an expression".to_string(),
        Rule::function_call => "a function call (like f(1, 2))".to_string(),
        Rule::index_access => "an index (like arr[0])".to_string(),
        Rule::field_access => "a field access (like point.x)".to_string(),
        Rule::parenthesized => "a parenthesized expression".to_string(),
        Rule::argument_list => "function arguments".to_string(),

        Rule::block => "a block ({ ... })".to_string(),
        Rule::variable_declaration => "a variable declaration (int x = 1;)".to_string(),
        Rule::function_declaration => "a function declaration (func name(...) { ... })".to_string(),
        Rule::record_type_declaration => "a type declaration (type Name { ... })".to_string(),
        Rule::record_instance_declaration => "a record declaration (Name variable;)".to_string(),
        Rule::assignment | Rule::field_assignment => "an assignment".to_string(),
        Rule::if_statement => "an if statement".to_string(),
        Rule::else_if_clause | Rule::else_clause => "an else clause".to_string(),
        Rule::while_statement => "a while loop".to_string(),
        Rule::try_statement => "a try/recover statement".to_string(),
        Rule::print_statement => "a print statement".to_string(),
        Rule::return_statement => "a return statement".to_string(),
        Rule::expression_statement => "an expression statement".to_string(),
        Rule::parameter_list | Rule::parameter => "a parameter (like int x)".to_string(),
        Rule::field_declaration => "a field declaration (like int x;)".to_string(),

        Rule::op_or
        | Rule::op_and
        | Rule::op_equal
        | Rule::op_not_equal
        | Rule::op_less
        | Rule::op_less_equal
        | Rule::op_greater
        | Rule::op_greater_equal
        | Rule::op_add
        | Rule::op_subtract
        | Rule::op_multiply
        | Rule::op_divide => "an operator".to_string(),
        Rule::op_negate | Rule::op_not => "a unary operator".to_string(),

        Rule::keyword_recover => "'recover'".to_string(),
        Rule::keyword_else => "'else'".to_string(),
        Rule::keyword_if => "'if'".to_string(),
        Rule::EOI => "end of input".to_string(),

        _ => format!("{:?}", rule).replace('_', " "),
    }
}

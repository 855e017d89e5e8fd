// Literal parsing module
// Numbers, strings, characters and array literals

use pest::iterators::Pair;

use crate::ast::*;
use crate::error::*;
use crate::parser::{BibiParser, Rule};

impl BibiParser {
    pub(crate) fn parse_integer(pair: &Pair<Rule>) -> ParseResult<i64> {
        let text = pair.as_str();
        text.parse::<i64>()
            .map_err(|_| ParseError::invalid_integer(text, &Self::span_from_pair(pair)))
    }

    pub(crate) fn parse_float(pair: &Pair<Rule>) -> ParseResult<f64> {
        let text = pair.as_str();
        text.parse::<f64>()
            .map_err(|_| ParseError::invalid_float(text, &Self::span_from_pair(pair)))
    }

    /// Parse a quoted string, resolving escape sequences
    pub(crate) fn parse_string(pair: Pair<Rule>) -> ParseResult<String> {
        let span = Self::span_from_pair(&pair);
        match pair.into_inner().next() {
            Some(content) => Self::unescape(content.as_str(), &span),
            None => Ok(String::new()),
        }
    }

    pub(crate) fn parse_char(pair: Pair<Rule>) -> ParseResult<char> {
        let span = Self::span_from_pair(&pair);
        let mut inner = pair.into_inner();
        let content = Self::expect_pair(&mut inner, "a character", &span)?;
        let text = Self::unescape(content.as_str(), &span)?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ParseError::invalid_escape(content.as_str(), &span)),
        }
    }

    fn unescape(raw: &str, span: &Span) -> ParseResult<String> {
        let mut result = String::with_capacity(raw.len());
        let mut chars = raw.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                result.push(c);
                continue;
            }
            let escaped = match chars.next() {
                Some('n') => '\n',
                Some('t') => '\t',
                Some('r') => '\r',
                Some('0') => '\0',
                Some('\\') => '\\',
                Some('"') => '"',
                Some('\'') => '\'',
                Some(other) => return Err(ParseError::invalid_escape(&format!("\\{other}"), span)),
                None => return Err(ParseError::invalid_escape("\\", span)),
            };
            result.push(escaped);
        }
        Ok(result)
    }

    /// Elements containing a decimal point become floats, the rest integers
    pub(crate) fn parse_int_array(pair: Pair<Rule>) -> ParseResult<Vec<NumberLiteral>> {
        pair.into_inner()
            .map(|element| {
                let text = element.as_str();
                let span = Self::span_from_pair(&element);
                if text.contains('.') {
                    text.parse::<f64>()
                        .map(NumberLiteral::Float)
                        .map_err(|_| ParseError::invalid_float(text, &span))
                } else {
                    text.parse::<i64>()
                        .map(NumberLiteral::Int)
                        .map_err(|_| ParseError::invalid_integer(text, &span))
                }
            })
            .collect()
    }

    pub(crate) fn parse_char_array(pair: Pair<Rule>) -> ParseResult<Vec<char>> {
        pair.into_inner().map(Self::parse_char).collect()
    }

    pub(crate) fn parse_str_array(pair: Pair<Rule>) -> ParseResult<Vec<String>> {
        pair.into_inner().map(Self::parse_string).collect()
    }
}

// Bibi Parser
// Pest-derived parser; rule handlers live in the submodules

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::ast::*;
use crate::error::*;

mod expressions;
mod literals;
mod statements;

pub(crate) type SignificantPairs<'i> = std::vec::IntoIter<Pair<'i, Rule>>;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct BibiParser;

impl BibiParser {
    /// Parse a complete program
    pub fn parse_program(input: &str) -> ParseResult<Program> {
        Self::parse_program_inner(input).map_err(|error| error.with_source(input))
    }

    /// Parse a single expression (no trailing semicolon)
    pub fn parse_expression(input: &str) -> ParseResult<Expression> {
        Self::parse_expression_inner(input).map_err(|error| error.with_source(input))
    }

    fn parse_program_inner(input: &str) -> ParseResult<Program> {
        let mut pairs = Self::parse(Rule::program, input)
            .map_err(|error| ParseError::from_pest_error(error, input.to_string()))?;
        let program_pair = pairs
            .next()
            .ok_or_else(|| ParseError::missing_element("a program", &Span::new(0, 0, 1, 1)))?;
        let span = Self::span_from_pair(&program_pair);

        let mut statements = Vec::new();
        for pair in program_pair.into_inner() {
            if pair.as_rule() == Rule::EOI {
                continue;
            }
            statements.push(Self::parse_statement(pair)?);
        }

        Ok(Program { statements, span })
    }

    fn parse_expression_inner(input: &str) -> ParseResult<Expression> {
        let mut pairs = Self::parse(Rule::expression_input, input)
            .map_err(|error| ParseError::from_pest_error(error, input.to_string()))?;
        let input_pair = pairs
            .next()
            .ok_or_else(|| ParseError::missing_element("an expression", &Span::new(0, 0, 1, 1)))?;
        let span = Self::span_from_pair(&input_pair);
        let mut inner = input_pair.into_inner();
        let expression_pair = Self::expect_pair(&mut inner, "an expression", &span)?;
        Self::parse_expression_from_pair(expression_pair)
    }

    /// Create a Span from a Pest pair, carrying its 1-based line and column
    pub(crate) fn span_from_pair(pair: &Pair<Rule>) -> Span {
        let pest_span = pair.as_span();
        let (line, column) = pest_span.start_pos().line_col();
        Span::new(pest_span.start(), pest_span.end(), line, column)
    }

    /// Take the next pair or report which element was missing
    pub(crate) fn expect_pair<'i>(
        pairs: &mut impl Iterator<Item = Pair<'i, Rule>>,
        expected: &str,
        span: &Span,
    ) -> ParseResult<Pair<'i, Rule>> {
        pairs
            .next()
            .ok_or_else(|| ParseError::missing_element(expected, span))
    }

    /// Inner pairs of a rule with keyword tokens filtered out
    pub(crate) fn significant_pairs(pair: Pair<'_, Rule>) -> SignificantPairs<'_> {
        pair.into_inner()
            .filter(|inner| !Self::is_keyword(inner.as_rule()))
            .collect::<Vec<_>>()
            .into_iter()
    }

    pub(crate) fn is_keyword(rule: Rule) -> bool {
        matches!(
            rule,
            Rule::keyword_func
                | Rule::keyword_type
                | Rule::keyword_if
                | Rule::keyword_else
                | Rule::keyword_while
                | Rule::keyword_break
                | Rule::keyword_continue
                | Rule::keyword_return
                | Rule::keyword_print
                | Rule::keyword_try
                | Rule::keyword_recover
        )
    }

    pub(crate) fn parse_identifier(pair: Pair<Rule>) -> ParseResult<Identifier> {
        let span = Self::span_from_pair(&pair);
        if pair.as_rule() != Rule::identifier {
            return Err(ParseError::unexpected_rule("an identifier", pair.as_rule(), &span));
        }
        Ok(Identifier {
            name: pair.as_str().to_string(),
            span,
        })
    }
}

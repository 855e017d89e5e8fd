// Expression parsing module
// Operator precedence via Pratt parsing, plus primary expressions

use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};

use crate::ast::*;
use crate::error::*;
use crate::parser::{BibiParser, Rule};

impl BibiParser {
    /// Precedence levels from lowest to highest
    pub(crate) fn pratt_parser() -> PrattParser<Rule> {
        PrattParser::new()
            // Level 1: Logical OR
            .op(Op::infix(Rule::op_or, Assoc::Left))
            // Level 2: Logical AND
            .op(Op::infix(Rule::op_and, Assoc::Left))
            // Level 3: Logical NOT binds looser than comparisons
            .op(Op::prefix(Rule::op_not))
            // Level 4: Equality
            .op(Op::infix(Rule::op_equal, Assoc::Left) | Op::infix(Rule::op_not_equal, Assoc::Left))
            // Level 5: Comparison
            .op(Op::infix(Rule::op_less, Assoc::Left)
                | Op::infix(Rule::op_less_equal, Assoc::Left)
                | Op::infix(Rule::op_greater, Assoc::Left)
                | Op::infix(Rule::op_greater_equal, Assoc::Left))
            // Level 6: Additive
            .op(Op::infix(Rule::op_add, Assoc::Left) | Op::infix(Rule::op_subtract, Assoc::Left))
            // Level 7: Multiplicative
            .op(Op::infix(Rule::op_multiply, Assoc::Left)
                | Op::infix(Rule::op_divide, Assoc::Left))
            // Level 8: Unary minus
            .op(Op::prefix(Rule::op_negate))
    }

    /// Parse an `expression` pair
    pub(crate) fn parse_expression_from_pair(pair: Pair<Rule>) -> ParseResult<Expression> {
        let span = Self::span_from_pair(&pair);
        match pair.as_rule() {
            Rule::expression => Self::parse_expression_with_precedence(pair.into_inner()),
            other => Err(ParseError::unexpected_rule("an expression", other, &span)),
        }
    }

    fn parse_expression_with_precedence(pairs: Pairs<Rule>) -> ParseResult<Expression> {
        Self::pratt_parser()
            .map_primary(Self::parse_primary)
            .map_prefix(|op: Pair<Rule>, operand: ParseResult<Expression>| {
                let operand = operand?;
                let op_span = Self::span_from_pair(&op);
                let operator = match op.as_rule() {
                    Rule::op_negate => UnaryOperator::Negate,
                    Rule::op_not => UnaryOperator::Not,
                    other => {
                        return Err(ParseError::unexpected_rule("a unary operator", other, &op_span))
                    }
                };
                let span = op_span.to(&operand.span);
                Ok(Expression {
                    kind: ExpressionKind::Unary(UnaryOperation {
                        operator,
                        operand: Box::new(operand),
                    }),
                    span,
                })
            })
            .map_infix(
                |left: ParseResult<Expression>,
                 op: Pair<Rule>,
                 right: ParseResult<Expression>| {
                    let left = left?;
                    let right = right?;

                    let operator = match op.as_rule() {
                        Rule::op_or => BinaryOperator::Or,
                        Rule::op_and => BinaryOperator::And,
                        Rule::op_equal => BinaryOperator::Equal,
                        Rule::op_not_equal => BinaryOperator::NotEqual,
                        Rule::op_less => BinaryOperator::Less,
                        Rule::op_less_equal => BinaryOperator::LessEqual,
                        Rule::op_greater => BinaryOperator::Greater,
                        Rule::op_greater_equal => BinaryOperator::GreaterEqual,
                        Rule::op_add => BinaryOperator::Add,
                        Rule::op_subtract => BinaryOperator::Subtract,
                        Rule::op_multiply => BinaryOperator::Multiply,
                        Rule::op_divide => BinaryOperator::Divide,
                        other => {
                            let op_span = Self::span_from_pair(&op);
                            return Err(ParseError::unexpected_rule(
                                "a binary operator",
                                other,
                                &op_span,
                            ));
                        }
                    };

                    let span = left.span.to(&right.span);
                    Ok(Expression {
                        kind: ExpressionKind::Binary(BinaryOperation {
                            left: Box::new(left),
                            operator,
                            right: Box::new(right),
                        }),
                        span,
                    })
                },
            )
            .parse(pairs)
    }

    /// Parse literals, identifiers, calls, indexing, field access and parentheses
    fn parse_primary(pair: Pair<Rule>) -> ParseResult<Expression> {
        let span = Self::span_from_pair(&pair);
        let kind = match pair.as_rule() {
            Rule::integer => ExpressionKind::Integer(Self::parse_integer(&pair)?),
            Rule::float => ExpressionKind::Float(Self::parse_float(&pair)?),
            Rule::string => ExpressionKind::Str(Self::parse_string(pair)?),
            Rule::char_literal => ExpressionKind::Char(Self::parse_char(pair)?),
            Rule::boolean => ExpressionKind::Boolean(pair.as_str() == "true"),
            Rule::int_array => ExpressionKind::IntArray(Self::parse_int_array(pair)?),
            Rule::char_array => ExpressionKind::CharArray(Self::parse_char_array(pair)?),
            Rule::str_array => ExpressionKind::StrArray(Self::parse_str_array(pair)?),
            Rule::identifier => ExpressionKind::Identifier(Self::parse_identifier(pair)?),
            Rule::function_call => {
                let mut inner = pair.into_inner();
                let name =
                    Self::parse_identifier(Self::expect_pair(&mut inner, "a function name", &span)?)?;
                let arguments = match inner.next() {
                    Some(list) => list
                        .into_inner()
                        .map(Self::parse_expression_from_pair)
                        .collect::<ParseResult<Vec<_>>>()?,
                    None => Vec::new(),
                };
                ExpressionKind::Call(FunctionCall { name, arguments })
            }
            Rule::index_access => {
                let mut inner = pair.into_inner();
                let array =
                    Self::parse_identifier(Self::expect_pair(&mut inner, "an array name", &span)?)?;
                let index = Self::parse_expression_from_pair(Self::expect_pair(
                    &mut inner,
                    "an index expression",
                    &span,
                )?)?;
                ExpressionKind::Index(IndexAccess {
                    array,
                    index: Box::new(index),
                })
            }
            Rule::field_access => {
                let mut inner = pair.into_inner();
                let record =
                    Self::parse_identifier(Self::expect_pair(&mut inner, "a record name", &span)?)?;
                let field =
                    Self::parse_identifier(Self::expect_pair(&mut inner, "a field name", &span)?)?;
                ExpressionKind::FieldAccess(FieldAccess { record, field })
            }
            Rule::parenthesized => {
                let mut inner = pair.into_inner();
                let expression = Self::parse_expression_from_pair(Self::expect_pair(
                    &mut inner,
                    "an expression",
                    &span,
                )?)?;
                ExpressionKind::Parenthesized(Box::new(expression))
            }
            other => return Err(ParseError::unexpected_rule("an expression", other, &span)),
        };

        Ok(Expression { kind, span })
    }
}

// Statement parsing module
// Declarations, assignments, control flow and blocks

use pest::iterators::Pair;

use crate::ast::*;
use crate::error::*;
use crate::parser::{BibiParser, Rule};

impl BibiParser {
    /// Parse any statement rule into a Statement node
    pub(crate) fn parse_statement(pair: Pair<Rule>) -> ParseResult<Statement> {
        let span = Self::span_from_pair(&pair);
        let kind = match pair.as_rule() {
            Rule::variable_declaration => {
                StatementKind::VariableDeclaration(Self::parse_variable_declaration(pair)?)
            }
            Rule::assignment => StatementKind::Assignment(Self::parse_assignment(pair)?),
            Rule::field_assignment => {
                StatementKind::Assignment(Self::parse_field_assignment(pair)?)
            }
            Rule::function_declaration => {
                StatementKind::FunctionDeclaration(Self::parse_function_declaration(pair)?)
            }
            Rule::block => StatementKind::Block(Self::parse_block(pair)?),
            Rule::if_statement => StatementKind::If(Self::parse_if_statement(pair)?),
            Rule::while_statement => StatementKind::While(Self::parse_while_statement(pair)?),
            Rule::break_statement => StatementKind::Break,
            Rule::continue_statement => StatementKind::Continue,
            Rule::return_statement => {
                let value = match Self::significant_pairs(pair).next() {
                    Some(expression) => Some(Self::parse_expression_from_pair(expression)?),
                    None => None,
                };
                StatementKind::Return(value)
            }
            Rule::print_statement => {
                let mut inner = Self::significant_pairs(pair);
                let expression = Self::expect_pair(&mut inner, "an expression to print", &span)?;
                StatementKind::Print(Self::parse_expression_from_pair(expression)?)
            }
            Rule::try_statement => StatementKind::Try(Self::parse_try_statement(pair)?),
            Rule::record_type_declaration => {
                StatementKind::RecordTypeDeclaration(Self::parse_record_type_declaration(pair)?)
            }
            Rule::record_instance_declaration => {
                let mut inner = Self::significant_pairs(pair);
                let record_type =
                    Self::parse_identifier(Self::expect_pair(&mut inner, "a type name", &span)?)?;
                let name = Self::parse_identifier(Self::expect_pair(
                    &mut inner,
                    "a variable name",
                    &span,
                )?)?;
                StatementKind::RecordInstanceDeclaration(RecordInstanceDeclaration {
                    record_type,
                    name,
                })
            }
            Rule::expression_statement => {
                let mut inner = Self::significant_pairs(pair);
                let expression = Self::expect_pair(&mut inner, "an expression", &span)?;
                StatementKind::Expression(Self::parse_expression_from_pair(expression)?)
            }
            other => return Err(ParseError::unexpected_rule("a statement", other, &span)),
        };

        Ok(Statement { kind, span })
    }

    /// Parse `{ statement* }`
    pub(crate) fn parse_block(pair: Pair<Rule>) -> ParseResult<Block> {
        let span = Self::span_from_pair(&pair);
        if pair.as_rule() != Rule::block {
            return Err(ParseError::unexpected_rule("a block", pair.as_rule(), &span));
        }
        let statements = pair
            .into_inner()
            .map(Self::parse_statement)
            .collect::<ParseResult<Vec<_>>>()?;
        Ok(Block { statements, span })
    }

    /// Parse a type such as `int` or `str[]`
    pub(crate) fn parse_type_name(pair: Pair<Rule>) -> ParseResult<TypeName> {
        let span = Self::span_from_pair(&pair);
        if pair.as_rule() != Rule::type_name {
            return Err(ParseError::unexpected_rule("a type", pair.as_rule(), &span));
        }
        let text = pair.as_str();
        let (base, is_array) = match text.strip_suffix("[]") {
            Some(base) => (base, true),
            None => (text, false),
        };
        let primitive = PrimitiveType::from_keyword(base)
            .ok_or_else(|| ParseError::missing_element("a primitive type", &span))?;
        Ok(TypeName {
            primitive,
            is_array,
            span,
        })
    }

    fn parse_variable_declaration(pair: Pair<Rule>) -> ParseResult<VariableDeclaration> {
        let span = Self::span_from_pair(&pair);
        let mut inner = Self::significant_pairs(pair);

        let type_name = Self::parse_type_name(Self::expect_pair(&mut inner, "a type", &span)?)?;
        let name =
            Self::parse_identifier(Self::expect_pair(&mut inner, "a variable name", &span)?)?;
        let initializer = match inner.next() {
            Some(expression) => Some(Self::parse_expression_from_pair(expression)?),
            None => None,
        };

        Ok(VariableDeclaration {
            type_name,
            name,
            initializer,
        })
    }

    fn parse_assignment(pair: Pair<Rule>) -> ParseResult<Assignment> {
        let span = Self::span_from_pair(&pair);
        let mut inner = Self::significant_pairs(pair);

        let name =
            Self::parse_identifier(Self::expect_pair(&mut inner, "a variable name", &span)?)?;
        let value = Self::parse_expression_from_pair(Self::expect_pair(
            &mut inner,
            "a value to assign",
            &span,
        )?)?;

        Ok(Assignment {
            target: AssignmentTarget::Variable(name),
            value,
        })
    }

    fn parse_field_assignment(pair: Pair<Rule>) -> ParseResult<Assignment> {
        let span = Self::span_from_pair(&pair);
        let mut inner = Self::significant_pairs(pair);

        let record =
            Self::parse_identifier(Self::expect_pair(&mut inner, "a record name", &span)?)?;
        let field = Self::parse_identifier(Self::expect_pair(&mut inner, "a field name", &span)?)?;
        let value = Self::parse_expression_from_pair(Self::expect_pair(
            &mut inner,
            "a value to assign",
            &span,
        )?)?;

        Ok(Assignment {
            target: AssignmentTarget::Field { record, field },
            value,
        })
    }

    fn parse_function_declaration(pair: Pair<Rule>) -> ParseResult<FunctionDeclaration> {
        let span = Self::span_from_pair(&pair);
        let mut name = None;
        let mut parameters = Vec::new();
        let mut return_type = None;
        let mut body = None;

        for inner in Self::significant_pairs(pair) {
            match inner.as_rule() {
                Rule::identifier => name = Some(Self::parse_identifier(inner)?),
                Rule::parameter_list => {
                    for parameter in inner.into_inner() {
                        parameters.push(Self::parse_parameter(parameter)?);
                    }
                }
                Rule::type_name => return_type = Some(Self::parse_type_name(inner)?),
                Rule::void_type => return_type = None,
                Rule::block => body = Some(Self::parse_block(inner)?),
                other => {
                    let inner_span = Self::span_from_pair(&inner);
                    return Err(ParseError::unexpected_rule(
                        "a function signature",
                        other,
                        &inner_span,
                    ));
                }
            }
        }

        Ok(FunctionDeclaration {
            name: name.ok_or_else(|| ParseError::missing_element("a function name", &span))?,
            parameters,
            return_type,
            body: body.ok_or_else(|| ParseError::missing_element("a function body", &span))?,
        })
    }

    fn parse_parameter(pair: Pair<Rule>) -> ParseResult<Parameter> {
        let span = Self::span_from_pair(&pair);
        let mut inner = Self::significant_pairs(pair);
        let type_name =
            Self::parse_type_name(Self::expect_pair(&mut inner, "a parameter type", &span)?)?;
        let name =
            Self::parse_identifier(Self::expect_pair(&mut inner, "a parameter name", &span)?)?;
        Ok(Parameter { type_name, name })
    }

    fn parse_if_statement(pair: Pair<Rule>) -> ParseResult<IfStatement> {
        let span = Self::span_from_pair(&pair);
        let mut inner = Self::significant_pairs(pair);

        let condition = Self::parse_expression_from_pair(Self::expect_pair(
            &mut inner,
            "a condition",
            &span,
        )?)?;
        let body = Self::parse_block(Self::expect_pair(&mut inner, "a block", &span)?)?;
        let mut branches = vec![ConditionalBranch {
            condition,
            body,
            span,
        }];
        let mut else_block = None;

        for clause in inner {
            let clause_span = Self::span_from_pair(&clause);
            match clause.as_rule() {
                Rule::else_if_clause => {
                    let mut parts = Self::significant_pairs(clause);
                    let condition = Self::parse_expression_from_pair(Self::expect_pair(
                        &mut parts,
                        "a condition",
                        &clause_span,
                    )?)?;
                    let body =
                        Self::parse_block(Self::expect_pair(&mut parts, "a block", &clause_span)?)?;
                    branches.push(ConditionalBranch {
                        condition,
                        body,
                        span: clause_span,
                    });
                }
                Rule::else_clause => {
                    let mut parts = Self::significant_pairs(clause);
                    else_block = Some(Self::parse_block(Self::expect_pair(
                        &mut parts,
                        "a block",
                        &clause_span,
                    )?)?);
                }
                other => {
                    return Err(ParseError::unexpected_rule("an else clause", other, &clause_span))
                }
            }
        }

        Ok(IfStatement {
            branches,
            else_block,
        })
    }

    fn parse_while_statement(pair: Pair<Rule>) -> ParseResult<WhileStatement> {
        let span = Self::span_from_pair(&pair);
        let mut inner = Self::significant_pairs(pair);
        let condition = Self::parse_expression_from_pair(Self::expect_pair(
            &mut inner,
            "a loop condition",
            &span,
        )?)?;
        let body = Self::parse_block(Self::expect_pair(&mut inner, "a loop body", &span)?)?;
        Ok(WhileStatement { condition, body })
    }

    fn parse_try_statement(pair: Pair<Rule>) -> ParseResult<TryStatement> {
        let span = Self::span_from_pair(&pair);
        let mut inner = Self::significant_pairs(pair);
        let protected = Self::parse_block(Self::expect_pair(&mut inner, "a try block", &span)?)?;
        let recovery =
            Self::parse_block(Self::expect_pair(&mut inner, "a recover block", &span)?)?;
        Ok(TryStatement {
            protected,
            recovery,
        })
    }

    fn parse_record_type_declaration(pair: Pair<Rule>) -> ParseResult<RecordTypeDeclaration> {
        let span = Self::span_from_pair(&pair);
        let mut inner = Self::significant_pairs(pair);
        let name = Self::parse_identifier(Self::expect_pair(&mut inner, "a type name", &span)?)?;

        let mut fields = Vec::new();
        for field in inner {
            let field_span = Self::span_from_pair(&field);
            let mut parts = Self::significant_pairs(field);
            let type_name =
                Self::parse_type_name(Self::expect_pair(&mut parts, "a field type", &field_span)?)?;
            let field_name = Self::parse_identifier(Self::expect_pair(
                &mut parts,
                "a field name",
                &field_span,
            )?)?;
            fields.push(FieldDeclaration {
                type_name,
                name: field_name,
            });
        }

        Ok(RecordTypeDeclaration { name, fields })
    }
}

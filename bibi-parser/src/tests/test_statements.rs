use crate::ast::*;
use crate::parser::BibiParser;

fn parse(input: &str) -> Program {
    BibiParser::parse_program(input).unwrap()
}

#[test]
fn test_if_else_if_else_chain() {
    let program = parse(
        r#"
        if x < 0 {
            print "negative";
        } else if x == 0 {
            print "zero";
        } else {
            print "positive";
        }
        "#,
    );

    assert_eq!(program.statements.len(), 1);
    match &program.statements[0].kind {
        StatementKind::If(statement) => {
            assert_eq!(statement.branches.len(), 2);
            assert!(matches!(
                statement.branches[1].condition.kind,
                ExpressionKind::Binary(BinaryOperation {
                    operator: BinaryOperator::Equal,
                    ..
                })
            ));
            let else_block = statement.else_block.as_ref().unwrap();
            assert!(matches!(else_block.statements[0].kind, StatementKind::Print(_)));
        }
        other => panic!("Expected if statement, got {other:?}"),
    }
}

#[test]
fn test_if_without_else() {
    let program = parse("if ready { print 1; }");
    match &program.statements[0].kind {
        StatementKind::If(statement) => {
            assert_eq!(statement.branches.len(), 1);
            assert!(statement.else_block.is_none());
        }
        other => panic!("Expected if statement, got {other:?}"),
    }
}

#[test]
fn test_while_with_break_and_continue() {
    let program = parse("while i < 10 { i = i + 1; if i == 3 { continue; } break; }");
    match &program.statements[0].kind {
        StatementKind::While(statement) => {
            let kinds: Vec<&StatementKind> =
                statement.body.statements.iter().map(|s| &s.kind).collect();
            assert_eq!(kinds.len(), 3);
            assert!(matches!(kinds[0], StatementKind::Assignment(_)));
            assert!(matches!(kinds[1], StatementKind::If(_)));
            assert!(matches!(kinds[2], StatementKind::Break));
        }
        other => panic!("Expected while statement, got {other:?}"),
    }
}

#[test]
fn test_try_recover() {
    let program = parse("try { print 5 / 0; } recover { print get_error; }");
    match &program.statements[0].kind {
        StatementKind::Try(statement) => {
            assert_eq!(statement.protected.statements.len(), 1);
            match &statement.recovery.statements[0].kind {
                StatementKind::Print(Expression {
                    kind: ExpressionKind::Identifier(identifier),
                    ..
                }) => assert_eq!(identifier.name, "get_error"),
                other => panic!("Expected print of get_error, got {other:?}"),
            }
        }
        other => panic!("Expected try statement, got {other:?}"),
    }
}

#[test]
fn test_return_with_and_without_value() {
    let program = parse("func f() int { return 1; } func g() { return; }");
    let bodies: Vec<&StatementKind> = program
        .statements
        .iter()
        .map(|statement| match &statement.kind {
            StatementKind::FunctionDeclaration(function) => &function.body.statements[0].kind,
            other => panic!("Expected function declaration, got {other:?}"),
        })
        .collect();

    assert!(matches!(bodies[0], StatementKind::Return(Some(_))));
    assert!(matches!(bodies[1], StatementKind::Return(None)));
}

#[test]
fn test_nested_blocks_and_expression_statements() {
    let program = parse("{ { f(1); } x; }");
    match &program.statements[0].kind {
        StatementKind::Block(block) => {
            assert!(matches!(block.statements[0].kind, StatementKind::Block(_)));
            assert!(matches!(
                block.statements[1].kind,
                StatementKind::Expression(Expression {
                    kind: ExpressionKind::Identifier(_),
                    ..
                })
            ));
        }
        other => panic!("Expected block, got {other:?}"),
    }
}

#[test]
fn test_equality_expression_is_not_an_assignment() {
    let program = parse("x == 1;");
    assert!(matches!(
        program.statements[0].kind,
        StatementKind::Expression(_)
    ));
}

#[test]
fn test_statement_positions_are_one_based() {
    let program = parse("int a = 1;\n  print a;");
    assert_eq!((program.statements[0].span.line, program.statements[0].span.column), (1, 1));
    assert_eq!((program.statements[1].span.line, program.statements[1].span.column), (2, 3));
}

#[test]
fn test_comments_are_ignored() {
    let program = parse("// leading comment\nint a = 1; // trailing\n// done");
    assert_eq!(program.statements.len(), 1);
}

#[test]
fn test_empty_program() {
    assert!(parse("").statements.is_empty());
    assert!(parse("   // nothing here\n").statements.is_empty());
}

// S-expression formatter for the Bibi AST
// Prints a parsed program as nested lists for `bibi parse`

use bibi_parser::*;

/// Lists wider than this are broken over several lines
const LINE_WIDTH: usize = 60;

pub fn format_program_as_sexpr(program: &Program) -> String {
    let items: Vec<String> = program
        .statements
        .iter()
        .map(|statement| format_statement(statement, 2))
        .collect();

    match items.len() {
        0 => "(program)".to_string(),
        1 => format!("(program {})", items[0]),
        _ => format!("(program\n  {})", items.join("\n  ")),
    }
}

fn list(head: &str, items: Vec<String>, indent: usize) -> String {
    if items.is_empty() {
        return format!("({head})");
    }

    let width = head.len() + items.iter().map(|item| item.len() + 1).sum::<usize>();
    if width < LINE_WIDTH && items.iter().all(|item| !item.contains('\n')) {
        format!("({head} {})", items.join(" "))
    } else {
        let pad = " ".repeat(indent + 2);
        format!("({head}\n{pad}{})", items.join(&format!("\n{pad}")))
    }
}

fn format_statement(statement: &Statement, indent: usize) -> String {
    let inner = indent + 2;
    match &statement.kind {
        StatementKind::VariableDeclaration(declaration) => {
            let head = format!("declare {} {}", declaration.type_name, declaration.name.name);
            let initializer = declaration
                .initializer
                .iter()
                .map(|expr| format_expression(expr, inner))
                .collect();
            list(&head, initializer, indent)
        }
        StatementKind::Assignment(assignment) => {
            let target = match &assignment.target {
                AssignmentTarget::Variable(name) => name.name.clone(),
                AssignmentTarget::Field { record, field } => {
                    format!("{}.{}", record.name, field.name)
                }
            };
            list(
                &format!("assign {target}"),
                vec![format_expression(&assignment.value, inner)],
                indent,
            )
        }
        StatementKind::FunctionDeclaration(function) => format_function(function, indent),
        StatementKind::Block(block) => format_block(block, indent),
        StatementKind::If(if_statement) => {
            let mut items: Vec<String> = if_statement
                .branches
                .iter()
                .map(|branch| {
                    list(
                        "branch",
                        vec![
                            format_expression(&branch.condition, inner + 2),
                            format_block(&branch.body, inner + 2),
                        ],
                        inner,
                    )
                })
                .collect();
            if let Some(else_block) = &if_statement.else_block {
                items.push(list(
                    "else",
                    vec![format_block(else_block, inner + 2)],
                    inner,
                ));
            }
            list("if", items, indent)
        }
        StatementKind::While(while_statement) => list(
            "while",
            vec![
                format_expression(&while_statement.condition, inner),
                format_block(&while_statement.body, inner),
            ],
            indent,
        ),
        StatementKind::Break => "(break)".to_string(),
        StatementKind::Continue => "(continue)".to_string(),
        StatementKind::Return(value) => list(
            "return",
            value
                .iter()
                .map(|expr| format_expression(expr, inner))
                .collect(),
            indent,
        ),
        StatementKind::Print(expr) => list("print", vec![format_expression(expr, inner)], indent),
        StatementKind::Try(try_statement) => list(
            "try",
            vec![
                format_block(&try_statement.protected, inner),
                list(
                    "recover",
                    vec![format_block(&try_statement.recovery, inner + 2)],
                    inner,
                ),
            ],
            indent,
        ),
        StatementKind::RecordTypeDeclaration(record) => list(
            &format!("type {}", record.name.name),
            record
                .fields
                .iter()
                .map(|field| format!("({} {})", field.type_name, field.name.name))
                .collect(),
            indent,
        ),
        StatementKind::RecordInstanceDeclaration(instance) => format!(
            "(record {} {})",
            instance.record_type.name, instance.name.name
        ),
        StatementKind::Expression(expr) => format_expression(expr, indent),
    }
}

fn format_function(function: &FunctionDeclaration, indent: usize) -> String {
    let parameters: Vec<String> = function
        .parameters
        .iter()
        .map(|parameter| format!("({} {})", parameter.type_name, parameter.name.name))
        .collect();
    let return_type = function
        .return_type
        .as_ref()
        .map_or_else(|| "void".to_string(), TypeName::to_string);

    list(
        &format!("func {}", function.name.name),
        vec![
            list("params", parameters, indent + 2),
            format!("(returns {return_type})"),
            format_block(&function.body, indent + 2),
        ],
        indent,
    )
}

fn format_block(block: &Block, indent: usize) -> String {
    let statements = block
        .statements
        .iter()
        .map(|statement| format_statement(statement, indent + 2))
        .collect();
    list("block", statements, indent)
}

fn format_expression(expr: &Expression, indent: usize) -> String {
    let inner = indent + 2;
    match &expr.kind {
        ExpressionKind::Integer(value) => format!("(integer {value})"),
        ExpressionKind::Float(value) => format!("(float {value:?})"),
        ExpressionKind::Str(value) => format!("{value:?}"),
        ExpressionKind::Char(value) => format!("(char '{}')", value.escape_default()),
        ExpressionKind::Boolean(value) => format!("(boolean {value})"),
        ExpressionKind::IntArray(elements) => list(
            "array",
            elements
                .iter()
                .map(|element| match element {
                    NumberLiteral::Int(value) => value.to_string(),
                    NumberLiteral::Float(value) => format!("{value:?}"),
                })
                .collect(),
            indent,
        ),
        ExpressionKind::CharArray(elements) => list(
            "array",
            elements
                .iter()
                .map(|c| format!("'{}'", c.escape_default()))
                .collect(),
            indent,
        ),
        ExpressionKind::StrArray(elements) => list(
            "array",
            elements.iter().map(|s| format!("{s:?}")).collect(),
            indent,
        ),
        ExpressionKind::Identifier(identifier) => identifier.name.clone(),
        ExpressionKind::Index(access) => list(
            &format!("index {}", access.array.name),
            vec![format_expression(&access.index, inner)],
            indent,
        ),
        ExpressionKind::FieldAccess(access) => {
            format!("(field {} {})", access.record.name, access.field.name)
        }
        ExpressionKind::Call(call) => list(
            &format!("call {}", call.name.name),
            call.arguments
                .iter()
                .map(|argument| format_expression(argument, inner))
                .collect(),
            indent,
        ),
        ExpressionKind::Unary(operation) => list(
            &operation.operator.to_string(),
            vec![format_expression(&operation.operand, inner)],
            indent,
        ),
        ExpressionKind::Binary(operation) => list(
            operation.operator.symbol(),
            vec![
                format_expression(&operation.left, inner),
                format_expression(&operation.right, inner),
            ],
            indent,
        ),
        ExpressionKind::Parenthesized(inner_expr) => format_expression(inner_expr, indent),
    }
}

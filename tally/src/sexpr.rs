// S-expression formatter for Tally AST
// Converts the AST into readable Lisp-like syntax

use tally_parser::*;

pub fn format_program_as_sexpr(program: &Program) -> String {
    format_program_with_indent(program, 0)
}

fn format_program_with_indent(program: &Program, indent: usize) -> String {
    let statements: Vec<String> = program
        .statements
        .iter()
        .map(|statement| format_statement_with_indent(statement, indent + 2))
        .collect();

    if statements.is_empty() {
        "(program)".to_string()
    } else if statements.len() == 1 {
        format!("(program {})", statements[0])
    } else {
        format!(
            "(program\n{}{})",
            " ".repeat(indent + 2),
            statements.join(&format!("\n{}", " ".repeat(indent + 2)))
        )
    }
}

fn format_statement_with_indent(statement: &Statement, indent: usize) -> String {
    match &statement.kind {
        StatementKind::Assignment(assignment) => format!(
            "(var {} {})",
            assignment.target.name,
            format_expression_with_indent(&assignment.value, indent + 2)
        ),
        StatementKind::Print(print) => format!("(print {})", quote(&print.text.value)),
        StatementKind::Out(out) => {
            format!("(out {})", format_expression_with_indent(&out.value, indent + 2))
        }
    }
}

fn format_expression_with_indent(expr: &Expression, indent: usize) -> String {
    match &expr.kind {
        ExpressionKind::Number(number) => number.text.clone(),
        ExpressionKind::Identifier(identifier) => identifier.name.clone(),
        ExpressionKind::Unary(unary) => format!(
            "({} {})",
            format_unary_operator_as_sexpr(unary.operator),
            format_expression_with_indent(&unary.operand, indent + 2)
        ),
        ExpressionKind::Parenthesized(inner) => format_expression_with_indent(inner, indent),
        ExpressionKind::BinaryOp(bin_op) => format_binary_op_with_indent(bin_op, indent),
        ExpressionKind::Range(range) => format!(
            "(range {} {})",
            format_expression_with_indent(&range.from, indent + 2),
            format_expression_with_indent(&range.to, indent + 2)
        ),
        ExpressionKind::Map(map) => format!(
            "(map {} (fn ({}) {}))",
            format_expression_with_indent(&map.input, indent + 2),
            map.parameter.name,
            format_expression_with_indent(&map.body, indent + 4)
        ),
        ExpressionKind::Reduce(reduce) => format!(
            "(reduce {} {} (fn ({} {}) {}))",
            format_expression_with_indent(&reduce.input, indent + 2),
            format_expression_with_indent(&reduce.initial, indent + 2),
            reduce.accumulator.name,
            reduce.element.name,
            format_expression_with_indent(&reduce.body, indent + 4)
        ),
    }
}

fn format_binary_op_with_indent(bin_op: &BinaryOperation, indent: usize) -> String {
    let left = format_expression_with_indent(&bin_op.left, indent + 2);
    let right = format_expression_with_indent(&bin_op.right, indent + 2);
    let op = bin_op.operator.symbol();

    // Simple expressions on one line
    if !left.contains('\n') && !right.contains('\n') && (left.len() + right.len() + op.len()) < 50 {
        format!("({} {} {})", op, left, right)
    } else {
        format!(
            "({}\n{}{}\n{}{})",
            op,
            " ".repeat(indent + 2),
            left,
            " ".repeat(indent + 2),
            right
        )
    }
}

fn format_unary_operator_as_sexpr(operator: UnaryOperator) -> &'static str {
    match operator {
        UnaryOperator::Minus => "neg",
        UnaryOperator::Plus => "pos",
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\\\""))
}

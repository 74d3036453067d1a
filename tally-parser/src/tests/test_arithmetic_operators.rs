// Tests for arithmetic operators, signs and precedence

use crate::*;
use pretty_assertions::assert_eq;

// Render an expression fully parenthesized so shape assertions stay readable
fn shape(expr: &Expression) -> String {
    match &expr.kind {
        ExpressionKind::Number(number) => number.text.clone(),
        ExpressionKind::Identifier(identifier) => identifier.name.clone(),
        ExpressionKind::Unary(unary) => format!("({}{})", unary.operator, shape(&unary.operand)),
        ExpressionKind::Parenthesized(inner) => shape(inner),
        ExpressionKind::BinaryOp(op) => {
            format!("({} {} {})", shape(&op.left), op.operator, shape(&op.right))
        }
        ExpressionKind::Range(range) => format!("{{{}, {}}}", shape(&range.from), shape(&range.to)),
        ExpressionKind::Map(map) => format!(
            "map({}, {} -> {})",
            shape(&map.input),
            map.parameter.name,
            shape(&map.body)
        ),
        ExpressionKind::Reduce(reduce) => format!(
            "reduce({}, {}, {} {} -> {})",
            shape(&reduce.input),
            shape(&reduce.initial),
            reduce.accumulator.name,
            reduce.element.name,
            shape(&reduce.body)
        ),
    }
}

fn parse_shape(input: &str) -> String {
    shape(&parse_expression(input).unwrap())
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    assert_eq!(parse_shape("1 + 2 * 3"), "(1 + (2 * 3))");
    assert_eq!(parse_shape("1 * 2 - 3"), "((1 * 2) - 3)");
}

#[test]
fn test_additive_operators_are_left_associative() {
    assert_eq!(parse_shape("10 - 4 - 3"), "((10 - 4) - 3)");
    assert_eq!(parse_shape("8 / 4 / 2"), "((8 / 4) / 2)");
}

#[test]
fn test_exponent_is_right_associative() {
    assert_eq!(parse_shape("2 ^ 3 ^ 2"), "(2 ^ (3 ^ 2))");
}

#[test]
fn test_exponent_binds_tighter_than_multiplication() {
    assert_eq!(parse_shape("2 * 3 ^ 2"), "(2 * (3 ^ 2))");
}

#[test]
fn test_unary_minus_applies_after_exponent() {
    assert_eq!(parse_shape("-2 ^ 2"), "(-(2 ^ 2))");
}

#[test]
fn test_unary_operand_of_exponent() {
    assert_eq!(parse_shape("2 ^ -1"), "(2 ^ (-1))");
}

#[test]
fn test_stacked_signs() {
    assert_eq!(parse_shape("- - 3"), "(-(-3))");
    assert_eq!(parse_shape("+4"), "(+4)");
    assert_eq!(parse_shape("1 - -2"), "(1 - (-2))");
}

#[test]
fn test_parentheses_override_precedence() {
    assert_eq!(parse_shape("(1 + 2) * 3"), "((1 + 2) * 3)");
    assert_eq!(parse_shape("(-2) ^ 2"), "((-2) ^ 2)");
}

#[test]
fn test_parenthesized_node_is_kept() {
    let expr = parse_expression("(7)").unwrap();
    assert!(matches!(expr.kind, ExpressionKind::Parenthesized(_)));
}

#[test]
fn test_number_literal_keeps_source_text() {
    let expr = parse_expression("3.50").unwrap();
    match &expr.kind {
        ExpressionKind::Number(number) => assert_eq!(number.text, "3.50"),
        other => panic!("Expected number, got: {:?}", other),
    }
}

#[test]
fn test_whitespace_and_newlines_inside_expressions() {
    assert_eq!(parse_shape("1\n  +\t2"), "(1 + 2)");
}

#[test]
fn test_identifiers_may_contain_keywords() {
    assert_eq!(parse_shape("mapping + output_1"), "(mapping + output_1)");
}

#[test]
fn test_sequence_forms() {
    assert_eq!(parse_shape("{1, n}"), "{1, n}");
    assert_eq!(
        parse_shape("map({0, 3}, i -> i * 2)"),
        "map({0, 3}, i -> (i * 2))"
    );
    assert_eq!(
        parse_shape("reduce(map({1, 2}, x -> x ^ 2), 0, acc x -> acc + x)"),
        "reduce(map({1, 2}, x -> (x ^ 2)), 0, acc x -> (acc + x))"
    );
}

#[test]
fn test_sequence_forms_as_operands() {
    assert_eq!(
        parse_shape("4 * reduce(s, 0, a b -> a + b) - 1"),
        "((4 * reduce(s, 0, a b -> (a + b))) - 1)"
    );
}

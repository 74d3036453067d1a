// Parsing through the public entry points only

use pretty_assertions::assert_eq;
use tally_parser::{parse_expression, parse_program, ExpressionKind, StatementKind};

const PI_PROGRAM: &str = "var n = 5000
var sequence = map({0, n}, i -> (-1)^i / (2.0 * i + 1))
var pi = 4 * reduce(sequence, 0, x y -> x + y)
print \"pi = \"
out pi";

#[test]
fn test_pi_program_statements() {
    let program = parse_program(PI_PROGRAM).unwrap();

    let kinds: Vec<&str> = program
        .statements
        .iter()
        .map(|statement| match &statement.kind {
            StatementKind::Assignment(_) => "var",
            StatementKind::Print(_) => "print",
            StatementKind::Out(_) => "out",
        })
        .collect();
    assert_eq!(kinds, vec!["var", "var", "var", "print", "out"]);

    let lines: Vec<usize> = program
        .statements
        .iter()
        .map(|statement| statement.span.line)
        .collect();
    assert_eq!(lines, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_pi_program_map_body() {
    let program = parse_program(PI_PROGRAM).unwrap();

    match &program.statements[1].kind {
        StatementKind::Assignment(assignment) => {
            assert_eq!(assignment.target.name, "sequence");
            assert_eq!(assignment.value.kind.tag(), "map");
            assert_eq!(assignment.value.span.column, 15);
        }
        other => panic!("Expected assignment, got: {:?}", other),
    }
}

#[test]
fn test_expression_entry_point() {
    let expression = parse_expression("{-1, 2} + 1").unwrap();

    match &expression.kind {
        ExpressionKind::BinaryOp(operation) => {
            assert_eq!(operation.left.kind.tag(), "range");
            assert_eq!(operation.right.kind.tag(), "number");
        }
        other => panic!("Expected binary operation, got: {:?}", other),
    }
}

#[test]
fn test_statement_is_not_an_expression() {
    assert!(parse_expression("out 1").is_err());
    assert_eq!(parse_program("out 1 +").unwrap_err().location().0, 1);
}

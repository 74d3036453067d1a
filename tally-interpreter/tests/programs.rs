// Whole programs through the public parser and interpreter APIs

use pretty_assertions::assert_eq;
use tally_interpreter::{
    run, Environment, EvaluationError, ExpressionEvaluator, Interpreter, InterpreterConfig,
    Location,
};
use tally_parser::{parse_expression, parse_program};

const PI_PROGRAM: &str = "var n = 5000
var sequence = map({0, n}, i -> (-1)^i / (2.0 * i + 1))
var pi = 4 * reduce(sequence, 0, x y -> x + y)
print \"pi = \"
out pi";

#[test]
fn test_pi_program() {
    let program = parse_program(PI_PROGRAM).unwrap();
    let mut output = String::new();

    run(&program, &mut output).unwrap();

    assert_eq!(output, "pi = 3.14179261348960");
}

#[test]
fn test_pi_program_sequential_matches_parallel() {
    let program = parse_program(PI_PROGRAM).unwrap();
    let config = InterpreterConfig::default().with_parallel_map(false);
    let mut output = String::new();

    Interpreter::with_config(config)
        .execute(&program, &mut output)
        .unwrap();

    assert_eq!(output, "pi = 3.14179261348960");
}

#[test]
fn test_unbound_variable_on_second_line() {
    let program = parse_program("var a = 1\nout b").unwrap();
    let mut output = String::new();

    let error = run(&program, &mut output).unwrap_err();

    assert!(matches!(error, EvaluationError::UnknownVariable { .. }));
    assert_eq!(error.location(), Location { line: 2, column: 4 });
    assert!(error.to_string().ends_with("at 2:4"));
    assert_eq!(output, "");
}

#[test]
fn test_range_plus_number_is_a_type_mismatch() {
    let expression = parse_expression("{-1, 2} + 1").unwrap();
    let evaluator = ExpressionEvaluator::new(InterpreterConfig::default());

    let error = evaluator
        .evaluate(&expression, &Environment::new())
        .unwrap_err();

    assert_eq!(error.to_string(), "Expected number but was sequence at 1:0");
}

#[test]
fn test_output_before_failure_is_kept() {
    let program = parse_program("print \"first\"\nout 1 / 0\nprint \"never\"").unwrap();
    let mut output = String::new();

    let error = run(&program, &mut output).unwrap_err();

    assert_eq!(output, "first");
    assert_eq!(error.to_string(), "Division by zero at 2:4");
}

// Parallel map must be indistinguishable from sequential map

use crate::*;
use pretty_assertions::assert_eq;
use tally_parser::parse_program;

fn run_with(config: InterpreterConfig, source: &str) -> Result<String, EvaluationError> {
    let program = parse_program(source).unwrap();
    let mut output = String::new();
    Interpreter::with_config(config).execute(&program, &mut output)?;
    Ok(output)
}

fn configs() -> Vec<InterpreterConfig> {
    vec![
        InterpreterConfig::default().with_parallel_map(false),
        InterpreterConfig::default(),
        InterpreterConfig::default().with_map_chunk_size(1),
        InterpreterConfig::default().with_map_chunk_size(7),
    ]
}

#[test]
fn test_output_is_identical_across_configurations() {
    let source = "var s = map({1, 40}, i -> i ^ 2 / 3) out s print \" \" out reduce(s, 0, a b -> a + b)";

    let outputs: Vec<String> = configs()
        .into_iter()
        .map(|config| run_with(config, source).unwrap())
        .collect();

    for output in &outputs[1..] {
        assert_eq!(output, &outputs[0]);
    }
}

#[test]
fn test_non_associative_reduce_over_parallel_map() {
    let source = "out reduce(map({1, 100}, x -> x), 0, a b -> a - b)";

    for config in configs() {
        assert_eq!(run_with(config, source).unwrap(), "-5048");
    }
}

#[test]
fn test_first_error_in_input_order_wins() {
    // i = 1 gives (-1) ^ 0.5, i = 3 divides by zero
    let source = "out map({1, 3}, i -> (i - 2) ^ (1 / (3 - i)))";

    for config in configs() {
        let error = run_with(config, source).unwrap_err();
        assert!(
            matches!(error, EvaluationError::UndefinedPower { .. }),
            "unexpected error: {error}"
        );
    }
}

#[test]
fn test_large_range_streams_through_chunks() {
    let source = "out reduce(map({1, 10000}, i -> i * 2), 0, a b -> a + b)";

    for config in configs() {
        assert_eq!(run_with(config, source).unwrap(), "100010000");
    }
}

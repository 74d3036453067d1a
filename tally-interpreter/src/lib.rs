//! Tally Interpreter
//!
//! Evaluates programs produced by `tally-parser`: decimal arithmetic with
//! a fixed working precision, lazy integer ranges, `map` (optionally
//! parallel) and strictly sequential `reduce`.

#![allow(clippy::result_large_err)]

pub mod config;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod executor;
pub mod number;
pub mod sequence;
pub mod sink;
pub mod value;

// Include tests directory with all test modules
#[cfg(test)]
#[path = "tests/mod.rs"]
pub mod tests;

// Re-export public API
pub use config::InterpreterConfig;
pub use environment::Environment;
pub use error::{EvaluationError, EvaluationResult, Location};
pub use evaluator::ExpressionEvaluator;
pub use executor::{render, Interpreter};
pub use number::{default_math_context, math_context, ArithmeticError, Number};
pub use sequence::Sequence;
pub use sink::{IoSink, OutputSink};
pub use value::Value;

/// Execute a program against a fresh environment with the default
/// configuration
pub fn run<S: OutputSink + ?Sized>(
    program: &tally_parser::Program,
    sink: &mut S,
) -> EvaluationResult<()> {
    Interpreter::new().execute(program, sink)
}

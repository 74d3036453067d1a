// Tally Parser Library
// Pest-based parser for the Tally sequence language

pub mod ast;
pub mod error;
pub mod parser;

pub use ast::*;
pub use error::*;
pub use parser::*;

// Include tests directory with all test modules
#[cfg(test)]
#[path = "tests/mod.rs"]
pub mod tests;

// Main parsing functions
pub fn parse_program(input: &str) -> Result<Program, ParseError> {
    parser::TallyParser::parse_program(input)
}

pub fn parse_expression(input: &str) -> Result<Expression, ParseError> {
    parser::TallyParser::parse_expression(input)
}

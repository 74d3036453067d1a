//! Parser tests driven through `parse_program` and `parse_expression`

pub mod test_arithmetic_operators;
pub mod test_syntax_errors;

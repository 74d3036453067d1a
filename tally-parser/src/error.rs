// Tally Parser Error Handling
// Syntax errors with miette integration

use crate::parser::Rule;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Main parse error type with miette integration
#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("Syntax error at {line}:{column}")]
    #[diagnostic(code(tally::parse::syntax_error), help("Expected {expected}"))]
    Syntax {
        #[source_code]
        src: String,
        #[label("unexpected input here")]
        span: SourceSpan,
        /// 1-based line of the failure
        line: usize,
        /// 0-based column of the failure
        column: usize,
        expected: String,
    },

    #[error("Unexpected grammar rule at {line}:{column}")]
    #[diagnostic(
        code(tally::parse::unexpected_rule),
        help("Expected rule: {expected}")
    )]
    UnexpectedRule {
        expected: String,
        found: Option<Rule>,
        #[label("while parsing this")]
        span: SourceSpan,
        line: usize,
        column: usize,
    },
}

impl ParseError {
    /// Create a parse error from a Pest parsing error
    pub fn from_pest_error(error: pest::error::Error<Rule>, src: String) -> Self {
        let span = match error.location {
            pest::error::InputLocation::Pos(pos) => SourceSpan::new(pos.into(), 0),
            pest::error::InputLocation::Span((start, end)) => {
                SourceSpan::new(start.into(), end - start)
            }
        };

        let (line, column) = match error.line_col {
            pest::error::LineColLocation::Pos((line, column)) => (line, column),
            pest::error::LineColLocation::Span((line, column), _) => (line, column),
        };

        let expected = match &error.variant {
            pest::error::ErrorVariant::ParsingError { positives, .. } => {
                describe_expected(positives)
            }
            _ => describe_expected(&[]),
        };

        ParseError::Syntax {
            src,
            span,
            line,
            // pest columns are 1-based
            column: column.saturating_sub(1),
            expected,
        }
    }

    /// Create an error for a pair the grammar should have produced but did not
    pub fn unexpected_rule(expected: &str, found: Option<Rule>, span: &crate::ast::Span) -> Self {
        ParseError::UnexpectedRule {
            expected: expected.to_string(),
            found,
            span: SourceSpan::new(span.start.into(), span.len()),
            line: span.line,
            column: span.column,
        }
    }

    /// Position of the failure as `(line, column)`
    pub fn location(&self) -> (usize, usize) {
        match self {
            ParseError::Syntax { line, column, .. } => (*line, *column),
            ParseError::UnexpectedRule { line, column, .. } => (*line, *column),
        }
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

fn describe_expected(rules: &[Rule]) -> String {
    let mut descriptions: Vec<&'static str> = Vec::new();
    for description in rules.iter().map(rule_to_user_friendly_description) {
        if !descriptions.contains(&description) {
            descriptions.push(description);
        }
    }

    match descriptions.as_slice() {
        [] => "valid Tally syntax".to_string(),
        [single] => single.to_string(),
        many => format!("one of: {}", many.join(", ")),
    }
}

/// Convert a parser rule to a user-friendly description
fn rule_to_user_friendly_description(rule: &Rule) -> &'static str {
    match rule {
        Rule::number => "a number (like 42 or 2.5)",
        Rule::string | Rule::string_content => "a quoted string (like \"hello\")",
        Rule::identifier => "an identifier (like total)",

        Rule::expression | Rule::expression_only => "an expression",
        Rule::braced_expr => "a parenthesized expression (like (x + 1))",
        Rule::range_expr => "a range (like {1, 10})",
        Rule::map_expr => "a map (like map(seq, x -> x * 2))",
        Rule::reduce_expr => "a reduce (like reduce(seq, 0, acc x -> acc + x))",

        Rule::assignment => "an assignment (var name = expression)",
        Rule::print_statement => "a print statement (print \"text\")",
        Rule::out_statement => "an out statement (out expression)",

        Rule::keyword => "a keyword",
        Rule::keyword_var => "'var'",
        Rule::keyword_print => "'print'",
        Rule::keyword_out => "'out'",
        Rule::keyword_map => "'map'",
        Rule::keyword_reduce => "'reduce'",

        Rule::op_add => "'+'",
        Rule::op_subtract => "'-'",
        Rule::op_multiply => "'*'",
        Rule::op_divide => "'/'",
        Rule::op_exponent => "'^'",
        Rule::op_negate => "a unary minus (-)",
        Rule::op_identity => "a unary plus (+)",

        Rule::program => "a program",
        Rule::EOI => "end of input",
        _ => "valid Tally syntax",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_single_expectation() {
        assert_eq!(describe_expected(&[Rule::number]), "a number (like 42 or 2.5)");
    }

    #[test]
    fn test_describe_deduplicates() {
        assert_eq!(
            describe_expected(&[Rule::string, Rule::string_content, Rule::EOI]),
            "one of: a quoted string (like \"hello\"), end of input"
        );
    }

    #[test]
    fn test_describe_nothing_expected() {
        assert_eq!(describe_expected(&[]), "valid Tally syntax");
    }
}

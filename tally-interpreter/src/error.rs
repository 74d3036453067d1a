//! Evaluation error types for the Tally interpreter.
//!
//! Every failure carries the position of the node that caused it, both
//! for the message (`... at line:column`) and as a miette label.

use crate::number::ArithmeticError;
use miette::{Diagnostic, SourceSpan};
use std::fmt;
use std::io;
use tally_parser::Span;
use thiserror::Error;

/// 1-based line, 0-based column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl From<&Span> for Location {
    fn from(span: &Span) -> Self {
        Self {
            line: span.line,
            column: span.column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors that abort program evaluation
#[derive(Error, Diagnostic, Debug)]
pub enum EvaluationError {
    #[error("Unknown variable '{name}' at {location}")]
    #[diagnostic(
        code(tally::eval::unknown_variable),
        help("Declare it first with `var {name} = ...`")
    )]
    UnknownVariable {
        name: String,
        location: Location,
        #[label("not defined")]
        span: SourceSpan,
    },

    #[error("Expected {expected} but was {found} at {location}")]
    #[diagnostic(code(tally::eval::type_mismatch))]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
        location: Location,
        #[label("this is a {found}")]
        span: SourceSpan,
    },

    #[error("Division by zero at {location}")]
    #[diagnostic(code(tally::eval::division_by_zero))]
    DivisionByZero {
        location: Location,
        #[label("divides by zero")]
        span: SourceSpan,
    },

    #[error("Undefined power {base} ^ {exponent} at {location}")]
    #[diagnostic(
        code(tally::eval::undefined_power),
        help("A negative base needs an integral exponent")
    )]
    UndefinedPower {
        base: String,
        exponent: String,
        location: Location,
        #[label("no real result")]
        span: SourceSpan,
    },

    #[error("Numeric overflow at {location}")]
    #[diagnostic(code(tally::eval::overflow))]
    NumericOverflow {
        location: Location,
        #[label("result is too large")]
        span: SourceSpan,
    },

    #[error("Invalid number literal '{text}' at {location}")]
    #[diagnostic(code(tally::eval::invalid_number))]
    InvalidNumber {
        text: String,
        location: Location,
        #[label("not a decimal number")]
        span: SourceSpan,
    },

    #[error("Failed to write output at {location}")]
    #[diagnostic(code(tally::eval::output))]
    Output {
        #[source]
        source: io::Error,
        location: Location,
        #[label("while writing this")]
        span: SourceSpan,
    },
}

impl EvaluationError {
    pub fn unknown_variable(name: &str, span: &Span) -> Self {
        Self::UnknownVariable {
            name: name.to_string(),
            location: span.into(),
            span: source_span(span),
        }
    }

    pub fn type_mismatch(expected: &'static str, found: &'static str, span: &Span) -> Self {
        Self::TypeMismatch {
            expected,
            found,
            location: span.into(),
            span: source_span(span),
        }
    }

    pub fn division_by_zero(span: &Span) -> Self {
        Self::DivisionByZero {
            location: span.into(),
            span: source_span(span),
        }
    }

    pub fn undefined_power(base: String, exponent: String, span: &Span) -> Self {
        Self::UndefinedPower {
            base,
            exponent,
            location: span.into(),
            span: source_span(span),
        }
    }

    pub fn invalid_number(text: &str, span: &Span) -> Self {
        Self::InvalidNumber {
            text: text.to_string(),
            location: span.into(),
            span: source_span(span),
        }
    }

    pub fn output(source: io::Error, span: &Span) -> Self {
        Self::Output {
            source,
            location: span.into(),
            span: source_span(span),
        }
    }

    /// Locate an arithmetic failure at `span`
    pub fn arithmetic(
        error: ArithmeticError,
        base: &dyn fmt::Display,
        exponent: &dyn fmt::Display,
        span: &Span,
    ) -> Self {
        match error {
            ArithmeticError::DivisionByZero => Self::division_by_zero(span),
            ArithmeticError::UndefinedPower => {
                Self::undefined_power(base.to_string(), exponent.to_string(), span)
            }
            ArithmeticError::Overflow => Self::NumericOverflow {
                location: span.into(),
                span: source_span(span),
            },
        }
    }

    pub fn location(&self) -> Location {
        match self {
            Self::UnknownVariable { location, .. }
            | Self::TypeMismatch { location, .. }
            | Self::DivisionByZero { location, .. }
            | Self::UndefinedPower { location, .. }
            | Self::NumericOverflow { location, .. }
            | Self::InvalidNumber { location, .. }
            | Self::Output { location, .. } => *location,
        }
    }
}

/// Result type for evaluation
pub type EvaluationResult<T> = Result<T, EvaluationError>;

fn source_span(span: &Span) -> SourceSpan {
    SourceSpan::new(span.start.into(), span.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_end_with_location() {
        let span = Span::new(10, 11, 2, 4);

        assert_eq!(
            EvaluationError::unknown_variable("b", &span).to_string(),
            "Unknown variable 'b' at 2:4"
        );
        assert_eq!(
            EvaluationError::type_mismatch("number", "sequence", &span).to_string(),
            "Expected number but was sequence at 2:4"
        );
        assert_eq!(
            EvaluationError::division_by_zero(&span).to_string(),
            "Division by zero at 2:4"
        );
    }

    #[test]
    fn test_arithmetic_errors_keep_operands() {
        let span = Span::new(0, 8, 1, 0);
        let error = EvaluationError::arithmetic(ArithmeticError::UndefinedPower, &"-8", &"0.5", &span);

        assert_eq!(error.to_string(), "Undefined power -8 ^ 0.5 at 1:0");
        assert_eq!(error.location(), Location { line: 1, column: 0 });
    }
}

// Tally Parser
// Pest grammar binding plus the AST builders for statements and expressions

use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;

use crate::ast::*;
use crate::error::*;

mod expressions;
mod literals;
mod statements;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct TallyParser;

impl TallyParser {
    /// Parse a complete program into its ordered statements
    pub fn parse_program(input: &str) -> ParseResult<Program> {
        let mut pairs = <Self as Parser<Rule>>::parse(Rule::program, input)
            .map_err(|error| ParseError::from_pest_error(error, input.to_string()))?;

        let root_span = Span::new(0, input.len(), 1, 0);
        let program_pair = Self::expect_next(&mut pairs, Rule::program, &root_span)?;
        let span = Self::span_from_pair(&program_pair);

        let mut statements = Vec::new();
        for pair in program_pair.into_inner() {
            match pair.as_rule() {
                Rule::assignment | Rule::print_statement | Rule::out_statement => {
                    statements.push(Self::parse_statement(pair)?);
                }
                Rule::EOI => {}
                other => {
                    return Err(ParseError::unexpected_rule(
                        "statement",
                        Some(other),
                        &Self::span_from_pair(&pair),
                    ))
                }
            }
        }

        Ok(Program { statements, span })
    }

    /// Parse a single expression (used by tests and tooling)
    pub fn parse_expression(input: &str) -> ParseResult<Expression> {
        let mut pairs = <Self as Parser<Rule>>::parse(Rule::expression_only, input)
            .map_err(|error| ParseError::from_pest_error(error, input.to_string()))?;

        let root_span = Span::new(0, input.len(), 1, 0);
        let wrapper = Self::expect_next(&mut pairs, Rule::expression_only, &root_span)?;
        let mut inner = wrapper.into_inner();
        let expression = Self::expect_next(&mut inner, Rule::expression, &root_span)?;

        Self::parse_expression_from_pair(expression)
    }

    /// Build an AST span from a pest pair (1-based line, 0-based column)
    pub(crate) fn span_from_pair(pair: &Pair<Rule>) -> Span {
        let pest_span = pair.as_span();
        let (line, column) = pest_span.start_pos().line_col();
        Span::new(pest_span.start(), pest_span.end(), line, column - 1)
    }

    /// Take the next pair, requiring it to be produced by `expected`
    pub(crate) fn expect_next<'i>(
        pairs: &mut Pairs<'i, Rule>,
        expected: Rule,
        parent: &Span,
    ) -> ParseResult<Pair<'i, Rule>> {
        match pairs.next() {
            Some(pair) if pair.as_rule() == expected => Ok(pair),
            Some(pair) => Err(ParseError::unexpected_rule(
                &format!("{expected:?}"),
                Some(pair.as_rule()),
                &Self::span_from_pair(&pair),
            )),
            None => Err(ParseError::unexpected_rule(
                &format!("{expected:?}"),
                None,
                parent,
            )),
        }
    }
}

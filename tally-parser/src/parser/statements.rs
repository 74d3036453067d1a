// Statement parsing: var assignments, print and out

use pest::iterators::Pair;

use super::{Rule, TallyParser};
use crate::ast::*;
use crate::error::*;

impl TallyParser {
    pub(crate) fn parse_statement(pair: Pair<Rule>) -> ParseResult<Statement> {
        let span = Self::span_from_pair(&pair);

        let kind = match pair.as_rule() {
            Rule::assignment => StatementKind::Assignment(Self::parse_assignment(pair)?),
            Rule::print_statement => StatementKind::Print(Self::parse_print_statement(pair)?),
            Rule::out_statement => StatementKind::Out(Self::parse_out_statement(pair)?),
            other => return Err(ParseError::unexpected_rule("statement", Some(other), &span)),
        };

        Ok(Statement { kind, span })
    }

    fn parse_assignment(pair: Pair<Rule>) -> ParseResult<Assignment> {
        let span = Self::span_from_pair(&pair);
        let mut inner = pair.into_inner();

        Self::expect_next(&mut inner, Rule::keyword_var, &span)?;
        let target = Self::parse_identifier(Self::expect_next(&mut inner, Rule::identifier, &span)?);
        let value =
            Self::parse_expression_from_pair(Self::expect_next(&mut inner, Rule::expression, &span)?)?;

        Ok(Assignment {
            target,
            value,
            span,
        })
    }

    fn parse_print_statement(pair: Pair<Rule>) -> ParseResult<PrintStatement> {
        let span = Self::span_from_pair(&pair);
        let mut inner = pair.into_inner();

        Self::expect_next(&mut inner, Rule::keyword_print, &span)?;
        let text = Self::parse_string(Self::expect_next(&mut inner, Rule::string, &span)?);

        Ok(PrintStatement { text, span })
    }

    fn parse_out_statement(pair: Pair<Rule>) -> ParseResult<OutStatement> {
        let span = Self::span_from_pair(&pair);
        let mut inner = pair.into_inner();

        Self::expect_next(&mut inner, Rule::keyword_out, &span)?;
        let value =
            Self::parse_expression_from_pair(Self::expect_next(&mut inner, Rule::expression, &span)?)?;

        Ok(OutStatement { value, span })
    }
}

// Expression parsing module
// Handles operator precedence, unary signs and the range/map/reduce forms

use std::sync::Arc;

use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};

use super::{Rule, TallyParser};
use crate::ast::*;
use crate::error::*;

impl TallyParser {
    /// Operator precedence parser
    /// Precedence levels from lowest to highest
    pub(crate) fn pratt_parser() -> PrattParser<Rule> {
        PrattParser::new()
            // Level 1: Additive
            .op(Op::infix(Rule::op_add, Assoc::Left) | Op::infix(Rule::op_subtract, Assoc::Left))
            // Level 2: Multiplicative
            .op(Op::infix(Rule::op_multiply, Assoc::Left)
                | Op::infix(Rule::op_divide, Assoc::Left))
            // Level 3: Unary sign, so that -2 ^ 3 is -(2 ^ 3)
            .op(Op::prefix(Rule::op_negate) | Op::prefix(Rule::op_identity))
            // Level 4: Exponentiation (highest precedence, right associative)
            .op(Op::infix(Rule::op_exponent, Assoc::Right))
    }

    /// Parse expression using precedence climbing
    pub(crate) fn parse_expression_with_precedence(pairs: Pairs<Rule>) -> ParseResult<Expression> {
        Self::pratt_parser()
            .map_primary(|pair| Self::parse_primary_expr(pair))
            .map_prefix(|op: Pair<Rule>, operand: ParseResult<Expression>| {
                let operand = operand?;
                let op_span = Self::span_from_pair(&op);

                let operator = match op.as_rule() {
                    Rule::op_negate => UnaryOperator::Minus,
                    Rule::op_identity => UnaryOperator::Plus,
                    other => {
                        return Err(ParseError::unexpected_rule(
                            "unary operator",
                            Some(other),
                            &op_span,
                        ))
                    }
                };

                let span = op_span.to(&operand.span);
                Ok(Expression {
                    kind: ExpressionKind::Unary(UnaryOperation {
                        operator,
                        operand: Box::new(operand),
                        span,
                    }),
                    span,
                })
            })
            .map_infix(
                |left: ParseResult<Expression>,
                 op: Pair<Rule>,
                 right: ParseResult<Expression>| {
                    let left = left?;
                    let right = right?;

                    let operator = match op.as_rule() {
                        Rule::op_add => BinaryOperator::Add,
                        Rule::op_subtract => BinaryOperator::Subtract,
                        Rule::op_multiply => BinaryOperator::Multiply,
                        Rule::op_divide => BinaryOperator::Divide,
                        Rule::op_exponent => BinaryOperator::Exponent,
                        other => {
                            return Err(ParseError::unexpected_rule(
                                "binary operator",
                                Some(other),
                                &Self::span_from_pair(&op),
                            ))
                        }
                    };

                    let span = left.span.to(&right.span);
                    Ok(Expression {
                        kind: ExpressionKind::BinaryOp(BinaryOperation {
                            left: Box::new(left),
                            operator,
                            right: Box::new(right),
                            span,
                        }),
                        span,
                    })
                },
            )
            .parse(pairs)
    }

    /// Parse an expression from a Pest pair (full precedence support)
    pub(crate) fn parse_expression_from_pair(pair: Pair<Rule>) -> ParseResult<Expression> {
        match pair.as_rule() {
            Rule::expression => Self::parse_expression_with_precedence(pair.into_inner()),
            _ => Self::parse_primary_expr(pair),
        }
    }

    /// Parse operands: literals, identifiers, parentheses, ranges, map and reduce
    pub(crate) fn parse_primary_expr(pair: Pair<Rule>) -> ParseResult<Expression> {
        let span = Self::span_from_pair(&pair);

        let kind = match pair.as_rule() {
            Rule::number => ExpressionKind::Number(Self::parse_number(pair)),
            Rule::identifier => ExpressionKind::Identifier(Self::parse_identifier(pair)),
            Rule::braced_expr => {
                let mut inner = pair.into_inner();
                let expression = Self::expect_next(&mut inner, Rule::expression, &span)?;
                ExpressionKind::Parenthesized(Box::new(Self::parse_expression_from_pair(
                    expression,
                )?))
            }
            Rule::range_expr => ExpressionKind::Range(Self::parse_range_expr(pair)?),
            Rule::map_expr => ExpressionKind::Map(Self::parse_map_expr(pair)?),
            Rule::reduce_expr => ExpressionKind::Reduce(Self::parse_reduce_expr(pair)?),
            Rule::expression => return Self::parse_expression_from_pair(pair),
            other => {
                return Err(ParseError::unexpected_rule(
                    "expression operand",
                    Some(other),
                    &span,
                ))
            }
        };

        Ok(Expression { kind, span })
    }

    fn parse_range_expr(pair: Pair<Rule>) -> ParseResult<RangeExpression> {
        let span = Self::span_from_pair(&pair);
        let mut inner = pair.into_inner();

        let from = Self::next_expression(&mut inner, &span)?;
        let to = Self::next_expression(&mut inner, &span)?;

        Ok(RangeExpression {
            from: Box::new(from),
            to: Box::new(to),
            span,
        })
    }

    fn parse_map_expr(pair: Pair<Rule>) -> ParseResult<MapExpression> {
        let span = Self::span_from_pair(&pair);
        let mut inner = pair.into_inner();

        Self::expect_next(&mut inner, Rule::keyword_map, &span)?;
        let input = Self::next_expression(&mut inner, &span)?;
        let parameter =
            Self::parse_identifier(Self::expect_next(&mut inner, Rule::identifier, &span)?);
        let body = Self::next_expression(&mut inner, &span)?;

        Ok(MapExpression {
            input: Box::new(input),
            parameter,
            body: Arc::new(body),
            span,
        })
    }

    fn parse_reduce_expr(pair: Pair<Rule>) -> ParseResult<ReduceExpression> {
        let span = Self::span_from_pair(&pair);
        let mut inner = pair.into_inner();

        Self::expect_next(&mut inner, Rule::keyword_reduce, &span)?;
        let input = Self::next_expression(&mut inner, &span)?;
        let initial = Self::next_expression(&mut inner, &span)?;
        let accumulator =
            Self::parse_identifier(Self::expect_next(&mut inner, Rule::identifier, &span)?);
        let element =
            Self::parse_identifier(Self::expect_next(&mut inner, Rule::identifier, &span)?);
        let body = Self::next_expression(&mut inner, &span)?;

        Ok(ReduceExpression {
            input: Box::new(input),
            initial: Box::new(initial),
            accumulator,
            element,
            body: Arc::new(body),
            span,
        })
    }

    fn next_expression(pairs: &mut Pairs<Rule>, parent: &Span) -> ParseResult<Expression> {
        let pair = Self::expect_next(pairs, Rule::expression, parent)?;
        Self::parse_expression_from_pair(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_binds_looser_than_exponent() {
        let expr = TallyParser::parse_expression("-2 ^ 3").unwrap();

        match &expr.kind {
            ExpressionKind::Unary(unary) => {
                assert_eq!(unary.operator, UnaryOperator::Minus);
                match &unary.operand.kind {
                    ExpressionKind::BinaryOp(op) => {
                        assert_eq!(op.operator, BinaryOperator::Exponent)
                    }
                    other => panic!("Expected exponent under minus, got: {:?}", other),
                }
            }
            other => panic!("Expected unary minus at the root, got: {:?}", other),
        }
    }

    #[test]
    fn test_prefix_binds_tighter_than_multiplication() {
        let expr = TallyParser::parse_expression("-2 * 3").unwrap();

        match &expr.kind {
            ExpressionKind::BinaryOp(op) => {
                assert_eq!(op.operator, BinaryOperator::Multiply);
                assert!(matches!(op.left.kind, ExpressionKind::Unary(_)));
            }
            other => panic!("Expected multiplication at the root, got: {:?}", other),
        }
    }

    #[test]
    fn test_binary_span_starts_at_left_operand() {
        let expr = TallyParser::parse_expression("  1 + 2").unwrap();

        assert_eq!(expr.span.start, 2);
        assert_eq!(expr.span.end, 7);
        assert_eq!((expr.span.line, expr.span.column), (1, 2));
    }
}

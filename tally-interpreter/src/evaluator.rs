//! Expression evaluator for the Tally interpreter.
//!
//! Evaluates parser `Expression` nodes against an explicit
//! [`Environment`]. Arithmetic errors are located at the operation,
//! type errors at the operand that had the wrong kind.

use crate::config::InterpreterConfig;
use crate::environment::Environment;
use crate::error::{EvaluationError, EvaluationResult};
use crate::number::Number;
use crate::sequence::Sequence;
use crate::value::Value;
use std::sync::Arc;
use tally_parser::{
    BinaryOperation, BinaryOperator, Expression, ExpressionKind, MapExpression, NumberLiteral,
    RangeExpression, ReduceExpression, UnaryOperation, UnaryOperator,
};

#[derive(Debug, Clone, Default)]
pub struct ExpressionEvaluator {
    config: InterpreterConfig,
}

impl ExpressionEvaluator {
    pub fn new(config: InterpreterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Evaluate an expression to a value
    pub fn evaluate(
        &self,
        expression: &Expression,
        environment: &Environment,
    ) -> EvaluationResult<Value> {
        match &expression.kind {
            ExpressionKind::Number(literal) => self.evaluate_literal(literal).map(Value::Number),
            ExpressionKind::Identifier(identifier) => environment
                .lookup(&identifier.name)
                .cloned()
                .ok_or_else(|| EvaluationError::unknown_variable(&identifier.name, &identifier.span)),
            ExpressionKind::Unary(unary) => self.evaluate_unary(unary, environment).map(Value::Number),
            ExpressionKind::Parenthesized(inner) => self.evaluate(inner, environment),
            ExpressionKind::BinaryOp(operation) => {
                self.evaluate_binary(operation, environment).map(Value::Number)
            }
            ExpressionKind::Range(range) => {
                self.evaluate_range(range, environment).map(Value::Sequence)
            }
            ExpressionKind::Map(map) => self.evaluate_map(map, environment).map(Value::Sequence),
            ExpressionKind::Reduce(reduce) => {
                self.evaluate_reduce(reduce, environment).map(Value::Number)
            }
        }
    }

    /// Evaluate an expression that must produce a number
    pub fn evaluate_number(
        &self,
        expression: &Expression,
        environment: &Environment,
    ) -> EvaluationResult<Number> {
        match self.evaluate(expression, environment)? {
            Value::Number(number) => Ok(number),
            other => Err(EvaluationError::type_mismatch(
                "number",
                other.type_name(),
                &expression.span,
            )),
        }
    }

    /// Evaluate an expression that must produce a sequence
    pub fn evaluate_sequence(
        &self,
        expression: &Expression,
        environment: &Environment,
    ) -> EvaluationResult<Sequence> {
        match self.evaluate(expression, environment)? {
            Value::Sequence(sequence) => Ok(sequence),
            other => Err(EvaluationError::type_mismatch(
                "sequence",
                other.type_name(),
                &expression.span,
            )),
        }
    }

    fn evaluate_literal(&self, literal: &NumberLiteral) -> EvaluationResult<Number> {
        literal
            .text
            .parse()
            .map_err(|_| EvaluationError::invalid_number(&literal.text, &literal.span))
    }

    fn evaluate_unary(
        &self,
        unary: &UnaryOperation,
        environment: &Environment,
    ) -> EvaluationResult<Number> {
        let operand = self.evaluate_number(&unary.operand, environment)?;

        Ok(match unary.operator {
            UnaryOperator::Minus => -&operand,
            UnaryOperator::Plus => operand,
        })
    }

    fn evaluate_binary(
        &self,
        operation: &BinaryOperation,
        environment: &Environment,
    ) -> EvaluationResult<Number> {
        let left = self.evaluate_number(&operation.left, environment)?;
        let right = self.evaluate_number(&operation.right, environment)?;
        let context = &self.config.math_context;

        let result = match operation.operator {
            BinaryOperator::Add => Ok(&left + &right),
            BinaryOperator::Subtract => Ok(&left - &right),
            BinaryOperator::Multiply => Ok(&left * &right),
            BinaryOperator::Divide => left.div(&right, context),
            BinaryOperator::Exponent => left.pow(&right, context),
        };

        result.map_err(|error| EvaluationError::arithmetic(error, &left, &right, &operation.span))
    }

    fn evaluate_range(
        &self,
        range: &RangeExpression,
        environment: &Environment,
    ) -> EvaluationResult<Sequence> {
        let from = self.evaluate_number(&range.from, environment)?.truncate();
        let to = self.evaluate_number(&range.to, environment)?.truncate();

        Ok(Sequence::range(from, to))
    }

    fn evaluate_map(
        &self,
        map: &MapExpression,
        environment: &Environment,
    ) -> EvaluationResult<Sequence> {
        let input = self.evaluate_sequence(&map.input, environment)?;

        Ok(Sequence::map(
            input,
            map.parameter.name.clone(),
            Arc::clone(&map.body),
            environment.snapshot(),
            self.config.clone(),
        ))
    }

    /// Left fold on the calling thread, in input order.
    ///
    /// The first element seeds the accumulator; `initial` is the result
    /// only when the input is empty.
    fn evaluate_reduce(
        &self,
        reduce: &ReduceExpression,
        environment: &Environment,
    ) -> EvaluationResult<Number> {
        let input = self.evaluate_sequence(&reduce.input, environment)?;
        let initial = self.evaluate_number(&reduce.initial, environment)?;

        let mut elements = input.iter();
        let mut accumulator = match elements.next() {
            Some(first) => first?,
            None => return Ok(initial),
        };

        let scope = environment.snapshot();
        for element in elements {
            let step = Environment::derive(
                &scope,
                [
                    (reduce.accumulator.name.clone(), Value::Number(accumulator)),
                    (reduce.element.name.clone(), Value::Number(element?)),
                ],
            );
            accumulator = self.evaluate_number(&reduce.body, &step)?;
        }

        Ok(accumulator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn eval(source: &str) -> EvaluationResult<Value> {
        let expression = tally_parser::parse_expression(source).unwrap();
        ExpressionEvaluator::default().evaluate(&expression, &Environment::new())
    }

    fn eval_text(source: &str) -> String {
        match eval(source).unwrap() {
            Value::Number(number) => number.to_string(),
            Value::Sequence(sequence) => format!("{:?}", sequence.collect_numbers().unwrap()),
        }
    }

    #[test]
    fn test_literal_keeps_scale() {
        assert_eq!(eval_text("2.0"), "2.0");
    }

    #[test]
    fn test_unary_signs() {
        assert_eq!(eval_text("-3"), "-3");
        assert_eq!(eval_text("+3"), "3");
        assert_eq!(eval_text("--3"), "3");
    }

    #[test]
    fn test_parenthesized_value_passes_through() {
        assert_eq!(eval_text("(1.50)"), "1.50");
    }

    #[test]
    fn test_reduce_seeds_with_first_element() {
        assert_eq!(eval_text("reduce({-1, 2}, -4, acc i -> acc + i)"), "2");
    }

    #[test]
    fn test_reduce_of_empty_input_is_initial() {
        assert_eq!(eval_text("reduce({1, 0}, 7, a b -> a)"), "7");
    }

    #[test]
    fn test_unknown_variable() {
        let error = eval("1 + nope").unwrap_err();
        assert_eq!(error.to_string(), "Unknown variable 'nope' at 1:4");
    }

    #[test]
    fn test_unary_minus_of_sequence() {
        let error = eval("-{1, 2}").unwrap_err();
        assert_eq!(error.to_string(), "Expected number but was sequence at 1:1");
    }

    #[test]
    fn test_map_input_must_be_sequence() {
        let error = eval("map(3, x -> x)").unwrap_err();
        assert_eq!(error.to_string(), "Expected sequence but was number at 1:4");
    }

    #[test]
    fn test_division_by_zero_is_located_at_operation() {
        let error = eval("1 + 4 / 0").unwrap_err();
        assert_eq!(error.to_string(), "Division by zero at 1:4");
    }
}

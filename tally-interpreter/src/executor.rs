//! Statement executor: runs a program against one persistent environment.

use crate::config::InterpreterConfig;
use crate::environment::Environment;
use crate::error::{EvaluationError, EvaluationResult};
use crate::evaluator::ExpressionEvaluator;
use crate::sink::OutputSink;
use crate::value::Value;
use tally_parser::{Expression, Program, Statement, StatementKind};

/// Interpreter session holding the top-level variables between programs
#[derive(Debug, Default)]
pub struct Interpreter {
    environment: Environment,
    evaluator: ExpressionEvaluator,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: InterpreterConfig) -> Self {
        Self {
            environment: Environment::new(),
            evaluator: ExpressionEvaluator::new(config),
        }
    }

    pub fn config(&self) -> &InterpreterConfig {
        self.evaluator.config()
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Forget every top-level variable
    pub fn reset(&mut self) {
        self.environment.clear();
    }

    /// Run statements in order; the first failure stops the program.
    ///
    /// Variables assigned before a failure stay bound.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = program.statements.len()))]
    pub fn execute<S: OutputSink + ?Sized>(
        &mut self,
        program: &Program,
        sink: &mut S,
    ) -> EvaluationResult<()> {
        for statement in &program.statements {
            self.execute_statement(statement, sink)?;
        }
        Ok(())
    }

    pub fn execute_statement<S: OutputSink + ?Sized>(
        &mut self,
        statement: &Statement,
        sink: &mut S,
    ) -> EvaluationResult<()> {
        tracing::debug!(position = %statement.span, "executing statement");

        match &statement.kind {
            StatementKind::Assignment(assignment) => {
                let value = self.evaluator.evaluate(&assignment.value, &self.environment)?;
                self.environment.assign(assignment.target.name.as_str(), value);
            }
            StatementKind::Print(print) => {
                sink.write_text(&print.text.value)
                    .map_err(|error| EvaluationError::output(error, &statement.span))?;
            }
            StatementKind::Out(out) => {
                let value = self.evaluator.evaluate(&out.value, &self.environment)?;
                let text = render(&value)?;
                sink.write_text(&text)
                    .map_err(|error| EvaluationError::output(error, &statement.span))?;
            }
        }

        Ok(())
    }

    /// Evaluate a standalone expression in the session's environment
    pub fn evaluate(&self, expression: &Expression) -> EvaluationResult<Value> {
        self.evaluator.evaluate(expression, &self.environment)
    }
}

/// Text written by `out`: plain decimals, sequences as `[e1, e2, ...]`
pub fn render(value: &Value) -> EvaluationResult<String> {
    match value {
        Value::Number(number) => Ok(number.to_string()),
        Value::Sequence(sequence) => {
            let mut text = String::from("[");
            for (index, element) in sequence.iter().enumerate() {
                if index > 0 {
                    text.push_str(", ");
                }
                text.push_str(&element?.to_string());
            }
            text.push(']');
            Ok(text)
        }
    }
}

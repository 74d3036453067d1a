//! Lazy sequences of numbers.
//!
//! A [`Sequence`] is an immutable recipe: either an inclusive integer
//! range or a `map` over another sequence. Every call to
//! [`Sequence::iter`] replays the recipe from the start, producing
//! elements on demand, so ranges are never materialized.
//!
//! Parallel `map` pulls a bounded chunk from its input, evaluates the
//! chunk on the rayon pool and hands results back in input order.

use crate::config::InterpreterConfig;
use crate::environment::Environment;
use crate::error::EvaluationResult;
use crate::evaluator::ExpressionEvaluator;
use crate::number::Number;
use crate::value::Value;
use num_bigint::BigInt;
use rayon::prelude::*;
use std::collections::VecDeque;
use std::sync::Arc;
use tally_parser::Expression;

/// Element stream produced by one traversal of a sequence
pub type Elements = Box<dyn Iterator<Item = EvaluationResult<Number>>>;

#[derive(Debug, Clone)]
pub enum Sequence {
    /// Consecutive integers from `from` to `to`, both inclusive
    Range { from: BigInt, to: BigInt },
    /// Elements of `input` passed through a body expression
    Map(Arc<MapSource>),
}

/// A `map` body together with the scope it closes over
#[derive(Debug)]
pub struct MapSource {
    input: Sequence,
    parameter: String,
    body: Arc<Expression>,
    scope: Arc<Environment>,
    config: InterpreterConfig,
}

impl MapSource {
    /// Evaluate the body with the parameter bound to `element`
    fn apply(&self, element: Number) -> EvaluationResult<Number> {
        let scope = Environment::derive(
            &self.scope,
            [(self.parameter.clone(), Value::Number(element))],
        );
        ExpressionEvaluator::new(self.config.clone()).evaluate_number(&self.body, &scope)
    }
}

impl Sequence {
    pub fn range(from: BigInt, to: BigInt) -> Self {
        Sequence::Range { from, to }
    }

    pub fn map(
        input: Sequence,
        parameter: String,
        body: Arc<Expression>,
        scope: Arc<Environment>,
        config: InterpreterConfig,
    ) -> Self {
        Sequence::Map(Arc::new(MapSource {
            input,
            parameter,
            body,
            scope,
            config,
        }))
    }

    /// Start a fresh traversal
    pub fn iter(&self) -> Elements {
        match self {
            Sequence::Range { from, to } => Box::new(RangeElements {
                next: from.clone(),
                last: to.clone(),
            }),
            Sequence::Map(source) if source.config.parallel_map => {
                Box::new(ParallelMapElements::new(Arc::clone(source)))
            }
            Sequence::Map(source) => {
                let elements = source.input.iter();
                let source = Arc::clone(source);
                Box::new(elements.map(move |element| element.and_then(|element| source.apply(element))))
            }
        }
    }

    /// Evaluate every element, stopping at the first error
    pub fn collect_numbers(&self) -> EvaluationResult<Vec<Number>> {
        self.iter().collect()
    }
}

struct RangeElements {
    next: BigInt,
    last: BigInt,
}

impl Iterator for RangeElements {
    type Item = EvaluationResult<Number>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.last {
            return None;
        }

        let current = self.next.clone();
        self.next += 1u32;
        Some(Ok(Number::from(current)))
    }
}

struct ParallelMapElements {
    source: Arc<MapSource>,
    input: Elements,
    ready: VecDeque<EvaluationResult<Number>>,
    finished: bool,
}

impl ParallelMapElements {
    fn new(source: Arc<MapSource>) -> Self {
        let input = source.input.iter();
        Self {
            source,
            input,
            ready: VecDeque::new(),
            finished: false,
        }
    }

    fn fill(&mut self) {
        let chunk_size = self.source.config.map_chunk_size.max(1);
        let mut chunk = Vec::with_capacity(chunk_size);
        let mut input_error = None;

        while chunk.len() < chunk_size {
            match self.input.next() {
                Some(Ok(element)) => chunk.push(element),
                Some(Err(error)) => {
                    input_error = Some(error);
                    self.finished = true;
                    break;
                }
                None => {
                    self.finished = true;
                    break;
                }
            }
        }

        tracing::trace!(elements = chunk.len(), "evaluating map chunk");

        let source = &self.source;
        let results: Vec<EvaluationResult<Number>> = chunk
            .into_par_iter()
            .map(|element| source.apply(element))
            .collect();

        if results.iter().any(Result::is_err) {
            self.finished = true;
        }

        self.ready.extend(results);
        self.ready.extend(input_error.map(Err));
    }
}

impl Iterator for ParallelMapElements {
    type Item = EvaluationResult<Number>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.ready.is_empty() && !self.finished {
            self.fill();
        }
        self.ready.pop_front()
    }
}

//! Interpreter configuration: numeric policy and `map` parallelism.

use crate::number::{default_math_context, math_context};
use bigdecimal::Context;

/// Number of input elements evaluated together by a parallel `map`
pub const DEFAULT_MAP_CHUNK_SIZE: usize = 1024;

#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// Precision and rounding for division and exponentiation
    pub math_context: Context,
    /// Evaluate `map` bodies on the rayon pool
    pub parallel_map: bool,
    /// Elements pulled from the input per parallel batch
    pub map_chunk_size: usize,
}

impl InterpreterConfig {
    pub fn with_precision(mut self, precision: u64) -> Self {
        self.math_context = math_context(precision, self.math_context.rounding_mode());
        self
    }

    pub fn with_parallel_map(mut self, parallel_map: bool) -> Self {
        self.parallel_map = parallel_map;
        self
    }

    pub fn with_map_chunk_size(mut self, map_chunk_size: usize) -> Self {
        self.map_chunk_size = map_chunk_size.max(1);
        self
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            math_context: default_math_context(),
            parallel_map: true,
            map_chunk_size: DEFAULT_MAP_CHUNK_SIZE,
        }
    }
}

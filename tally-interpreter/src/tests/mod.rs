//! Tests for the parser → interpreter pipeline

pub mod test_parallel_map;

//! Runtime value representation for the Tally interpreter.

use crate::number::Number;
use crate::sequence::Sequence;

/// Runtime values: a decimal number or a lazy sequence of numbers
#[derive(Debug, Clone)]
pub enum Value {
    Number(Number),
    Sequence(Sequence),
}

impl Value {
    /// Kind name used in type mismatch messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Sequence(_) => "sequence",
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(number) => Some(number),
            Value::Sequence(_) => None,
        }
    }
}

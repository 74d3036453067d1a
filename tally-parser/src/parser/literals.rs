// Literal parsing functions for the Tally parser
// Numbers, identifiers and quoted strings

use pest::iterators::Pair;

use super::{Rule, TallyParser};
use crate::ast::*;

impl TallyParser {
    /// Parse a number literal, keeping its exact source text
    pub(super) fn parse_number(pair: Pair<Rule>) -> NumberLiteral {
        NumberLiteral {
            text: pair.as_str().to_string(),
            span: Self::span_from_pair(&pair),
        }
    }

    pub(super) fn parse_identifier(pair: Pair<Rule>) -> Identifier {
        Identifier {
            name: pair.as_str().to_string(),
            span: Self::span_from_pair(&pair),
        }
    }

    /// Parse a quoted string; the content is taken verbatim, no escapes
    pub(super) fn parse_string(pair: Pair<Rule>) -> StringLiteral {
        let span = Self::span_from_pair(&pair);
        let value = pair
            .into_inner()
            .find(|inner| inner.as_rule() == Rule::string_content)
            .map(|content| content.as_str().to_string())
            .unwrap_or_default();

        StringLiteral { value, span }
    }
}

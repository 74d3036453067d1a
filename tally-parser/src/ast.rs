// Tally AST Definitions
// Statement and expression nodes, each carrying its source position

use std::fmt;
use std::sync::Arc;

/// Source position information for AST nodes.
///
/// `start`/`end` are byte offsets into the source. `line` is 1-based and
/// `column` is 0-based, both describing `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Span covering `self` through `other`, positioned at `self`.
    pub fn to(&self, other: &Span) -> Self {
        Self {
            start: self.start,
            end: other.end.max(self.end),
            line: self.line,
            column: self.column,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A whole source file: statements in execution order
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// `var name = expression`
    Assignment(Assignment),
    /// `print "text"`
    Print(PrintStatement),
    /// `out expression`
    Out(OutStatement),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: Identifier,
    pub value: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintStatement {
    pub text: StringLiteral,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutStatement {
    pub value: Expression,
    pub span: Span,
}

/// String literal with the surrounding quotes already removed
#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    Number(NumberLiteral),
    Identifier(Identifier),
    Unary(UnaryOperation),
    Parenthesized(Box<Expression>),
    BinaryOp(BinaryOperation),
    Range(RangeExpression),
    Map(MapExpression),
    Reduce(ReduceExpression),
}

impl ExpressionKind {
    /// Short tag naming the syntactic form, used by tooling output.
    pub fn tag(&self) -> &'static str {
        match self {
            ExpressionKind::Number(_) => "number",
            ExpressionKind::Identifier(_) => "identifier",
            ExpressionKind::Unary(_) => "unary",
            ExpressionKind::Parenthesized(_) => "parenthesized",
            ExpressionKind::BinaryOp(_) => "binary",
            ExpressionKind::Range(_) => "range",
            ExpressionKind::Map(_) => "map",
            ExpressionKind::Reduce(_) => "reduce",
        }
    }
}

/// Decimal literal kept as source text so no precision is lost before evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOperation {
    pub operator: UnaryOperator,
    pub operand: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Minus,
    Plus,
}

impl UnaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOperator::Minus => "-",
            UnaryOperator::Plus => "+",
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOperation {
    pub left: Box<Expression>,
    pub operator: BinaryOperator,
    pub right: Box<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Exponent,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Exponent => "^",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// `{from, to}`: inclusive integer range
#[derive(Debug, Clone, PartialEq)]
pub struct RangeExpression {
    pub from: Box<Expression>,
    pub to: Box<Expression>,
    pub span: Span,
}

/// `map(input, parameter -> body)`
///
/// The body is shared so lazily evaluated sequences can hold on to it
/// after the surrounding statement has finished.
#[derive(Debug, Clone, PartialEq)]
pub struct MapExpression {
    pub input: Box<Expression>,
    pub parameter: Identifier,
    pub body: Arc<Expression>,
    pub span: Span,
}

/// `reduce(input, initial, accumulator element -> body)`
#[derive(Debug, Clone, PartialEq)]
pub struct ReduceExpression {
    pub input: Box<Expression>,
    pub initial: Box<Expression>,
    pub accumulator: Identifier,
    pub element: Identifier,
    pub body: Arc<Expression>,
    pub span: Span,
}

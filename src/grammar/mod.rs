//! Rule-expression grammar: source text → syntax tree.

pub mod error;
pub mod parser;
pub mod tree;

pub use error::{line_info, ErrorKind, LineInfo, MalformedExpression};
pub use parser::Parser;
pub use tree::{Expression, Node, NodeKind, Span, TurnAngle};

use std::collections::BTreeSet;

/// Parse a rule expression with a fresh parser.
pub fn parse(source: &str) -> Result<Expression, MalformedExpression> {
    Parser::new().parse(source, None)
}

/// Parse a rule expression that may only reference `known_terms`.
pub fn parse_with_known(
    source: &str,
    known_terms: &BTreeSet<String>,
) -> Result<Expression, MalformedExpression> {
    Parser::new().parse(source, Some(known_terms))
}

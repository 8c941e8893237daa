//! Recursive-descent parser for rule expressions.
//!
//! A single left-to-right pass over the source characters. Tokens are folded
//! into a left-associative `Concat` chain as they are read.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::error::MalformedExpression;
use super::tree::{Expression, Node, NodeKind, Span, TurnAngle};

/// Characters accepted as the sign of a counter-clockwise turn.
pub const MINUS_LIKE: [char; 6] = [
    '-',        // hyphen-minus
    '\u{2012}', // figure dash
    '\u{2013}', // en dash
    '\u{2014}', // em dash
    '\u{2212}', // minus sign
    '\u{FF0D}', // fullwidth hyphen-minus
];

pub fn is_minus_like(ch: char) -> bool {
    MINUS_LIKE.contains(&ch)
}

/// Reusable expression parser.
///
/// Scratch state is reset on every call to [`Parser::parse`]; taking
/// `&mut self` keeps one instance from serving two parses at once.
#[derive(Debug)]
pub struct Parser {
    chars: Vec<char>,
    source: Arc<str>,
    pos: usize,
    terms: BTreeSet<String>,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            chars: Vec::new(),
            source: Arc::from(""),
            pos: 0,
            terms: BTreeSet::new(),
        }
    }

    /// Parse `source` into an expression.
    ///
    /// When `known_terms` is given, any symbol outside it is rejected with
    /// "Unknown term".
    pub fn parse(
        &mut self,
        source: &str,
        known_terms: Option<&BTreeSet<String>>,
    ) -> Result<Expression, MalformedExpression> {
        self.reset(source);

        let mut tree = Node::end(self.source.clone());

        loop {
            self.skip_whitespace();
            if self.is_at_end() {
                break;
            }

            let token = self.parse_node(known_terms)?;

            // the first token replaces the initial End outright
            tree = Node::concat(tree, token);
        }

        Ok(Expression {
            tree,
            terms: self.terms.clone(),
        })
    }

    fn reset(&mut self, source: &str) {
        self.chars = source.chars().collect();
        self.source = Arc::from(source);
        self.pos = 0;
        self.terms.clear();
    }

    fn parse_node(
        &mut self,
        known_terms: Option<&BTreeSet<String>>,
    ) -> Result<Node, MalformedExpression> {
        match self.peek() {
            '+' => self.parse_turn(),
            '[' => self.parse_state(NodeKind::Save, '[', "\"[\""),
            ']' => self.parse_state(NodeKind::Restore, ']', "\"]\""),
            ch if is_minus_like(ch) => self.parse_turn(),
            ch if is_term_start(ch) => self.parse_term(known_terms),
            _ => Err(MalformedExpression::illegal_character(
                self.source.clone(),
                self.pos,
            )),
        }
    }

    fn parse_term(
        &mut self,
        known_terms: Option<&BTreeSet<String>>,
    ) -> Result<Node, MalformedExpression> {
        let begin = self.pos;

        if self.is_at_end() || !is_term_start(self.peek()) {
            return Err(self.expected("english letter or \"_\""));
        }

        let mut name = String::new();
        while !self.is_at_end() && is_term_char(self.peek()) {
            name.push(self.advance());
        }

        if let Some(known) = known_terms {
            if !known.contains(&name) {
                return Err(MalformedExpression::unknown_term(self.source.clone(), begin));
            }
        }

        let node = Node::new(
            NodeKind::Term(Arc::from(name.as_str())),
            Span::new(begin, self.pos - begin),
            self.source.clone(),
        );
        self.terms.insert(name);
        Ok(node)
    }

    fn parse_turn(&mut self) -> Result<Node, MalformedExpression> {
        let begin = self.pos;

        let counter_clockwise = match self.peek_opt() {
            Some('+') => false,
            Some(ch) if is_minus_like(ch) => true,
            _ => return Err(self.expected("\"+\" or \"-\"")),
        };
        self.advance();
        self.skip_whitespace();

        let angle = match self.parse_angle() {
            Some(deg) if counter_clockwise => TurnAngle::Degrees(-deg),
            Some(deg) => TurnAngle::Degrees(deg),
            None if counter_clockwise => TurnAngle::DefaultNegative,
            None => TurnAngle::DefaultPositive,
        };

        Ok(Node::new(
            NodeKind::Turn(angle),
            Span::new(begin, self.pos - begin),
            self.source.clone(),
        ))
    }

    /// Consume a decimal literal of the form `\d*\.\d+` or `\d+`, if present.
    fn parse_angle(&mut self) -> Option<f64> {
        let start = self.pos;
        let mut end = start;

        while end < self.chars.len() && self.chars[end].is_ascii_digit() {
            end += 1;
        }

        let has_fraction = self.chars.get(end) == Some(&'.')
            && self.chars.get(end + 1).is_some_and(|c| c.is_ascii_digit());
        if has_fraction {
            end += 1;
            while end < self.chars.len() && self.chars[end].is_ascii_digit() {
                end += 1;
            }
        }

        if end == start {
            return None;
        }

        let literal: String = self.chars[start..end].iter().collect();
        let value = literal.parse::<f64>().ok()?;
        self.pos = end;
        Some(value)
    }

    fn parse_state(
        &mut self,
        kind: NodeKind,
        expected_char: char,
        expected_text: &'static str,
    ) -> Result<Node, MalformedExpression> {
        let begin = self.pos;
        if self.peek_opt() != Some(expected_char) {
            return Err(self.expected(expected_text));
        }
        self.advance();
        Ok(Node::new(kind, Span::new(begin, 1), self.source.clone()))
    }

    fn expected(&self, what: &'static str) -> MalformedExpression {
        MalformedExpression::expected(what, self.source.clone(), self.pos)
    }

    fn peek(&self) -> char {
        self.chars[self.pos]
    }

    fn peek_opt(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.pos];
        self.pos += 1;
        ch
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.peek().is_whitespace() {
            self.advance();
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

fn is_term_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_term_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::error::ErrorKind;

    fn parse(source: &str) -> Expression {
        Parser::new().parse(source, None).unwrap()
    }

    fn known(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_empty_and_whitespace() {
        for src in ["", "   ", "\t\n  \n"] {
            let expr = parse(src);
            assert!(expr.tree.is_end(), "{src:?} should parse to End");
            assert!(expr.terms.is_empty());
            assert_eq!(expr.tree.span.pos, src.chars().count());
        }
    }

    #[test]
    fn parse_single_term_is_not_wrapped() {
        let expr = parse("F");
        assert_eq!(expr.tree.kind, NodeKind::Term(Arc::from("F")));
        assert_eq!(expr.tree.span, Span::new(0, 1));
        assert_eq!(expr.terms, known(&["F"]));
    }

    #[test]
    fn parse_long_identifier() {
        let expr = parse("  _branch2x ");
        assert_eq!(expr.tree.kind, NodeKind::Term(Arc::from("_branch2x")));
        assert_eq!(expr.tree.span, Span::new(2, 9));
    }

    #[test]
    fn parse_positive_numeric_turn() {
        let expr = parse("+90 F");
        match &expr.tree.kind {
            NodeKind::Concat(left, right) => {
                assert_eq!(left.kind, NodeKind::Turn(TurnAngle::Degrees(90.0)));
                assert_eq!(right.kind, NodeKind::Term(Arc::from("F")));
            }
            other => panic!("expected Concat, got {other:?}"),
        }
    }

    #[test]
    fn parse_negative_numeric_turn() {
        let expr = parse("-90 F");
        match &expr.tree.kind {
            NodeKind::Concat(left, _) => {
                assert_eq!(left.kind, NodeKind::Turn(TurnAngle::Degrees(-90.0)));
            }
            other => panic!("expected Concat, got {other:?}"),
        }
    }

    #[test]
    fn parse_default_turns() {
        let expr = parse("+F");
        match &expr.tree.kind {
            NodeKind::Concat(left, right) => {
                assert_eq!(left.kind, NodeKind::Turn(TurnAngle::DefaultPositive));
                assert_eq!(right.kind, NodeKind::Term(Arc::from("F")));
            }
            other => panic!("expected Concat, got {other:?}"),
        }
        assert_eq!(parse("-").tree.kind, NodeKind::Turn(TurnAngle::DefaultNegative));
    }

    #[test]
    fn parse_minus_like_characters() {
        for ch in MINUS_LIKE {
            let src = format!("{ch}45");
            let expr = parse(&src);
            assert_eq!(
                expr.tree.kind,
                NodeKind::Turn(TurnAngle::Degrees(-45.0)),
                "{ch:?} should be a negative turn"
            );
        }
    }

    #[test]
    fn parse_turn_with_whitespace_before_number() {
        let expr = parse("+  22.5");
        assert_eq!(expr.tree.kind, NodeKind::Turn(TurnAngle::Degrees(22.5)));
        assert_eq!(expr.tree.span, Span::new(0, 7));
    }

    #[test]
    fn parse_fraction_without_integer_part() {
        let expr = parse("-.5");
        assert_eq!(expr.tree.kind, NodeKind::Turn(TurnAngle::Degrees(-0.5)));
    }

    #[test]
    fn trailing_dot_is_not_part_of_number() {
        let err = Parser::new().parse("+1.", None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::IllegalCharacter);
        assert_eq!(err.offset(), 2);
    }

    #[test]
    fn parse_concat_is_left_associative() {
        let expr = parse("A B C");
        match &expr.tree.kind {
            NodeKind::Concat(left, right) => {
                assert!(matches!(left.kind, NodeKind::Concat(..)));
                assert_eq!(right.kind, NodeKind::Term(Arc::from("C")));
            }
            other => panic!("expected Concat, got {other:?}"),
        }
        assert_eq!(expr.tree.span, Span::new(0, 3));
    }

    #[test]
    fn parse_save_restore() {
        let expr = parse("[F]");
        assert_eq!(expr.tree.to_string(), "[ F ]");
        assert_eq!(expr.tree.span, Span::new(0, 3));
        assert_eq!(expr.tree.instruction_count(), 3);
    }

    #[test]
    fn unbalanced_brackets_are_accepted() {
        assert_eq!(parse("] ] [").tree.instruction_count(), 3);
    }

    #[test]
    fn spans_stay_inside_source() {
        for src in ["F", "+90 F", "F[+F]F[-F]F", " X + Y F + ", "-\u{2212}.25 _a"] {
            let expr = parse(src);
            let len = src.chars().count();
            assert!(expr.tree.span.end() <= len, "span overflow for {src:?}");
            for leaf in expr.tree.leaves() {
                assert!(leaf.span.end() <= len);
            }
        }
    }

    #[test]
    fn length_matches_consumed_characters() {
        let src = "F[+F]F[-F]F";
        let expr = parse(src);
        assert_eq!(expr.tree.span, Span::new(0, src.len()));
        assert_eq!(expr.tree.source_text(), src);
    }

    #[test]
    fn terms_are_collected() {
        let expr = parse("X + Y F + X");
        assert_eq!(expr.terms, known(&["F", "X", "Y"]));
    }

    #[test]
    fn unknown_term_is_rejected() {
        let allowed = known(&["F"]);
        let err = Parser::new().parse("F X", Some(&allowed)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownTerm);
        assert_eq!(err.reason(), "Unknown term");
        assert_eq!(err.offset(), 2);
    }

    #[test]
    fn known_terms_accept_declared_symbols() {
        let allowed = known(&["F", "X"]);
        let expr = Parser::new().parse("F X", Some(&allowed)).unwrap();
        assert_eq!(expr.terms, allowed);
    }

    #[test]
    fn illegal_character_is_rejected() {
        let err = Parser::new().parse("F * F", None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::IllegalCharacter);
        assert_eq!(err.reason(), "Illegal character");
        assert_eq!(err.offset(), 2);
        assert_eq!(err.column(), 3);
    }

    #[test]
    fn illegal_character_on_later_line() {
        let err = Parser::new().parse("F F\n  F # F", None).unwrap_err();
        assert_eq!(err.line(), 2);
        assert_eq!(err.column(), 5);
        assert_eq!(err.line_text(), "  F # F");
    }

    #[test]
    fn non_ascii_letters_are_illegal() {
        let err = Parser::new().parse("F é", None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::IllegalCharacter);
        assert_eq!(err.offset(), 2);
    }

    #[test]
    fn parser_state_resets_between_calls() {
        let mut parser = Parser::new();
        parser.parse("A B C", None).unwrap();
        let expr = parser.parse("F", None).unwrap();
        assert_eq!(expr.terms, known(&["F"]));
        assert_eq!(expr.source(), "F");

        assert!(parser.parse("F * F", None).is_err());
        let expr = parser.parse("G", None).unwrap();
        assert_eq!(expr.terms, known(&["G"]));
    }
}

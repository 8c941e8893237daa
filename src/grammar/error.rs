//! Error types for the grammar parser.

use std::fmt;
use std::sync::Arc;

/// A rule expression that could not be parsed.
///
/// Carries the whole source text and the character offset of the offending
/// position, so a caller can point at the exact column.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedExpression {
    pub kind: ErrorKind,
    source: Arc<str>,
    offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    IllegalCharacter,
    UnknownTerm,
    Expected(&'static str),
}

impl ErrorKind {
    /// Short machine-readable reason.
    pub fn reason(&self) -> String {
        match self {
            ErrorKind::IllegalCharacter => "Illegal character".to_string(),
            ErrorKind::UnknownTerm => "Unknown term".to_string(),
            ErrorKind::Expected(what) => format!("Expected {what}"),
        }
    }
}

impl MalformedExpression {
    fn new(kind: ErrorKind, source: Arc<str>, offset: usize) -> Self {
        debug_assert!(
            offset <= source.chars().count(),
            "error offset {offset} is past the end of the source"
        );
        Self {
            kind,
            source,
            offset,
        }
    }

    pub fn illegal_character(source: Arc<str>, offset: usize) -> Self {
        Self::new(ErrorKind::IllegalCharacter, source, offset)
    }

    pub fn unknown_term(source: Arc<str>, offset: usize) -> Self {
        Self::new(ErrorKind::UnknownTerm, source, offset)
    }

    pub fn expected(what: &'static str, source: Arc<str>, offset: usize) -> Self {
        Self::new(ErrorKind::Expected(what), source, offset)
    }

    pub fn reason(&self) -> String {
        self.kind.reason()
    }

    pub fn source_text(&self) -> &str {
        &self.source
    }

    /// Character offset into the source.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// 1-based line number of the offending position.
    pub fn line(&self) -> usize {
        1 + self
            .source
            .chars()
            .take(self.offset)
            .filter(|&c| c == '\n')
            .count()
    }

    /// 1-based column of the offending position.
    pub fn column(&self) -> usize {
        line_info(&self.source, self.offset).index + 1
    }

    /// Text of the line containing the offending position.
    pub fn line_text(&self) -> String {
        line_info(&self.source, self.offset).text
    }
}

impl fmt::Display for MalformedExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREFIX: &str = "Error in line: ";

        let info = line_info(&self.source, self.offset);
        // +1 for the opening quote around the line text
        let pad = " ".repeat(PREFIX.len() + info.index + 1);

        writeln!(f, "{PREFIX}\"{}\"", info.text)?;
        writeln!(f, "{pad}^")?;
        write!(f, "{pad}{}", self.reason())
    }
}

impl std::error::Error for MalformedExpression {}

/// The line of `source` that contains character offset `at`.
#[derive(Debug, Clone, PartialEq)]
pub struct LineInfo {
    pub text: String,
    /// Offset of `at` within the line.
    pub index: usize,
    /// Character offset of the first character of the line.
    pub begin: usize,
    /// Character offset one past the last character of the line.
    pub end: usize,
}

/// Locate the line containing `at`.
///
/// An offset sitting on a newline belongs to the line that newline terminates.
pub fn line_info(source: &str, at: usize) -> LineInfo {
    let chars: Vec<char> = source.chars().collect();
    let at = at.min(chars.len());

    let begin = chars[..at]
        .iter()
        .rposition(|&c| c == '\n')
        .map_or(0, |i| i + 1);
    let end = chars[begin..]
        .iter()
        .position(|&c| c == '\n')
        .map_or(chars.len(), |i| begin + i);

    LineInfo {
        text: chars[begin..end].iter().collect(),
        index: at - begin,
        begin,
        end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_info_single_line() {
        let info = line_info("F + F", 2);
        assert_eq!(info.text, "F + F");
        assert_eq!(info.index, 2);
        assert_eq!(info.begin, 0);
        assert_eq!(info.end, 5);
    }

    #[test]
    fn line_info_second_line() {
        let info = line_info("F F\nX * Y\nZ", 6);
        assert_eq!(info.text, "X * Y");
        assert_eq!(info.index, 2);
        assert_eq!(info.begin, 4);
        assert_eq!(info.end, 9);
    }

    #[test]
    fn line_info_on_newline_belongs_to_previous_line() {
        let info = line_info("AB\nCD", 2);
        assert_eq!(info.text, "AB");
        assert_eq!(info.index, 2);
    }

    #[test]
    fn line_info_past_end_is_clamped() {
        let info = line_info("F", 10);
        assert_eq!(info.text, "F");
        assert_eq!(info.index, 1);
    }

    #[test]
    fn line_and_column_are_one_based() {
        let err = MalformedExpression::illegal_character(Arc::from("F\nF * F"), 4);
        assert_eq!(err.line(), 2);
        assert_eq!(err.column(), 3);
        assert_eq!(err.line_text(), "F * F");
    }

    #[test]
    fn display_renders_three_line_diagnostic() {
        let err = MalformedExpression::illegal_character(Arc::from("F * F"), 2);
        let rendered = err.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Error in line: \"F * F\"");
        let caret = lines[1].find('^').unwrap();
        // caret sits under the '*' in the quoted line
        assert_eq!(lines[0].chars().nth(caret), Some('*'));
        assert_eq!(lines[2].trim_start(), "Illegal character");
        assert_eq!(lines[2].find('I'), Some(caret));
    }

    #[test]
    fn expected_reason_text() {
        let err = MalformedExpression::expected("\"[\"", Arc::from("]"), 0);
        assert_eq!(err.reason(), "Expected \"[\"");
        assert_eq!(err.kind, ErrorKind::Expected("\"[\""));
    }
}

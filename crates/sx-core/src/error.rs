use thiserror::Error;

/// Malformed s-expression source. Positions are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected end of input at line {line}, column {column}: expected `{expected}`")]
    UnexpectedEof {
        expected: char,
        line: usize,
        column: usize,
    },

    #[error("unterminated string starting at line {line}, column {column}: missing closing `{quote}`")]
    UnterminatedString {
        quote: char,
        line: usize,
        column: usize,
    },

    #[error("expected `(` at line {line}, column {column}")]
    ExpectedList { line: usize, column: usize },

    #[error("nesting deeper than {limit} levels at line {line}, column {column}")]
    TooDeep {
        limit: usize,
        line: usize,
        column: usize,
    },
}

impl ParseError {
    /// `(line, column)` of the error, both 1-based.
    pub fn position(&self) -> (usize, usize) {
        match *self {
            ParseError::UnexpectedEof { line, column, .. }
            | ParseError::UnterminatedString { line, column, .. }
            | ParseError::ExpectedList { line, column }
            | ParseError::TooDeep { line, column, .. } => (line, column),
        }
    }
}

/// Map a byte offset in `source` to a 1-based `(line, column)`.
/// Columns count characters, not bytes.
pub(crate) fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

//! Parser for s-expression source text → `SExpr`.
//!
//! Built on `winnow` 0.7 token parsers. Grammar:
//!
//! - a list is `(`, zero or more lists/atoms/strings separated by
//!   whitespace, then `)`;
//! - an atom is a maximal run of characters other than whitespace, `(`,
//!   `)`, `'` and `"`; atoms matching `-?\d+(\.\d+)?` become numbers;
//! - a string is delimited by matching `"` or `'` with no escapes.
//!
//! The document is a single top-level list. Anything after it is ignored.

use crate::config::ParseConfig;
use crate::error::{ParseError, line_col};
use crate::id::Symbol;
use crate::model::{Atom, SExpr};
use winnow::ascii::digit1;
use winnow::combinator::opt;
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

/// Parse s-expression source with the default `ParseConfig`.
#[must_use = "parsing result should be used"]
pub fn parse_sexpr(input: &str) -> Result<SExpr, ParseError> {
    parse_sexpr_with(input, &ParseConfig::default())
}

/// Parse s-expression source into its top-level list.
#[must_use = "parsing result should be used"]
pub fn parse_sexpr_with(input: &str, config: &ParseConfig) -> Result<SExpr, ParseError> {
    let mut parser = Cursor {
        source: input,
        rest: input,
        max_depth: config.max_depth,
    };

    skip_space(&mut parser.rest);

    let expr = match parser.rest.chars().next() {
        None => return Err(parser.eof('(')),
        Some('(') => parser.parse_list(0)?,
        Some(quote @ ('"' | '\'')) => {
            // A lone string is still not a document, but an unterminated
            // one is the more useful thing to report.
            let start = parser.offset();
            parser.parse_string(quote)?;
            return Err(parser.expected_list(start));
        }
        Some(_) => return Err(parser.expected_list(parser.offset())),
    };

    skip_space(&mut parser.rest);
    if !parser.rest.is_empty() {
        log::debug!(
            "ignoring {} trailing bytes after top-level list",
            parser.rest.len()
        );
    }
    log::debug!(
        "parsed {} lists, depth {}",
        expr.list_count(),
        expr.depth()
    );

    Ok(expr)
}

// ─── Recursive descent ──────────────────────────────────────────────────

struct Cursor<'s> {
    source: &'s str,
    rest: &'s str,
    max_depth: usize,
}

impl<'s> Cursor<'s> {
    fn offset(&self) -> usize {
        self.source.len() - self.rest.len()
    }

    /// Parse a list; `rest` must start with `(`. `depth` counts the lists
    /// already open around this one.
    fn parse_list(&mut self, depth: usize) -> Result<SExpr, ParseError> {
        if depth >= self.max_depth {
            let (line, column) = line_col(self.source, self.offset());
            return Err(ParseError::TooDeep {
                limit: self.max_depth,
                line,
                column,
            });
        }
        self.rest = &self.rest[1..];

        let mut items = Vec::new();
        loop {
            skip_space(&mut self.rest);
            match self.rest.chars().next() {
                None => return Err(self.eof(')')),
                Some(')') => {
                    self.rest = &self.rest[1..];
                    return Ok(SExpr::List(items));
                }
                Some('(') => items.push(self.parse_list(depth + 1)?),
                Some(quote @ ('"' | '\'')) => {
                    let text = self.parse_string(quote)?;
                    items.push(SExpr::Atom(Atom::Str(text.to_string())));
                }
                Some(_) => items.push(SExpr::Atom(self.parse_atom()?)),
            }
        }
    }

    /// Parse a quoted string; `rest` must start with `quote`.
    fn parse_string(&mut self, quote: char) -> Result<&'s str, ParseError> {
        let start = self.offset();
        let unterminated = || {
            let (line, column) = line_col(self.source, start);
            ParseError::UnterminatedString {
                quote,
                line,
                column,
            }
        };

        let mut rest = &self.rest[quote.len_utf8()..];
        let Ok(body) = take_till::<_, _, ContextError>(0.., quote).parse_next(&mut rest) else {
            return Err(unterminated());
        };
        let Some(after) = rest.strip_prefix(quote) else {
            return Err(unterminated());
        };
        self.rest = after;
        Ok(body)
    }

    fn parse_atom(&mut self) -> Result<Atom, ParseError> {
        let start = self.offset();
        let text = match atom_text.parse_next(&mut self.rest) {
            Ok(text) => text,
            Err(_) => return Err(self.expected_list(start)),
        };
        if is_number(text) {
            if let Ok(n) = text.parse::<f64>() {
                return Ok(Atom::Number(n));
            }
        }
        Ok(Atom::Symbol(Symbol::intern(text)))
    }

    fn eof(&self, expected: char) -> ParseError {
        let (line, column) = line_col(self.source, self.source.len());
        ParseError::UnexpectedEof {
            expected,
            line,
            column,
        }
    }

    fn expected_list(&self, offset: usize) -> ParseError {
        let (line, column) = line_col(self.source, offset);
        ParseError::ExpectedList { line, column }
    }
}

// ─── Low-level parsers ──────────────────────────────────────────────────

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_atom_char(c: char) -> bool {
    !is_space(c) && !matches!(c, '(' | ')' | '\'' | '"')
}

fn skip_space(input: &mut &str) {
    let _: Result<&str, ErrMode<ContextError>> = take_while(0.., is_space).parse_next(input);
}

fn atom_text<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., is_atom_char).parse_next(input)
}

fn number_literal<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    (opt('-'), digit1, opt(('.', digit1)))
        .take()
        .parse_next(input)
}

/// Whether the whole atom is a signed integer or decimal literal.
fn is_number(text: &str) -> bool {
    let mut rest = text;
    number_literal.parse_next(&mut rest).is_ok() && rest.is_empty()
}

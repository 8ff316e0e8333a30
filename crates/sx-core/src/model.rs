//! Parsed s-expression data model.
//!
//! A parse produces one `SExpr` tree. It is immutable once built and is
//! consumed by `TreeNode::build` to produce the visual layout tree.

use crate::id::Symbol;
use serde::{Serialize, Serializer};
use std::fmt;

// ─── Atoms ───────────────────────────────────────────────────────────────

/// An indivisible token of an s-expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    /// Bare word that is not a number literal, e.g. `identifier` or `name:`.
    Symbol(Symbol),
    /// Signed integer or decimal literal (`-12`, `3.25`).
    Number(f64),
    /// Quoted string contents, without the quotes. No escape processing.
    Str(String),
}

impl fmt::Display for Atom {
    /// Label text as drawn inside a node box.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Symbol(sym) => f.write_str(sym.as_str()),
            // `-0` reads as `0`, like the number it was parsed from.
            Atom::Number(n) if *n == 0.0 => f.write_str("0"),
            Atom::Number(n) => write!(f, "{n}"),
            Atom::Str(s) => f.write_str(s),
        }
    }
}

impl Serialize for Atom {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Atom::Symbol(sym) => sym.serialize(serializer),
            Atom::Number(n) => serializer.serialize_f64(*n),
            Atom::Str(s) => serializer.serialize_str(s),
        }
    }
}

// ─── Expressions ─────────────────────────────────────────────────────────

/// A parsed s-expression: an atom, or an ordered list of expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum SExpr {
    Atom(Atom),
    List(Vec<SExpr>),
}

impl SExpr {
    pub fn symbol(s: &str) -> Self {
        SExpr::Atom(Atom::Symbol(Symbol::intern(s)))
    }

    pub fn number(n: f64) -> Self {
        SExpr::Atom(Atom::Number(n))
    }

    pub fn string(s: impl Into<String>) -> Self {
        SExpr::Atom(Atom::Str(s.into()))
    }

    /// The list items, or `None` for an atom.
    pub fn as_list(&self) -> Option<&[SExpr]> {
        match self {
            SExpr::List(items) => Some(items),
            SExpr::Atom(_) => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, SExpr::List(_))
    }

    /// Number of lists in this expression, including itself.
    pub fn list_count(&self) -> usize {
        match self {
            SExpr::Atom(_) => 0,
            SExpr::List(items) => 1 + items.iter().map(SExpr::list_count).sum::<usize>(),
        }
    }

    /// Maximum list nesting depth. An atom has depth 0, `()` has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            SExpr::Atom(_) => 0,
            SExpr::List(items) => 1 + items.iter().map(SExpr::depth).max().unwrap_or(0),
        }
    }
}

impl fmt::Display for SExpr {
    /// Canonical text: single spaces, strings re-quoted with `"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SExpr::Atom(Atom::Str(s)) if s.contains('"') => write!(f, "'{s}'"),
            SExpr::Atom(Atom::Str(s)) => write!(f, "\"{s}\""),
            SExpr::Atom(atom) => write!(f, "{atom}"),
            SExpr::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl Serialize for SExpr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SExpr::Atom(atom) => atom.serialize(serializer),
            SExpr::List(items) => items.serialize(serializer),
        }
    }
}

//! Source → tree sync.
//!
//! Holds the last source text the viewer saw and the outcome of parsing
//! it. Feeding the same text again is a no-op, so hosts can forward every
//! editor change event without re-laying-out an unchanged tree.

use sx_core::{ParseConfig, ParseError, SExpr, parse_sexpr_with};

/// What `SourceSync::update` found.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// Text is identical to the last update.
    Unchanged,
    /// Text parsed; the caller should rebuild the tree from it.
    Parsed(SExpr),
    /// Text failed to parse; the caller should keep the current tree.
    Failed(ParseError),
}

#[derive(Debug, Default)]
pub struct SourceSync {
    text: Option<String>,
    last_error: Option<ParseError>,
}

impl SourceSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last text passed to `update`, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Error from the most recent parse, cleared by the next success.
    pub fn last_error(&self) -> Option<&ParseError> {
        self.last_error.as_ref()
    }

    pub fn update(&mut self, text: &str, config: &ParseConfig) -> SyncOutcome {
        if self.text.as_deref() == Some(text) {
            return SyncOutcome::Unchanged;
        }
        self.text = Some(text.to_string());

        match parse_sexpr_with(text, config) {
            Ok(expr) => {
                self.last_error = None;
                SyncOutcome::Parsed(expr)
            }
            Err(err) => {
                log::debug!("parse failed: {err}");
                self.last_error = Some(err.clone());
                SyncOutcome::Failed(err)
            }
        }
    }

    /// Forget the last text so the next `update` always re-parses.
    pub fn invalidate(&mut self) {
        self.text = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn same_text_is_unchanged() {
        let mut sync = SourceSync::new();
        let config = ParseConfig::default();
        assert!(matches!(sync.update("(a)", &config), SyncOutcome::Parsed(_)));
        assert_eq!(sync.update("(a)", &config), SyncOutcome::Unchanged);
    }

    #[test]
    fn error_is_kept_until_next_success() {
        let mut sync = SourceSync::new();
        let config = ParseConfig::default();
        assert!(matches!(sync.update("(", &config), SyncOutcome::Failed(_)));
        assert!(sync.last_error().is_some());
        assert_eq!(sync.update("(", &config), SyncOutcome::Unchanged);
        assert!(sync.last_error().is_some());

        assert!(matches!(sync.update("()", &config), SyncOutcome::Parsed(_)));
        assert_eq!(sync.last_error(), None);
        assert_eq!(sync.text(), Some("()"));
    }

    #[test]
    fn invalidate_forces_reparse() {
        let mut sync = SourceSync::new();
        let config = ParseConfig::default();
        sync.update("(a)", &config);
        sync.invalidate();
        assert!(matches!(sync.update("(a)", &config), SyncOutcome::Parsed(_)));
    }
}

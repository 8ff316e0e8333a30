//! Keyboard shortcut mapping.
//!
//! Maps `KeyboardEvent.key` values to semantic `ShortcutAction`s. The map
//! lives in Rust so every host binds the same keys.
//!
//! - Arrow keys pan the view.
//! - `+`/`=` and `-`/`_` zoom, except while the source editor has focus
//!   (they are typed text then).
//! - `r` re-fits the tree to the canvas.

use kurbo::Vec2;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── View ──
    PanLeft,
    PanUp,
    PanRight,
    PanDown,
    ZoomIn,
    ZoomOut,
    SoftReset,
}

impl ShortcutAction {
    /// Translate delta for pan actions, `speed` pixels per press.
    ///
    /// Panning left moves the content right, so the view looks further
    /// left, and likewise for the other directions.
    pub fn pan_delta(self, speed: f64) -> Option<Vec2> {
        match self {
            Self::PanLeft => Some(Vec2::new(speed, 0.0)),
            Self::PanUp => Some(Vec2::new(0.0, speed)),
            Self::PanRight => Some(Vec2::new(-speed, 0.0)),
            Self::PanDown => Some(Vec2::new(0.0, -speed)),
            Self::ZoomIn | Self::ZoomOut | Self::SoftReset => None,
        }
    }
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key press to an action.
    ///
    /// `editor_focused` is whether the source editor currently has focus.
    /// Returns `None` if the key has no binding.
    pub fn resolve(key: &str, editor_focused: bool) -> Option<ShortcutAction> {
        match key {
            "ArrowLeft" => Some(ShortcutAction::PanLeft),
            "ArrowUp" => Some(ShortcutAction::PanUp),
            "ArrowRight" => Some(ShortcutAction::PanRight),
            "ArrowDown" => Some(ShortcutAction::PanDown),
            "r" | "R" => Some(ShortcutAction::SoftReset),
            "+" | "=" if !editor_focused => Some(ShortcutAction::ZoomIn),
            "-" | "_" if !editor_focused => Some(ShortcutAction::ZoomOut),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolve_arrows() {
        assert_eq!(
            ShortcutMap::resolve("ArrowLeft", false),
            Some(ShortcutAction::PanLeft)
        );
        assert_eq!(ShortcutMap::resolve("ArrowUp", false), Some(ShortcutAction::PanUp));
        assert_eq!(
            ShortcutMap::resolve("ArrowRight", true),
            Some(ShortcutAction::PanRight)
        );
        assert_eq!(
            ShortcutMap::resolve("ArrowDown", true),
            Some(ShortcutAction::PanDown)
        );
    }

    #[test]
    fn resolve_zoom_keys() {
        for key in ["+", "="] {
            assert_eq!(ShortcutMap::resolve(key, false), Some(ShortcutAction::ZoomIn));
        }
        for key in ["-", "_"] {
            assert_eq!(ShortcutMap::resolve(key, false), Some(ShortcutAction::ZoomOut));
        }
    }

    #[test]
    fn zoom_keys_are_text_while_editing() {
        for key in ["+", "=", "-", "_"] {
            assert_eq!(ShortcutMap::resolve(key, true), None);
        }
    }

    #[test]
    fn resolve_soft_reset() {
        assert_eq!(ShortcutMap::resolve("r", false), Some(ShortcutAction::SoftReset));
        assert_eq!(ShortcutMap::resolve("R", false), Some(ShortcutAction::SoftReset));
    }

    #[test]
    fn unbound_keys() {
        assert_eq!(ShortcutMap::resolve("x", false), None);
        assert_eq!(ShortcutMap::resolve("Escape", false), None);
        assert_eq!(ShortcutMap::resolve("", false), None);
    }

    #[test]
    fn pan_directions() {
        assert_eq!(
            ShortcutAction::PanLeft.pan_delta(20.0),
            Some(Vec2::new(20.0, 0.0))
        );
        assert_eq!(ShortcutAction::PanUp.pan_delta(20.0), Some(Vec2::new(0.0, 20.0)));
        assert_eq!(
            ShortcutAction::PanRight.pan_delta(20.0),
            Some(Vec2::new(-20.0, 0.0))
        );
        assert_eq!(
            ShortcutAction::PanDown.pan_delta(20.0),
            Some(Vec2::new(0.0, -20.0))
        );
        assert_eq!(ShortcutAction::ZoomIn.pan_delta(20.0), None);
    }
}

//! Input abstraction layer.
//!
//! Normalizes host pointer, wheel, and keyboard events into a single
//! `InputEvent` enum consumed by the viewport controller. Positions are
//! canvas pixels relative to the canvas's top-left corner.

use kurbo::{Point, Vec2};

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed over the canvas.
    PointerDown { x: f64, y: f64 },

    /// Pointer moved. `dx`/`dy` is the movement since the last event
    /// (`MouseEvent.movementX/Y`).
    PointerMove { x: f64, y: f64, dx: f64, dy: f64 },

    /// Pointer released over the canvas.
    PointerUp { x: f64, y: f64 },

    /// Wheel scroll. Positive `delta_y` scrolls down (zooms out).
    Wheel { delta_y: f64 },

    /// Key press; `key` is the `KeyboardEvent.key` value.
    Key { key: String },
}

impl InputEvent {
    pub fn from_pointer_down(x: f64, y: f64) -> Self {
        Self::PointerDown { x, y }
    }

    pub fn from_pointer_move(x: f64, y: f64, dx: f64, dy: f64) -> Self {
        Self::PointerMove { x, y, dx, dy }
    }

    pub fn from_pointer_up(x: f64, y: f64) -> Self {
        Self::PointerUp { x, y }
    }

    pub fn key(key: impl Into<String>) -> Self {
        Self::Key { key: key.into() }
    }

    /// Extract position if this is a pointer event.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { x, y }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y } => Some(Point::new(*x, *y)),
            _ => None,
        }
    }

    /// Pointer movement, for move events.
    pub fn movement(&self) -> Option<Vec2> {
        match self {
            Self::PointerMove { dx, dy, .. } => Some(Vec2::new(*dx, *dy)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pointer_events_carry_position() {
        assert_eq!(
            InputEvent::from_pointer_down(3.0, 4.0).position(),
            Some(Point::new(3.0, 4.0))
        );
        assert_eq!(
            InputEvent::from_pointer_move(1.0, 2.0, -5.0, 6.0).movement(),
            Some(Vec2::new(-5.0, 6.0))
        );
        assert_eq!(InputEvent::Wheel { delta_y: 1.0 }.position(), None);
        assert_eq!(InputEvent::key("r").movement(), None);
    }
}

//! Abstract 2D drawing surface.
//!
//! Everything the viewer paints goes through `DrawSurface`: a Canvas2D
//! context in the browser, a Vello scene natively, or a display list in
//! tests. The surface keeps a current transform and a save/restore stack,
//! the way Canvas2D does.

use kurbo::{Affine, BezPath, Point, Rect};
use sx_core::{Color, TextMeasure};

pub trait DrawSurface: TextMeasure {
    /// Push the current transform.
    fn save(&mut self);

    /// Pop back to the last saved transform. Unbalanced calls are ignored.
    fn restore(&mut self);

    /// Set the current transform to identity.
    fn reset_transform(&mut self);

    /// Post-multiply the current transform: `current = current · affine`.
    fn transform(&mut self, affine: Affine);

    /// Clear `rect` (in current-transform space) to transparent.
    fn clear_rect(&mut self, rect: Rect);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64);

    fn fill_path(&mut self, path: &BezPath, color: Color);

    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64);

    /// Draw `text` with its left end on the baseline at `origin`.
    fn fill_text(&mut self, text: &str, origin: Point, color: Color);
}

//! Draw surface that records into a `vello::Scene`.
//!
//! The caller presents the scene (via wgpu or any other Vello renderer).
//! Text is measured with a fixed-advance estimate and traced, not shaped:
//! glyph rendering needs a font context the viewer does not carry yet.

use crate::surface::DrawSurface;
use kurbo::{Affine, BezPath, Point, Rect, Stroke};
use peniko::Fill;
use sx_core::{Color, MonospaceMeasure, TextMeasure};
use vello::Scene;

pub struct VelloSurface {
    scene: Scene,
    measure: MonospaceMeasure,
    current: Affine,
    stack: Vec<Affine>,
}

impl Default for VelloSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloSurface {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            measure: MonospaceMeasure::default(),
            current: Affine::IDENTITY,
            stack: Vec::new(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn into_scene(self) -> Scene {
        self.scene
    }

    pub fn current_transform(&self) -> Affine {
        self.current
    }
}

/// Core color → peniko color.
pub fn to_peniko(color: Color) -> peniko::Color {
    let [r, g, b, a] = color.to_rgba8();
    peniko::Color::from_rgba8(r, g, b, a)
}

impl TextMeasure for VelloSurface {
    fn measure_text(&self, text: &str) -> f64 {
        self.measure.measure_text(text)
    }
}

impl DrawSurface for VelloSurface {
    fn save(&mut self) {
        self.stack.push(self.current);
    }

    fn restore(&mut self) {
        if let Some(saved) = self.stack.pop() {
            self.current = saved;
        }
    }

    fn reset_transform(&mut self) {
        self.current = Affine::IDENTITY;
    }

    fn transform(&mut self, affine: Affine) {
        self.current *= affine;
    }

    /// Vello has no partial clear. The render loop clears the whole
    /// viewport once per frame, so this starts a fresh scene.
    fn clear_rect(&mut self, _rect: Rect) {
        self.scene.reset();
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.scene
            .fill(Fill::NonZero, self.current, to_peniko(color), None, &rect);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.scene
            .stroke(&Stroke::new(width), self.current, to_peniko(color), None, &rect);
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        self.scene
            .fill(Fill::NonZero, self.current, to_peniko(color), None, path);
    }

    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64) {
        self.scene
            .stroke(&Stroke::new(width), self.current, to_peniko(color), None, path);
    }

    /// Not encoded into the scene: this surface draws boxes, links and
    /// connectors but no labels. Text is only traced at its device-space
    /// origin. Use `Canvas2dSurface` or `RecordingSurface` where labels
    /// must appear.
    fn fill_text(&mut self, text: &str, origin: Point, _color: Color) {
        let at = self.current * origin;
        log::trace!("TEXT {text:?} at ({}, {})", at.x, at.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn peniko_conversion_keeps_channels() {
        let c = to_peniko(Color::rgba8(255, 0, 0, 0.25));
        let [r, g, b, a] = c.components;
        assert_eq!((r, g, b), (1.0, 0.0, 0.0));
        assert!((a - 64.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn text_leaves_transform_state_alone() {
        let mut surface = VelloSurface::new();
        surface.transform(Affine::translate((4.0, 2.0)));
        surface.fill_text("label", Point::new(1.0, 1.0), Color::BLACK);
        assert_eq!(surface.current_transform(), Affine::translate((4.0, 2.0)));
        assert_eq!(surface.measure_text("label"), 30.0);
    }

    #[test]
    fn transform_stack_matches_canvas_semantics() {
        let mut surface = VelloSurface::new();
        surface.transform(Affine::translate((4.0, 2.0)));
        surface.save();
        surface.transform(Affine::scale(2.0));
        surface.restore();
        assert_eq!(surface.current_transform(), Affine::translate((4.0, 2.0)));
        surface.reset_transform();
        assert_eq!(surface.current_transform(), Affine::IDENTITY);
    }
}

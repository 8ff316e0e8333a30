//! Global view transform: uniform scale plus translate over the canvas.

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Canvas pixels ← AST space.
///
/// In centered mode the AST origin sits at the canvas center and the
/// translate is in AST units (scaled with the view). Otherwise the
/// translate is applied in canvas pixels, before scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    scale: f64,
    translate: Vec2,
    centered: bool,
    canvas: Size,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate: Vec2::ZERO,
            centered: false,
            canvas: Size::ZERO,
        }
    }
}

impl ViewTransform {
    pub fn new(canvas: Size, centered: bool) -> Self {
        Self {
            canvas,
            centered,
            ..Self::default()
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translate(&self) -> Vec2 {
        self.translate
    }

    pub fn is_centered(&self) -> bool {
        self.centered
    }

    pub fn set_centered(&mut self, centered: bool) {
        self.centered = centered;
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas
    }

    pub fn set_canvas_size(&mut self, canvas: Size) {
        self.canvas = canvas;
    }

    /// Add `delta` to the translate as-is.
    pub fn translate_by(&mut self, delta: Vec2) {
        self.translate += delta;
    }

    /// Add `delta / scale`. Centered, the translate is applied before the
    /// scale, so a drag of `delta` pixels moves the content by `delta`
    /// pixels at any zoom. Uncentered, the content moves by `delta / scale`.
    pub fn translate_scaled(&mut self, delta: Vec2) {
        self.translate += delta / self.scale;
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    pub fn scale_by(&mut self, factor: f64) {
        self.scale *= factor;
    }

    /// Back to unit scale and zero translate.
    pub fn clear(&mut self) {
        self.scale = 1.0;
        self.translate = Vec2::ZERO;
    }

    /// Effective translate applied before scaling.
    pub fn offset(&self) -> Vec2 {
        if self.centered {
            self.canvas.to_vec2() / 2.0 + self.translate * self.scale
        } else {
            self.translate
        }
    }

    /// Canvas ← AST: `translate(offset) · scale`.
    pub fn affine(&self) -> Affine {
        Affine::translate(self.offset()) * Affine::scale(self.scale)
    }

    /// Canvas pixels → AST space.
    pub fn to_world(&self, canvas_point: Point) -> Point {
        self.affine().inverse() * canvas_point
    }

    /// AST space → canvas pixels.
    pub fn to_canvas(&self, world_point: Point) -> Point {
        self.affine() * world_point
    }

    /// The part of AST space that is currently on the canvas.
    pub fn visible_rect(&self) -> Rect {
        let origin = self.to_world(Point::ORIGIN);
        Rect::from_origin_size(origin, self.canvas / self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn close(a: Point, b: Point) -> bool {
        (a - b).hypot() < 1e-9
    }

    #[test]
    fn centered_affine_puts_origin_mid_canvas() {
        let view = ViewTransform::new(Size::new(800.0, 600.0), true);
        assert_eq!(view.to_canvas(Point::ORIGIN), Point::new(400.0, 300.0));
    }

    #[test]
    fn centered_translate_scales_with_view() {
        let mut view = ViewTransform::new(Size::new(800.0, 600.0), true);
        view.scale_by(2.0);
        view.translate_by(Vec2::new(10.0, -5.0));
        assert_eq!(view.offset(), Vec2::new(420.0, 290.0));
        assert_eq!(view.to_canvas(Point::new(1.0, 1.0)), Point::new(422.0, 292.0));
    }

    #[test]
    fn uncentered_translate_is_in_pixels() {
        let mut view = ViewTransform::new(Size::new(800.0, 600.0), false);
        view.scale_by(2.0);
        view.translate_by(Vec2::new(10.0, 20.0));
        assert_eq!(view.to_canvas(Point::new(1.0, 1.0)), Point::new(12.0, 22.0));
    }

    #[test]
    fn to_world_inverts_to_canvas() {
        let mut view = ViewTransform::new(Size::new(640.0, 480.0), true);
        view.scale_by(1.7);
        view.translate_scaled(Vec2::new(33.0, -12.0));
        let p = Point::new(123.0, 456.0);
        assert!(close(view.to_canvas(view.to_world(p)), p));
    }

    #[test]
    fn translate_scaled_divides_by_scale() {
        let mut view = ViewTransform::default();
        view.scale_by(4.0);
        view.translate_scaled(Vec2::new(20.0, -8.0));
        assert_eq!(view.translate(), Vec2::new(5.0, -2.0));
    }

    #[test]
    fn translate_scaled_pixel_movement_depends_on_centering() {
        let world = Point::new(3.0, 4.0);
        let delta = Vec2::new(12.0, -6.0);

        let mut centered = ViewTransform::new(Size::new(200.0, 100.0), true);
        centered.scale_by(3.0);
        let before = centered.to_canvas(world);
        centered.translate_scaled(delta);
        assert!(close(centered.to_canvas(world), before + delta));

        let mut plain = ViewTransform::new(Size::new(200.0, 100.0), false);
        plain.scale_by(3.0);
        let before = plain.to_canvas(world);
        plain.translate_scaled(delta);
        assert!(close(plain.to_canvas(world), before + delta / 3.0));
    }

    #[test]
    fn zoom_in_then_out_restores_scale() {
        let mut view = ViewTransform::default();
        view.scale_by(1.1);
        view.scale_by(1.0 / 1.1);
        assert!((view.scale() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn visible_rect_covers_canvas() {
        let mut view = ViewTransform::new(Size::new(200.0, 100.0), true);
        view.scale_by(2.0);
        let rect = view.visible_rect();
        assert_eq!(rect, Rect::new(-50.0, -25.0, 50.0, 25.0));
    }

    #[test]
    fn clear_resets_scale_and_translate() {
        let mut view = ViewTransform::new(Size::new(10.0, 10.0), true);
        view.scale_by(3.0);
        view.translate_by(Vec2::new(1.0, 1.0));
        view.clear();
        assert_eq!(view.scale(), 1.0);
        assert_eq!(view.translate(), Vec2::ZERO);
        assert!(view.is_centered());
    }
}

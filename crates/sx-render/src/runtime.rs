//! Render surface: root objects, global view transform, and the
//! per-animation-frame update + draw cycle.
//!
//! The host owns the clock and the frame callback. It calls `run` once,
//! then `on_frame` from every animation-frame callback until `stop`.
//! `FrameScheduler` abstracts the host's request/cancel pair so the cycle
//! can be driven from tests without a browser.

use crate::object::{DrawContext, Drawable, SceneObject, Updatable};
use crate::surface::DrawSurface;
use crate::view::ViewTransform;
use kurbo::Size;
use sx_core::{Color, ObjectId, Theme};

/// Handle returned by the host for a pending frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRequest(pub i32);

/// The host's animation-frame scheduling.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameRequest;
    fn cancel_frame(&mut self, request: FrameRequest);
}

pub struct RenderSurface {
    objects: Vec<Box<dyn SceneObject>>,
    view: ViewTransform,
    theme: Theme,
    /// Timestamp of the last frame, in milliseconds.
    time: f64,
    running: bool,
    pending: Option<FrameRequest>,
}

impl std::fmt::Debug for RenderSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSurface")
            .field("objects", &self.objects.len())
            .field("view", &self.view)
            .field("time", &self.time)
            .field("running", &self.running)
            .field("pending", &self.pending)
            .finish()
    }
}

impl RenderSurface {
    pub fn new(canvas: Size) -> Self {
        Self {
            objects: Vec::new(),
            view: ViewTransform::new(canvas, false),
            theme: Theme::default(),
            time: 0.0,
            running: false,
            pending: None,
        }
    }

    // ─── Objects ────────────────────────────────────────────────────────

    pub fn add_object(&mut self, object: Box<dyn SceneObject>) -> ObjectId {
        let id = object.id();
        self.objects.push(object);
        id
    }

    pub fn remove_object(&mut self, id: ObjectId) -> Option<Box<dyn SceneObject>> {
        let index = self.objects.iter().position(|o| o.id() == id)?;
        Some(self.objects.remove(index))
    }

    pub fn clear_objects(&mut self) {
        self.objects.clear();
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Typed lookup of a root object.
    pub fn object<T: SceneObject>(&self, id: ObjectId) -> Option<&T> {
        self.objects
            .iter()
            .find(|o| o.id() == id)
            .and_then(|o| o.downcast_ref::<T>())
    }

    pub fn object_mut<T: SceneObject>(&mut self, id: ObjectId) -> Option<&mut T> {
        self.objects
            .iter_mut()
            .find(|o| o.id() == id)
            .and_then(|o| o.downcast_mut::<T>())
    }

    // ─── View ───────────────────────────────────────────────────────────

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewTransform {
        &mut self.view
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    // ─── Frame cycle ────────────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start the cycle at host time `now` (ms) and request the first frame.
    pub fn run(&mut self, now: f64, scheduler: &mut dyn FrameScheduler) {
        if let Some(request) = self.pending.take() {
            scheduler.cancel_frame(request);
        }
        self.time = now;
        self.running = true;
        self.pending = Some(scheduler.request_frame());
        log::debug!("render loop started at {now}");
    }

    /// Cancel the pending frame. Safe to call repeatedly.
    pub fn stop(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(request) = self.pending.take() {
            scheduler.cancel_frame(request);
        }
        if self.running {
            log::debug!("render loop stopped");
        }
        self.running = false;
    }

    /// One animation frame at host time `t` (ms). Returns `false` when the
    /// loop is stopped and nothing was done.
    pub fn on_frame(
        &mut self,
        t: f64,
        scheduler: &mut dyn FrameScheduler,
        surface: &mut dyn DrawSurface,
    ) -> bool {
        if !self.running {
            return false;
        }
        self.pending = Some(scheduler.request_frame());

        let elapsed = t - self.time;
        self.time = t;
        self.update(elapsed);
        self.refresh(surface);
        self.clear(surface);
        self.draw(surface);
        true
    }

    /// Advance every root object by `elapsed` ms.
    pub fn update(&mut self, elapsed: f64) {
        for object in &mut self.objects {
            object.update(elapsed);
        }
    }

    /// Reset the surface transform and apply the global view transform.
    pub fn refresh(&self, surface: &mut dyn DrawSurface) {
        surface.reset_transform();
        surface.transform(self.view.affine());
    }

    /// Clear the visible part of AST space. Assumes `refresh` ran.
    pub fn clear(&self, surface: &mut dyn DrawSurface) {
        let visible = self.view.visible_rect();
        surface.clear_rect(visible);
        if self.theme.background != Color::TRANSPARENT {
            surface.fill_rect(visible, self.theme.background);
        }
    }

    /// Draw every root object in insertion order.
    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        let mut cx = DrawContext::new(surface, &self.theme);
        for object in &self.objects {
            object.draw(&mut cx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DrawCommand, RecordingSurface};
    use kurbo::{Affine, Point, Vec2};
    use pretty_assertions::assert_eq;
    use sx_core::{LayoutConfig, MonospaceMeasure, TreeNode, parse_sexpr};

    #[derive(Default)]
    struct FakeScheduler {
        next: i32,
        requested: Vec<FrameRequest>,
        cancelled: Vec<FrameRequest>,
    }

    impl FrameScheduler for FakeScheduler {
        fn request_frame(&mut self) -> FrameRequest {
            self.next += 1;
            let request = FrameRequest(self.next);
            self.requested.push(request);
            request
        }

        fn cancel_frame(&mut self, request: FrameRequest) {
            self.cancelled.push(request);
        }
    }

    fn tree(src: &str, config: &LayoutConfig) -> TreeNode {
        let expr = parse_sexpr(src).unwrap();
        let mut tree = TreeNode::build(&expr, &MonospaceMeasure::default(), config);
        tree.init_positions(config);
        tree
    }

    fn surface_with(src: &str) -> (RenderSurface, ObjectId) {
        let mut rs = RenderSurface::new(Size::new(400.0, 300.0));
        let id = rs.add_object(Box::new(tree(src, &LayoutConfig::default())));
        (rs, id)
    }

    #[test]
    fn run_requests_first_frame() {
        let (mut rs, _) = surface_with("(a)");
        let mut sched = FakeScheduler::default();
        rs.run(100.0, &mut sched);
        assert!(rs.is_running());
        assert_eq!(sched.requested, vec![FrameRequest(1)]);
    }

    #[test]
    fn frame_rerequests_then_draws() {
        let (mut rs, _) = surface_with("(a (b))");
        let mut sched = FakeScheduler::default();
        let mut surface = RecordingSurface::new();
        rs.run(0.0, &mut sched);
        assert!(rs.on_frame(16.0, &mut sched, &mut surface));
        assert_eq!(sched.requested.len(), 2);
        assert!(matches!(surface.commands()[0], DrawCommand::Clear { .. }));
        assert_eq!(surface.texts(), vec!["a", "b"]);
        assert_eq!(surface.save_depth(), 0);
    }

    #[test]
    fn stop_is_idempotent_and_silences_frames() {
        let (mut rs, _) = surface_with("(a)");
        let mut sched = FakeScheduler::default();
        let mut surface = RecordingSurface::new();
        rs.run(0.0, &mut sched);
        rs.stop(&mut sched);
        rs.stop(&mut sched);
        assert_eq!(sched.cancelled, vec![FrameRequest(1)]);
        assert!(!rs.on_frame(16.0, &mut sched, &mut surface));
        assert!(surface.commands().is_empty());
        assert_eq!(sched.requested.len(), 1);
    }

    #[test]
    fn update_uses_elapsed_between_frames() {
        let config = LayoutConfig {
            glide_velocity: 0.01,
            ..LayoutConfig::default()
        };
        let mut rs = RenderSurface::new(Size::new(400.0, 300.0));
        let id = rs.add_object(Box::new(tree("(a (b))", &config)));
        let mut sched = FakeScheduler::default();
        let mut surface = RecordingSurface::new();

        rs.run(1000.0, &mut sched);
        rs.on_frame(1100.0, &mut sched, &mut surface);
        let child = &rs.object::<TreeNode>(id).unwrap().children()[0];
        // 100 ms at 0.01 units/ms, straight down toward y = 37.5.
        assert!((child.position().y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn refresh_composes_centered_transform() {
        let (mut rs, _) = surface_with("(a)");
        rs.view_mut().set_centered(true);
        rs.view_mut().scale_by(2.0);
        rs.view_mut().translate_by(Vec2::new(10.0, 0.0));
        let mut surface = RecordingSurface::new();
        surface.transform(Affine::scale(9.0));
        rs.refresh(&mut surface);
        let expected = Affine::translate((220.0, 150.0)) * Affine::scale(2.0);
        assert_eq!(surface.current_transform(), expected);
    }

    #[test]
    fn children_draw_inside_parent_transform() {
        let (mut rs, id) = surface_with("(a (b))");
        rs.object_mut::<TreeNode>(id)
            .unwrap()
            .set_position(Point::new(100.0, 50.0));
        let mut surface = RecordingSurface::new();
        rs.draw(&mut surface);

        let child_pos = rs.object::<TreeNode>(id).unwrap().children()[0].position();
        let child_text = surface
            .commands()
            .iter()
            .find(|c| matches!(c, DrawCommand::FillText { text, .. } if text == "b"))
            .unwrap();
        let expected = Affine::translate((100.0, 50.0)) * Affine::translate(child_pos.to_vec2());
        assert_eq!(child_text.transform(), expected);
    }

    #[test]
    fn typed_lookup_and_removal() {
        let (mut rs, id) = surface_with("(a)");
        assert!(rs.object::<TreeNode>(id).is_some());
        assert!(rs.remove_object(id).is_some());
        assert!(rs.object::<TreeNode>(id).is_none());
        assert_eq!(rs.object_count(), 0);
    }
}

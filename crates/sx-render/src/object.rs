//! Scene-object capabilities.
//!
//! Objects in the retained scene graph compose two independent traits:
//! `Updatable` (per-frame state advance) and `Drawable` (paint self, then
//! children, inside the object's local transform). Both are driven from an
//! embedded `SceneNode`. Root objects live in the `RenderSurface` as
//! `Box<dyn SceneObject>`.

use crate::surface::DrawSurface;
use std::any::Any;
use sx_core::{ObjectId, SceneNode, Theme};

/// What a draw pass needs besides the object itself.
pub struct DrawContext<'a> {
    pub surface: &'a mut dyn DrawSurface,
    pub theme: &'a Theme,
}

impl<'a> DrawContext<'a> {
    pub fn new(surface: &'a mut dyn DrawSurface, theme: &'a Theme) -> Self {
        Self { surface, theme }
    }
}

// ─── Update ─────────────────────────────────────────────────────────────

pub trait Updatable {
    fn scene_node_mut(&mut self) -> &mut SceneNode;

    /// Per-object hook, run after the glide step.
    fn update_self(&mut self, _elapsed: f64) {}

    /// Update owned children in order with the same `elapsed`.
    fn update_children(&mut self, _elapsed: f64) {}

    /// Advance one frame: glide, own hook, then children.
    fn update(&mut self, elapsed: f64) {
        self.scene_node_mut().step(elapsed);
        self.update_self(elapsed);
        self.update_children(elapsed);
    }
}

// ─── Draw ───────────────────────────────────────────────────────────────

pub trait Drawable {
    fn scene_node(&self) -> &SceneNode;

    /// Paint this object in its own local space.
    fn draw_self(&self, cx: &mut DrawContext<'_>);

    fn draw_children(&self, _cx: &mut DrawContext<'_>) {}

    /// Compose the local transform onto the surface, paint self, then
    /// children, and restore.
    fn draw(&self, cx: &mut DrawContext<'_>) {
        cx.surface.save();
        cx.surface.transform(self.scene_node().local_transform());
        self.draw_self(cx);
        self.draw_children(cx);
        cx.surface.restore();
    }
}

// ─── Root objects ───────────────────────────────────────────────────────

/// Upcast to `Any` for typed lookup of root objects.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A root-level object owned by the render surface.
pub trait SceneObject: Updatable + Drawable + AsAny {
    fn id(&self) -> ObjectId {
        self.scene_node().id()
    }
}

impl dyn SceneObject {
    pub fn downcast_ref<T: SceneObject>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: SceneObject>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

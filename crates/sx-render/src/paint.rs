//! Tree node → draw-surface commands.
//!
//! Each node paints in its own local space: the box spans
//! `[0, width] × [-height/2, height/2]`, body segments run left to right
//! centered in the box, and every child link runs from its connector dot
//! to the child's top-center. Children then paint inside their own
//! transforms.

use crate::object::{DrawContext, Drawable, SceneObject, Updatable};
use kurbo::{BezPath, Circle, Point, Shape};
use sx_core::{SceneNode, Segment, TreeNode};

/// Flattening tolerance for connector circles.
const CIRCLE_TOLERANCE: f64 = 0.1;

impl Updatable for TreeNode {
    fn scene_node_mut(&mut self) -> &mut SceneNode {
        self.scene_mut()
    }

    fn update_children(&mut self, elapsed: f64) {
        for child in self.children_mut() {
            child.update(elapsed);
        }
    }
}

impl Drawable for TreeNode {
    fn scene_node(&self) -> &SceneNode {
        self.scene()
    }

    fn draw_self(&self, cx: &mut DrawContext<'_>) {
        paint_box(self, cx);
        paint_body(self, cx);
    }

    fn draw_children(&self, cx: &mut DrawContext<'_>) {
        for child in self.children() {
            child.draw(cx);
        }
    }
}

impl SceneObject for TreeNode {}

// ─── Node parts ─────────────────────────────────────────────────────────

fn paint_box(node: &TreeNode, cx: &mut DrawContext<'_>) {
    let theme = cx.theme;
    let rect = node.local_box();
    cx.surface.fill_rect(rect, theme.node_fill);
    cx.surface.stroke_rect(rect, theme.node_stroke, theme.line_width);
    if node.is_active() {
        cx.surface.fill_rect(rect, theme.highlight);
    }
    if node.is_selected() {
        let outline = rect.inflate(theme.line_width, theme.line_width);
        cx.surface.stroke_rect(outline, theme.selection, theme.line_width);
    }
}

fn paint_body(node: &TreeNode, cx: &mut DrawContext<'_>) {
    let theme = cx.theme;
    let connector = node.connector_size();
    let spacing = node.segment_spacing();
    let mut x = node.width() / 2.0 - node.text_width() / 2.0;

    for segment in node.body() {
        match segment {
            Segment::Text { text, width } => {
                log::trace!("text {text:?} at x = {x}");
                cx.surface
                    .fill_text(text, Point::new(x, theme.text_baseline), theme.text);
                x += width + spacing;
            }
            Segment::Child(index) => {
                let Some(child) = node.child(*index) else {
                    x += connector + spacing;
                    continue;
                };
                let dot = Point::new(x + connector / 2.0, connector / 4.0);
                let top_center = child.position()
                    + kurbo::Vec2::new(child.width() / 2.0, -child.height() / 2.0);

                let mut link = BezPath::new();
                link.move_to(dot);
                link.line_to(top_center);
                let stroke = if node.is_active() {
                    theme.link_active
                } else {
                    theme.link
                };
                cx.surface.stroke_path(&link, stroke, theme.line_width);

                let circle = Circle::new(dot, connector / 2.0).to_path(CIRCLE_TOLERANCE);
                cx.surface.fill_path(&circle, theme.connector);
                x += connector + spacing;
            }
        }
    }
}

//! Viewport controller: the viewer's application context.
//!
//! Owns the render surface and everything that used to be ambient state:
//! the current tree, hover and selection, drag state, hotkey flags, and the
//! source sync. Host events come in through `handle_event` (or the
//! individual operations); drawing happens in the render surface's frame
//! cycle.

use crate::config::ViewerConfig;
use crate::input::InputEvent;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::sync::{SourceSync, SyncOutcome};
use kurbo::{Point, Size, Vec2};
use sx_core::{NodePath, ObjectId, ParseError, TextMeasure, TreeNode};
use sx_render::{RenderSurface, hit_test};

#[derive(Debug)]
pub struct ViewportController {
    surface: RenderSurface,
    config: ViewerConfig,
    sync: SourceSync,
    ast: Option<ObjectId>,
    active: Option<NodePath>,
    selected: Option<NodePath>,
    dragging: bool,
    hotkeys_enabled: bool,
    editor_focused: bool,
}

impl ViewportController {
    pub fn new(canvas: Size) -> Self {
        Self::with_config(canvas, ViewerConfig::default())
    }

    pub fn with_config(canvas: Size, config: ViewerConfig) -> Self {
        let mut surface = RenderSurface::new(canvas);
        surface.view_mut().set_centered(config.centered);
        surface.set_theme(config.theme.clone());
        Self {
            surface,
            config,
            sync: SourceSync::new(),
            ast: None,
            active: None,
            selected: None,
            dragging: false,
            hotkeys_enabled: true,
            editor_focused: false,
        }
    }

    // ─── Accessors ──────────────────────────────────────────────────────

    pub fn surface(&self) -> &RenderSurface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut RenderSurface {
        &mut self.surface
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Replace the configuration. Theme and centering apply immediately;
    /// layout and parse settings apply from the next parse.
    pub fn set_config(&mut self, config: ViewerConfig) {
        self.surface.view_mut().set_centered(config.centered);
        self.surface.set_theme(config.theme.clone());
        if config.parse != self.config.parse || config.layout != self.config.layout {
            self.sync.invalidate();
        }
        self.config = config;
    }

    pub fn tree(&self) -> Option<&TreeNode> {
        self.surface.object::<TreeNode>(self.ast?)
    }

    pub fn tree_mut(&mut self) -> Option<&mut TreeNode> {
        self.surface.object_mut::<TreeNode>(self.ast?)
    }

    pub fn active_path(&self) -> Option<&[usize]> {
        self.active.as_deref()
    }

    pub fn selected_path(&self) -> Option<&[usize]> {
        self.selected.as_deref()
    }

    pub fn selected_node(&self) -> Option<&TreeNode> {
        self.tree()?.node_at(self.selected.as_deref()?)
    }

    pub fn last_error(&self) -> Option<&ParseError> {
        self.sync.last_error()
    }

    pub fn scale_factor(&self) -> f64 {
        self.surface.view().scale()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn hotkeys_enabled(&self) -> bool {
        self.hotkeys_enabled
    }

    pub fn set_hotkeys_enabled(&mut self, enabled: bool) {
        self.hotkeys_enabled = enabled;
    }

    /// While the source editor has focus, `+`/`-` are typed text.
    pub fn set_editor_focused(&mut self, focused: bool) {
        self.editor_focused = focused;
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.surface
            .view_mut()
            .set_canvas_size(Size::new(width, height));
    }

    // ─── Source ─────────────────────────────────────────────────────────

    /// Sync the viewer to new source text. Returns `Ok(true)` if the tree
    /// was rebuilt and `Ok(false)` if the text was unchanged. On a parse
    /// error the previous tree stays in place.
    pub fn set_text(&mut self, text: &str, measure: &dyn TextMeasure) -> Result<bool, ParseError> {
        let expr = match self.sync.update(text, &self.config.parse) {
            SyncOutcome::Unchanged => return Ok(false),
            SyncOutcome::Failed(err) => return Err(err),
            SyncOutcome::Parsed(expr) => expr,
        };

        let tree = TreeNode::build(&expr, measure, &self.config.layout);
        log::debug!(
            "built tree: {} nodes, extent {}×{}",
            tree.node_count(),
            tree.tree_width(),
            tree.tree_height()
        );

        if self.config.reset_view_on_parse {
            self.reset();
            self.ast = Some(self.surface.add_object(Box::new(tree)));
            self.init_scale();
        } else {
            self.drop_tree();
            self.ast = Some(self.surface.add_object(Box::new(tree)));
        }
        self.init_positions();
        Ok(true)
    }

    fn drop_tree(&mut self) {
        if let Some(id) = self.ast.take() {
            self.surface.remove_object(id);
        }
        self.active = None;
        self.selected = None;
    }

    // ─── View operations ────────────────────────────────────────────────

    /// Add `delta` to the global translate.
    pub fn translate(&mut self, delta: Vec2) {
        self.surface.view_mut().translate_by(delta);
    }

    /// Add `delta / scale` to the global translate.
    pub fn translate_scaled(&mut self, delta: Vec2) {
        self.surface.view_mut().translate_scaled(delta);
    }

    /// Multiply the global scale. Non-positive or non-finite factors are
    /// ignored.
    pub fn scale(&mut self, factor: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            log::warn!("ignoring scale factor {factor}");
            return;
        }
        self.surface.view_mut().scale_by(factor);
    }

    pub fn scale_and_reset_positions(&mut self, factor: f64) {
        self.scale(factor);
        self.init_positions();
    }

    /// Re-fit the current tree: clear the transform, then fit and place.
    pub fn soft_reset(&mut self) {
        self.surface.view_mut().clear();
        self.init_scale();
        self.init_positions();
    }

    /// Drop the tree and clear the transform.
    pub fn reset(&mut self) {
        self.drop_tree();
        self.surface.view_mut().clear();
    }

    /// Scale so the whole tree fits the canvas, capped at
    /// `max_initial_scale`.
    pub fn init_scale(&mut self) {
        let Some(tree) = self.tree() else {
            return;
        };
        let canvas = self.surface.view().canvas_size();
        let x_ratio = canvas.width / tree.tree_width();
        let y_ratio = canvas.height / tree.tree_height();
        let fit = x_ratio.min(y_ratio).min(self.config.max_initial_scale);
        if !(fit.is_finite() && fit > 0.0) {
            log::debug!("canvas {canvas:?} too small to fit tree, keeping scale");
            return;
        }
        log::debug!("fit scale {fit} (x ratio {x_ratio}, y ratio {y_ratio})");
        self.surface.view_mut().set_scale(fit);
    }

    /// Put the root above the origin and lay out the tree beneath it.
    pub fn init_positions(&mut self) {
        let layout = self.config.layout.clone();
        let Some(tree) = self.tree_mut() else {
            return;
        };
        let root = Point::new(-tree.width() / 2.0, -tree.tree_height() / 3.0);
        tree.set_position(root);
        tree.init_positions(&layout);
    }

    // ─── Pointer ────────────────────────────────────────────────────────

    /// Hover at canvas position `pos`. Returns whether the highlighted
    /// node changed.
    pub fn mouse_move(&mut self, pos: Point) -> bool {
        let world = self.surface.view().to_world(pos);
        let Some(tree) = self.tree() else {
            return false;
        };
        let hit = hit_test(tree, world);
        if hit == self.active {
            return false;
        }

        let previous = std::mem::replace(&mut self.active, hit.clone());
        if let Some(tree) = self.tree_mut() {
            if let Some(node) = previous.as_deref().and_then(|p| tree.node_at_mut(p)) {
                node.set_active(false);
            }
            if let Some(node) = hit.as_deref().and_then(|p| tree.node_at_mut(p)) {
                node.set_active(true);
            }
        }
        true
    }

    /// Click at canvas position `pos`: select the node under it, or clear
    /// the selection on a miss. Returns whether the selection changed.
    pub fn click(&mut self, pos: Point) -> bool {
        let world = self.surface.view().to_world(pos);
        let Some(tree) = self.tree() else {
            return false;
        };
        let hit = hit_test(tree, world);
        if hit == self.selected {
            return false;
        }

        let previous = std::mem::replace(&mut self.selected, hit.clone());
        if let Some(tree) = self.tree_mut() {
            if let Some(node) = previous.as_deref().and_then(|p| tree.node_at_mut(p)) {
                node.set_selected(false);
            }
            if let Some(node) = hit.as_deref().and_then(|p| tree.node_at_mut(p)) {
                log::debug!("selected {}", node.to_source());
                node.set_selected(true);
            }
        }
        true
    }

    // ─── Events ─────────────────────────────────────────────────────────

    /// Dispatch a host event. Returns whether anything visible changed.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { .. } => {
                self.dragging = true;
                false
            }
            InputEvent::PointerMove { x, y, dx, dy } => {
                let hover = self.mouse_move(Point::new(*x, *y));
                if self.dragging {
                    self.translate_scaled(Vec2::new(*dx, *dy));
                    return true;
                }
                hover
            }
            InputEvent::PointerUp { x, y } => {
                self.dragging = false;
                self.click(Point::new(*x, *y))
            }
            InputEvent::Wheel { delta_y } => {
                if *delta_y > 0.0 {
                    self.scale(self.config.zoom_out);
                } else if *delta_y < 0.0 {
                    self.scale(self.config.zoom_in);
                } else {
                    return false;
                }
                true
            }
            InputEvent::Key { key } => self.handle_key(key),
        }
    }

    /// Pointer released outside the canvas: end any drag without clicking.
    pub fn cancel_drag(&mut self) {
        self.dragging = false;
    }

    fn handle_key(&mut self, key: &str) -> bool {
        if !self.hotkeys_enabled {
            return false;
        }
        let Some(action) = ShortcutMap::resolve(key, self.editor_focused) else {
            return false;
        };
        log::debug!("shortcut {key:?} → {action:?}");

        if let Some(delta) = action.pan_delta(self.config.scroll_speed) {
            self.translate_scaled(delta);
            return true;
        }
        match action {
            ShortcutAction::ZoomIn => self.scale(self.config.zoom_in),
            ShortcutAction::ZoomOut => self.scale(self.config.zoom_out),
            ShortcutAction::SoftReset => self.soft_reset(),
            ShortcutAction::PanLeft
            | ShortcutAction::PanUp
            | ShortcutAction::PanRight
            | ShortcutAction::PanDown => {}
        }
        true
    }
}

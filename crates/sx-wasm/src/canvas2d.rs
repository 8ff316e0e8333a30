//! Canvas2D backend: `DrawSurface` over a `CanvasRenderingContext2d`, and
//! a `requestAnimationFrame` scheduler for the render loop.
//!
//! The surface tracks its own current transform and pushes the full matrix
//! to the context on every change, so the context never drifts from what
//! the scene graph composed. Failed context calls are logged and skipped.

use kurbo::{Affine, BezPath, PathEl, Point, Rect};
use std::cell::RefCell;
use std::rc::Rc;
use sx_core::{Color, MonospaceMeasure, TextMeasure};
use sx_render::{DrawSurface, FrameRequest, FrameScheduler};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

pub struct Canvas2dSurface {
    ctx: CanvasRenderingContext2d,
    current: Affine,
    stack: Vec<Affine>,
    fallback: MonospaceMeasure,
}

impl Canvas2dSurface {
    pub fn new(ctx: CanvasRenderingContext2d, font: &str) -> Self {
        ctx.set_font(font);
        Self {
            ctx,
            current: Affine::IDENTITY,
            stack: Vec::new(),
            fallback: MonospaceMeasure::default(),
        }
    }

    /// CSS font shorthand used for both drawing and measuring.
    pub fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    fn apply_transform(&self) {
        let [a, b, c, d, e, f] = self.current.as_coeffs();
        if let Err(err) = self.ctx.set_transform(a, b, c, d, e, f) {
            log::warn!("setTransform failed: {err:?}");
        }
    }

    fn trace_path(&self, path: &BezPath) {
        self.ctx.begin_path();
        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => self.ctx.move_to(p.x, p.y),
                PathEl::LineTo(p) => self.ctx.line_to(p.x, p.y),
                PathEl::QuadTo(c, p) => self.ctx.quadratic_curve_to(c.x, c.y, p.x, p.y),
                PathEl::CurveTo(c1, c2, p) => {
                    self.ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y)
                }
                PathEl::ClosePath => self.ctx.close_path(),
            }
        }
    }
}

impl TextMeasure for Canvas2dSurface {
    fn measure_text(&self, text: &str) -> f64 {
        match self.ctx.measure_text(text) {
            Ok(metrics) => metrics.width(),
            Err(err) => {
                log::warn!("measureText failed, estimating: {err:?}");
                self.fallback.measure_text(text)
            }
        }
    }
}

impl DrawSurface for Canvas2dSurface {
    fn save(&mut self) {
        self.stack.push(self.current);
        self.ctx.save();
    }

    fn restore(&mut self) {
        let Some(saved) = self.stack.pop() else {
            return;
        };
        self.ctx.restore();
        self.current = saved;
        self.apply_transform();
    }

    fn reset_transform(&mut self) {
        self.current = Affine::IDENTITY;
        self.apply_transform();
    }

    fn transform(&mut self, affine: Affine) {
        self.current *= affine;
        self.apply_transform();
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.ctx
            .clear_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width);
        self.ctx
            .stroke_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        self.trace_path(path);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64) {
        self.trace_path(path);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width);
        self.ctx.stroke();
    }

    fn fill_text(&mut self, text: &str, origin: Point, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        if let Err(err) = self.ctx.fill_text(text, origin.x, origin.y) {
            log::warn!("fillText failed: {err:?}");
        }
    }
}

// ─── requestAnimationFrame ───────────────────────────────────────────────

/// Shared slot for the frame callback. The viewer fills it once the
/// callback closure exists; the scheduler only borrows it to hand the
/// function to `requestAnimationFrame`.
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub struct AnimationFrames {
    window: Option<web_sys::Window>,
    callback: FrameCallback,
}

impl AnimationFrames {
    pub fn new(callback: FrameCallback) -> Self {
        let window = web_sys::window();
        if window.is_none() {
            log::warn!("no window; animation frames disabled");
        }
        Self { window, callback }
    }
}

impl FrameScheduler for AnimationFrames {
    fn request_frame(&mut self) -> FrameRequest {
        let Some(window) = &self.window else {
            return FrameRequest(0);
        };
        let callback = self.callback.borrow();
        let Some(closure) = callback.as_ref() else {
            log::warn!("frame requested before callback was installed");
            return FrameRequest(0);
        };
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(handle) => FrameRequest(handle),
            Err(err) => {
                log::warn!("requestAnimationFrame failed: {err:?}");
                FrameRequest(0)
            }
        }
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        let Some(window) = &self.window else {
            return;
        };
        if let Err(err) = window.cancel_animation_frame(request.0) {
            log::warn!("cancelAnimationFrame failed: {err:?}");
        }
    }
}

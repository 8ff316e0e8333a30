//! WASM bridge for the s-expression tree viewer.
//!
//! Exposes `SxViewer` to JavaScript via `wasm-bindgen`. The viewer draws
//! into the canvas it was created with and drives its own
//! `requestAnimationFrame` loop between `run` and `stop`. Host events
//! (pointer, wheel, keys, editor text) are forwarded through the methods
//! below.

mod canvas2d;

pub use canvas2d::{AnimationFrames, Canvas2dSurface, FrameCallback};

use kurbo::{Size, Vec2};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use sx_core::{ParseError, parse_sexpr};
use sx_editor::{InputEvent, ViewerConfig, ViewportController};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

struct Viewer {
    controller: ViewportController,
    surface: Canvas2dSurface,
    frames: AnimationFrames,
}

impl Viewer {
    fn frame(&mut self, t: f64) {
        let Self {
            controller,
            surface,
            frames,
        } = self;
        controller.surface_mut().on_frame(t, frames, surface);
    }
}

#[wasm_bindgen]
pub struct SxViewer {
    inner: Rc<RefCell<Viewer>>,
    callback: FrameCallback,
}

#[wasm_bindgen]
impl SxViewer {
    /// Create a viewer drawing into `canvas`. Fails if the canvas has no
    /// 2D context.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<SxViewer, JsValue> {
        console_error_panic_hook_setup();

        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| js_sys::Error::new("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let size = Size::new(f64::from(canvas.width()), f64::from(canvas.height()));

        let controller = ViewportController::new(size);
        let surface = Canvas2dSurface::new(ctx, &controller.config().theme.font);
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let inner = Rc::new(RefCell::new(Viewer {
            controller,
            surface,
            frames: AnimationFrames::new(Rc::clone(&callback)),
        }));

        let weak: Weak<RefCell<Viewer>> = Rc::downgrade(&inner);
        let on_frame = Closure::wrap(Box::new(move |t: f64| {
            let Some(viewer) = weak.upgrade() else {
                return;
            };
            match viewer.try_borrow_mut() {
                Ok(mut viewer) => viewer.frame(t),
                Err(_) => log::warn!("frame at {t} skipped: viewer busy"),
            }
        }) as Box<dyn FnMut(f64)>);
        *callback.borrow_mut() = Some(on_frame);

        log::debug!("viewer created for {}×{} canvas", size.width, size.height);
        Ok(Self { inner, callback })
    }

    // ─── Source ──────────────────────────────────────────────────────────

    /// Sync the viewer to editor text. Returns `false` on a parse error;
    /// the previous tree keeps rendering and `last_error` says why.
    pub fn set_text(&self, text: &str) -> bool {
        let mut viewer = self.inner.borrow_mut();
        let Viewer {
            controller,
            surface,
            ..
        } = &mut *viewer;
        controller.set_text(text, &*surface).is_ok()
    }

    /// Message of the most recent parse error, if the last parse failed.
    pub fn last_error(&self) -> Option<String> {
        self.inner
            .borrow()
            .controller
            .last_error()
            .map(ToString::to_string)
    }

    /// Source text of the clicked subtree.
    pub fn selected_text(&self) -> Option<String> {
        self.inner
            .borrow()
            .controller
            .selected_node()
            .map(|node| node.to_source())
    }

    // ─── Render loop ─────────────────────────────────────────────────────

    /// Start drawing. `now` is the host clock in ms (`performance.now()`).
    pub fn run(&self, now: f64) {
        let mut viewer = self.inner.borrow_mut();
        let Viewer {
            controller, frames, ..
        } = &mut *viewer;
        controller.surface_mut().run(now, frames);
    }

    /// Stop drawing. Safe to call when not running.
    pub fn stop(&self) {
        let mut viewer = self.inner.borrow_mut();
        let Viewer {
            controller, frames, ..
        } = &mut *viewer;
        controller.surface_mut().stop(frames);
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().controller.surface().is_running()
    }

    /// The host resized the canvas element.
    pub fn resize(&self, width: f64, height: f64) {
        self.inner.borrow_mut().controller.resize(width, height);
    }

    // ─── Input ───────────────────────────────────────────────────────────
    //
    // Each handler returns whether the view changed, so the host can
    // `preventDefault` on handled keys and wheel events.

    pub fn pointer_down(&self, x: f64, y: f64) -> bool {
        self.dispatch(InputEvent::from_pointer_down(x, y))
    }

    /// `dx`/`dy` are `MouseEvent.movementX/Y`.
    pub fn pointer_move(&self, x: f64, y: f64, dx: f64, dy: f64) -> bool {
        self.dispatch(InputEvent::from_pointer_move(x, y, dx, dy))
    }

    pub fn pointer_up(&self, x: f64, y: f64) -> bool {
        self.dispatch(InputEvent::from_pointer_up(x, y))
    }

    /// Pointer left the canvas while pressed.
    pub fn pointer_cancel(&self) {
        self.inner.borrow_mut().controller.cancel_drag();
    }

    pub fn wheel(&self, delta_y: f64) -> bool {
        self.dispatch(InputEvent::Wheel { delta_y })
    }

    /// `key` is `KeyboardEvent.key`.
    pub fn key(&self, key: &str) -> bool {
        self.dispatch(InputEvent::key(key))
    }

    fn dispatch(&self, event: InputEvent) -> bool {
        self.inner.borrow_mut().controller.handle_event(&event)
    }

    // ─── View ────────────────────────────────────────────────────────────

    /// Pan by a canvas-pixel delta.
    pub fn pan(&self, dx: f64, dy: f64) {
        self.inner
            .borrow_mut()
            .controller
            .translate_scaled(Vec2::new(dx, dy));
    }

    pub fn zoom(&self, factor: f64) {
        self.inner.borrow_mut().controller.scale(factor);
    }

    pub fn scale_factor(&self) -> f64 {
        self.inner.borrow().controller.scale_factor()
    }

    /// Re-fit the current tree to the canvas.
    pub fn soft_reset(&self) {
        self.inner.borrow_mut().controller.soft_reset();
    }

    pub fn set_editor_focused(&self, focused: bool) {
        self.inner
            .borrow_mut()
            .controller
            .set_editor_focused(focused);
    }

    pub fn set_hotkeys_enabled(&self, enabled: bool) {
        self.inner
            .borrow_mut()
            .controller
            .set_hotkeys_enabled(enabled);
    }

    // ─── Config ──────────────────────────────────────────────────────────

    /// Replace the viewer config from JSON. Missing fields take their
    /// defaults. On bad JSON the current config stays and the error
    /// message is thrown.
    pub fn set_config_json(&self, json: &str) -> Result<(), JsValue> {
        let config: ViewerConfig = serde_json::from_str(json)
            .map_err(|e| js_sys::Error::new(&format!("invalid viewer config: {e}")))?;
        let mut viewer = self.inner.borrow_mut();
        viewer.surface.set_font(&config.theme.font);
        viewer.controller.set_config(config);
        Ok(())
    }

    /// Current config as JSON.
    pub fn config_json(&self) -> String {
        serde_json::to_string(self.inner.borrow().controller.config())
            .unwrap_or_else(|e| format!(r#"{{"error":"{e}"}}"#))
    }
}

impl Drop for SxViewer {
    fn drop(&mut self) {
        if let Ok(mut viewer) = self.inner.try_borrow_mut() {
            let Viewer {
                controller, frames, ..
            } = &mut *viewer;
            controller.surface_mut().stop(frames);
        }
        self.callback.borrow_mut().take();
    }
}

// ─── Console logging ─────────────────────────────────────────────────────

#[cfg(target_arch = "wasm32")]
struct ConsoleLogger;

#[cfg(target_arch = "wasm32")]
impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&msg),
            log::Level::Warn => web_sys::console::warn_1(&msg),
            log::Level::Info => web_sys::console::info_1(&msg),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
static LOGGER: ConsoleLogger = ConsoleLogger;

/// Raise console verbosity: `"trace"`, `"debug"`, `"info"`, `"warn"`,
/// `"error"` or `"off"`. Unknown names are ignored.
#[wasm_bindgen]
pub fn set_log_level(level: &str) {
    match level.parse::<log::LevelFilter>() {
        Ok(filter) => log::set_max_level(filter),
        Err(_) => log::warn!("unknown log level {level:?}"),
    }
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("sx viewer panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
            if log::set_logger(&LOGGER).is_ok() {
                log::set_max_level(log::LevelFilter::Warn);
            }
        });
    }
}

// ─── Standalone functions (no canvas needed) ─────────────────────────────

fn error_json(err: &ParseError) -> serde_json::Value {
    let (line, column) = err.position();
    serde_json::json!({
        "ok": false,
        "error": err.to_string(),
        "line": line,
        "column": column,
    })
}

/// Validate source text. Returns JSON: `{"ok":true}` or
/// `{"ok":false,"error":"...","line":N,"column":N}`.
#[wasm_bindgen]
pub fn validate(source: &str) -> String {
    let value = match parse_sexpr(source) {
        Ok(_) => serde_json::json!({ "ok": true }),
        Err(err) => error_json(&err),
    };
    value.to_string()
}

/// Parse source text and return the AST as nested JSON arrays:
/// `{"ok":true,"tree":[...]}` or the `validate` error shape.
#[wasm_bindgen]
pub fn parse_to_json(source: &str) -> String {
    let value = match parse_sexpr(source) {
        Ok(expr) => serde_json::json!({ "ok": true, "tree": expr }),
        Err(err) => error_json(&err),
    };
    value.to_string()
}

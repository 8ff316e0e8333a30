//! Viewer tunables: zoom and pan steps, fit behaviour, plus the nested
//! parse/layout/theme configs.

use serde::{Deserialize, Serialize};
use sx_core::{LayoutConfig, ParseConfig, Theme};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Upper bound for the fit-to-canvas scale. Default: **1.5**.
    pub max_initial_scale: f64,
    /// Factor for wheel-up and `+`. Default: **1.1**.
    pub zoom_in: f64,
    /// Factor for wheel-down and `-`. Default: **0.9**.
    pub zoom_out: f64,
    /// Arrow-key pan step in canvas pixels. Default: **20**.
    pub scroll_speed: f64,
    /// Put the AST origin at the canvas center. Default: **true**.
    pub centered: bool,
    /// Re-fit the view after every successful parse. When off, a new tree
    /// keeps the current pan and zoom. Default: **true**.
    pub reset_view_on_parse: bool,
    pub parse: ParseConfig,
    pub layout: LayoutConfig,
    pub theme: Theme,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            max_initial_scale: 1.5,
            zoom_in: 1.1,
            zoom_out: 0.9,
            scroll_speed: 20.0,
            centered: true,
            reset_view_on_parse: true,
            parse: ParseConfig::default(),
            layout: LayoutConfig::default(),
            theme: Theme::default(),
        }
    }
}

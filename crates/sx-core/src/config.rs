//! Tunables for parsing, layout, and painting.
//!
//! Every struct has a `Default` matching the stock viewer and deserializes
//! with `#[serde(default)]`, so a host only needs to send the fields it
//! wants to change.

use crate::color::Color;
use serde::{Deserialize, Serialize};

// ─── Parse ────────────────────────────────────────────────────────────────

/// Configuration for `parse_sexpr_with`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Maximum list nesting. Every pass over the tree recurses once per
    /// level, so this also bounds stack use for layout, paint, and hit
    /// testing. Default: **256**.
    pub max_depth: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self { max_depth: 256 }
    }
}

// ─── Layout ───────────────────────────────────────────────────────────────

/// Node box metrics and spacing used by `TreeNode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub min_node_width: f64,
    /// Boxes never grow vertically, so this is every node's height.
    pub min_node_height: f64,
    /// Width reserved in a node's body for each child link.
    pub connector_size: f64,
    /// Horizontal gap between sibling subtrees.
    pub neighbor_spacing: f64,
    /// Vertical distance from a parent's center line to its children's.
    pub child_spacing: f64,
    /// Gap between adjacent body segments.
    pub segment_spacing: f64,
    /// Horizontal padding added around the body text.
    pub padding: f64,
    /// Speed (units per millisecond) at which children glide into their
    /// laid-out position. `0.0` places them directly.
    pub glide_velocity: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let min_node_height = 25.0;
        Self {
            min_node_width: 25.0,
            min_node_height,
            connector_size: 5.0,
            neighbor_spacing: 7.0,
            child_spacing: min_node_height * 1.5,
            segment_spacing: 3.0,
            padding: 10.0,
            glide_velocity: 0.0,
        }
    }
}

// ─── Theme ────────────────────────────────────────────────────────────────

/// Colors and stroke metrics for painting tree nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub background: Color,
    pub node_fill: Color,
    pub node_stroke: Color,
    pub text: Color,
    /// Overlay drawn over an active (hovered) subtree.
    pub highlight: Color,
    pub link: Color,
    pub link_active: Color,
    pub connector: Color,
    pub selection: Color,
    pub line_width: f64,
    /// CSS font shorthand handed to text-capable surfaces.
    pub font: String,
    /// Baseline offset of atom text below a node's center line.
    pub text_baseline: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            node_fill: Color::WHITE,
            node_stroke: Color::BLACK,
            text: Color::BLACK,
            highlight: Color::rgba8(100, 200, 100, 0.4),
            link: Color::rgba8(0, 0, 0, 0.25),
            link_active: Color::rgba8(255, 0, 0, 0.25),
            connector: Color::BLACK,
            selection: Color::rgba8(30, 110, 230, 0.9),
            line_width: 2.0,
            font: "10px sans-serif".to_string(),
            text_baseline: 4.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_spacing_follows_node_height() {
        let config = LayoutConfig::default();
        assert_eq!(config.child_spacing, 37.5);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: LayoutConfig = serde_json::from_str(r#"{"neighbor_spacing": 12}"#).unwrap();
        assert_eq!(config.neighbor_spacing, 12.0);
        assert_eq!(config.min_node_width, 25.0);

        let theme: Theme = serde_json::from_str(r##"{"highlight": "#FF000066"}"##).unwrap();
        assert_eq!(theme.highlight.to_rgba8(), [255, 0, 0, 102]);
        assert_eq!(theme.line_width, 2.0);
    }
}

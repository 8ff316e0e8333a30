//! Headless draw surface that records a display list.
//!
//! Each command keeps the transform that was current when it was issued,
//! so tests can check placement without rasterizing anything.

use crate::surface::DrawSurface;
use kurbo::{Affine, BezPath, Point, Rect};
use sx_core::{Color, MonospaceMeasure, TextMeasure};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        rect: Rect,
        transform: Affine,
    },
    FillRect {
        rect: Rect,
        color: Color,
        transform: Affine,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        width: f64,
        transform: Affine,
    },
    FillPath {
        path: BezPath,
        color: Color,
        transform: Affine,
    },
    StrokePath {
        path: BezPath,
        color: Color,
        width: f64,
        transform: Affine,
    },
    FillText {
        text: String,
        origin: Point,
        color: Color,
        transform: Affine,
    },
}

impl DrawCommand {
    /// Transform that was current when the command was recorded.
    pub fn transform(&self) -> Affine {
        match self {
            DrawCommand::Clear { transform, .. }
            | DrawCommand::FillRect { transform, .. }
            | DrawCommand::StrokeRect { transform, .. }
            | DrawCommand::FillPath { transform, .. }
            | DrawCommand::StrokePath { transform, .. }
            | DrawCommand::FillText { transform, .. } => *transform,
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    measure: MonospaceMeasure,
    current: Affine,
    stack: Vec<Affine>,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_measure(measure: MonospaceMeasure) -> Self {
        Self {
            measure,
            ..Self::default()
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain the display list, keeping the transform state.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn current_transform(&self) -> Affine {
        self.current
    }

    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    /// Text runs in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl TextMeasure for RecordingSurface {
    fn measure_text(&self, text: &str) -> f64 {
        self.measure.measure_text(text)
    }
}

impl DrawSurface for RecordingSurface {
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

    fn clear_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::Clear {
            rect,
            transform: self.current,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            color,
            transform: self.current,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            color,
            width,
            transform: self.current,
        });
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        self.commands.push(DrawCommand::FillPath {
            path: path.clone(),
            color,
            transform: self.current,
        });
    }

    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64) {
        self.commands.push(DrawCommand::StrokePath {
            path: path.clone(),
            color,
            width,
            transform: self.current,
        });
    }

    fn fill_text(&mut self, text: &str, origin: Point, color: Color) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            origin,
            color,
            transform: self.current,
        });
    }
}

//! Text measurement used to size node boxes.

/// Anything that can report the rendered width of a text run.
///
/// Draw surfaces implement this so layout matches what they paint.
pub trait TextMeasure {
    fn measure_text(&self, text: &str) -> f64;
}

/// Fixed advance per character. Used headless and by surfaces without a
/// font stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasure {
    pub char_width: f64,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        // Roughly a 10px sans-serif glyph.
        Self { char_width: 6.0 }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure_text(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.char_width
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn measure_text(&self, text: &str) -> f64 {
        (**self).measure_text(text)
    }
}

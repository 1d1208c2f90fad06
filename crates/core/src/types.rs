//! Native presentation shape model produced by the converter.
//!
//! Everything here is already in output units (EMU for positions, points for
//! font sizes) so a writer only has to serialize it.

use crate::color::Rgb;
use crate::geometry::{Frame, SLIDE_HEIGHT_EMU, SLIDE_WIDTH_EMU};
use serde::{Deserialize, Serialize};

/// A whole converted presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    /// Slide width in EMU.
    pub width: i64,

    /// Slide height in EMU.
    pub height: i64,

    /// Slides in source order.
    pub slides: Vec<Slide>,
}

impl Deck {
    /// Create an empty 16:9 deck.
    pub fn new() -> Self {
        Self {
            width: SLIDE_WIDTH_EMU,
            height: SLIDE_HEIGHT_EMU,
            slides: Vec::new(),
        }
    }

    /// Add a slide to the deck.
    pub fn add_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    /// All text of all slides, one entry per run, in shape order.
    pub fn all_text(&self) -> Vec<&str> {
        self.slides.iter().flat_map(|s| s.texts()).collect()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

/// One output slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// 1-based slide number.
    pub number: usize,

    /// Shapes in z-order (first is drawn first).
    pub shapes: Vec<Shape>,
}

impl Slide {
    /// Create a new slide with the given number.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            shapes: Vec::new(),
        }
    }

    /// Text of every run on this slide, in shape order.
    pub fn texts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for shape in &self.shapes {
            match shape {
                Shape::Text(tb) => out.extend(tb.paragraph.runs.iter().map(|r| r.text.as_str())),
                Shape::Table(table) => {
                    for row in &table.rows {
                        for cell in row {
                            out.extend(cell.paragraph.runs.iter().map(|r| r.text.as_str()));
                        }
                    }
                }
                Shape::Auto(_) => {}
            }
        }
        out
    }

    /// The first text box whose runs concatenate to `text`.
    pub fn find_text(&self, text: &str) -> Option<&TextBox> {
        self.shapes.iter().find_map(|s| match s {
            Shape::Text(tb) if tb.paragraph.text() == text => Some(tb),
            _ => None,
        })
    }
}

/// A native slide shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Auto(AutoShape),
    Text(TextBox),
    Table(Table),
}

impl Shape {
    pub fn frame(&self) -> &Frame {
        match self {
            Shape::Auto(s) => &s.frame,
            Shape::Text(t) => &t.frame,
            Shape::Table(t) => &t.frame,
        }
    }
}

/// Preset geometry of an auto shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Geometry {
    Rectangle,
    RoundedRectangle,
}

impl Geometry {
    /// DrawingML `prstGeom` name.
    pub fn preset(&self) -> &'static str {
        match self {
            Geometry::Rectangle => "rect",
            Geometry::RoundedRectangle => "roundRect",
        }
    }
}

/// Shape outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub color: Rgb,
    /// Width in EMU.
    pub width: i64,
}

/// A filled (or outlined) preset shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoShape {
    pub geometry: Geometry,
    pub frame: Frame,
    /// Solid fill, or no fill when `None`.
    pub fill: Option<Rgb>,
    /// Outline, or no line when `None`.
    pub line: Option<Line>,
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    /// Map a CSS `text-align` value.
    pub fn from_css(value: &str) -> Self {
        match value.trim() {
            "center" => Align::Center,
            "right" => Align::Right,
            _ => Align::Left,
        }
    }

    /// DrawingML `algn` value.
    pub fn ooxml(&self) -> &'static str {
        match self {
            Align::Left => "l",
            Align::Center => "ctr",
            Align::Right => "r",
        }
    }
}

/// Vertical anchoring of text inside its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Anchor {
    #[default]
    Top,
    Middle,
}

/// A run of uniformly formatted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub size_pt: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: Rgb,
    pub font: String,
}

impl TextRun {
    pub fn new(text: impl Into<String>, size_pt: f64, color: Rgb, font: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            size_pt,
            bold: false,
            italic: false,
            underline: false,
            color,
            font: font.into(),
        }
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn underline(mut self, underline: bool) -> Self {
        self.underline = underline;
        self
    }
}

/// A single paragraph of runs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Paragraph {
    pub align: Align,
    pub runs: Vec<TextRun>,
}

impl Paragraph {
    pub fn new(align: Align) -> Self {
        Self {
            align,
            runs: Vec::new(),
        }
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A free-floating text box with zero insets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    pub frame: Frame,
    pub paragraph: Paragraph,
    pub anchor: Anchor,
    pub wrap: bool,
}

/// Outline applied to all four edges of a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellBorder {
    pub color: Rgb,
    /// Width in EMU.
    pub width: i64,
    pub dashed: bool,
}

/// One table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    pub paragraph: Paragraph,
    pub fill: Option<Rgb>,
    pub border: CellBorder,
    /// Left/right margin in EMU.
    pub margin_x: i64,
    /// Top/bottom margin in EMU.
    pub margin_y: i64,
}

/// A native table. Rendered without any built-in table style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub frame: Frame,
    /// Column widths in EMU.
    pub columns: Vec<i64>,
    /// Row height in EMU.
    pub row_height: i64,
    /// Rows of cells; every row has `columns.len()` cells.
    pub rows: Vec<Vec<TableCell>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_presets() {
        assert_eq!(Geometry::Rectangle.preset(), "rect");
        assert_eq!(Geometry::RoundedRectangle.preset(), "roundRect");
    }
}

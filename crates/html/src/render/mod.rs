//! Block renderers: one per classified block kind, all drawing onto a
//! [`SlideCanvas`].

pub mod chrome;
pub mod content;
pub mod inline;
pub mod legend;
pub mod planning;
pub mod section;
pub mod table;

use deck_core::geometry::pt_to_emu;
use deck_core::{
    Align, Anchor, AutoShape, Frame, Geometry, Line, Paragraph, PxRect, Result, Rgb, Shape, Table,
    TextBox, TextRun,
};

/// Colors used when CSS provides nothing.
pub mod palette {
    use deck_core::Rgb;

    pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);
    pub const TEXT: Rgb = Rgb(0x33, 0x33, 0x33);
    pub const MUTED: Rgb = Rgb(0x66, 0x66, 0x66);
    pub const BORDER: Rgb = Rgb(0xCC, 0xCC, 0xCC);
    pub const ACCENT: Rgb = Rgb(0x00, 0x62, 0x72);
    pub const ALERT: Rgb = Rgb(0xCC, 0x00, 0x00);
}

/// Formatting for a single-run text box.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub size_pt: f64,
    pub bold: bool,
    pub color: Rgb,
    pub align: Align,
    pub anchor: Anchor,
}

impl TextStyle {
    pub fn new(size_pt: f64, color: Rgb) -> Self {
        Self {
            size_pt,
            bold: false,
            color,
            align: Align::Left,
            anchor: Anchor::Top,
        }
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn middle(mut self) -> Self {
        self.anchor = Anchor::Middle;
        self
    }
}

/// Collects the native shapes of one slide.
#[derive(Debug)]
pub struct SlideCanvas {
    font: String,
    shapes: Vec<Shape>,
}

impl SlideCanvas {
    pub fn new(font: impl Into<String>) -> Self {
        Self {
            font: font.into(),
            shapes: Vec::new(),
        }
    }

    pub fn into_shapes(self) -> Vec<Shape> {
        self.shapes
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Add a preset shape. `line` is `(color, width in points)`.
    pub fn shape(
        &mut self,
        geometry: Geometry,
        rect: PxRect,
        fill: Option<Rgb>,
        line: Option<(Rgb, f64)>,
    ) -> Result<()> {
        self.shapes.push(Shape::Auto(AutoShape {
            geometry,
            frame: Frame::from_rect(&rect)?,
            fill,
            line: line.map(|(color, pt)| Line {
                color,
                width: pt_to_emu(pt),
            }),
        }));
        Ok(())
    }

    /// Filled rectangle without outline.
    pub fn rect(&mut self, rect: PxRect, fill: Rgb) -> Result<()> {
        self.shape(Geometry::Rectangle, rect, Some(fill), None)
    }

    /// Filled rounded rectangle without outline.
    pub fn rounded_rect(&mut self, rect: PxRect, fill: Rgb) -> Result<()> {
        self.shape(Geometry::RoundedRectangle, rect, Some(fill), None)
    }

    /// Single-run text box. Blank text draws nothing.
    pub fn text(&mut self, rect: PxRect, text: &str, style: TextStyle) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }
        let run = TextRun::new(text, style.size_pt, style.color, self.font.as_str()).bold(style.bold);
        self.runs(rect, vec![run], style.align, style.anchor)
    }

    /// Multi-run text box. No runs draws nothing.
    pub fn runs(&mut self, rect: PxRect, runs: Vec<TextRun>, align: Align, anchor: Anchor) -> Result<()> {
        if runs.is_empty() {
            return Ok(());
        }
        self.shapes.push(Shape::Text(TextBox {
            frame: Frame::from_rect(&rect)?,
            paragraph: Paragraph { align, runs },
            anchor,
            wrap: true,
        }));
        Ok(())
    }

    pub fn table(&mut self, table: Table) {
        self.shapes.push(Shape::Table(table));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_is_not_drawn() {
        let mut canvas = SlideCanvas::new("Arial");
        canvas
            .text(PxRect::new(0.0, 0.0, 10.0, 10.0), "  ", TextStyle::new(8.0, palette::TEXT))
            .unwrap();
        canvas
            .runs(PxRect::new(0.0, 0.0, 10.0, 10.0), vec![], Align::Left, Anchor::Top)
            .unwrap();
        assert!(canvas.shapes().is_empty());
    }

    #[test]
    fn test_shape_line_width_in_points() {
        let mut canvas = SlideCanvas::new("Arial");
        canvas
            .shape(
                Geometry::Rectangle,
                PxRect::new(0.0, 0.0, 10.0, 10.0),
                None,
                Some((palette::BORDER, 0.75)),
            )
            .unwrap();
        match &canvas.shapes()[0] {
            Shape::Auto(s) => assert_eq!(s.line.map(|l| l.width), Some(9525)),
            other => panic!("unexpected shape {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_geometry_is_an_error() {
        let mut canvas = SlideCanvas::new("Arial");
        assert!(canvas.rect(PxRect::new(0.0, 1e12, 10.0, 10.0), palette::WHITE).is_err());
    }
}

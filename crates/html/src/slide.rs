//! Rendering of one slide container into native shapes.

use crate::classify::{classify_slide, BlockKind};
use crate::render::chrome::render_chrome;
use crate::render::legend::{render_legend, render_link};
use crate::render::section::render_section;
use crate::render::table::render_table;
use crate::render::{palette, SlideCanvas, TextStyle};
use crate::style::StyleContext;
use deck_core::{PxRect, Result, Shape};
use scraper::ElementRef;

/// Result of rendering one slide.
#[derive(Debug, Clone, PartialEq)]
pub enum SlideOutcome {
    /// The slide rendered completely.
    Rendered(Vec<Shape>),
    /// The slide failed; `placeholder` holds the error text box shown instead.
    Failed { message: String, placeholder: Vec<Shape> },
}

impl SlideOutcome {
    /// Shapes to put on the output slide, whichever way it went.
    pub fn into_shapes(self) -> Vec<Shape> {
        match self {
            SlideOutcome::Rendered(shapes) => shapes,
            SlideOutcome::Failed { placeholder, .. } => placeholder,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SlideOutcome::Failed { .. })
    }
}

/// Renders slides against one document's stylesheet and font.
pub struct SlideRenderer<'c> {
    ctx: &'c StyleContext,
}

impl<'c> SlideRenderer<'c> {
    pub fn new(ctx: &'c StyleContext) -> Self {
        Self { ctx }
    }

    /// Render a slide, turning any failure into an error placeholder.
    /// `index` is 0-based and only used for logging.
    pub fn render(&self, slide: ElementRef<'_>, index: usize, total: usize) -> SlideOutcome {
        match self.try_render(slide) {
            Ok(shapes) => {
                log::info!("[{}/{}] rendered {} shapes", index + 1, total, shapes.len());
                SlideOutcome::Rendered(shapes)
            }
            Err(e) => {
                log::warn!("[{}/{}] rendering failed: {}", index + 1, total, e);
                let message = e.to_string();
                SlideOutcome::Failed {
                    placeholder: self.placeholder(&message),
                    message,
                }
            }
        }
    }

    /// Chrome, then content blocks in source order, then legends, then links.
    pub fn try_render(&self, slide: ElementRef<'_>) -> Result<Vec<Shape>> {
        let ctx = self.ctx;
        let layout = classify_slide(slide, ctx);
        let mut canvas = SlideCanvas::new(ctx.font.as_str());

        for block in &layout.chrome {
            render_chrome(ctx, &mut canvas, slide, block)?;
        }
        for block in &layout.content {
            match block.kind {
                BlockKind::Table => {
                    if let Some(table) = crate::dom::find_tag(block.element, "table") {
                        render_table(ctx, &mut canvas, table, block.bounds)?;
                    }
                }
                _ => render_section(ctx, &mut canvas, block)?,
            }
        }
        for block in &layout.legends {
            render_legend(ctx, &mut canvas, block)?;
        }
        for block in &layout.links {
            render_link(ctx, &mut canvas, block)?;
        }

        Ok(canvas.into_shapes())
    }

    fn placeholder(&self, message: &str) -> Vec<Shape> {
        let mut canvas = SlideCanvas::new(self.ctx.font.as_str());
        let text = format!("Slide rendering error: {}", message);
        if let Err(e) = canvas.text(
            PxRect::new(30.0, 250.0, 900.0, 40.0),
            &text,
            TextStyle::new(10.0, palette::ALERT),
        ) {
            log::warn!("could not build error placeholder: {}", e);
        }
        canvas.into_shapes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;
    use deck_core::Stylesheet;
    use scraper::Html;

    fn outcome(body: &str) -> SlideOutcome {
        let html = format!("<div class=\"slide\">{}</div>", body);
        let doc = Html::parse_fragment(&html);
        let slide = dom::find_class(doc.root_element(), "slide").unwrap();
        let ctx = StyleContext::new(Stylesheet::new(), "Arial");
        SlideRenderer::new(&ctx).render(slide, 0, 1)
    }

    #[test]
    fn test_render_order() {
        let out = outcome(
            r#"<a class="link-text" style="top:400px" href="x">Link</a>
               <div style="position:absolute;bottom:30px"><span style="color:red">●</span> Key</div>
               <div style="position:absolute;top:300px;left:20px"><table><tr><td>T</td></tr></table></div>
               <div class="main-title">Title</div>"#,
        );
        let shapes = out.into_shapes();
        let kinds: Vec<&str> = shapes
            .iter()
            .map(|s| match s {
                Shape::Text(tb) if tb.paragraph.text() == "Title" => "title",
                Shape::Table(_) => "table",
                Shape::Text(tb) if tb.paragraph.text() == "Link" => "link",
                Shape::Text(_) => "legend",
                Shape::Auto(_) => "auto",
            })
            .collect();
        assert_eq!(kinds, vec!["title", "table", "legend", "link"]);
    }

    #[test]
    fn test_out_of_range_geometry_becomes_placeholder() {
        let out = outcome(r#"<div style="position:absolute;top:99999999999px;left:0"><table><tr><td>x</td></tr></table></div>"#);
        assert!(out.is_failed());
        match &out {
            SlideOutcome::Failed { message, placeholder } => {
                assert!(message.contains("Geometry"));
                match &placeholder[0] {
                    Shape::Text(tb) => {
                        assert!(tb.paragraph.text().starts_with("Slide rendering error: "));
                        assert_eq!(tb.paragraph.runs[0].size_pt, 10.0);
                        assert_eq!(tb.paragraph.runs[0].color, palette::ALERT);
                        assert_eq!(tb.frame.to_rect(), PxRect::new(30.0, 250.0, 900.0, 40.0));
                    }
                    other => panic!("unexpected {:?}", other),
                }
            }
            SlideOutcome::Rendered(_) => unreachable!(),
        }
    }
}

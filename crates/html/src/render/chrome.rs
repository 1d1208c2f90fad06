//! Slide chrome: top bar, date box, title and footer.

use super::{palette, SlideCanvas, TextStyle};
use crate::classify::{BlockKind, SlideBlock, FOOTER_CLASSES};
use crate::dom;
use crate::style::StyleContext;
use deck_core::geometry::CANVAS_WIDTH_PX;
use deck_core::{Align, PxRect, Result};
use scraper::ElementRef;

/// Render one chrome block. `slide` is searched for footer parts that live
/// outside the footer element.
pub fn render_chrome(
    ctx: &StyleContext,
    canvas: &mut SlideCanvas,
    slide: ElementRef<'_>,
    block: &SlideBlock<'_>,
) -> Result<()> {
    let el = block.element;
    let rect = block.bounds;
    match block.kind {
        BlockKind::TopBar => {
            let style = ctx.resolve(el, &[".top-bar"]);
            canvas.rect(rect, style.background().unwrap_or(palette::BORDER))
        }
        BlockKind::DateBox => {
            let style = ctx.resolve(el, &[".date-box"]);
            canvas.rect(rect, style.background().unwrap_or(palette::BORDER))?;
            canvas.text(
                rect,
                &dom::text_content(el),
                TextStyle::new(
                    style.font_pt_or(14.0),
                    style.color("color").unwrap_or(palette::WHITE),
                )
                .bold(style.is_bold_or(true))
                .align(Align::Center)
                .middle(),
            )
        }
        BlockKind::Title => {
            let style = ctx.resolve(el, &[".main-title"]);
            canvas.text(
                rect,
                &dom::text_content(el),
                TextStyle::new(
                    style.font_pt_or(42.0),
                    style.color("color").unwrap_or(palette::ACCENT),
                )
                .bold(style.is_bold_or(true)),
            )
        }
        BlockKind::Footer => render_footer(ctx, canvas, slide, block),
        other => {
            log::debug!("{:?} is not a chrome block", other);
            Ok(())
        }
    }
}

fn render_footer(
    ctx: &StyleContext,
    canvas: &mut SlideCanvas,
    slide: ElementRef<'_>,
    block: &SlideBlock<'_>,
) -> Result<()> {
    let footer = block.element;
    let rect = block.bounds;
    let own = FOOTER_CLASSES
        .iter()
        .find(|class| dom::has_class(footer, class))
        .map(|class| format!(".{}", class))
        .unwrap_or_default();
    let style = ctx.resolve(footer, &[".footer-bar", ".bottom-bar", ".footer", own.as_str()]);
    canvas.rect(rect, style.background().unwrap_or(palette::BORDER))?;

    let part = |class: &str| dom::find_class(footer, class).or_else(|| dom::find_class(slide, class));

    if let Some(number) = part("page-number") {
        let style = ctx.resolve(number, &[".page-number"]);
        canvas.text(
            PxRect::new(20.0, rect.top, 100.0, rect.height),
            &dom::text_content(number),
            TextStyle::new(
                style.font_pt_or(14.0),
                style.color("color").unwrap_or(palette::WHITE),
            )
            .middle(),
        )?;
    }

    if let Some(logo) = part("logo") {
        let style = ctx.resolve(logo, &[".logo"]);
        canvas.text(
            PxRect::new(CANVAS_WIDTH_PX - 140.0, rect.top, 120.0, rect.height),
            &dom::text_content(logo),
            TextStyle::new(
                style.font_pt_or(18.0),
                style.color("color").unwrap_or(palette::WHITE),
            )
            .bold(style.is_bold_or(true))
            .align(Align::Right)
            .middle(),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify_slide;
    use deck_core::{Anchor, Rgb, Shape, Stylesheet};
    use scraper::Html;

    fn render(body: &str, css: &str) -> Vec<Shape> {
        let html = format!("<div class=\"slide\">{}</div>", body);
        let doc = Html::parse_fragment(&html);
        let slide = dom::find_class(doc.root_element(), "slide").unwrap();
        let ctx = StyleContext::new(Stylesheet::parse(css), "Arial");
        let layout = classify_slide(slide, &ctx);
        let mut canvas = SlideCanvas::new("Arial");
        for block in &layout.chrome {
            render_chrome(&ctx, &mut canvas, slide, block).unwrap();
        }
        canvas.into_shapes()
    }

    #[test]
    fn test_date_box_centered() {
        let shapes = render(r#"<div class="date-box">Q3 2024</div>"#, ".date-box { background: #006272 }");
        match (&shapes[0], &shapes[1]) {
            (Shape::Auto(bg), Shape::Text(text)) => {
                assert_eq!(bg.fill, Some(Rgb(0x00, 0x62, 0x72)));
                assert_eq!(bg.frame.to_rect(), PxRect::new(860.0, 8.0, 100.0, 50.0));
                assert_eq!(text.paragraph.align, Align::Center);
                assert_eq!(text.anchor, Anchor::Middle);
                assert_eq!(text.paragraph.runs[0].size_pt, 10.5);
                assert!(text.paragraph.runs[0].bold);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_title_defaults() {
        let shapes = render(r#"<div class="main-title">Project Status</div>"#, "");
        match &shapes[0] {
            Shape::Text(tb) => {
                let rect = tb.frame.to_rect();
                assert_eq!((rect.left, rect.top, rect.width), (30.0, 20.0, 800.0));
                assert!((rect.height - 58.8).abs() < 0.01);
                assert_eq!(tb.paragraph.runs[0].size_pt, 31.5);
                assert_eq!(tb.paragraph.runs[0].color, palette::ACCENT);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_footer_parts_found_outside_footer() {
        let shapes = render(
            r#"<div class="footer-bar"></div><span class="page-number">7</span><span class="logo">ACME</span>"#,
            "",
        );
        assert_eq!(shapes.len(), 3);
        match (&shapes[1], &shapes[2]) {
            (Shape::Text(number), Shape::Text(logo)) => {
                assert_eq!(number.paragraph.text(), "7");
                assert_eq!(number.frame.to_rect(), PxRect::new(20.0, 508.0, 100.0, 32.0));
                assert_eq!(logo.paragraph.text(), "ACME");
                assert_eq!(logo.paragraph.align, Align::Right);
                assert_eq!(logo.frame.to_rect().left, 820.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}

//! Progress bars of a planning section.

use super::content::{ContentArea, ContentRenderer};
use super::inline::{element_runs, InlineFormat};
use super::{palette, SlideCanvas, TextStyle};
use crate::dom;
use crate::style::StyleContext;
use deck_core::css::{pct, px_to_pt};
use deck_core::{Align, Anchor, PxRect, Result};
use scraper::ElementRef;

/// Horizontal inset of bars from the section edges.
const BAR_INSET: f64 = 12.0;
/// Vertical gap between bars.
const BAR_GAP: f64 = 8.0;
/// Advance after a text line between bars.
const TEXT_STEP: f64 = 16.0;

/// Rounded, filled div with a height: the track of a progress bar.
fn is_track(el: ElementRef<'_>) -> bool {
    if !dom::is_tag(el, "div") {
        return false;
    }
    let style = dom::inline_style(el);
    style.has("border-radius") && style.has("height") && style.background().is_some()
}

/// Whether the box holds a progress bar among its grandchildren.
pub fn has_progress_bar(box_el: ElementRef<'_>) -> bool {
    dom::child_elements(box_el).any(|child| dom::child_elements(child).any(is_track))
}

/// Draw the bars and text lines of a planning box. Bars span the section
/// width; the first one starts `INSET` below the box top.
pub fn render_planning(
    ctx: &StyleContext,
    canvas: &mut SlideCanvas,
    box_el: ElementRef<'_>,
    frame: PxRect,
    section: PxRect,
) -> Result<()> {
    let left = section.left;
    let width = section.width;
    let bar_width = width - 2.0 * BAR_INSET;
    let mut y = frame.top + super::content::INSET;

    for child in dom::child_elements(box_el) {
        let mut drew_bar = false;

        for track in dom::child_elements(child).filter(|el| is_track(*el)) {
            let style = dom::inline_style(track);
            let fills: Vec<_> = dom::child_elements(track)
                .filter(|fd| dom::is_tag(*fd, "div") && dom::inline_style(*fd).background().is_some())
                .collect();
            let labels: Vec<_> = dom::child_elements(track)
                .filter(|sp| dom::is_tag(*sp, "span"))
                .collect();
            if fills.is_empty() && labels.is_empty() {
                continue;
            }
            let Some(track_color) = style.background() else {
                continue;
            };
            drew_bar = true;

            let height = style.px_or("height", 16.0);
            canvas.rounded_rect(PxRect::new(left + BAR_INSET, y, bar_width, height), track_color)?;

            for fill in fills {
                let fill_style = dom::inline_style(fill);
                let Some(color) = fill_style.background() else {
                    continue;
                };
                let percent = fill_style
                    .get("width")
                    .and_then(pct)
                    .unwrap_or(0.0)
                    .clamp(0.0, 100.0);
                let fill_width = bar_width * percent / 100.0;
                if fill_width > 0.0 {
                    canvas.rounded_rect(PxRect::new(left + BAR_INSET, y, fill_width, height), color)?;
                }
            }

            for label in labels {
                let text = dom::text_content(label);
                if !text.contains('%') {
                    continue;
                }
                let label_style = dom::inline_style(label);
                let size_pt = label_style.px("font-size").map(px_to_pt).unwrap_or(8.0);
                let color = label_style.color("color").unwrap_or(palette::TEXT);
                canvas.text(
                    PxRect::new(left + bar_width - 60.0, y, 72.0, height),
                    &text,
                    TextStyle::new(size_pt, color).align(Align::Right),
                )?;
            }

            y += height + BAR_GAP;
        }

        if drew_bar || !dom::is_tag(child, "div") || dom::text_content(child).is_empty() {
            continue;
        }

        let line = PxRect::new(left + BAR_INSET, y, width - 2.0 * BAR_INSET, 14.0);
        if dom::has_block_children(child) {
            let runs = element_runs(ctx, child, InlineFormat::new(8.0, palette::TEXT).skip_blocks());
            canvas.runs(line, runs, Align::Left, Anchor::Top)?;
            y += TEXT_STEP;
            let area = ContentArea::new(left, width).with_indent(BAR_INSET);
            y = ContentRenderer::new(ctx)
                .without_loose_text()
                .render(canvas, child, area, y)?;
        } else {
            let runs = element_runs(ctx, child, InlineFormat::new(8.0, palette::TEXT));
            canvas.runs(line, runs, Align::Left, Anchor::Top)?;
            y += TEXT_STEP;
        }
    }

    log::debug!("planning box rendered down to y={}", y);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{Geometry, Rgb, Shape, Stylesheet};
    use scraper::Html;

    const BOX: &str = r#"<div class="section-box">
        <div>
          <div style="height:12px;border-radius:6px;background:#eeeeee">
            <div style="width:40%;background:#00aa00"></div>
            <span style="color:#111111">40%</span>
          </div>
        </div>
        <div>Phase 2 <strong>kickoff</strong><ul><li>Vendors</li></ul></div>
        <div>Wrap-up</div>
      </div>"#;

    fn render() -> Vec<Shape> {
        let doc = Html::parse_fragment(BOX);
        let box_el = dom::find_class(doc.root_element(), "section-box").unwrap();
        let ctx = StyleContext::new(Stylesheet::new(), "Arial");
        let mut canvas = SlideCanvas::new("Arial");
        render_planning(
            &ctx,
            &mut canvas,
            box_el,
            PxRect::new(30.0, 120.0, 900.0, 80.0),
            PxRect::new(30.0, 100.0, 900.0, 100.0),
        )
        .unwrap();
        canvas.into_shapes()
    }

    #[test]
    fn test_detects_progress_bar() {
        let doc = Html::parse_fragment(BOX);
        let box_el = dom::find_class(doc.root_element(), "section-box").unwrap();
        assert!(has_progress_bar(box_el));

        let doc = Html::parse_fragment(r#"<div class="section-box"><div><div style="height:4px">x</div></div></div>"#);
        let box_el = dom::find_class(doc.root_element(), "section-box").unwrap();
        assert!(!has_progress_bar(box_el));
    }

    #[test]
    fn test_bar_track_fill_and_label() {
        let shapes = render();
        match (&shapes[0], &shapes[1]) {
            (Shape::Auto(track), Shape::Auto(fill)) => {
                assert_eq!(track.geometry, Geometry::RoundedRectangle);
                assert_eq!(track.frame.to_rect(), PxRect::new(42.0, 128.0, 876.0, 12.0));
                assert_eq!(fill.fill, Some(Rgb(0x00, 0xAA, 0x00)));
                assert!((fill.frame.to_rect().width - 350.4).abs() < 0.01);
            }
            other => panic!("unexpected shapes {:?}", other),
        }
        match &shapes[2] {
            Shape::Text(tb) => {
                assert_eq!(tb.paragraph.text(), "40%");
                assert_eq!(tb.paragraph.align, Align::Right);
                assert_eq!(tb.frame.to_rect().left, 30.0 + 876.0 - 60.0);
            }
            other => panic!("unexpected shape {:?}", other),
        }
    }

    #[test]
    fn test_text_lines_follow_bars() {
        let shapes = render();
        let texts: Vec<(String, f64)> = shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Text(tb) => Some((tb.paragraph.text(), tb.frame.to_rect().top)),
                _ => None,
            })
            .collect();
        assert_eq!(
            texts,
            vec![
                ("40%".to_string(), 128.0),
                ("Phase 2 kickoff".to_string(), 148.0),
                ("\u{2022}".to_string(), 164.0),
                ("Vendors".to_string(), 164.0),
                ("Wrap-up".to_string(), 177.0),
            ]
        );
    }
}

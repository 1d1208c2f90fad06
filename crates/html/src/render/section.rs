//! Sections: header separator and title, bordered content box, and the
//! content inside it.

use super::content::{ContentArea, ContentRenderer, INSET};
use super::planning::render_planning;
use super::table::render_table;
use super::{palette, SlideCanvas, TextStyle};
use crate::classify::{BlockKind, ResolvedBox, SlideBlock, DEFAULT_PLANNING_WIDTH};
use crate::dom;
use crate::style::StyleContext;
use deck_core::color::border_color;
use deck_core::css::px_to_pt;
use deck_core::geometry::CANVAS_WIDTH_PX;
use deck_core::{Geometry, PxRect, Result};
use scraper::ElementRef;

/// Outline width of a content box, in points.
const BOX_LINE_PT: f64 = 0.75;
/// Width of one trend item.
const TREND_ITEM_WIDTH: f64 = 80.0;

/// Render a section, section-table or planning block.
pub fn render_section(ctx: &StyleContext, canvas: &mut SlideCanvas, block: &SlideBlock<'_>) -> Result<()> {
    render_header(ctx, canvas, block)?;

    let Some(boxed) = block.content_box else {
        return Ok(());
    };
    render_box(ctx, canvas, &boxed)?;

    let box_el = boxed.element();
    let frame = boxed.frame;
    match block.kind {
        BlockKind::SectionTable => match dom::find_tag(box_el, "table") {
            // Sits 2px inside the box outline, not at the content inset.
            Some(table) => render_table(
                ctx,
                canvas,
                table,
                PxRect::new(frame.left + 2.0, frame.top + 2.0, frame.width - 4.0, 0.0),
            ),
            None => Ok(()),
        },
        BlockKind::Planning => {
            // Bars span their own default width; header and box keep the section's.
            let width = dom::inline_style(block.element).length_or(
                "width",
                DEFAULT_PLANNING_WIDTH,
                CANVAS_WIDTH_PX,
            );
            let bars = PxRect::new(block.bounds.left, block.bounds.top, width, block.bounds.height);
            render_planning(ctx, canvas, box_el, frame, bars)
        }
        _ => match trend_box(box_el) {
            Some(trend) => render_trend(ctx, canvas, trend, &frame),
            None => {
                let area = ContentArea::new(frame.left, frame.width);
                ContentRenderer::new(ctx)
                    .render(canvas, box_el, area, frame.top + INSET)
                    .map(|_| ())
            }
        },
    }
}

fn render_header(ctx: &StyleContext, canvas: &mut SlideCanvas, block: &SlideBlock<'_>) -> Result<()> {
    let PxRect { left, top, width, .. } = block.bounds;

    let separator = dom::find_class(block.element, "section-header")
        .map(|header| ctx.resolve(header, &[".section-header"]))
        .and_then(|style| style.get("border-top").and_then(border_color))
        .unwrap_or(palette::BORDER);
    canvas.rect(PxRect::new(left, top, width, 1.0), separator)?;

    if let Some(title) = dom::find_class(block.element, "section-title") {
        let style = ctx.resolve(title, &[".section-title"]);
        canvas.text(
            PxRect::new(left, top + 2.0, width, 16.0),
            &dom::text_content(title),
            TextStyle::new(
                style.font_pt_or(13.0),
                style.color("color").unwrap_or(palette::ACCENT),
            )
            .bold(style.is_bold_or(true)),
        )?;
    }
    Ok(())
}

fn render_box(ctx: &StyleContext, canvas: &mut SlideCanvas, boxed: &ResolvedBox<'_>) -> Result<()> {
    let style = ctx.resolve(boxed.element(), &[".section-box"]);
    let fill = style.background().unwrap_or(palette::WHITE);
    let line = style
        .get("border")
        .and_then(border_color)
        .unwrap_or(palette::BORDER);
    canvas.shape(Geometry::Rectangle, boxed.frame, Some(fill), Some((line, BOX_LINE_PT)))
}

/// The box itself when it is a trend box, else a trend box inside it.
fn trend_box(box_el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    if dom::has_class(box_el, "trend-box") {
        return Some(box_el);
    }
    dom::find_class(box_el, "trend-box")
}

/// A row of `.trend-item` labels.
fn render_trend(
    ctx: &StyleContext,
    canvas: &mut SlideCanvas,
    trend: ElementRef<'_>,
    frame: &PxRect,
) -> Result<()> {
    let item_css = ctx.css(&[".trend-item"]);
    let base_size = item_css.font_pt_or(14.0);
    let bold = item_css.is_bold_or(true);
    let base_color = item_css.color("color").unwrap_or(palette::TEXT);
    let gap = ctx.css(&[".trend-box"]).px_or("gap", 30.0);

    let own = dom::inline_style(trend);
    let y = own
        .px("top")
        .filter(|t| *t > 0.0)
        .unwrap_or(frame.top + 10.0);
    let mut x = own.px("left").filter(|l| *l > 0.0).unwrap_or(frame.left) + INSET;

    for item in dom::find_all_class(trend, "trend-item") {
        let style = dom::inline_style(item);
        let size_pt = style.px("font-size").map(px_to_pt).unwrap_or(base_size);
        let color = style.color("color").unwrap_or(base_color);
        canvas.text(
            PxRect::new(x, y, TREND_ITEM_WIDTH, 20.0),
            &dom::text_content(item),
            TextStyle::new(size_pt, color).bold(bold),
        )?;
        x += TREND_ITEM_WIDTH + gap;
    }
    Ok(())
}

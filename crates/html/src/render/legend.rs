//! Bottom-anchored legends and link lines.

use super::inline::{element_runs, InlineFormat};
use super::{palette, SlideCanvas};
use crate::classify::SlideBlock;
use crate::dom;
use crate::style::StyleContext;
use deck_core::css::px_to_pt;
use deck_core::{Align, Anchor, Result};

/// A legend line: colored dots and labels. Runs without a color of their
/// own take the legend's.
pub fn render_legend(ctx: &StyleContext, canvas: &mut SlideCanvas, block: &SlideBlock<'_>) -> Result<()> {
    let style = dom::inline_style(block.element);
    let size_pt = px_to_pt(style.px_or("font-size", 11.0));
    let color = style.color("color").unwrap_or(palette::MUTED);
    let runs = element_runs(ctx, block.element, InlineFormat::new(size_pt, color));
    canvas.runs(block.bounds, runs, Align::Left, Anchor::Top)
}

/// One underlined `a.link-text` line.
pub fn render_link(ctx: &StyleContext, canvas: &mut SlideCanvas, block: &SlideBlock<'_>) -> Result<()> {
    let style = ctx.resolve(block.element, &[".link-text"]);
    let text = dom::text_content(block.element);
    if text.is_empty() {
        return Ok(());
    }
    let run = ctx
        .run(
            text,
            style.font_pt_or(12.0),
            style.color("color").unwrap_or(palette::ACCENT),
        )
        .underline(true);
    canvas.runs(block.bounds, vec![run], Align::Left, Anchor::Top)
}

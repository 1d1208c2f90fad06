//! Recursive rich content inside a section box.
//!
//! Layout is a single vertical cursor: every renderer takes the current `y`
//! and returns the `y` below what it drew.

use super::inline::{element_runs, node_runs, InlineFormat};
use super::{palette, SlideCanvas, TextStyle};
use crate::dom::{self, INLINE_TAGS};
use crate::style::StyleContext;
use deck_core::css::px_to_pt;
use deck_core::{Align, Anchor, Error, PxRect, Result, Rgb};
use scraper::node::Node;
use scraper::ElementRef;

/// Deepest block nesting rendered before the slide is given up.
pub const MAX_NESTING: usize = 32;

/// Inset of content from the box edges.
pub const INSET: f64 = 8.0;

/// Default list line height.
const LINE_HEIGHT: f64 = 13.0;
/// Advance after a single line of text.
const LINE_STEP: f64 = 14.0;
/// Extra indent of a nested list.
const LIST_INDENT: f64 = 16.0;
/// Marker size for list items, in points.
const MARKER_PT: f64 = 8.0;

const DEFAULT_BULLET: &str = "\u{25aa}";

/// Horizontal extent, base font size and nesting depth of a content pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentArea {
    pub left: f64,
    pub width: f64,
    pub indent: f64,
    pub size_pt: f64,
    pub depth: usize,
}

impl ContentArea {
    /// Area covering a box of the given left edge and width, at 8pt.
    pub fn new(left: f64, width: f64) -> Self {
        Self {
            left,
            width,
            indent: 0.0,
            size_pt: 8.0,
            depth: 0,
        }
    }

    pub fn with_indent(mut self, indent: f64) -> Self {
        self.indent = indent;
        self
    }

    pub fn x(&self) -> f64 {
        self.left + INSET + self.indent
    }

    pub fn inner_width(&self) -> f64 {
        self.width - 2.0 * INSET - self.indent
    }

    /// One level deeper, with extra indent and a new base size.
    fn nested(&self, extra_indent: f64, size_pt: f64) -> Result<Self> {
        let depth = self.depth + 1;
        if depth > MAX_NESTING {
            return Err(Error::NestingTooDeep { depth });
        }
        Ok(Self {
            indent: self.indent + extra_indent,
            size_pt,
            depth,
            ..*self
        })
    }
}

/// Glyph, color and size of `.bullet-item` markers.
#[derive(Debug, Clone, PartialEq)]
struct BulletStyle {
    glyph: String,
    color: Rgb,
    size_pt: f64,
}

impl BulletStyle {
    fn from_sheet(ctx: &StyleContext) -> Self {
        let before = ctx.css(&[".bullet-item::before"]);
        Self {
            glyph: before
                .get("content")
                .and_then(css_content)
                .unwrap_or_else(|| DEFAULT_BULLET.to_string()),
            color: before.color("color").unwrap_or(palette::ALERT),
            size_pt: before.font_pt_or(10.0),
        }
    }
}

/// Decode a CSS `content` string: strip quotes and resolve `\XXXX` escapes.
fn css_content(value: &str) -> Option<String> {
    let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
    let mut out = String::new();
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let mut hex = String::new();
        while let Some(h) = chars.peek().copied().filter(|h| h.is_ascii_hexdigit()) {
            if hex.len() == 6 {
                break;
            }
            hex.push(h);
            chars.next();
        }
        if hex.is_empty() {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
            continue;
        }
        if chars.peek() == Some(&' ') {
            chars.next();
        }
        if let Some(decoded) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
            out.push(decoded);
        }
    }
    let out = out.trim().to_string();
    (!out.is_empty()).then_some(out)
}

/// Renders the children of a box, recursing into nested blocks.
pub struct ContentRenderer<'c> {
    ctx: &'c StyleContext,
    bullet: BulletStyle,
    loose_text: bool,
}

impl<'c> ContentRenderer<'c> {
    pub fn new(ctx: &'c StyleContext) -> Self {
        Self {
            ctx,
            bullet: BulletStyle::from_sheet(ctx),
            loose_text: true,
        }
    }

    /// Ignore bare text and inline elements between blocks. Used when the
    /// caller already drew the parent's inline text as a line of its own.
    pub fn without_loose_text(mut self) -> Self {
        self.loose_text = false;
        self
    }

    /// Render the children of `parent` starting at `y`; returns the new `y`.
    pub fn render(
        &self,
        canvas: &mut SlideCanvas,
        parent: ElementRef<'_>,
        area: ContentArea,
        mut y: f64,
    ) -> Result<f64> {
        let mut loose = Vec::new();

        for node in parent.children() {
            let Some(child) = ElementRef::wrap(node) else {
                if self.loose_text && matches!(node.value(), Node::Text(_)) {
                    loose.push(node);
                }
                continue;
            };
            if INLINE_TAGS.contains(&dom::tag(child)) {
                if self.loose_text {
                    loose.push(node);
                }
                continue;
            }
            y = self.loose_line(canvas, std::mem::take(&mut loose), &area, y)?;
            y = self.block(canvas, child, &area, y)?;
        }

        self.loose_line(canvas, loose, &area, y)
    }

    fn loose_line<'a>(
        &self,
        canvas: &mut SlideCanvas,
        nodes: Vec<ego_tree::NodeRef<'a, Node>>,
        area: &ContentArea,
        y: f64,
    ) -> Result<f64> {
        if nodes.is_empty() {
            return Ok(y);
        }
        let runs = node_runs(self.ctx, nodes, InlineFormat::new(area.size_pt, palette::TEXT));
        if runs.is_empty() {
            return Ok(y);
        }
        canvas.runs(self.line(area, y), runs, Align::Left, Anchor::Top)?;
        Ok(y + LINE_STEP)
    }

    fn line(&self, area: &ContentArea, y: f64) -> PxRect {
        PxRect::new(area.x(), y, area.inner_width(), LINE_STEP)
    }

    fn block(
        &self,
        canvas: &mut SlideCanvas,
        child: ElementRef<'_>,
        area: &ContentArea,
        y: f64,
    ) -> Result<f64> {
        let style = dom::inline_style(child);
        let y = y + style.px_or("margin-top", 0.0);
        let margin_bottom = style.px_or("margin-bottom", 0.0);

        if dom::has_any_class(child, &["budget-label", "sub-label"]) {
            let label = style.over(&self.ctx.css(&[".budget-label", ".sub-label"]));
            let text_style = TextStyle::new(
                label.font_pt_or(12.0),
                label.color("color").unwrap_or(palette::TEXT),
            )
            .bold(label.is_bold_or(true));
            canvas.text(self.line(area, y), &dom::text_content(child), text_style)?;
            return Ok(y + LINE_STEP + margin_bottom);
        }

        if dom::has_class(child, "bullet-item") {
            return self.bullet_item(canvas, child, area, y);
        }

        match dom::tag(child) {
            "ul" | "ol" => {
                let y = self.list(canvas, child, area, y)?;
                Ok(y + margin_bottom)
            }
            "p" => {
                let runs = element_runs(self.ctx, child, InlineFormat::new(area.size_pt, palette::TEXT));
                let advance = if runs.is_empty() { 0.0 } else { LINE_STEP };
                canvas.runs(self.line(area, y), runs, Align::Left, Anchor::Top)?;
                Ok(y + advance + margin_bottom)
            }
            "div" if dom::has_block_children(child) => {
                let size_pt = style.px("font-size").map(px_to_pt).unwrap_or(area.size_pt);
                let nested = area.nested(style.px_or("margin-left", 0.0), size_pt)?;
                let y = self.render(canvas, child, nested, y)?;
                Ok(y + margin_bottom)
            }
            "div" => {
                let runs = element_runs(self.ctx, child, InlineFormat::new(area.size_pt, palette::TEXT));
                let advance = if runs.is_empty() { 0.0 } else { LINE_STEP };
                canvas.runs(self.line(area, y), runs, Align::Left, Anchor::Top)?;
                Ok(y + advance + margin_bottom)
            }
            other => {
                log::debug!("skipping <{}> inside box content", other);
                Ok(y)
            }
        }
    }

    fn bullet_item(
        &self,
        canvas: &mut SlideCanvas,
        item: ElementRef<'_>,
        area: &ContentArea,
        y: f64,
    ) -> Result<f64> {
        let style = self.ctx.resolve(item, &[".bullet-item"]);
        let size_pt = style.font_pt_or(11.0);
        let margin_bottom = style.px_or("margin-bottom", 4.0);
        let color = style.color("color").unwrap_or(palette::TEXT);

        let x = area.x();
        canvas.text(
            PxRect::new(x, y, 10.0, 12.0),
            &self.bullet.glyph,
            TextStyle::new(self.bullet.size_pt, self.bullet.color),
        )?;
        let runs = element_runs(self.ctx, item, InlineFormat::new(size_pt, color));
        canvas.runs(
            PxRect::new(x + 12.0, y, area.inner_width() - 12.0, LINE_STEP),
            runs,
            Align::Left,
            Anchor::Top,
        )?;
        Ok(y + LINE_STEP.max((size_pt * 1.8).floor()) + margin_bottom)
    }

    fn list(
        &self,
        canvas: &mut SlideCanvas,
        list: ElementRef<'_>,
        area: &ContentArea,
        mut y: f64,
    ) -> Result<f64> {
        let style = dom::inline_style(list);
        let ordered = dom::is_tag(list, "ol");
        let line_height = line_height(style.get("line-height"));
        let margin_left = style.px_or("margin-left", 0.0);
        let x = area.x() + margin_left;
        let width = area.inner_width() - margin_left;

        let items = dom::child_elements(list).filter(|li| dom::is_tag(*li, "li"));
        for (number, li) in items.enumerate().map(|(i, li)| (i + 1, li)) {
            let color = dom::inline_style(li).color("color").unwrap_or(palette::TEXT);
            let runs = element_runs(
                self.ctx,
                li,
                InlineFormat::new(area.size_pt, color).skip_blocks(),
            );
            if !runs.is_empty() {
                let (marker, marker_width, text_offset) = if ordered {
                    (format!("{}.", number), 18.0, 18.0)
                } else {
                    ("\u{2022}".to_string(), 10.0, 12.0)
                };
                canvas.text(
                    PxRect::new(x, y, marker_width, line_height),
                    &marker,
                    TextStyle::new(MARKER_PT, color),
                )?;
                canvas.runs(
                    PxRect::new(x + text_offset, y, width - text_offset, line_height),
                    runs,
                    Align::Left,
                    Anchor::Top,
                )?;
                y += line_height;
            }
            for nested in dom::child_elements(li).filter(|c| dom::is_tag(*c, "ul") || dom::is_tag(*c, "ol")) {
                let deeper = area.nested(LIST_INDENT, area.size_pt)?;
                y = self.list(canvas, nested, &deeper, y)?;
            }
        }
        Ok(y)
    }
}

/// List line height: a multiplier below 5, pixels from 5 up, else 13.
fn line_height(value: Option<&str>) -> f64 {
    match value.and_then(deck_core::css::px) {
        Some(v) if v > 0.0 && v < 5.0 => (LINE_HEIGHT * v).floor(),
        Some(v) if v >= 5.0 => v.floor(),
        _ => LINE_HEIGHT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{Shape, Stylesheet};
    use scraper::Html;

    fn render(body: &str, css: &str) -> (Result<f64>, Vec<Shape>) {
        let doc = Html::parse_fragment(&format!("<div class=\"box\">{}</div>", body));
        let parent = dom::find_class(doc.root_element(), "box").unwrap();
        let ctx = StyleContext::new(Stylesheet::parse(css), "Arial");
        let mut canvas = SlideCanvas::new("Arial");
        let y = ContentRenderer::new(&ctx).render(&mut canvas, parent, ContentArea::new(20.0, 580.0), 113.0);
        (y, canvas.into_shapes())
    }

    fn text_at(shape: &Shape) -> (String, PxRect) {
        match shape {
            Shape::Text(tb) => (tb.paragraph.text(), tb.frame.to_rect()),
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_text_is_one_line() {
        let (y, shapes) = render("$150,000", "");
        assert_eq!(y.unwrap(), 127.0);
        let (text, rect) = text_at(&shapes[0]);
        assert_eq!(text, "$150,000");
        assert_eq!((rect.left, rect.top, rect.width), (28.0, 113.0, 564.0));
    }

    #[test]
    fn test_labels_and_paragraphs_advance_cursor() {
        let (y, shapes) = render(
            r#"<div class="sub-label" style="margin-bottom:2px">Scope</div><p>First</p><p> </p><p>Second</p>"#,
            ".sub-label { font-size: 16px }",
        );
        assert_eq!(y.unwrap(), 113.0 + 16.0 + 14.0 + 14.0);
        match &shapes[0] {
            Shape::Text(tb) => {
                assert_eq!(tb.paragraph.runs[0].size_pt, 12.0);
                assert!(tb.paragraph.runs[0].bold);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(text_at(&shapes[2]).1.top, 143.0);
    }

    #[test]
    fn test_bullet_items_use_before_rule() {
        let (y, shapes) = render(
            r#"<div class="bullet-item">Hire <b>two</b></div>"#,
            r#".bullet-item::before { content: "\2022"; color: #0000ff }"#,
        );
        let (glyph, rect) = text_at(&shapes[0]);
        assert_eq!(glyph, "\u{2022}");
        assert_eq!((rect.width, rect.height), (10.0, 12.0));
        match &shapes[0] {
            Shape::Text(tb) => assert_eq!(tb.paragraph.runs[0].color, Rgb(0, 0, 255)),
            _ => unreachable!(),
        }
        assert_eq!(text_at(&shapes[1]), ("Hire two".to_string(), PxRect::new(40.0, 113.0, 552.0, 14.0)));
        assert_eq!(y.unwrap(), 113.0 + 14.0 + 4.0);
    }

    #[test]
    fn test_css_content_escapes() {
        assert_eq!(css_content("\"\\25aa\"").as_deref(), Some("\u{25aa}"));
        assert_eq!(css_content("'\\2022 '").as_deref(), Some("\u{2022}"));
        assert_eq!(css_content("\"\\2713\"").as_deref(), Some("\u{2713}"));
        assert_eq!(css_content("\"-\"").as_deref(), Some("-"));
        assert_eq!(css_content("\"\""), None);
    }

    #[test]
    fn test_ordered_list_with_nested_list() {
        let (y, shapes) = render(
            "<ol style=\"line-height:1.5\"><li>One<ul><li>Sub</li></ul></li><li>Two</li></ol>",
            "",
        );
        let texts: Vec<String> = shapes.iter().map(|s| text_at(s).0).collect();
        assert_eq!(texts, vec!["1.", "One", "\u{2022}", "Sub", "2.", "Two"]);
        let nested_marker = text_at(&shapes[2]).1;
        assert_eq!(nested_marker.left, 28.0 + LIST_INDENT);
        assert_eq!(nested_marker.top, 113.0 + 19.0);
        assert_eq!(y.unwrap(), 113.0 + 19.0 + 13.0 + 19.0);
    }

    #[test]
    fn test_div_with_blocks_recurses_with_indent() {
        let (_, shapes) = render(
            r#"<div style="margin-left:10px;font-size:12px">Lead<p>Body</p></div>"#,
            "",
        );
        let (lead, rect) = text_at(&shapes[0]);
        assert_eq!(lead, "Lead");
        assert_eq!(rect.left, 38.0);
        match &shapes[1] {
            Shape::Text(tb) => assert_eq!(tb.paragraph.runs[0].size_pt, 9.0),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_excessive_nesting_is_an_error() {
        let depth = MAX_NESTING + 2;
        let body = format!("{}<p>deep</p>{}", "<div>".repeat(depth), "</div>".repeat(depth));
        let (y, _) = render(&body, "");
        assert!(matches!(y, Err(Error::NestingTooDeep { .. })));
    }

    #[test]
    fn test_line_height() {
        assert_eq!(line_height(None), 13.0);
        assert_eq!(line_height(Some("1.5")), 19.0);
        assert_eq!(line_height(Some("18px")), 18.0);
        assert_eq!(line_height(Some("normal")), 13.0);
    }
}

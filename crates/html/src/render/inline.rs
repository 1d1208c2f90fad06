//! Inline rich text: bold, italic and colored spans, plus colored status dots.

use crate::dom::{self, BLOCK_TAGS};
use crate::style::StyleContext;
use deck_core::{Rgb, TextRun};
use scraper::node::Node;
use scraper::ElementRef;

/// Glyph drawn for colored status dots.
pub const DOT: &str = "\u{25cf}";

#[derive(Debug)]
enum Part {
    Plain(String),
    Bold(String),
    Italic(String),
    Colored(String, Option<Rgb>),
}

/// Base formatting for inline runs.
#[derive(Debug, Clone, Copy)]
pub struct InlineFormat {
    pub size_pt: f64,
    pub color: Rgb,
    /// Leave out nested block elements (lists, divs, paragraphs, tables).
    pub skip_blocks: bool,
}

impl InlineFormat {
    pub fn new(size_pt: f64, color: Rgb) -> Self {
        Self {
            size_pt,
            color,
            skip_blocks: false,
        }
    }

    pub fn skip_blocks(mut self) -> Self {
        self.skip_blocks = true;
        self
    }
}

/// Runs for the children of `el`.
pub fn element_runs(ctx: &StyleContext, el: ElementRef<'_>, fmt: InlineFormat) -> Vec<TextRun> {
    node_runs(ctx, el.children(), fmt)
}

/// Runs for a sequence of sibling nodes.
pub fn node_runs<'a, I>(ctx: &StyleContext, nodes: I, fmt: InlineFormat) -> Vec<TextRun>
where
    I: IntoIterator<Item = ego_tree::NodeRef<'a, Node>>,
{
    let mut parts = Vec::new();
    for node in nodes {
        if let Node::Text(t) = node.value() {
            parts.push(Part::Plain(String::from(&**t)));
            continue;
        }
        let Some(sub) = ElementRef::wrap(node) else {
            continue;
        };
        let name = dom::tag(sub);
        if fmt.skip_blocks && BLOCK_TAGS.contains(&name) {
            continue;
        }
        match name {
            "strong" | "b" => parts.push(Part::Bold(raw_text(sub))),
            "em" | "i" => parts.push(Part::Italic(raw_text(sub))),
            "span" => {
                if let Some(part) = span_part(sub) {
                    parts.push(part);
                }
            }
            _ => parts.push(Part::Plain(raw_text(sub))),
        }
    }
    assemble(ctx, parts, fmt)
}

fn span_part(span: ElementRef<'_>) -> Option<Part> {
    let style = dom::inline_style(span);
    if let Some(bg) = style.background_raw() {
        if style.has("border-radius") || style.has("display") {
            return Rgb::parse(bg).map(|c| Part::Colored(DOT.to_string(), Some(c)));
        }
    }
    let text = dom::text_content(span);
    if text == DOT {
        return style.color("color").map(|c| Part::Colored(DOT.to_string(), Some(c)));
    }
    if text.is_empty() {
        return None;
    }
    Some(Part::Colored(raw_text(span), style.color("color")))
}

fn raw_text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// Collapse whitespace runs to one space, keeping a single leading/trailing space.
fn squeeze(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

fn assemble(ctx: &StyleContext, parts: Vec<Part>, fmt: InlineFormat) -> Vec<TextRun> {
    let mut runs: Vec<TextRun> = Vec::new();
    let mut pending_space = false;

    for part in parts {
        let (raw, bold, italic, color) = match part {
            Part::Plain(t) => (t, false, false, None),
            Part::Bold(t) => (t, true, false, None),
            Part::Italic(t) => (t, false, true, None),
            Part::Colored(t, c) => (t, false, false, c),
        };
        let mut text = squeeze(&raw);
        if text.trim().is_empty() {
            pending_space |= !text.is_empty();
            continue;
        }
        if let Some(last) = runs.last() {
            if last.text.ends_with(' ') {
                text = text.trim_start().to_string();
            } else if pending_space && !text.starts_with(' ') {
                text.insert(0, ' ');
            }
        }
        pending_space = false;
        runs.push(
            ctx.run(text, fmt.size_pt, color.unwrap_or(fmt.color))
                .bold(bold)
                .italic(italic),
        );
    }

    if let Some(first) = runs.first_mut() {
        first.text = first.text.trim_start().to_string();
    }
    if let Some(last) = runs.last_mut() {
        last.text = last.text.trim_end().to_string();
    }
    runs.retain(|r| !r.text.is_empty());
    runs
}

/// Spans that render as a colored dot: a background plus rounding, or a
/// colored `●` glyph.
pub fn is_dot_span(span: ElementRef<'_>) -> bool {
    let style = dom::inline_style(span);
    if style.background_raw().is_some() && style.has("border-radius") {
        return true;
    }
    style.has("color") && dom::own_text(span).contains(DOT)
}

/// Color of a status-indicator circle anywhere inside `el`.
pub fn circle_color(el: ElementRef<'_>) -> Option<Rgb> {
    for span in dom::find_all_tag(el, "span") {
        if span.value().attr("style").is_none() {
            continue;
        }
        let style = dom::inline_style(span);
        if let Some(bg) = style.background() {
            return Some(bg);
        }
        if style.has("color") && dom::own_text(span).contains(DOT) {
            return style.color("color");
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::palette;
    use deck_core::Stylesheet;
    use scraper::Html;

    fn runs_of(html: &str, fmt: InlineFormat) -> Vec<TextRun> {
        let ctx = StyleContext::new(Stylesheet::new(), "Arial");
        let doc = Html::parse_fragment(html);
        let el = dom::find_tag(doc.root_element(), "div").unwrap();
        element_runs(&ctx, el, fmt)
    }

    fn texts(runs: &[TextRun]) -> Vec<&str> {
        runs.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn test_emphasis_runs() {
        let runs = runs_of(
            "<div>Budget: <strong>$1M</strong> and <em>rising</em></div>",
            InlineFormat::new(8.0, palette::TEXT),
        );
        assert_eq!(texts(&runs), vec!["Budget: ", "$1M", " and ", "rising"]);
        assert!(runs[1].bold && !runs[1].italic);
        assert!(runs[3].italic && !runs[3].bold);
        assert!(runs.iter().all(|r| r.size_pt == 8.0 && r.font == "Arial"));
    }

    #[test]
    fn test_whitespace_between_elements_is_kept_once() {
        let runs = runs_of(
            "<div>\n  <b>A</b>\n   <i>B</i>\n</div>",
            InlineFormat::new(8.0, palette::TEXT),
        );
        assert_eq!(texts(&runs), vec!["A", " B"]);
    }

    #[test]
    fn test_colored_span() {
        let runs = runs_of(
            r#"<div>Status <span style="color: #00aa00">on track</span></div>"#,
            InlineFormat::new(8.0, palette::TEXT),
        );
        assert_eq!(runs[0].color, palette::TEXT);
        assert_eq!(runs[1].color, Rgb(0x00, 0xAA, 0x00));
    }

    #[test]
    fn test_dot_spans_become_colored_glyphs() {
        let runs = runs_of(
            r#"<div><span style="background:#ff0000;border-radius:50%;width:8px"></span> Late
               <span style="color: green">●</span> Done <span style="color:#123">   </span></div>"#,
            InlineFormat::new(8.0, palette::TEXT),
        );
        assert_eq!(texts(&runs), vec![DOT, " Late ", DOT, " Done"]);
        assert_eq!(runs[0].color, Rgb(255, 0, 0));
        assert_eq!(runs[2].color, Rgb(0, 128, 0));
    }

    #[test]
    fn test_skip_blocks() {
        let runs = runs_of(
            "<div>Phase 1 <ul><li>nested</li></ul><p>para</p></div>",
            InlineFormat::new(8.0, palette::TEXT).skip_blocks(),
        );
        assert_eq!(texts(&runs), vec!["Phase 1"]);
    }

    #[test]
    fn test_circle_color() {
        let doc = Html::parse_fragment(
            r#"<div><span style="display:inline-block;background:#00ff00"></span></div>"#,
        );
        let div = dom::find_tag(doc.root_element(), "div").unwrap();
        assert_eq!(circle_color(div), Some(Rgb(0, 255, 0)));

        let doc = Html::parse_fragment(r#"<div><span style="color:red">●</span> x</div>"#);
        let div = dom::find_tag(doc.root_element(), "div").unwrap();
        assert_eq!(circle_color(div), Some(Rgb(255, 0, 0)));

        let doc = Html::parse_fragment(r#"<div><span>●</span></div>"#);
        let div = dom::find_tag(doc.root_element(), "div").unwrap();
        assert_eq!(circle_color(div), None);
    }
}

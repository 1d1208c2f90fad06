//! Classification of a slide's positioned blocks.
//!
//! Only the slide's direct children are dispatched as content: sections and
//! standalone tables are top-level absolutely positioned divs. Chrome,
//! legends and links are located by a descendant search and rendered in
//! their own passes.

use crate::dom;
use crate::render::planning::has_progress_bar;
use crate::render::table::table_height;
use crate::style::StyleContext;
use deck_core::geometry::{CANVAS_HEIGHT_PX, CANVAS_WIDTH_PX};
use deck_core::PxRect;
use ego_tree::NodeId;
use scraper::ElementRef;
use std::collections::HashSet;

/// Width of a section whose wrapper declares none.
pub const DEFAULT_SECTION_WIDTH: f64 = 420.0;
/// Span of planning bars whose wrapper declares no width.
pub const DEFAULT_PLANNING_WIDTH: f64 = 900.0;
/// Vertical offset of a nested content box below its header.
pub const HEADER_GAP: f64 = 20.0;
/// Height of a content box whose style declares none.
pub const DEFAULT_BOX_HEIGHT: f64 = 80.0;
/// How many following siblings may hold a detached content box.
pub const SIBLING_LOOKAHEAD: usize = 2;

/// Footer classes, in lookup priority.
pub const FOOTER_CLASSES: &[&str] = &["footer-bar", "bottom-bar", "footer"];
const CHROME_CLASSES: &[&str] = &[
    "footer-bar",
    "bottom-bar",
    "footer",
    "page-number",
    "logo",
    "top-bar",
    "date-box",
    "main-title",
];
const BOX_CLASSES: &[&str] = &["section-box", "trend-box"];

/// What a block is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    TopBar,
    DateBox,
    Title,
    Footer,
    /// Section with rich content, a trend row, or only a header.
    Section,
    /// Section whose box holds a table.
    SectionTable,
    /// Section whose box holds progress bars.
    Planning,
    /// Table outside any section.
    Table,
    Legend,
    Link,
}

/// Where a section's content box came from.
#[derive(Debug, Clone, Copy)]
pub enum SectionBox<'a> {
    /// The box is a descendant of the section wrapper.
    Nested(ElementRef<'a>),
    /// The box is a following top-level sibling at `index` in the slide.
    Sibling { element: ElementRef<'a>, index: usize },
}

impl<'a> SectionBox<'a> {
    pub fn element(&self) -> ElementRef<'a> {
        match self {
            SectionBox::Nested(el) => *el,
            SectionBox::Sibling { element, .. } => *element,
        }
    }
}

/// A content box with its position resolved, whichever shape the source used.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedBox<'a> {
    pub source: SectionBox<'a>,
    pub frame: PxRect,
}

impl<'a> ResolvedBox<'a> {
    pub fn element(&self) -> ElementRef<'a> {
        self.source.element()
    }
}

/// One classified unit of a slide.
#[derive(Debug, Clone)]
pub struct SlideBlock<'a> {
    pub kind: BlockKind,
    pub element: ElementRef<'a>,
    pub bounds: PxRect,
    /// Content box owned by a section.
    pub content_box: Option<ResolvedBox<'a>>,
}

impl<'a> SlideBlock<'a> {
    fn new(kind: BlockKind, element: ElementRef<'a>, bounds: PxRect) -> Self {
        Self {
            kind,
            element,
            bounds,
            content_box: None,
        }
    }
}

/// All blocks of a slide, grouped by rendering pass.
#[derive(Debug, Default)]
pub struct SlideLayout<'a> {
    /// Top bar, date box, title, footer, in that order.
    pub chrome: Vec<SlideBlock<'a>>,
    /// Sections and tables in source order.
    pub content: Vec<SlideBlock<'a>>,
    pub legends: Vec<SlideBlock<'a>>,
    pub links: Vec<SlideBlock<'a>>,
}

/// Classify every block of one slide container.
pub fn classify_slide<'a>(slide: ElementRef<'a>, ctx: &StyleContext) -> SlideLayout<'a> {
    SlideLayout {
        chrome: classify_chrome(slide, ctx),
        content: classify_content(slide, ctx),
        legends: classify_legends(slide),
        links: classify_links(slide),
    }
}

fn classify_chrome<'a>(slide: ElementRef<'a>, ctx: &StyleContext) -> Vec<SlideBlock<'a>> {
    let mut chrome = Vec::new();

    if let Some(bar) = dom::find_class(slide, "top-bar") {
        let style = ctx.resolve(bar, &[".top-bar"]);
        let height = style.px_or("height", 8.0);
        chrome.push(SlideBlock::new(
            BlockKind::TopBar,
            bar,
            PxRect::new(0.0, 0.0, CANVAS_WIDTH_PX, height),
        ));
    }

    if let Some(date) = dom::find_class(slide, "date-box") {
        let style = ctx.resolve(date, &[".date-box"]);
        let width = style.px_or("width", 100.0);
        let height = style.px_or("height", 50.0);
        let top = style.px_or("top", 8.0);
        let right = style.px_or("right", 0.0);
        chrome.push(SlideBlock::new(
            BlockKind::DateBox,
            date,
            PxRect::new(CANVAS_WIDTH_PX - width - right, top, width, height),
        ));
    }

    if let Some(title) = dom::find_class(slide, "main-title") {
        let style = ctx.resolve(title, &[".main-title"]);
        let font_px = style.px_or("font-size", 42.0);
        chrome.push(SlideBlock::new(
            BlockKind::Title,
            title,
            PxRect::new(
                style.px_or("left", 30.0),
                style.px_or("top", 20.0),
                style.px_or("max-width", 800.0),
                font_px * 1.4,
            ),
        ));
    }

    let footer = FOOTER_CLASSES
        .iter()
        .find_map(|class| dom::find_class(slide, class).map(|el| (el, *class)));
    if let Some((footer, class)) = footer {
        let selector = format!(".{}", class);
        let style = ctx.resolve(footer, &[".footer-bar", ".bottom-bar", ".footer", selector.as_str()]);
        let height = style.px_or("height", 32.0);
        chrome.push(SlideBlock::new(
            BlockKind::Footer,
            footer,
            PxRect::new(0.0, CANVAS_HEIGHT_PX - height, CANVAS_WIDTH_PX, height),
        ));
    }

    chrome
}

fn classify_content<'a>(slide: ElementRef<'a>, ctx: &StyleContext) -> Vec<SlideBlock<'a>> {
    let children: Vec<ElementRef<'a>> = dom::child_elements(slide).collect();
    let mut consumed: HashSet<NodeId> = HashSet::new();
    let mut blocks = Vec::new();

    for (idx, div) in children.iter().copied().enumerate() {
        if !dom::is_tag(div, "div") || consumed.contains(&div.id()) {
            continue;
        }
        let style = dom::inline_style(div);
        let positioned = style.get("position") == Some("absolute")
            || (style.has("top") && style.has("left"));
        if !positioned || is_chrome(div) || is_legend(div) {
            continue;
        }
        let has_header = dom::find_class(div, "section-header").is_some();
        if !has_header && !link_anchors(div).is_empty() {
            continue;
        }
        if dom::has_any_class(div, BOX_CLASSES) {
            continue;
        }

        let top = style.px_or("top", 0.0);
        let left = style.px_or("left", 0.0);

        if has_header {
            let source = nested_box(div).or_else(|| {
                let found = sibling_box(&children, idx)?;
                consumed.insert(found.element().id());
                Some(found)
            });
            let kind = match source.map(|s| s.element()) {
                Some(el) if has_progress_bar(el) => BlockKind::Planning,
                Some(el) if dom::find_tag(el, "table").is_some() => BlockKind::SectionTable,
                _ => BlockKind::Section,
            };
            let width = style.length_or("width", DEFAULT_SECTION_WIDTH, CANVAS_WIDTH_PX);
            let section = PxRect::new(left, top, width, HEADER_GAP);
            let content_box = source.map(|source| ResolvedBox {
                source,
                frame: box_frame(ctx, source.element(), &section),
            });
            let height = match &content_box {
                Some(b) => b.frame.bottom() - top,
                None => style.px_or("height", HEADER_GAP),
            };
            log::debug!(
                "section at ({}, {}) kind={:?} box={}",
                left,
                top,
                kind,
                match content_box.map(|b| b.source) {
                    Some(SectionBox::Nested(_)) => "nested",
                    Some(SectionBox::Sibling { .. }) => "sibling",
                    None => "none",
                }
            );
            blocks.push(SlideBlock {
                kind,
                element: div,
                bounds: PxRect::new(left, top, width, height),
                content_box,
            });
        } else if let Some(table) = dom::find_tag(div, "table") {
            let mut width = style.length_or("width", 0.0, CANVAS_WIDTH_PX);
            if width <= 0.0 {
                width = CANVAS_WIDTH_PX - left - 20.0;
            }
            blocks.push(SlideBlock::new(
                BlockKind::Table,
                div,
                PxRect::new(left, top, width, table_height(table)),
            ));
        } else {
            log::debug!("skipping decorative block at ({}, {})", left, top);
        }
    }

    blocks
}

/// Content box nested inside the section wrapper.
fn nested_box(section: ElementRef<'_>) -> Option<SectionBox<'_>> {
    dom::find_class(section, "section-box")
        .or_else(|| dom::find_class(section, "trend-box"))
        .map(SectionBox::Nested)
}

/// Content box emitted as one of the next few top-level siblings.
fn sibling_box<'a>(children: &[ElementRef<'a>], header_idx: usize) -> Option<SectionBox<'a>> {
    children
        .iter()
        .copied()
        .enumerate()
        .skip(header_idx + 1)
        .take(SIBLING_LOOKAHEAD)
        .find(|(_, sib)| dom::has_any_class(*sib, BOX_CLASSES))
        .map(|(index, element)| SectionBox::Sibling { element, index })
}

/// Frame of a content box: its own position when it has one, otherwise just
/// below the header.
fn box_frame(ctx: &StyleContext, el: ElementRef<'_>, section: &PxRect) -> PxRect {
    let inline = dom::inline_style(el);
    let style = inline.over(&ctx.css(&[".section-box"]));
    let height = style.px_or("height", DEFAULT_BOX_HEIGHT);
    let width = inline.length_or("width", section.width, section.width);
    match inline.px("top").filter(|t| *t > 0.0) {
        Some(top) => {
            let left = inline.px("left").filter(|l| *l > 0.0).unwrap_or(section.left);
            PxRect::new(left, top, width, height)
        }
        None => PxRect::new(section.left, section.top + HEADER_GAP, width, height),
    }
}

fn is_chrome(div: ElementRef<'_>) -> bool {
    dom::has_any_class(div, CHROME_CLASSES)
        || FOOTER_CLASSES
            .iter()
            .any(|class| dom::find_class(div, class).is_some())
}

/// Legend: bottom-anchored, no section header, and holding colored dots.
pub fn is_legend(div: ElementRef<'_>) -> bool {
    if !dom::inline_style(div).has("bottom") {
        return false;
    }
    if dom::find_class(div, "section-header").is_some() {
        return false;
    }
    dom::find_all_tag(div, "span")
        .into_iter()
        .filter(|s| s.value().attr("style").is_some())
        .any(crate::render::inline::is_dot_span)
}

fn link_anchors(el: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    dom::find_all_class(el, "link-text")
        .into_iter()
        .filter(|a| dom::is_tag(*a, "a"))
        .collect()
}

fn classify_legends(slide: ElementRef<'_>) -> Vec<SlideBlock<'_>> {
    dom::elements(slide)
        .filter(|el| dom::is_tag(*el, "div") && el.value().attr("style").is_some())
        .filter(|el| is_legend(*el))
        .map(|el| {
            let style = dom::inline_style(el);
            let bottom = style.px_or("bottom", 50.0);
            let left = style.px_or("left", 30.0);
            SlideBlock::new(
                BlockKind::Legend,
                el,
                PxRect::new(left, CANVAS_HEIGHT_PX - bottom - 20.0, 800.0, 20.0),
            )
        })
        .collect()
}

/// Height of one link line.
const LINK_LINE: f64 = 15.0;
const LINK_WIDTH: f64 = 300.0;

fn classify_links(slide: ElementRef<'_>) -> Vec<SlideBlock<'_>> {
    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut links = Vec::new();

    for container in dom::elements(slide).filter(|el| dom::is_tag(*el, "div")) {
        let style = dom::inline_style(container);
        if style.get("position") != Some("absolute") {
            continue;
        }
        if dom::find_class(container, "section-header").is_some() {
            continue;
        }
        let anchors: Vec<_> = link_anchors(container)
            .into_iter()
            .filter(|a| seen.insert(a.id()))
            .collect();
        let line = CANVAS_HEIGHT_PX - style.px_or("bottom", 60.0) - LINK_LINE;
        let left = style.px_or("left", 30.0);
        let count = anchors.len();
        for (i, anchor) in anchors.into_iter().enumerate() {
            let top = line - (count - 1 - i) as f64 * LINK_LINE;
            links.push(SlideBlock::new(
                BlockKind::Link,
                anchor,
                PxRect::new(left, top, LINK_WIDTH, LINK_LINE),
            ));
        }
    }

    for anchor in dom::child_elements(slide) {
        if !dom::is_tag(anchor, "a") || !dom::has_class(anchor, "link-text") {
            continue;
        }
        if !seen.insert(anchor.id()) {
            continue;
        }
        let style = dom::inline_style(anchor);
        let top = match (style.px("top"), style.px("bottom")) {
            (Some(top), _) if top > 0.0 => top,
            (_, Some(bottom)) if bottom > 0.0 => CANVAS_HEIGHT_PX - bottom - LINK_LINE,
            _ => CANVAS_HEIGHT_PX - 75.0,
        };
        links.push(SlideBlock::new(
            BlockKind::Link,
            anchor,
            PxRect::new(style.px_or("left", 30.0), top, LINK_WIDTH, LINK_LINE),
        ));
    }

    links
}

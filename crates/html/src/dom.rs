//! Small helpers over the `scraper` DOM.
//!
//! Searches are descendant-or-self and match class names as whole tokens.

use deck_core::StyleDict;
use scraper::node::Node;
use scraper::{ElementRef, Html};

/// Tags that flow inside a line of text.
pub const INLINE_TAGS: &[&str] = &["strong", "b", "em", "i", "span", "a", "br", "sub", "sup"];

/// Tags that start their own block when found inside content.
pub const BLOCK_TAGS: &[&str] = &["p", "ul", "ol", "div", "table"];

/// Parsed inline `style` attribute of an element.
pub fn inline_style(el: ElementRef<'_>) -> StyleDict {
    el.value()
        .attr("style")
        .map(StyleDict::parse)
        .unwrap_or_default()
}

/// Lowercase tag name.
pub fn tag(el: ElementRef<'_>) -> &str {
    el.value().name()
}

pub fn is_tag(el: ElementRef<'_>, name: &str) -> bool {
    el.value().name() == name
}

/// True if the element carries `class` as one of its class tokens.
pub fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

/// True if the element carries any of the given class tokens.
pub fn has_any_class(el: ElementRef<'_>, classes: &[&str]) -> bool {
    el.value().classes().any(|c| classes.contains(&c))
}

/// Class tokens of an element, in attribute order.
pub fn classes(el: ElementRef<'_>) -> Vec<&str> {
    el.value().classes().collect()
}

/// Element itself and all element descendants, in document order.
pub fn elements(el: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    el.descendants().filter_map(ElementRef::wrap)
}

/// Direct element children.
pub fn child_elements(el: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    el.children().filter_map(ElementRef::wrap)
}

/// First element (descendant-or-self) with the class.
pub fn find_class<'a>(el: ElementRef<'a>, class: &str) -> Option<ElementRef<'a>> {
    elements(el).find(|e| has_class(*e, class))
}

/// All elements (descendant-or-self) with the class.
pub fn find_all_class<'a>(el: ElementRef<'a>, class: &str) -> Vec<ElementRef<'a>> {
    elements(el).filter(|e| has_class(*e, class)).collect()
}

/// First element (descendant-or-self) with the tag.
pub fn find_tag<'a>(el: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    elements(el).find(|e| is_tag(*e, name))
}

/// All elements (descendant-or-self) with the tag.
pub fn find_all_tag<'a>(el: ElementRef<'a>, name: &str) -> Vec<ElementRef<'a>> {
    elements(el).filter(|e| is_tag(*e, name)).collect()
}

/// Whether any direct child is a block-level element.
pub fn has_block_children(el: ElementRef<'_>) -> bool {
    child_elements(el).any(|c| BLOCK_TAGS.contains(&tag(c)))
}

/// All descendant text, whitespace collapsed and trimmed.
pub fn text_content(el: ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

/// Text directly inside the element (not inside child elements).
pub fn own_text(el: ElementRef<'_>) -> String {
    el.children()
        .filter_map(|n| match n.value() {
            Node::Text(t) => Some(&**t),
            _ => None,
        })
        .collect()
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Concatenated text of every `<style>` element.
pub fn style_text(doc: &Html) -> String {
    elements(doc.root_element())
        .filter(|e| is_tag(*e, "style"))
        .map(|e| e.text().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Table rows and their `th`/`td` cells.
pub fn table_rows(table: ElementRef<'_>) -> Vec<(ElementRef<'_>, Vec<ElementRef<'_>>)> {
    find_all_tag(table, "tr")
        .into_iter()
        .map(|tr| {
            let cells = child_elements(tr)
                .filter(|c| is_tag(*c, "th") || is_tag(*c, "td"))
                .collect();
            (tr, cells)
        })
        .collect()
}

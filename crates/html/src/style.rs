//! Element-aware style resolution.

use crate::dom;
use deck_core::{Rgb, StyleDict, Stylesheet, TextRun};
use scraper::ElementRef;

/// Stylesheet and typeface shared by every renderer of one document.
#[derive(Debug, Clone)]
pub struct StyleContext {
    pub sheet: Stylesheet,
    pub font: String,
}

impl StyleContext {
    pub fn new(sheet: Stylesheet, font: impl Into<String>) -> Self {
        Self {
            sheet,
            font: font.into(),
        }
    }

    /// Stylesheet rules for the selectors, later selectors winning.
    pub fn css(&self, selectors: &[&str]) -> StyleDict {
        self.sheet.merged(selectors)
    }

    /// Effective style: inline declarations over the given stylesheet rules.
    pub fn resolve(&self, el: ElementRef<'_>, selectors: &[&str]) -> StyleDict {
        dom::inline_style(el).over(&self.css(selectors))
    }

    /// Merged `.class` rules for every class token of the element.
    pub fn class_rules(&self, el: ElementRef<'_>) -> StyleDict {
        let selectors: Vec<String> = dom::classes(el).iter().map(|c| format!(".{}", c)).collect();
        let refs: Vec<&str> = selectors.iter().map(String::as_str).collect();
        self.css(&refs)
    }

    /// A run in the document typeface.
    pub fn run(&self, text: impl Into<String>, size_pt: f64, color: Rgb) -> TextRun {
        TextRun::new(text, size_pt, color, self.font.as_str())
    }
}

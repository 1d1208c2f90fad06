//! Inline style and stylesheet parsing for the slide HTML dialect.
//!
//! The dialect is deliberately constrained: rules are matched by exact selector
//! text, later rules replace earlier ones, and there is no specificity or
//! inheritance. Inline styles are never merged automatically; callers layer
//! them over stylesheet rules with [`StyleDict::over`].

use crate::color::Rgb;
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

/// Regex to strip `/* ... */` comments, including multi-line ones.
static CSS_COMMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

/// Regex to match one `selectors { declarations }` rule.
static CSS_RULE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^{}]+)\{([^}]*)\}").unwrap());

/// Regex to match the leading number of a length (`12px`, `1.5`, `50%`).
static LEADING_NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([0-9]*\.?[0-9]+)").unwrap());

/// Font families that only make sense inside a browser.
const SYSTEM_FONT_ALIASES: &[&str] = &["-apple-system", "BlinkMacSystemFont"];

/// Ordered property map for a single element or rule.
///
/// Keys are lowercase property names, values are trimmed. Empty values are
/// dropped at parse time so that a present key always carries a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDict {
    props: IndexMap<String, String>,
}

impl StyleDict {
    /// Create an empty style map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse declarations such as `top: 10px; color: #333`.
    pub fn parse(declarations: &str) -> Self {
        let mut props = IndexMap::new();
        for decl in declarations.split(';') {
            let Some((key, value)) = decl.split_once(':') else {
                continue;
            };
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim();
            if key.is_empty() || value.is_empty() {
                continue;
            }
            props.insert(key, value.to_string());
        }
        Self { props }
    }

    /// Raw value of a property.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.props.get(key).map(String::as_str)
    }

    /// True if the property is present.
    pub fn has(&self, key: &str) -> bool {
        self.props.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Layer `self` over `base`: properties of `self` win.
    pub fn over(&self, base: &StyleDict) -> StyleDict {
        let mut merged = base.clone();
        merged.extend(self);
        merged
    }

    /// Copy every property of `other` into `self`, replacing existing keys.
    pub fn extend(&mut self, other: &StyleDict) {
        for (k, v) in &other.props {
            self.props.insert(k.clone(), v.clone());
        }
    }

    /// Pixel value of a property, if it has a leading number.
    pub fn px(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(px)
    }

    /// Pixel value of a property, or `default` when absent or unparseable.
    pub fn px_or(&self, key: &str, default: f64) -> f64 {
        self.px(key).unwrap_or(default)
    }

    /// Color of a property, if it parses.
    pub fn color(&self, key: &str) -> Option<Rgb> {
        self.get(key).and_then(Rgb::parse)
    }

    /// Background color from `background` or `background-color`.
    pub fn background(&self) -> Option<Rgb> {
        self.get("background")
            .or_else(|| self.get("background-color"))
            .and_then(Rgb::parse)
    }

    /// Raw background value, whether or not it parses as a color.
    pub fn background_raw(&self) -> Option<&str> {
        self.get("background").or_else(|| self.get("background-color"))
    }

    /// Font size converted from CSS pixels to points.
    pub fn font_pt_or(&self, default_px: f64) -> f64 {
        px_to_pt(self.px_or("font-size", default_px))
    }

    /// Whether `font-weight` renders bold, with a default for a missing value.
    pub fn is_bold_or(&self, default: bool) -> bool {
        self.get("font-weight").map(is_bold).unwrap_or(default)
    }

    /// Resolve a length property to pixels.
    ///
    /// Percentages resolve against `container`, which the caller supplies
    /// explicitly. Missing, zero or unparseable values return `default`.
    pub fn length_or(&self, key: &str, default: f64, container: f64) -> f64 {
        let Some(value) = self.get(key) else {
            return default;
        };
        if value.contains('%') {
            return match pct(value) {
                Some(p) if p > 0.0 => container * p / 100.0,
                _ => default,
            };
        }
        match px(value) {
            Some(v) if v > 0.0 => v,
            _ => default,
        }
    }

    /// True if any `border*` property mentions `dashed`.
    pub fn has_dashed_border(&self) -> bool {
        self.iter()
            .any(|(k, v)| k.starts_with("border") && v.contains("dashed"))
    }
}

/// Flattened `selector → properties` map built from `<style>` blocks.
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    rules: IndexMap<String, StyleDict>,
}

impl Stylesheet {
    /// Create an empty stylesheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the text of one or more `<style>` blocks.
    pub fn parse(css: &str) -> Self {
        let mut sheet = Self::new();
        sheet.add_css(css);
        sheet
    }

    /// Add rules from a `<style>` block. Later rules replace earlier rules with
    /// the same selector text.
    pub fn add_css(&mut self, css: &str) {
        let css = CSS_COMMENT_REGEX.replace_all(css, "");
        let before = self.rules.len();
        for caps in CSS_RULE_REGEX.captures_iter(&css) {
            let props = StyleDict::parse(&caps[2]);
            for selector in caps[1].split(',') {
                let selector = normalize_selector(selector);
                if selector.is_empty() {
                    continue;
                }
                self.rules.insert(selector, props.clone());
            }
        }
        log::debug!(
            "stylesheet: {} selectors ({} new)",
            self.rules.len(),
            self.rules.len() - before
        );
    }

    /// Rules for exactly this selector text.
    pub fn rule(&self, selector: &str) -> Option<&StyleDict> {
        self.rules.get(&normalize_selector(selector))
    }

    /// Merge the rules of several selectors; later selectors win.
    pub fn merged(&self, selectors: &[&str]) -> StyleDict {
        let mut merged = StyleDict::new();
        for sel in selectors {
            if let Some(rule) = self.rule(sel) {
                merged.extend(rule);
            }
        }
        merged
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First usable font family from the `body` or `.slide` rules.
    pub fn font_family(&self) -> Option<String> {
        ["body", ".slide"].iter().find_map(|sel| {
            let families = self.rule(sel)?.get("font-family")?;
            families
                .split(',')
                .map(|f| f.trim().trim_matches(|c| c == '\'' || c == '"'))
                .find(|f| !f.is_empty() && !SYSTEM_FONT_ALIASES.contains(f))
                .map(str::to_string)
        })
    }
}

fn normalize_selector(selector: &str) -> String {
    selector.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Leading number of a CSS length, e.g. `12` for `12px`.
pub fn px(value: &str) -> Option<f64> {
    let caps = LEADING_NUMBER_REGEX.captures(value)?;
    caps[1].parse().ok()
}

/// Percentage of a CSS value such as `45%`.
pub fn pct(value: &str) -> Option<f64> {
    let (number, _) = value.trim().split_once('%')?;
    number.trim().parse().ok()
}

/// CSS pixels to typographic points.
pub fn px_to_pt(px: f64) -> f64 {
    px * 0.75
}

/// True unless the weight is `400`, `normal` or empty.
pub fn is_bold(weight: &str) -> bool {
    !matches!(weight.trim(), "" | "400" | "normal")
}

//! Conversion options.

/// Typeface used when the stylesheet names none.
pub const DEFAULT_FONT: &str = "Arial";

/// Class that marks a slide container.
pub const DEFAULT_SLIDE_CLASS: &str = "slide";

/// Options for one HTML-to-PPTX conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Font used when the stylesheet has no usable `font-family`.
    fallback_font: String,

    /// Font forced on every run, regardless of CSS.
    font_override: Option<String>,

    /// Class name identifying slide containers (`div.<class>`).
    slide_class: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            fallback_font: DEFAULT_FONT.to_string(),
            font_override: None,
            slide_class: DEFAULT_SLIDE_CLASS.to_string(),
        }
    }
}

impl ConvertOptions {
    /// Create options with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the font used when CSS names none.
    pub fn with_fallback_font(mut self, font: impl Into<String>) -> Self {
        let font = font.into();
        if !font.trim().is_empty() {
            self.fallback_font = font;
        }
        self
    }

    /// Force a typeface on every run.
    pub fn with_font_override(mut self, font: Option<String>) -> Self {
        self.font_override = font.filter(|f| !f.trim().is_empty());
        self
    }

    /// Change the class that identifies slide containers.
    pub fn with_slide_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !class.trim().is_empty() {
            self.slide_class = class.trim().to_string();
        }
        self
    }

    pub fn fallback_font(&self) -> &str {
        &self.fallback_font
    }

    pub fn font_override(&self) -> Option<&str> {
        self.font_override.as_deref()
    }

    pub fn slide_class(&self) -> &str {
        &self.slide_class
    }

    /// Pick the typeface for a document whose stylesheet names `css_font`.
    pub fn resolve_font(&self, css_font: Option<String>) -> String {
        self.font_override
            .clone()
            .or(css_font)
            .unwrap_or_else(|| self.fallback_font.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ConvertOptions::new();
        assert_eq!(opts.fallback_font(), "Arial");
        assert_eq!(opts.slide_class(), "slide");
        assert_eq!(opts.font_override(), None);
    }

    #[test]
    fn test_resolve_font_precedence() {
        let opts = ConvertOptions::new();
        assert_eq!(opts.resolve_font(None), "Arial");
        assert_eq!(opts.resolve_font(Some("Inter".into())), "Inter");

        let opts = opts.with_font_override(Some("Calibri".into()));
        assert_eq!(opts.resolve_font(Some("Inter".into())), "Calibri");
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let opts = ConvertOptions::new()
            .with_fallback_font("  ")
            .with_slide_class("")
            .with_font_override(Some(" ".into()));
        assert_eq!(opts, ConvertOptions::default());
    }
}

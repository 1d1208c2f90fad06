//! CSS color literals and contrast decisions.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Matches `rgb(r, g, b` and `rgba(r, g, b` prefixes; alpha is ignored.
static RGB_FUNCTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^rgba?\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)").unwrap());

/// Luminance above which a background counts as light.
const LIGHT_THRESHOLD: f64 = 180.0;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgb = Rgb(0x00, 0x00, 0x00);

    /// Parse a CSS color literal.
    ///
    /// Accepts the names `white`, `black`, `red`, `green`, `blue`, `#rgb`,
    /// `#rrggbb`, `rgb()` and `rgba()`. `transparent` and anything unparseable
    /// yield `None`; callers pick their own fallback.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        if value.is_empty() {
            return None;
        }

        match value.as_str() {
            "white" => return Some(Self::WHITE),
            "black" => return Some(Self::BLACK),
            "red" => return Some(Rgb(0xFF, 0x00, 0x00)),
            "green" => return Some(Rgb(0x00, 0x80, 0x00)),
            "blue" => return Some(Rgb(0x00, 0x00, 0xFF)),
            "transparent" => return None,
            _ => {}
        }

        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex);
        }

        let caps = RGB_FUNCTION_REGEX.captures(&value)?;
        let channel = |i: usize| -> Option<u8> {
            let n: u32 = caps.get(i)?.as_str().parse().ok()?;
            Some(n.min(255) as u8)
        };
        Some(Rgb(channel(1)?, channel(2)?, channel(3)?))
    }

    /// Perceived luminance (0.299R + 0.587G + 0.114B).
    pub fn luminance(&self) -> f64 {
        0.299 * self.0 as f64 + 0.587 * self.1 as f64 + 0.114 * self.2 as f64
    }

    /// True if this color is light enough to keep dark text on top of it.
    pub fn is_light(&self) -> bool {
        self.luminance() > LIGHT_THRESHOLD
    }

    /// Uppercase `RRGGBB` form used by DrawingML `srgbClr`.
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex())
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => Some(Rgb(
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        )),
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
            Some(Rgb(digit(0)?, digit(1)?, digit(2)?))
        }
        _ => None,
    }
}

/// Extract the color from a CSS border shorthand such as `1px solid #ccc`.
///
/// The last token that parses as a color wins.
pub fn border_color(border: &str) -> Option<Rgb> {
    border.split_whitespace().rev().find_map(Rgb::parse)
}

//! Pixel canvas to EMU mapping and table column balancing.
//!
//! Slides are authored on a fixed 960×540 px canvas that maps onto a
//! 10 × 5.625 in (16:9) slide at 914400 EMU per inch, i.e. 9525 EMU per px.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Logical canvas width in CSS pixels.
pub const CANVAS_WIDTH_PX: f64 = 960.0;
/// Logical canvas height in CSS pixels.
pub const CANVAS_HEIGHT_PX: f64 = 540.0;

pub const EMU_PER_INCH: i64 = 914_400;
pub const SLIDE_WIDTH_IN: f64 = 10.0;
pub const SLIDE_HEIGHT_IN: f64 = 5.625;

/// Physical slide width in EMU.
pub const SLIDE_WIDTH_EMU: i64 = 9_144_000;
/// Physical slide height in EMU.
pub const SLIDE_HEIGHT_EMU: i64 = 5_143_500;

/// EMU per CSS pixel on the canvas.
pub const EMU_PER_PX: f64 = SLIDE_WIDTH_IN * EMU_PER_INCH as f64 / CANVAS_WIDTH_PX;

/// Narrowest width an auto-sized table column may shrink to.
pub const MIN_COLUMN_PX: f64 = 12.0;

/// Convert CSS pixels to EMU.
///
/// Rejects non-finite values and coordinates outside the 32-bit range that
/// DrawingML accepts.
pub fn to_emu(px: f64) -> Result<i64> {
    if !px.is_finite() {
        return Err(Error::Geometry(format!("non-finite length {}px", px)));
    }
    let emu = (px * EMU_PER_PX).round();
    if emu.abs() > i32::MAX as f64 {
        return Err(Error::Geometry(format!("{}px is outside the slide coordinate range", px)));
    }
    Ok(emu as i64)
}

/// Convert EMU back to CSS pixels.
pub fn to_px(emu: i64) -> f64 {
    emu as f64 / EMU_PER_PX
}

/// Convert typographic points to EMU (12700 per point).
pub fn pt_to_emu(pt: f64) -> i64 {
    (pt * 12_700.0).round() as i64
}

/// A rectangle in CSS pixels on the slide canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PxRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PxRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// A shape frame in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Frame {
    /// Map a pixel rectangle onto the slide.
    pub fn from_px(left: f64, top: f64, width: f64, height: f64) -> Result<Self> {
        Ok(Self {
            x: to_emu(left)?,
            y: to_emu(top)?,
            cx: to_emu(width.max(0.0))?,
            cy: to_emu(height.max(0.0))?,
        })
    }

    pub fn from_rect(rect: &PxRect) -> Result<Self> {
        Self::from_px(rect.left, rect.top, rect.width, rect.height)
    }

    /// The frame in pixels (for inspection and tests).
    pub fn to_rect(&self) -> PxRect {
        PxRect::new(to_px(self.x), to_px(self.y), to_px(self.cx), to_px(self.cy))
    }
}

/// Balance table column widths so they always add up to `total`.
///
/// `explicit` holds one entry per column: `Some(px)` for a column whose first
/// row declares a width, `None` otherwise. Implicit columns share what is left
/// of `total` evenly, but never shrink below [`MIN_COLUMN_PX`]; explicit
/// columns are scaled to absorb any surplus or shortfall.
pub fn column_widths(explicit: &[Option<f64>], total: f64) -> Vec<f64> {
    let n = explicit.len();
    if n == 0 {
        return Vec::new();
    }
    let total = total.max(0.0);
    let declared: f64 = explicit.iter().flatten().map(|w| w.max(0.0)).sum();
    let implicit = explicit.iter().filter(|w| w.is_none()).count();

    let even = || vec![total / n as f64; n];

    if implicit == 0 {
        if declared <= 0.0 {
            return even();
        }
        let scale = total / declared;
        return explicit
            .iter()
            .map(|w| w.unwrap_or(0.0).max(0.0) * scale)
            .collect();
    }

    let auto = (total - declared) / implicit as f64;
    if auto >= MIN_COLUMN_PX {
        return explicit
            .iter()
            .map(|w| w.map(|w| w.max(0.0)).unwrap_or(auto))
            .collect();
    }

    // Implicit columns pinned at the minimum; explicit ones share the rest.
    let remaining = total - MIN_COLUMN_PX * implicit as f64;
    if remaining <= 0.0 || declared <= 0.0 {
        return even();
    }
    let scale = remaining / declared;
    explicit
        .iter()
        .map(|w| match w {
            Some(w) => w.max(0.0) * scale,
            None => MIN_COLUMN_PX,
        })
        .collect()
}

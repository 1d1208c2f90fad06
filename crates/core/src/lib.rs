//! Core types for HTML-to-PPTX conversion: the native shape model, CSS color
//! and style parsing, canvas geometry, options and errors.

pub mod color;
pub mod config;
pub mod css;
pub mod error;
pub mod geometry;
pub mod types;

pub use color::Rgb;
pub use config::ConvertOptions;
pub use css::{StyleDict, Stylesheet};
pub use error::{Error, Result};
pub use geometry::{Frame, PxRect};
pub use types::{
    Align, Anchor, AutoShape, CellBorder, Deck, Geometry, Line, Paragraph, Shape, Slide, Table,
    TableCell, TextBox, TextRun,
};

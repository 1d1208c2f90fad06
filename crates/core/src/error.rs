//! Error types for HTML-to-PPTX conversion.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting an HTML deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file or buffer.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The input contained no slide containers.
    #[error("No slides found in HTML (expected div.{0} elements)")]
    NoSlides(String),

    /// Block content nested deeper than the renderer accepts.
    #[error("Content nested too deeply (depth {depth})")]
    NestingTooDeep { depth: usize },

    /// A coordinate or size could not be mapped onto the slide.
    #[error("Geometry error: {0}")]
    Geometry(String),

    /// ZIP archive error while packaging the PPTX.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML serialization error while writing PPTX parts.
    #[error("XML writing error: {0}")]
    XmlError(String),
}

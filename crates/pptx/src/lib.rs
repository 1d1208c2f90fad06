//! PPTX (Office Open XML) backend: serializes a converted deck into a
//! PowerPoint package and reads packages back for inspection.
//!
//! A package is a ZIP archive of XML parts. The writer emits one slide
//! master, one blank layout and one theme, then one part per slide.

pub mod parts;
pub mod reader;
pub mod shapes;
pub mod writer;
pub mod xml;

pub use reader::{PackageSummary, PptxReader, ShapeKind, ShapeSummary, SlideSummary};
pub use writer::PptxWriter;

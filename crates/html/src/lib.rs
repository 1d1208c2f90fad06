//! HTML slide dialect to native presentation shapes.
//!
//! A document is one `<style>` block plus `div.slide` containers laid out on
//! a 960×540 px canvas. Each slide is classified into positioned blocks
//! (chrome, sections, tables, legends, links) which are re-rendered as native
//! rectangles, text boxes and tables.
//!
//! ```no_run
//! use deck_core::ConvertOptions;
//!
//! let html = std::fs::read_to_string("status.html").unwrap();
//! let bytes = deck_html::html_to_pptx(&html, &ConvertOptions::new()).unwrap();
//! std::fs::write("status.pptx", bytes).unwrap();
//! ```

pub mod classify;
pub mod convert;
pub mod dom;
pub mod render;
pub mod slide;
pub mod style;

pub use classify::{classify_slide, BlockKind, SlideBlock, SlideLayout};
pub use convert::{html_to_deck, html_to_pptx, render_slides};
pub use slide::{SlideOutcome, SlideRenderer};
pub use style::StyleContext;

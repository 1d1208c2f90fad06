//! PPTX package writer.

use crate::parts;
use crate::shapes::slide_xml;
use deck_core::{Deck, Error, Result};
use std::io::{Cursor, Seek, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Writes a [`Deck`] as a PowerPoint package.
///
/// Parts are written in a fixed order with a fixed timestamp, so the same
/// deck always produces the same bytes.
pub struct PptxWriter {
    title: String,
}

impl PptxWriter {
    pub fn new() -> Self {
        Self {
            title: String::from("Presentation"),
        }
    }

    /// Set the document title stored in the core properties.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Write the package to an in-memory buffer.
    pub fn write_to_vec(&self, deck: &Deck) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write(deck, &mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// Write the package to any seekable sink.
    pub fn write<W: Write + Seek>(&self, deck: &Deck, sink: W) -> Result<()> {
        let count = deck.slides.len();
        let mut zip = PackageZip::new(sink);

        zip.add("[Content_Types].xml", &parts::content_types(count)?)?;
        zip.add("_rels/.rels", &parts::root_rels()?)?;
        zip.add("docProps/core.xml", &parts::core_props(&self.title)?)?;
        zip.add("docProps/app.xml", &parts::app_props(count)?)?;
        zip.add(
            "ppt/presentation.xml",
            &parts::presentation(count, deck.width, deck.height)?,
        )?;
        zip.add("ppt/_rels/presentation.xml.rels", &parts::presentation_rels(count)?)?;
        zip.add("ppt/presProps.xml", &parts::pres_props()?)?;
        zip.add("ppt/viewProps.xml", &parts::view_props()?)?;
        zip.add("ppt/tableStyles.xml", &parts::table_styles()?)?;
        zip.add("ppt/theme/theme1.xml", parts::THEME_XML.as_bytes())?;
        zip.add(
            "ppt/slideMasters/slideMaster1.xml",
            parts::SLIDE_MASTER_XML.as_bytes(),
        )?;
        zip.add(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &parts::slide_master_rels()?,
        )?;
        zip.add(
            "ppt/slideLayouts/slideLayout1.xml",
            parts::SLIDE_LAYOUT_XML.as_bytes(),
        )?;
        zip.add(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &parts::slide_layout_rels()?,
        )?;

        for (i, slide) in deck.slides.iter().enumerate() {
            let n = i + 1;
            zip.add(&parts::slide_path(n), &slide_xml(slide)?)?;
            zip.add(&parts::slide_rels_path(n), &parts::slide_rels()?)?;
        }

        zip.finish()?;
        log::info!("wrote package with {} slides", count);
        Ok(())
    }
}

impl Default for PptxWriter {
    fn default() -> Self {
        Self::new()
    }
}

struct PackageZip<W: Write + Seek> {
    inner: ZipWriter<W>,
}

impl<W: Write + Seek> PackageZip<W> {
    fn new(sink: W) -> Self {
        Self {
            inner: ZipWriter::new(sink),
        }
    }

    fn add(&mut self, path: &str, data: &[u8]) -> Result<()> {
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());
        self.inner
            .start_file(path, options)
            .map_err(|e| Error::ZipError(format!("Failed to start '{}': {}", path, e)))?;
        self.inner.write_all(data)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.inner
            .finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))?;
        Ok(())
    }
}

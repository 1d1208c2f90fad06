//! Thin wrapper over `quick_xml::Writer` for building package parts.

use deck_core::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

pub const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
pub const NS_PACKAGE_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
pub const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

/// An XML document under construction, starting with a standalone declaration.
pub struct XmlWriter {
    inner: Writer<Cursor<Vec<u8>>>,
}

fn xml_err(e: quick_xml::Error) -> Error {
    Error::XmlError(e.to_string())
}

impl XmlWriter {
    pub fn new() -> Result<Self> {
        let mut inner = Writer::new(Cursor::new(Vec::new()));
        inner
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml_err)?;
        Ok(Self { inner })
    }

    fn element<'a>(name: &'a str, attrs: &[(&'a str, &'a str)]) -> BytesStart<'a> {
        let mut el = BytesStart::new(name);
        for attr in attrs {
            el.push_attribute(*attr);
        }
        el
    }

    /// Open an element.
    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.inner
            .write_event(Event::Start(Self::element(name, attrs)))
            .map_err(xml_err)
    }

    /// Write a self-closing element.
    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.inner
            .write_event(Event::Empty(Self::element(name, attrs)))
            .map_err(xml_err)
    }

    /// Close an element.
    pub fn end(&mut self, name: &str) -> Result<()> {
        self.inner
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_err)
    }

    /// Write escaped character data.
    pub fn text(&mut self, text: &str) -> Result<()> {
        self.inner
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_err)
    }

    /// `<name attrs>text</name>`
    pub fn leaf(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.inner.into_inner().into_inner()
    }
}

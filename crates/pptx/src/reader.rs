//! Reads a written package back into a per-slide shape summary.

use deck_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Kind of a top-level shape in a slide's shape tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Shape,
    TextBox,
    Table,
}

/// One shape with its offset (EMU) and text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeSummary {
    pub kind: ShapeKind,
    pub x: i64,
    pub y: i64,
    /// Paragraph text; table cells are joined with tabs, rows with newlines.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideSummary {
    pub number: usize,
    pub path: String,
    pub shapes: Vec<ShapeSummary>,
}

impl SlideSummary {
    pub fn texts(&self) -> Vec<&str> {
        self.shapes
            .iter()
            .map(|s| s.text.as_str())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageSummary {
    pub slides: Vec<SlideSummary>,
}

/// Reader for PPTX packages.
pub struct PptxReader;

impl PptxReader {
    pub fn new() -> Self {
        Self
    }

    /// Summarize every slide of a package, in presentation order.
    pub fn summarize<R: Read + Seek>(&self, reader: R) -> Result<PackageSummary> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let order = self.slide_order(&mut archive)?;
        let mut slides = Vec::with_capacity(order.len());
        for (idx, path) in order.into_iter().enumerate() {
            let content = self.read_file_from_archive(&mut archive, &path)?;
            slides.push(SlideSummary {
                number: idx + 1,
                shapes: shapes_from_xml(&content)?,
                path,
            });
        }
        Ok(PackageSummary { slides })
    }

    /// Slide part paths ordered by relationship id.
    fn slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels = self.read_file_from_archive(archive, "ppt/_rels/presentation.xml.rels")?;
        let mut slides: Vec<(String, Option<usize>)> = Vec::new();

        let mut reader = Reader::from_str(&rels);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let rel_type = attr(e, b"Type").unwrap_or_default();
                    let target = attr(e, b"Target").unwrap_or_default();
                    let id = attr(e, b"Id").unwrap_or_default();
                    if rel_type.ends_with("/slide") {
                        let order = extract_slide_number(&id).or_else(|| extract_slide_number(&target));
                        let path = match target.strip_prefix('/') {
                            Some(abs) => abs.to_string(),
                            None => format!("ppt/{}", target),
                        };
                        slides.push((path, order));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing relationships: {}",
                        e
                    )))
                }
                _ => {}
            }
        }

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });
        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;
        Ok(content)
    }
}

impl Default for PptxReader {
    fn default() -> Self {
        Self::new()
    }
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

/// Top-level shapes of one slide's `spTree`.
fn shapes_from_xml(xml: &str) -> Result<Vec<ShapeSummary>> {
    let mut shapes = Vec::new();
    let mut reader = Reader::from_str(xml);

    let mut current: Option<ShapeSummary> = None;
    let mut in_text = false;
    let mut first_cell = true;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => {
                    current = Some(ShapeSummary {
                        kind: ShapeKind::Shape,
                        x: 0,
                        y: 0,
                        text: String::new(),
                    })
                }
                b"graphicFrame" => {
                    first_cell = true;
                    current = Some(ShapeSummary {
                        kind: ShapeKind::Table,
                        x: 0,
                        y: 0,
                        text: String::new(),
                    })
                }
                b"tr" => {
                    if let Some(shape) = current.as_mut() {
                        if !shape.text.is_empty() {
                            shape.text.push('\n');
                        }
                    }
                    first_cell = true;
                }
                b"tc" => {
                    if let Some(shape) = current.as_mut() {
                        if !first_cell {
                            shape.text.push('\t');
                        }
                    }
                    first_cell = false;
                }
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                b"cNvSpPr" => {
                    if let Some(shape) = current.as_mut() {
                        if attr(e, b"txBox").as_deref() == Some("1") {
                            shape.kind = ShapeKind::TextBox;
                        }
                    }
                }
                b"off" => {
                    if let Some(shape) = current.as_mut() {
                        shape.x = attr(e, b"x").and_then(|v| v.parse().ok()).unwrap_or(0);
                        shape.y = attr(e, b"y").and_then(|v| v.parse().ok()).unwrap_or(0);
                    }
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_text {
                    if let Some(shape) = current.as_mut() {
                        let text = e.unescape().unwrap_or_default();
                        shape.text.push_str(&text);
                    }
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" | b"graphicFrame" => {
                    if let Some(shape) = current.take() {
                        shapes.push(shape);
                    }
                }
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(format!("Error parsing slide: {}", e))),
            _ => {}
        }
    }
    Ok(shapes)
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");
    let start = s
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    s[start..].parse().ok()
}

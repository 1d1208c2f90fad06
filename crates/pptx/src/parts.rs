//! Package-level parts: content types, relationships, document properties and
//! the presentation part itself.

use crate::xml::{XmlWriter, NS_A, NS_CONTENT_TYPES, NS_P, NS_PACKAGE_RELS, NS_R};
use deck_core::Result;

pub const THEME_XML: &str = include_str!("../resources/theme1.xml");
pub const SLIDE_MASTER_XML: &str = include_str!("../resources/slideMaster1.xml");
pub const SLIDE_LAYOUT_XML: &str = include_str!("../resources/slideLayout1.xml");

const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CT_BASE: &str = "application/vnd.openxmlformats-officedocument";

/// Width and height of the notes page in EMU.
const NOTES_SIZE: (i64, i64) = (6_858_000, 9_144_000);
/// First slide id; ids below 256 are reserved.
const FIRST_SLIDE_ID: usize = 256;
const MASTER_ID: &str = "2147483648";

/// Path of slide `n` (1-based) inside the package.
pub fn slide_path(n: usize) -> String {
    format!("ppt/slides/slide{}.xml", n)
}

/// Path of the relationships part of slide `n`.
pub fn slide_rels_path(n: usize) -> String {
    format!("ppt/slides/_rels/slide{}.xml.rels", n)
}

/// One relationship entry.
struct Rel<'a> {
    id: String,
    kind: &'a str,
    target: String,
}

impl<'a> Rel<'a> {
    fn new(id: impl Into<String>, kind: &'a str, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            target: target.into(),
        }
    }
}

fn relationships(rels: &[Rel<'_>]) -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start("Relationships", &[("xmlns", NS_PACKAGE_RELS)])?;
    for rel in rels {
        let kind = rel_type(rel.kind);
        w.empty(
            "Relationship",
            &[
                ("Id", rel.id.as_str()),
                ("Type", kind.as_str()),
                ("Target", rel.target.as_str()),
            ],
        )?;
    }
    w.end("Relationships")?;
    Ok(w.into_bytes())
}

fn rel_type(kind: &str) -> String {
    match kind {
        "core-properties" => {
            "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties"
                .to_string()
        }
        _ => format!("{}/{}", REL_BASE, kind),
    }
}

/// `[Content_Types].xml` for a deck of `slide_count` slides.
pub fn content_types(slide_count: usize) -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    w.empty(
        "Default",
        &[
            ("Extension", "rels"),
            ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
        ],
    )?;
    w.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;

    let mut overrides: Vec<(String, String)> = vec![
        (
            "/ppt/presentation.xml".into(),
            format!("{}.presentationml.presentation.main+xml", CT_BASE),
        ),
        (
            "/ppt/slideMasters/slideMaster1.xml".into(),
            format!("{}.presentationml.slideMaster+xml", CT_BASE),
        ),
        (
            "/ppt/slideLayouts/slideLayout1.xml".into(),
            format!("{}.presentationml.slideLayout+xml", CT_BASE),
        ),
        ("/ppt/theme/theme1.xml".into(), format!("{}.theme+xml", CT_BASE)),
        (
            "/ppt/presProps.xml".into(),
            format!("{}.presentationml.presProps+xml", CT_BASE),
        ),
        (
            "/ppt/viewProps.xml".into(),
            format!("{}.presentationml.viewProps+xml", CT_BASE),
        ),
        (
            "/ppt/tableStyles.xml".into(),
            format!("{}.presentationml.tableStyles+xml", CT_BASE),
        ),
        (
            "/docProps/core.xml".into(),
            "application/vnd.openxmlformats-package.core-properties+xml".into(),
        ),
        (
            "/docProps/app.xml".into(),
            format!("{}.extended-properties+xml", CT_BASE),
        ),
    ];
    for n in 1..=slide_count {
        overrides.push((
            format!("/{}", slide_path(n)),
            format!("{}.presentationml.slide+xml", CT_BASE),
        ));
    }
    for (part, content_type) in &overrides {
        w.empty(
            "Override",
            &[("PartName", part.as_str()), ("ContentType", content_type.as_str())],
        )?;
    }
    w.end("Types")?;
    Ok(w.into_bytes())
}

/// `_rels/.rels`
pub fn root_rels() -> Result<Vec<u8>> {
    relationships(&[
        Rel::new("rId1", "officeDocument", "ppt/presentation.xml"),
        Rel::new("rId2", "core-properties", "docProps/core.xml"),
        Rel::new("rId3", "extended-properties", "docProps/app.xml"),
    ])
}

/// `docProps/core.xml`. Carries no timestamps so output stays byte-stable.
pub fn core_props(title: &str) -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    w.leaf("dc:title", &[], title)?;
    w.leaf("dc:creator", &[], "html2pptx")?;
    w.end("cp:coreProperties")?;
    Ok(w.into_bytes())
}

/// `docProps/app.xml`
pub fn app_props(slide_count: usize) -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start(
        "Properties",
        &[(
            "xmlns",
            "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
        )],
    )?;
    w.leaf("Application", &[], "html2pptx")?;
    w.leaf("PresentationFormat", &[], "On-screen Show (16:9)")?;
    w.leaf("Slides", &[], &slide_count.to_string())?;
    w.end("Properties")?;
    Ok(w.into_bytes())
}

/// `ppt/presentation.xml`
pub fn presentation(slide_count: usize, width: i64, height: i64) -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start(
        "p:presentation",
        &[
            ("xmlns:a", NS_A),
            ("xmlns:r", NS_R),
            ("xmlns:p", NS_P),
            ("saveSubsetFonts", "1"),
        ],
    )?;

    w.start("p:sldMasterIdLst", &[])?;
    w.empty("p:sldMasterId", &[("id", MASTER_ID), ("r:id", "rId1")])?;
    w.end("p:sldMasterIdLst")?;

    if slide_count > 0 {
        w.start("p:sldIdLst", &[])?;
        for i in 0..slide_count {
            let id = (FIRST_SLIDE_ID + i).to_string();
            let rid = format!("rId{}", i + 2);
            w.empty("p:sldId", &[("id", id.as_str()), ("r:id", rid.as_str())])?;
        }
        w.end("p:sldIdLst")?;
    }

    let (cx, cy) = (width.to_string(), height.to_string());
    w.empty("p:sldSz", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    let (ncx, ncy) = (NOTES_SIZE.0.to_string(), NOTES_SIZE.1.to_string());
    w.empty("p:notesSz", &[("cx", ncx.as_str()), ("cy", ncy.as_str())])?;
    w.end("p:presentation")?;
    Ok(w.into_bytes())
}

/// `ppt/_rels/presentation.xml.rels`. Slides take rId2..rIdN+1 so slide order
/// can be read back from the ids.
pub fn presentation_rels(slide_count: usize) -> Result<Vec<u8>> {
    let mut rels = vec![Rel::new("rId1", "slideMaster", "slideMasters/slideMaster1.xml")];
    for n in 1..=slide_count {
        rels.push(Rel::new(
            format!("rId{}", n + 1),
            "slide",
            format!("slides/slide{}.xml", n),
        ));
    }
    let next = slide_count + 2;
    rels.push(Rel::new(format!("rId{}", next), "presProps", "presProps.xml"));
    rels.push(Rel::new(format!("rId{}", next + 1), "viewProps", "viewProps.xml"));
    rels.push(Rel::new(format!("rId{}", next + 2), "theme", "theme/theme1.xml"));
    rels.push(Rel::new(format!("rId{}", next + 3), "tableStyles", "tableStyles.xml"));
    relationships(&rels)
}

/// Relationships of a slide: its layout.
pub fn slide_rels() -> Result<Vec<u8>> {
    relationships(&[Rel::new(
        "rId1",
        "slideLayout",
        "../slideLayouts/slideLayout1.xml",
    )])
}

pub fn slide_master_rels() -> Result<Vec<u8>> {
    relationships(&[
        Rel::new("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
        Rel::new("rId2", "theme", "../theme/theme1.xml"),
    ])
}

pub fn slide_layout_rels() -> Result<Vec<u8>> {
    relationships(&[Rel::new(
        "rId1",
        "slideMaster",
        "../slideMasters/slideMaster1.xml",
    )])
}

pub fn pres_props() -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.empty(
        "p:presentationPr",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;
    Ok(w.into_bytes())
}

pub fn view_props() -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start(
        "p:viewPr",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;
    w.empty("p:gridSpacing", &[("cx", "76200"), ("cy", "76200")])?;
    w.end("p:viewPr")?;
    Ok(w.into_bytes())
}

/// An empty table style list; tables carry their own formatting.
pub fn table_styles() -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.empty(
        "a:tblStyleLst",
        &[
            ("xmlns:a", NS_A),
            ("def", "{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}"),
        ],
    )?;
    Ok(w.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(bytes: Result<Vec<u8>>) -> String {
        String::from_utf8(bytes.unwrap()).unwrap()
    }

    #[test]
    fn test_presentation_lists_slides_in_order() {
        let xml = text(presentation(3, 9_144_000, 5_143_500));
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId2"/>"#));
        assert!(xml.contains(r#"<p:sldId id="258" r:id="rId4"/>"#));
        assert!(xml.contains(r#"<p:sldSz cx="9144000" cy="5143500"/>"#));
        assert!(xml.contains(r#"<p:notesSz cx="6858000" cy="9144000"/>"#));
    }

    #[test]
    fn test_presentation_rels_ids_follow_slides() {
        let xml = text(presentation_rels(2));
        assert!(xml.contains(r#"Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml""#));
        assert!(xml.contains(r#"Id="rId3""#));
        assert!(xml.contains(r#"Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps""#));
        assert!(xml.contains(r#"Id="rId7""#));
    }

    #[test]
    fn test_content_types_cover_every_slide() {
        let xml = text(content_types(2));
        assert!(xml.contains(r#"PartName="/ppt/slides/slide1.xml""#));
        assert!(xml.contains(r#"PartName="/ppt/slides/slide2.xml""#));
        assert!(!xml.contains("slide3.xml"));
        assert!(xml.contains("/docProps/core.xml"));
    }

    #[test]
    fn test_core_props_has_no_timestamps() {
        let xml = text(core_props("Status"));
        assert!(xml.contains("<dc:title>Status</dc:title>"));
        assert!(!xml.contains("dcterms:created"));
    }
}

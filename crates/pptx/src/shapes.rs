//! Slide XML: the shape tree of one slide.

use crate::xml::{XmlWriter, NS_A, NS_P, NS_R};
use deck_core::{
    Anchor, AutoShape, CellBorder, Frame, Paragraph, Result, Rgb, Shape, Slide, Table, TableCell,
    TextBox, TextRun,
};

const TABLE_URI: &str = "http://schemas.openxmlformats.org/drawingml/2006/table";

/// Serialize one slide. Shape ids start at 2; id 1 is the group root.
pub fn slide_xml(slide: &Slide) -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start(
        "p:sld",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;
    w.start("p:cSld", &[])?;
    w.start("p:spTree", &[])?;

    w.start("p:nvGrpSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    w.empty("p:cNvGrpSpPr", &[])?;
    w.empty("p:nvPr", &[])?;
    w.end("p:nvGrpSpPr")?;
    w.start("p:grpSpPr", &[])?;
    w.start("a:xfrm", &[])?;
    w.empty("a:off", &[("x", "0"), ("y", "0")])?;
    w.empty("a:ext", &[("cx", "0"), ("cy", "0")])?;
    w.empty("a:chOff", &[("x", "0"), ("y", "0")])?;
    w.empty("a:chExt", &[("cx", "0"), ("cy", "0")])?;
    w.end("a:xfrm")?;
    w.end("p:grpSpPr")?;

    for (i, shape) in slide.shapes.iter().enumerate() {
        let id = i + 2;
        match shape {
            Shape::Auto(s) => write_auto(&mut w, id, s)?,
            Shape::Text(t) => write_text_box(&mut w, id, t)?,
            Shape::Table(t) => write_table(&mut w, id, t)?,
        }
    }

    w.end("p:spTree")?;
    w.end("p:cSld")?;
    w.start("p:clrMapOvr", &[])?;
    w.empty("a:masterClrMapping", &[])?;
    w.end("p:clrMapOvr")?;
    w.end("p:sld")?;
    Ok(w.into_bytes())
}

fn non_visual(w: &mut XmlWriter, id: usize, name: &str, text_box: bool) -> Result<()> {
    let id = id.to_string();
    let name = format!("{} {}", name, id);
    w.start("p:nvSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", id.as_str()), ("name", name.as_str())])?;
    if text_box {
        w.empty("p:cNvSpPr", &[("txBox", "1")])?;
    } else {
        w.empty("p:cNvSpPr", &[])?;
    }
    w.empty("p:nvPr", &[])?;
    w.end("p:nvSpPr")
}

fn xfrm(w: &mut XmlWriter, ns: &str, frame: &Frame) -> Result<()> {
    let (x, y) = (frame.x.to_string(), frame.y.to_string());
    let (cx, cy) = (frame.cx.to_string(), frame.cy.to_string());
    let tag = format!("{}:xfrm", ns);
    w.start(&tag, &[])?;
    w.empty("a:off", &[("x", x.as_str()), ("y", y.as_str())])?;
    w.empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    w.end(&tag)
}

fn solid_fill(w: &mut XmlWriter, color: Rgb) -> Result<()> {
    let hex = color.hex();
    w.start("a:solidFill", &[])?;
    w.empty("a:srgbClr", &[("val", hex.as_str())])?;
    w.end("a:solidFill")
}

fn fill(w: &mut XmlWriter, color: Option<Rgb>) -> Result<()> {
    match color {
        Some(c) => solid_fill(w, c),
        None => w.empty("a:noFill", &[]),
    }
}

fn write_auto(w: &mut XmlWriter, id: usize, shape: &AutoShape) -> Result<()> {
    w.start("p:sp", &[])?;
    non_visual(w, id, "Shape", false)?;
    w.start("p:spPr", &[])?;
    xfrm(w, "a", &shape.frame)?;
    w.start("a:prstGeom", &[("prst", shape.geometry.preset())])?;
    w.empty("a:avLst", &[])?;
    w.end("a:prstGeom")?;
    fill(w, shape.fill)?;
    match shape.line {
        Some(line) => {
            let width = line.width.to_string();
            w.start("a:ln", &[("w", width.as_str())])?;
            solid_fill(w, line.color)?;
            w.end("a:ln")?;
        }
        None => {
            w.start("a:ln", &[])?;
            w.empty("a:noFill", &[])?;
            w.end("a:ln")?;
        }
    }
    w.end("p:spPr")?;
    w.end("p:sp")
}

fn write_text_box(w: &mut XmlWriter, id: usize, tb: &TextBox) -> Result<()> {
    w.start("p:sp", &[])?;
    non_visual(w, id, "TextBox", true)?;
    w.start("p:spPr", &[])?;
    xfrm(w, "a", &tb.frame)?;
    w.start("a:prstGeom", &[("prst", "rect")])?;
    w.empty("a:avLst", &[])?;
    w.end("a:prstGeom")?;
    w.empty("a:noFill", &[])?;
    w.end("p:spPr")?;

    w.start("p:txBody", &[])?;
    let mut body: Vec<(&str, &str)> = vec![
        ("wrap", if tb.wrap { "square" } else { "none" }),
        ("lIns", "0"),
        ("tIns", "0"),
        ("rIns", "0"),
        ("bIns", "0"),
        ("rtlCol", "0"),
    ];
    if tb.anchor == Anchor::Middle {
        body.push(("anchor", "ctr"));
    }
    w.start("a:bodyPr", &body)?;
    w.empty("a:noAutofit", &[])?;
    w.end("a:bodyPr")?;
    w.empty("a:lstStyle", &[])?;
    write_paragraph(w, &tb.paragraph)?;
    w.end("p:txBody")?;
    w.end("p:sp")
}

fn write_paragraph(w: &mut XmlWriter, paragraph: &Paragraph) -> Result<()> {
    w.start("a:p", &[])?;
    w.empty("a:pPr", &[("algn", paragraph.align.ooxml())])?;
    for run in &paragraph.runs {
        write_run(w, run)?;
    }
    match paragraph.runs.last() {
        Some(run) => {
            let size = hundredths(run.size_pt);
            w.empty("a:endParaRPr", &[("lang", "en-US"), ("sz", size.as_str())])?;
        }
        None => w.empty("a:endParaRPr", &[("lang", "en-US")])?,
    }
    w.end("a:p")
}

/// Font size in hundredths of a point.
fn hundredths(pt: f64) -> String {
    ((pt * 100.0).round() as i64).to_string()
}

fn write_run(w: &mut XmlWriter, run: &TextRun) -> Result<()> {
    let size = hundredths(run.size_pt);
    let mut attrs: Vec<(&str, &str)> = vec![("lang", "en-US"), ("sz", size.as_str())];
    attrs.push(("b", if run.bold { "1" } else { "0" }));
    if run.italic {
        attrs.push(("i", "1"));
    }
    if run.underline {
        attrs.push(("u", "sng"));
    }
    attrs.push(("dirty", "0"));

    w.start("a:r", &[])?;
    w.start("a:rPr", &attrs)?;
    solid_fill(w, run.color)?;
    w.empty("a:latin", &[("typeface", run.font.as_str())])?;
    w.end("a:rPr")?;
    w.leaf("a:t", &[], &run.text)?;
    w.end("a:r")
}

fn write_table(w: &mut XmlWriter, id: usize, table: &Table) -> Result<()> {
    let id_str = id.to_string();
    let name = format!("Table {}", id);
    w.start("p:graphicFrame", &[])?;
    w.start("p:nvGraphicFramePr", &[])?;
    w.empty("p:cNvPr", &[("id", id_str.as_str()), ("name", name.as_str())])?;
    w.start("p:cNvGraphicFramePr", &[])?;
    w.empty("a:graphicFrameLocks", &[("noGrp", "1")])?;
    w.end("p:cNvGraphicFramePr")?;
    w.empty("p:nvPr", &[])?;
    w.end("p:nvGraphicFramePr")?;
    xfrm(w, "p", &table.frame)?;

    w.start("a:graphic", &[])?;
    w.start("a:graphicData", &[("uri", TABLE_URI)])?;
    w.start("a:tbl", &[])?;
    // No style id and all look flags off: cells carry their own formatting.
    w.empty(
        "a:tblPr",
        &[
            ("firstRow", "0"),
            ("bandRow", "0"),
            ("firstCol", "0"),
            ("lastRow", "0"),
            ("lastCol", "0"),
            ("bandCol", "0"),
        ],
    )?;
    w.start("a:tblGrid", &[])?;
    for col in &table.columns {
        let width = col.to_string();
        w.empty("a:gridCol", &[("w", width.as_str())])?;
    }
    w.end("a:tblGrid")?;

    let height = table.row_height.to_string();
    for row in &table.rows {
        w.start("a:tr", &[("h", height.as_str())])?;
        for cell in row {
            write_cell(w, cell)?;
        }
        w.end("a:tr")?;
    }

    w.end("a:tbl")?;
    w.end("a:graphicData")?;
    w.end("a:graphic")?;
    w.end("p:graphicFrame")
}

fn write_cell(w: &mut XmlWriter, cell: &TableCell) -> Result<()> {
    w.start("a:tc", &[])?;
    w.start("a:txBody", &[])?;
    w.empty("a:bodyPr", &[])?;
    w.empty("a:lstStyle", &[])?;
    write_paragraph(w, &cell.paragraph)?;
    w.end("a:txBody")?;

    let (mx, my) = (cell.margin_x.to_string(), cell.margin_y.to_string());
    w.start(
        "a:tcPr",
        &[
            ("marL", mx.as_str()),
            ("marR", mx.as_str()),
            ("marT", my.as_str()),
            ("marB", my.as_str()),
        ],
    )?;
    for edge in ["a:lnL", "a:lnR", "a:lnT", "a:lnB"] {
        write_cell_border(w, edge, &cell.border)?;
    }
    fill(w, cell.fill)?;
    w.end("a:tcPr")?;
    w.end("a:tc")
}

fn write_cell_border(w: &mut XmlWriter, edge: &str, border: &CellBorder) -> Result<()> {
    let width = border.width.to_string();
    w.start(edge, &[("w", width.as_str())])?;
    solid_fill(w, border.color)?;
    let dash = if border.dashed { "dash" } else { "solid" };
    w.empty("a:prstDash", &[("val", dash)])?;
    w.end(edge)
}

//! HTML `<table>` to native table.

use super::inline::{circle_color, element_runs, InlineFormat, DOT};
use super::{palette, SlideCanvas};
use crate::dom;
use crate::style::StyleContext;
use deck_core::color::border_color;
use deck_core::css::px_to_pt;
use deck_core::geometry::{column_widths, to_emu, CANVAS_WIDTH_PX};
use deck_core::{Align, CellBorder, Frame, Paragraph, PxRect, Result, Rgb, StyleDict, Table, TableCell};
use scraper::ElementRef;

/// Height of every table row.
pub const ROW_HEIGHT_PX: f64 = 22.0;

/// Cell border width in EMU (0.5pt).
const BORDER_EMU: i64 = 6350;

/// Font size of a table without one, in px.
const DEFAULT_TABLE_FONT_PX: f64 = 11.0;

const BORDER_KEYS: &[&str] = &["border", "border-top", "border-bottom", "border-left", "border-right"];

/// Frame height of a table with the given element's rows.
pub fn table_height(table: ElementRef<'_>) -> f64 {
    dom::table_rows(table).len() as f64 * ROW_HEIGHT_PX + 4.0
}

/// First border color found among the border properties.
fn any_border_color(style: &StyleDict) -> Option<Rgb> {
    BORDER_KEYS
        .iter()
        .find_map(|key| style.get(key).and_then(border_color))
}

/// Render `table` at `rect.left`/`rect.top`. `rect.width` is the container
/// width; the table's own `width` overrides it.
pub fn render_table(
    ctx: &StyleContext,
    canvas: &mut SlideCanvas,
    table: ElementRef<'_>,
    rect: PxRect,
) -> Result<()> {
    let rows = dom::table_rows(table);
    let n_cols = rows.iter().map(|(_, cells)| cells.len()).max().unwrap_or(0);
    if rows.is_empty() || n_cols == 0 {
        log::debug!("skipping empty table");
        return Ok(());
    }

    let table_style = dom::inline_style(table);
    let mut width = rect.width;
    if width <= 0.0 {
        width = CANVAS_WIDTH_PX - rect.left - 20.0;
    }
    width = table_style.length_or("width", width, width);

    let section = dom::classes(table)
        .first()
        .map(|class| format!(".{}", class));
    let section_css = |cell: &str| match &section {
        Some(prefix) => ctx.css(&[format!("{} {}", prefix, cell).as_str()]),
        None => StyleDict::new(),
    };
    let th_css = section_css("th");
    let td_css = section_css("td");

    let dashed = table_style.has_dashed_border() || td_css.has_dashed_border() || th_css.has_dashed_border();
    let border = CellBorder {
        color: any_border_color(&td_css)
            .or_else(|| any_border_color(&th_css))
            .or_else(|| table_style.get("border").and_then(border_color))
            .unwrap_or(palette::BORDER),
        width: BORDER_EMU,
        dashed,
    };
    let table_font_px = table_style.px_or("font-size", DEFAULT_TABLE_FONT_PX);

    let mut explicit: Vec<Option<f64>> = rows[0]
        .1
        .iter()
        .map(|cell| {
            let own = dom::inline_style(*cell).length_or("width", 0.0, width);
            let declared = if own > 0.0 {
                own
            } else {
                dom::classes(*cell)
                    .iter()
                    .map(|class| ctx.css(&[format!(".{}", class).as_str()]).length_or("width", 0.0, width))
                    .find(|w| *w > 0.0)
                    .unwrap_or(0.0)
            };
            (declared > 0.0).then_some(declared)
        })
        .collect();
    explicit.resize(n_cols, None);
    let columns = column_widths(&explicit, width)
        .into_iter()
        .map(to_emu)
        .collect::<Result<Vec<_>>>()?;

    let margin_x = to_emu(4.0)?;
    let margin_y = to_emu(2.0)?;
    let mut out_rows = Vec::with_capacity(rows.len());

    for (tr, cells) in &rows {
        let row_style = dom::inline_style(*tr);
        let row_fill = row_style.background();
        let row_color = row_style.color("color");

        let mut out_cells: Vec<TableCell> = cells
            .iter()
            .take(n_cols)
            .map(|cell| {
                let header = dom::is_tag(*cell, "th");
                let cell_style = CellStyle {
                    inline: dom::inline_style(*cell),
                    class: ctx.class_rules(*cell),
                    section: if header { th_css.clone() } else { td_css.clone() },
                };
                let paragraph = cell_paragraph(ctx, *cell, &cell_style, header, row_color, row_fill, table_font_px);
                TableCell {
                    paragraph,
                    fill: cell_style.fill_over(row_fill),
                    border,
                    margin_x,
                    margin_y,
                }
            })
            .collect();
        while out_cells.len() < n_cols {
            out_cells.push(TableCell {
                paragraph: Paragraph::default(),
                fill: row_fill,
                border,
                margin_x,
                margin_y,
            });
        }
        out_rows.push(out_cells);
    }

    let mut frame = Frame::from_px(
        rect.left,
        rect.top,
        width,
        rows.len() as f64 * ROW_HEIGHT_PX + 4.0,
    )?;
    // Grid and frame must agree to the EMU.
    frame.cx = columns.iter().sum();
    log::debug!("table {}x{} at ({}, {}) width {}", rows.len(), n_cols, rect.left, rect.top, width);
    canvas.table(Table {
        frame,
        columns,
        row_height: to_emu(ROW_HEIGHT_PX)?,
        rows: out_rows,
    });
    Ok(())
}

/// Style layers of one cell: inline, then its class rules, then the
/// `.<table-class> th|td` rule.
struct CellStyle {
    inline: StyleDict,
    class: StyleDict,
    section: StyleDict,
}

impl CellStyle {
    fn get(&self, key: &str) -> Option<&str> {
        self.inline
            .get(key)
            .or_else(|| self.class.get(key))
            .or_else(|| self.section.get(key))
    }

    fn px(&self, key: &str) -> Option<f64> {
        [&self.inline, &self.class, &self.section]
            .into_iter()
            .find_map(|s| s.px(key).filter(|v| *v > 0.0))
    }

    /// Explicit color on the cell itself.
    fn color(&self) -> Option<Rgb> {
        self.inline.color("color").or_else(|| self.class.color("color"))
    }

    /// Cell fill, then the row's, then the `th`/`td` default.
    fn fill_over(&self, row: Option<Rgb>) -> Option<Rgb> {
        self.inline
            .background()
            .or_else(|| self.class.background())
            .or(row)
            .or_else(|| self.section.background())
    }
}

fn cell_paragraph(
    ctx: &StyleContext,
    cell: ElementRef<'_>,
    style: &CellStyle,
    header: bool,
    row_color: Option<Rgb>,
    row_fill: Option<Rgb>,
    table_font_px: f64,
) -> Paragraph {
    let align = Align::from_css(style.get("text-align").unwrap_or("left"));
    let bold = style
        .get("font-weight")
        .map(deck_core::css::is_bold)
        .unwrap_or(header);

    if let Some(dot) = circle_color(cell) {
        return Paragraph {
            align,
            runs: vec![ctx.run(DOT, 10.0, dot).bold(bold)],
        };
    }

    let mut size_pt = px_to_pt(style.px("font-size").unwrap_or(table_font_px));
    if size_pt < 6.0 {
        size_pt = 8.0;
    }

    let fill = style.fill_over(row_fill);
    let explicit = style.color().or(row_color);
    let color = match (explicit, fill) {
        (None, Some(fill)) if !fill.is_light() => palette::WHITE,
        _ => explicit.unwrap_or(palette::TEXT),
    };

    let mut runs = element_runs(ctx, cell, InlineFormat::new(size_pt, color));
    for run in &mut runs {
        run.bold |= bold;
    }
    Paragraph { align, runs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::geometry::to_px;
    use deck_core::{Shape, Stylesheet};
    use scraper::Html;

    fn render(html: &str, css: &str, rect: PxRect) -> Table {
        let doc = Html::parse_fragment(html);
        let table = dom::find_tag(doc.root_element(), "table").unwrap();
        let ctx = StyleContext::new(Stylesheet::parse(css), "Arial");
        let mut canvas = SlideCanvas::new("Arial");
        render_table(&ctx, &mut canvas, table, rect).unwrap();
        match canvas.into_shapes().pop() {
            Some(Shape::Table(t)) => t,
            other => panic!("expected a table, got {:?}", other),
        }
    }

    #[test]
    fn test_explicit_and_auto_columns() {
        let table = render(
            r#"<table style="width:400px"><tr><th style="width:200px">Item</th><th>Cost</th></tr>
               <tr><td>A</td><td>1</td></tr></table>"#,
            "",
            PxRect::new(30.0, 100.0, 900.0, 0.0),
        );
        let widths: Vec<f64> = table.columns.iter().map(|c| to_px(*c)).collect();
        assert_eq!(widths, vec![200.0, 200.0]);
        assert_eq!(table.frame.to_rect(), PxRect::new(30.0, 100.0, 400.0, 48.0));
        assert_eq!(table.row_height, to_emu(22.0).unwrap());
        assert!(table.rows[0][0].paragraph.runs[0].bold);
        assert!(!table.rows[1][0].paragraph.runs[0].bold);
    }

    #[test]
    fn test_all_explicit_columns_fill_table_width() {
        let table = render(
            r#"<table style="width:400px"><tr><td style="width:100px">a</td><td style="width:100px">b</td></tr></table>"#,
            "",
            PxRect::new(30.0, 100.0, 900.0, 0.0),
        );
        let widths: Vec<f64> = table.columns.iter().map(|c| to_px(*c)).collect();
        assert_eq!(widths, vec![200.0, 200.0]);
        assert_eq!(table.columns.iter().sum::<i64>(), table.frame.cx);
        assert_eq!(table.frame.to_rect().width, 400.0);
    }

    #[test]
    fn test_class_width_and_percent() {
        let table = render(
            r#"<table><tr><td class="narrow">a</td><td style="width:50%">b</td><td>c</td></tr></table>"#,
            ".narrow { width: 100px }",
            PxRect::new(0.0, 0.0, 600.0, 0.0),
        );
        let widths: Vec<f64> = table.columns.iter().map(|c| to_px(*c)).collect();
        assert_eq!(widths, vec![100.0, 300.0, 200.0]);
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let table = render(
            "<table><tr><td>a</td></tr><tr><td>b</td><td>c</td><td>d</td></tr></table>",
            "",
            PxRect::new(0.0, 0.0, 300.0, 0.0),
        );
        assert_eq!(table.columns.len(), 3);
        assert!(table.rows.iter().all(|r| r.len() == 3));
        assert!(table.rows[0][2].paragraph.runs.is_empty());
    }

    #[test]
    fn test_fill_priority_and_contrast() {
        let table = render(
            r#"<table class="grid">
                 <tr style="background:#eeeeee"><th>H</th><th style="background:#003366">Dark</th></tr>
                 <tr><td>x</td><td class="hot">y</td></tr>
               </table>"#,
            ".grid td { background: #fafafa } .hot { background: #ff0000; color: #000000 }",
            PxRect::new(0.0, 0.0, 200.0, 0.0),
        );
        assert_eq!(table.rows[0][0].fill, Some(Rgb(0xEE, 0xEE, 0xEE)));
        assert_eq!(table.rows[0][1].fill, Some(Rgb(0x00, 0x33, 0x66)));
        assert_eq!(table.rows[0][1].paragraph.runs[0].color, palette::WHITE);
        assert_eq!(table.rows[0][0].paragraph.runs[0].color, palette::TEXT);
        assert_eq!(table.rows[1][0].fill, Some(Rgb(0xFA, 0xFA, 0xFA)));
        assert_eq!(table.rows[1][1].fill, Some(Rgb(0xFF, 0x00, 0x00)));
        assert_eq!(table.rows[1][1].paragraph.runs[0].color, Rgb(0, 0, 0));
    }

    #[test]
    fn test_td_cell_fill_beats_row_fill() {
        let table = render(
            r#"<table class="grid">
                 <tr style="background:#dddddd"><td style="background:#00ff00">a</td><td>b</td></tr>
               </table>"#,
            ".grid td { background: #fafafa }",
            PxRect::new(0.0, 0.0, 200.0, 0.0),
        );
        assert_eq!(table.rows[0][0].fill, Some(Rgb(0x00, 0xFF, 0x00)));
        assert_eq!(table.rows[0][1].fill, Some(Rgb(0xDD, 0xDD, 0xDD)));
    }

    #[test]
    fn test_dashed_border_from_section_css() {
        let table = render(
            r#"<table class="risk"><tr><td>a</td></tr></table>"#,
            ".risk td { border: 1px dashed #999999 }",
            PxRect::new(0.0, 0.0, 200.0, 0.0),
        );
        let border = table.rows[0][0].border;
        assert!(border.dashed);
        assert_eq!(border.color, Rgb(0x99, 0x99, 0x99));
        assert_eq!(border.width, 6350);

        let plain = render("<table><tr><td>a</td></tr></table>", "", PxRect::new(0.0, 0.0, 200.0, 0.0));
        assert!(!plain.rows[0][0].border.dashed);
        assert_eq!(plain.rows[0][0].border.color, palette::BORDER);
    }

    #[test]
    fn test_circle_indicator_and_font_floor() {
        let table = render(
            r#"<table style="font-size:4px"><tr>
                 <td><span style="display:inline-block;background:#00aa00;border-radius:50%"></span> ok</td>
                 <td>tiny</td>
               </tr></table>"#,
            "",
            PxRect::new(0.0, 0.0, 200.0, 0.0),
        );
        let dot = &table.rows[0][0].paragraph.runs;
        assert_eq!(dot.len(), 1);
        assert_eq!(dot[0].text, DOT);
        assert_eq!(dot[0].size_pt, 10.0);
        assert_eq!(dot[0].color, Rgb(0x00, 0xAA, 0x00));
        assert_eq!(table.rows[0][1].paragraph.runs[0].size_pt, 8.0);
    }

    #[test]
    fn test_default_width_fills_slide() {
        let table = render("<table><tr><td>a</td></tr></table>", "", PxRect::new(30.0, 0.0, 0.0, 0.0));
        assert_eq!(table.frame.to_rect().width, 910.0);
    }
}

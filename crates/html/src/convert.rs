//! Whole-document conversion.

use crate::dom;
use crate::slide::{SlideOutcome, SlideRenderer};
use crate::style::StyleContext;
use deck_core::{ConvertOptions, Deck, Error, Result, Slide, Stylesheet};
use deck_pptx::PptxWriter;
use scraper::{ElementRef, Html};

/// Convert an HTML document into the native shape model.
///
/// Every `div.<slide_class>` becomes one slide, in document order. A slide
/// that fails to render is replaced by an error placeholder; only a document
/// without slides is an error.
pub fn html_to_deck(html: &str, options: &ConvertOptions) -> Result<Deck> {
    let doc = Html::parse_document(html);
    let sheet = Stylesheet::parse(&dom::style_text(&doc));
    let font = options.resolve_font(sheet.font_family());
    log::debug!("stylesheet has {} rules, font {}", sheet.len(), font);
    let ctx = StyleContext::new(sheet, font);

    let slides = slide_containers(&doc, options.slide_class());
    if slides.is_empty() {
        return Err(Error::NoSlides(options.slide_class().to_string()));
    }

    let outcomes = render_slides(&ctx, &slides);
    let failed = outcomes.iter().filter(|o| o.is_failed()).count();

    let mut deck = Deck::new();
    for (i, outcome) in outcomes.into_iter().enumerate() {
        let mut slide = Slide::new(i + 1);
        slide.shapes = outcome.into_shapes();
        deck.add_slide(slide);
    }
    log::info!(
        "converted {} slides ({} replaced by error placeholders)",
        deck.slides.len(),
        failed
    );
    Ok(deck)
}

/// Convert an HTML document straight to `.pptx` bytes.
pub fn html_to_pptx(html: &str, options: &ConvertOptions) -> Result<Vec<u8>> {
    let deck = html_to_deck(html, options)?;
    PptxWriter::new().write_to_vec(&deck)
}

/// Render each slide container independently.
pub fn render_slides(ctx: &StyleContext, slides: &[ElementRef<'_>]) -> Vec<SlideOutcome> {
    let renderer = SlideRenderer::new(ctx);
    slides
        .iter()
        .enumerate()
        .map(|(i, slide)| renderer.render(*slide, i, slides.len()))
        .collect()
}

fn slide_containers<'a>(doc: &'a Html, class: &str) -> Vec<ElementRef<'a>> {
    dom::elements(doc.root_element())
        .filter(|e| dom::is_tag(*e, "div") && dom::has_class(*e, class))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{PxRect, Shape};
    use deck_pptx::PptxReader;
    use std::io::Cursor;

    fn document(css: &str, slides: &[&str]) -> String {
        let body: String = slides
            .iter()
            .map(|s| format!("<div class=\"slide\">{}</div>", s))
            .collect();
        format!(
            "<html><head><style>{}</style></head><body>{}</body></html>",
            css, body
        )
    }

    fn convert(css: &str, slides: &[&str]) -> Deck {
        html_to_deck(&document(css, slides), &ConvertOptions::new()).unwrap()
    }

    fn rects(slide: &Slide) -> Vec<(String, PxRect)> {
        slide
            .shapes
            .iter()
            .map(|s| {
                let text = match s {
                    Shape::Text(tb) => tb.paragraph.text(),
                    Shape::Table(_) => "<table>".to_string(),
                    Shape::Auto(_) => String::new(),
                };
                (text, s.frame().to_rect())
            })
            .collect()
    }

    const BUDGET: &str = r#"<div style="position:absolute;top:85px;left:20px;width:580px">
        <div class="section-header"><span class="section-title">BUDGET</span></div>
        <div class="section-box" style="height:80px">$150,000</div>
      </div>"#;

    #[test]
    fn test_budget_slide() {
        let deck = convert("", &[BUDGET]);
        assert_eq!(deck.slides.len(), 1);
        let slide = &deck.slides[0];
        let value = slide.find_text("$150,000").unwrap();
        let rect = value.frame.to_rect();
        assert_eq!((rect.left, rect.top), (28.0, 113.0));
        let boxed = rects(slide)
            .into_iter()
            .find(|(text, r)| text.is_empty() && r.height == 80.0)
            .map(|(_, r)| r);
        assert_eq!(boxed, Some(PxRect::new(20.0, 105.0, 580.0, 80.0)));
    }

    #[test]
    fn test_table_column_widths_balance() {
        let deck = convert(
            "",
            &[r#"<div style="position:absolute;top:100px;left:20px;width:400px">
                   <table><tr><td style="width:200px">a</td><td>b</td></tr></table>
                 </div>"#],
        );
        match &deck.slides[0].shapes[0] {
            Shape::Table(table) => {
                assert_eq!(table.columns, vec![1_905_000, 1_905_000]);
                assert_eq!(table.columns.iter().sum::<i64>(), table.frame.cx);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_nested_and_sibling_sections_match() {
        let nested = r#"<div style="position:absolute;top:60px;left:20px;width:500px">
            <div class="section-header"><span class="section-title">RISKS</span></div>
            <div class="section-box"><p>Vendor delay</p></div>
          </div>"#;
        let sibling = r#"<div style="position:absolute;top:60px;left:20px;width:500px">
            <div class="section-header"><span class="section-title">RISKS</span></div>
          </div>
          <div class="section-box"><p>Vendor delay</p></div>"#;
        let deck = convert("", &[nested, sibling]);
        assert_eq!(deck.slides[0].shapes, deck.slides[1].shapes);
        assert!(deck.slides[0].find_text("Vendor delay").is_some());
    }

    #[test]
    fn test_positioned_sibling_box_matches_nested() {
        let header = r#"<div class="section-header"><span class="section-title">PLAN</span></div>"#;
        let rich = "<p>Kickoff <strong>done</strong></p><ul><li>Design</li></ul>";
        let table = "<table><tr><th>Step</th><th>Owner</th></tr><tr><td>Build</td><td>Ops</td></tr></table>";

        for content in [rich, table] {
            let nested = format!(
                r#"<div style="position:absolute;top:60px;left:20px;width:500px">{}<div class="section-box">{}</div></div>"#,
                header, content
            );
            let sibling = format!(
                r#"<div style="position:absolute;top:60px;left:20px;width:500px">{}</div>
                   <div class="section-box" style="position:absolute;top:80px;left:20px">{}</div>"#,
                header, content
            );
            let deck = convert("", &[nested.as_str(), sibling.as_str()]);
            assert_eq!(deck.slides[0].shapes, deck.slides[1].shapes);

            for slide in &deck.slides {
                let boxed = rects(slide)
                    .into_iter()
                    .find(|(text, r)| text.is_empty() && r.height == 80.0)
                    .map(|(_, r)| r);
                assert_eq!(boxed, Some(PxRect::new(20.0, 80.0, 500.0, 80.0)));

                if content == rich {
                    let first = slide.find_text("Kickoff done").unwrap().frame.to_rect();
                    assert_eq!((first.left, first.top), (28.0, 88.0));
                } else {
                    match slide.shapes.last() {
                        Some(Shape::Table(t)) => {
                            assert_eq!(t.frame.to_rect(), PxRect::new(22.0, 82.0, 496.0, 48.0));
                        }
                        other => panic!("unexpected {:?}", other),
                    }
                }
            }
        }
    }

    #[test]
    fn test_failing_slide_is_isolated() {
        let deep = format!(
            r#"<div style="position:absolute;top:60px;left:20px;width:500px">
                 <div class="section-header"><span class="section-title">DEEP</span></div>
                 <div class="section-box">{}<p>x</p>{}</div>
               </div>"#,
            "<div>".repeat(40),
            "</div>".repeat(40)
        );
        let deck = convert(
            "",
            &[
                r#"<div class="main-title">One</div>"#,
                deep.as_str(),
                r#"<div class="main-title">Three</div>"#,
            ],
        );
        assert_eq!(deck.slides.len(), 3);
        assert!(deck.slides[0].find_text("One").is_some());
        assert!(deck.slides[2].find_text("Three").is_some());

        let failed = &deck.slides[1];
        assert_eq!(failed.shapes.len(), 1);
        let text = failed.texts().concat();
        assert!(text.starts_with("Slide rendering error: "));
        assert!(text.contains("nested too deeply"));
    }

    #[test]
    fn test_no_slides_is_an_error() {
        let err = html_to_deck("<html><body><p>nothing</p></body></html>", &ConvertOptions::new())
            .unwrap_err();
        assert!(matches!(err, Error::NoSlides(ref class) if class == "slide"));
        assert!(html_to_pptx("<p>nothing</p>", &ConvertOptions::new()).is_err());
    }

    #[test]
    fn test_custom_slide_class() {
        let html = r#"<div class="page"><div class="main-title">A</div></div>
                      <div class="slide"><div class="main-title">B</div></div>"#;
        let deck = html_to_deck(html, &ConvertOptions::new().with_slide_class("page")).unwrap();
        assert_eq!(deck.all_text(), vec!["A"]);
    }

    #[test]
    fn test_font_resolution() {
        let html = document(
            "body { font-family: -apple-system, 'Segoe UI', sans-serif }",
            &[r#"<div class="main-title">T</div>"#],
        );
        let deck = html_to_deck(&html, &ConvertOptions::new()).unwrap();
        match &deck.slides[0].shapes[0] {
            Shape::Text(tb) => assert_eq!(tb.paragraph.runs[0].font, "Segoe UI"),
            other => panic!("unexpected {:?}", other),
        }

        let forced = ConvertOptions::new().with_font_override(Some("Calibri".into()));
        let deck = html_to_deck(&html, &forced).unwrap();
        match &deck.slides[0].shapes[0] {
            Shape::Text(tb) => assert_eq!(tb.paragraph.runs[0].font, "Calibri"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_pptx_bytes_are_deterministic_and_readable() {
        let html = document(".main-title { color: #123456 }", &[BUDGET, r#"<div class="main-title">Next</div>"#]);
        let opts = ConvertOptions::new();
        let a = html_to_pptx(&html, &opts).unwrap();
        let b = html_to_pptx(&html, &opts).unwrap();
        assert_eq!(a, b);

        let summary = PptxReader::new().summarize(Cursor::new(a)).unwrap();
        assert_eq!(summary.slides.len(), 2);
        assert!(summary.slides[0].texts().contains(&"$150,000"));
        assert_eq!(summary.slides[1].texts(), vec!["Next"]);
    }
}

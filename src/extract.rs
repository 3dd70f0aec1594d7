//! Per-slide text and hyperlink extraction.
//!
//! The core of the crate: a pure traversal over a parsed [`Document`] that
//! produces one [`SlideResult`] per non-empty slide. Hyperlink targets are
//! resolved through each slide's relationship table with a fixed fallback
//! order, deduplicated per slide by exact URL equality, and paired with the
//! closest display text available. Traversal holds no state beyond the
//! current slide's seen-URL set, so concurrent extraction of independent
//! documents is safe.

use crate::error::Result;
use crate::pptx::hyperlinks::Hyperlink;
use crate::pptx::shape::Shape;
use crate::pptx::textframe::TextFrame;
use crate::pptx::{Document, Slide};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Maximum length of a link's display text, in characters.
///
/// Longer text is truncated to its first `MAX_LINK_TEXT` characters.
pub const MAX_LINK_TEXT: usize = 200;

/// One hyperlink extracted from a slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedUrl {
    /// Target URL
    pub url: String,

    /// Display text associated with the link, possibly empty
    pub text: String,

    /// 1-based ordinal of the slide the link was found on
    pub slide: usize,
}

/// The extraction result for one slide.
///
/// Serializes to `{"slide_number", "text", "urls", "url_count"}`, the shape
/// downstream consumers persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideResult {
    /// 1-based slide ordinal, matching presentation order
    pub slide_number: usize,

    /// All visible text fragments of the slide, joined by single spaces
    pub text: String,

    /// Accepted URLs in discovery order, deduplicated within the slide
    pub urls: Vec<ExtractedUrl>,

    /// Number of accepted URLs; always equals `urls.len()`
    pub url_count: usize,
}

/// Extract text and hyperlinks from every slide of a document.
///
/// Slides with neither text nor URLs are omitted; the remaining results keep
/// their original 1-based ordinals, so the sequence is strictly increasing
/// but may have gaps.
///
/// # Examples
///
/// ```rust,no_run
/// use decklinks::{Document, extract};
///
/// let doc = Document::open("presentation.pptx")?;
/// for slide in extract(&doc) {
///     println!("slide {}: {} URLs", slide.slide_number, slide.url_count);
/// }
/// # Ok::<(), decklinks::ParseError>(())
/// ```
pub fn extract(document: &Document) -> Vec<SlideResult> {
    let results: Vec<SlideResult> = document.slides().iter().filter_map(extract_slide).collect();

    let total_urls: usize = results.iter().map(|r| r.url_count).sum();
    log::debug!(
        "extracted {} slides with {} URLs",
        results.len(),
        total_urls
    );

    results
}

/// Open a package and extract it in one call.
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<Vec<SlideResult>> {
    Ok(extract(&Document::open(path)?))
}

/// Extract one slide, or `None` when it yields neither text nor URLs.
fn extract_slide(slide: &Slide) -> Option<SlideResult> {
    let mut fragments: Vec<String> = Vec::new();
    let mut acc = UrlAccumulator {
        slide,
        urls: Vec::new(),
        seen: HashSet::new(),
    };

    for shape in slide.shapes() {
        match shape {
            // Tables are visited in full and then skipped for all generic
            // handling: never also treated as a plain text shape, and their
            // frame-level click action is not consulted.
            Shape::Table(table) => {
                for row in &table.rows {
                    for cell in &row.cells {
                        let text = cell.text();
                        if !text.is_empty() {
                            fragments.push(text);
                        }
                        acc.collect_frame(&cell.frame);
                    }
                }
            },
            Shape::Text(sp) => {
                let text = sp.frame.text();
                let text = text.trim();
                if !text.is_empty() {
                    fragments.push(text.to_string());
                }
                acc.collect_frame(&sp.frame);
                acc.collect_links(&sp.click_hyperlinks, text);
            },
            Shape::Other(other) => {
                // Pictures and free shapes carry no text of their own.
                acc.collect_links(&other.click_hyperlinks, "");
            },
            // Groups structurally cannot carry a click action, and the
            // traversal does not descend into their children (see DESIGN.md).
            Shape::Group(_) => {},
        }
    }

    let text = fragments.join(" ");
    if text.is_empty() && acc.urls.is_empty() {
        return None;
    }

    Some(SlideResult {
        slide_number: slide.number(),
        text,
        url_count: acc.urls.len(),
        urls: acc.urls,
    })
}

/// Accumulates accepted URLs for one slide.
///
/// The seen-set lives exactly as long as the slide's traversal, which is
/// what bounds dedup to a per-slide scope.
struct UrlAccumulator<'a> {
    slide: &'a Slide,
    urls: Vec<ExtractedUrl>,
    seen: HashSet<String>,
}

impl UrlAccumulator<'_> {
    /// Resolve one hyperlink and record it if the acceptance rule passes:
    /// trimmed target non-empty, not an intra-document `#` anchor, and not
    /// already seen on this slide. First occurrence's display text wins.
    fn record(&mut self, link: &Hyperlink, display: &str) {
        let Some(target) = link.resolve(self.slide.rels()) else {
            return;
        };

        let url = target.trim();
        if url.is_empty() || url.starts_with('#') || self.seen.contains(url) {
            return;
        }

        self.seen.insert(url.to_string());
        self.urls.push(ExtractedUrl {
            url: url.to_string(),
            text: truncate_text(display),
            slide: self.slide.number(),
        });
    }

    /// Record several hyperlinks sharing one display text (shape-level
    /// click actions).
    fn collect_links(&mut self, links: &[Hyperlink], display: &str) {
        for link in links {
            self.record(link, display);
        }
    }

    /// Run the run/paragraph procedure over a text frame.
    ///
    /// Run-level hyperlinks use the run's own text as display text, falling
    /// back to the paragraph text accumulated so far; the paragraph-level
    /// hyperlink is a lower-priority source checked after the runs, with the
    /// full paragraph text as display.
    fn collect_frame(&mut self, frame: &TextFrame) {
        for para in &frame.paragraphs {
            let mut para_text = String::new();

            for run in &para.runs {
                para_text.push_str(&run.text);

                if let Some(link) = &run.hyperlink {
                    let run_text = run.text.trim();
                    let display = if run_text.is_empty() {
                        para_text.trim()
                    } else {
                        run_text
                    };
                    self.record(link, display);
                }
            }

            if let Some(link) = &para.hyperlink {
                self.record(link, para_text.trim());
            }
        }
    }
}

/// Keep the first [`MAX_LINK_TEXT`] characters of a display text.
fn truncate_text(text: &str) -> String {
    match text.char_indices().nth(MAX_LINK_TEXT) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opc::{Relationship, Relationships};
    use crate::pptx::shape::{OtherShape, TableCell, TableRow, TableShape, TextShape};
    use crate::pptx::textframe::{Paragraph, Run};

    const RT_HYPERLINK: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";

    fn text_shape(runs: Vec<Run>) -> Shape {
        Shape::Text(TextShape {
            frame: TextFrame {
                paragraphs: vec![Paragraph {
                    runs,
                    hyperlink: None,
                }],
            },
            click_hyperlinks: Vec::new(),
        })
    }

    fn slide(number: usize, shapes: Vec<Shape>) -> Slide {
        Slide::new(number, shapes, Relationships::new())
    }

    fn slide_with_rels(number: usize, shapes: Vec<Shape>, rels: &[(&str, &str)]) -> Slide {
        let mut table = Relationships::new();
        for (r_id, target) in rels {
            table.add(Relationship::new(
                r_id.to_string(),
                RT_HYPERLINK.to_string(),
                target.to_string(),
                true,
            ));
        }
        Slide::new(number, shapes, table)
    }

    #[test]
    fn test_text_only_slide() {
        // Scenario A: one text shape, no hyperlinks.
        let doc = Document::new(vec![slide(1, vec![text_shape(vec![Run::new("Hello World")])])]);
        let results = extract(&doc);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].slide_number, 1);
        assert_eq!(results[0].text, "Hello World");
        assert!(results[0].urls.is_empty());
        assert_eq!(results[0].url_count, 0);
    }

    #[test]
    fn test_direct_address_link() {
        // Scenario B: a run with a direct target address.
        let doc = Document::new(vec![slide(
            1,
            vec![text_shape(vec![Run::linked(
                "click here",
                Hyperlink::direct("https://example.com"),
            )])],
        )]);
        let results = extract(&doc);

        assert_eq!(
            results[0].urls,
            vec![ExtractedUrl {
                url: "https://example.com".to_string(),
                text: "click here".to_string(),
                slide: 1,
            }]
        );
        assert_eq!(results[0].url_count, 1);
    }

    #[test]
    fn test_relationship_fallback_link() {
        // Scenario C: no direct address, rId resolved through the slide rels.
        let doc = Document::new(vec![slide_with_rels(
            1,
            vec![text_shape(vec![Run::linked(
                "click here",
                Hyperlink::relationship("rId2"),
            )])],
            &[("rId2", "https://foo.org")],
        )]);
        let results = extract(&doc);

        assert_eq!(
            results[0].urls,
            vec![ExtractedUrl {
                url: "https://foo.org".to_string(),
                text: "click here".to_string(),
                slide: 1,
            }]
        );
    }

    #[test]
    fn test_duplicate_url_kept_once() {
        // Scenario D: two runs linking the same target; first wins.
        let doc = Document::new(vec![slide(
            1,
            vec![text_shape(vec![
                Run::linked("first", Hyperlink::direct("https://dup.com")),
                Run::linked("second", Hyperlink::direct("https://dup.com")),
            ])],
        )]);
        let results = extract(&doc);

        assert_eq!(results[0].url_count, 1);
        assert_eq!(results[0].urls[0].text, "first");
    }

    #[test]
    fn test_table_text_and_links() {
        // Scenario E: a table cell with text and a hyperlink.
        let doc = Document::new(vec![slide(
            1,
            vec![Shape::Table(TableShape {
                rows: vec![TableRow {
                    cells: vec![TableCell {
                        frame: TextFrame {
                            paragraphs: vec![Paragraph {
                                runs: vec![Run::linked(
                                    "Row1",
                                    Hyperlink::direct("https://table.com"),
                                )],
                                hyperlink: None,
                            }],
                        },
                    }],
                }],
            })],
        )]);
        let results = extract(&doc);

        assert_eq!(results[0].text, "Row1");
        assert_eq!(results[0].urls[0].url, "https://table.com");
        assert_eq!(results[0].urls[0].text, "Row1");
    }

    #[test]
    fn test_shape_click_action_uses_shape_text() {
        // Scenario F: shape-level hyperlink with the shape's text as display.
        let doc = Document::new(vec![slide(
            1,
            vec![Shape::Text(TextShape {
                frame: TextFrame {
                    paragraphs: vec![Paragraph {
                        runs: vec![Run::new("Visit us")],
                        hyperlink: None,
                    }],
                },
                click_hyperlinks: vec![Hyperlink::direct("https://shape.example")],
            })],
        )]);
        let results = extract(&doc);

        assert_eq!(results[0].urls[0].url, "https://shape.example");
        assert_eq!(results[0].urls[0].text, "Visit us");
    }

    #[test]
    fn test_picture_click_action_has_empty_text() {
        let doc = Document::new(vec![slide(
            1,
            vec![Shape::Other(OtherShape {
                element: "pic".to_string(),
                click_hyperlinks: vec![Hyperlink::direct("https://img.example")],
            })],
        )]);
        let results = extract(&doc);

        assert_eq!(results[0].text, "");
        assert_eq!(results[0].urls[0].text, "");
    }

    #[test]
    fn test_anchor_and_blank_urls_rejected() {
        let doc = Document::new(vec![slide(
            1,
            vec![text_shape(vec![
                Run::linked("anchor", Hyperlink::direct("#section-2")),
                Run::linked("blank", Hyperlink::direct("   ")),
                Run::linked("ok", Hyperlink::direct("https://kept.example")),
            ])],
        )]);
        let results = extract(&doc);

        assert_eq!(results[0].url_count, 1);
        assert_eq!(results[0].urls[0].url, "https://kept.example");
    }

    #[test]
    fn test_whitespace_only_slide_omitted() {
        let doc = Document::new(vec![
            slide(1, vec![text_shape(vec![Run::new("   \n  ")])]),
            slide(2, vec![]),
            slide(3, vec![text_shape(vec![Run::new("kept")])]),
        ]);
        let results = extract(&doc);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].slide_number, 3);
    }

    #[test]
    fn test_slide_ordinals_preserved_across_gaps() {
        let doc = Document::new(vec![
            slide(1, vec![text_shape(vec![Run::new("one")])]),
            slide(2, vec![]),
            slide(3, vec![text_shape(vec![Run::new("three")])]),
        ]);
        let numbers: Vec<usize> = extract(&doc).iter().map(|r| r.slide_number).collect();
        assert_eq!(numbers, vec![1, 3]);
    }

    #[test]
    fn test_same_url_on_two_slides_appears_per_slide() {
        let make = |n| {
            slide(
                n,
                vec![text_shape(vec![Run::linked(
                    "again",
                    Hyperlink::direct("https://both.example"),
                )])],
            )
        };
        let doc = Document::new(vec![make(1), make(2)]);
        let results = extract(&doc);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].urls[0].slide, 1);
        assert_eq!(results[1].urls[0].slide, 2);
    }

    #[test]
    fn test_display_text_truncated_to_200_chars() {
        let long = "x".repeat(250);
        let doc = Document::new(vec![slide(
            1,
            vec![text_shape(vec![Run::linked(
                long.clone(),
                Hyperlink::direct("https://long.example"),
            )])],
        )]);
        let results = extract(&doc);

        assert_eq!(results[0].urls[0].text, long[..200]);
    }

    #[test]
    fn test_truncation_is_character_based() {
        // 250 two-byte characters; byte-based slicing would panic or split.
        let long = "é".repeat(250);
        let doc = Document::new(vec![slide(
            1,
            vec![text_shape(vec![Run::linked(
                long,
                Hyperlink::direct("https://utf8.example"),
            )])],
        )]);
        let results = extract(&doc);

        assert_eq!(results[0].urls[0].text.chars().count(), 200);
    }

    #[test]
    fn test_empty_run_text_falls_back_to_paragraph_so_far() {
        let doc = Document::new(vec![slide(
            1,
            vec![text_shape(vec![
                Run::new("Read the docs "),
                Run::linked("", Hyperlink::direct("https://docs.example")),
            ])],
        )]);
        let results = extract(&doc);

        assert_eq!(results[0].urls[0].text, "Read the docs");
    }

    #[test]
    fn test_paragraph_hyperlink_lower_priority() {
        let doc = Document::new(vec![slide(
            1,
            vec![Shape::Text(TextShape {
                frame: TextFrame {
                    paragraphs: vec![Paragraph {
                        runs: vec![Run::linked("run", Hyperlink::direct("https://run.example"))],
                        hyperlink: Some(Hyperlink::direct("https://para.example")),
                    }],
                },
                click_hyperlinks: Vec::new(),
            })],
        )]);
        let results = extract(&doc);

        // Run first in discovery order, paragraph link after it.
        assert_eq!(results[0].urls.len(), 2);
        assert_eq!(results[0].urls[0].url, "https://run.example");
        assert_eq!(results[0].urls[1].url, "https://para.example");
        assert_eq!(results[0].urls[1].text, "run");
    }

    #[test]
    fn test_unresolvable_rid_is_skipped() {
        let doc = Document::new(vec![slide(
            1,
            vec![text_shape(vec![
                Run::linked("broken", Hyperlink::relationship("rId99")),
                Run::linked("ok", Hyperlink::direct("https://fine.example")),
            ])],
        )]);
        let results = extract(&doc);

        assert_eq!(results[0].url_count, 1);
        assert_eq!(results[0].urls[0].url, "https://fine.example");
    }

    #[test]
    fn test_group_children_not_traversed() {
        use crate::pptx::shape::GroupShape;

        let doc = Document::new(vec![slide(
            1,
            vec![Shape::Group(GroupShape {
                shapes: vec![text_shape(vec![Run::linked(
                    "hidden",
                    Hyperlink::direct("https://grouped.example"),
                )])],
            })],
        )]);

        // Reference behavior: a group is opaque to the traversal.
        assert!(extract(&doc).is_empty());
    }

    #[test]
    fn test_json_shape() {
        let doc = Document::new(vec![slide(
            1,
            vec![text_shape(vec![Run::linked(
                "click here",
                Hyperlink::direct("https://example.com"),
            )])],
        )]);
        let results = extract(&doc);

        let json = serde_json::to_value(&results[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "slide_number": 1,
                "text": "click here",
                "urls": [{"url": "https://example.com", "text": "click here", "slide": 1}],
                "url_count": 1,
            })
        );
    }

    #[test]
    fn test_end_to_end_package_extraction() {
        use std::io::{Cursor, Write};
        use zip::ZipWriter;
        use zip::write::SimpleFileOptions;

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        let parts: &[(&str, &str)] = &[
            (
                "[Content_Types].xml",
                r#"<?xml version="1.0"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
</Types>"#,
            ),
            (
                "_rels/.rels",
                r#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
</Relationships>"#,
            ),
            (
                "ppt/presentation.xml",
                r#"<?xml version="1.0"?>
<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<p:sldIdLst><p:sldId id="256" r:id="rId2"/></p:sldIdLst></p:presentation>"#,
            ),
            (
                "ppt/_rels/presentation.xml.rels",
                r#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml"/>
</Relationships>"#,
            ),
            (
                "ppt/slides/slide1.xml",
                r#"<?xml version="1.0"?>
<p:sld xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<p:cSld><p:spTree><p:sp><p:txBody>
<a:p><a:r><a:rPr><a:hlinkClick r:id="rId3"/></a:rPr><a:t>click here</a:t></a:r></a:p>
</p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#,
            ),
            (
                "ppt/slides/_rels/slide1.xml.rels",
                r#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://foo.org" TargetMode="External"/>
</Relationships>"#,
            ),
        ];
        for (name, body) in parts {
            writer.start_file(*name, options).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        let data = writer.finish().unwrap().into_inner();

        let results = extract(&Document::from_bytes(data).unwrap());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "click here");
        assert_eq!(
            results[0].urls,
            vec![ExtractedUrl {
                url: "https://foo.org".to_string(),
                text: "click here".to_string(),
                slide: 1,
            }]
        );
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        /// One generated run: a link target (possibly junk) and display text.
        fn run_strategy() -> impl Strategy<Value = Run> {
            (
                prop_oneof![
                    Just(String::new()),
                    "#[a-z]{0,6}",
                    " {0,3}",
                    "https://[a-z]{1,8}\\.example",
                ],
                "[a-zA-Z ]{0,300}",
            )
                .prop_map(|(url, text)| Run::linked(text, Hyperlink::direct(url)))
        }

        fn slides_strategy() -> impl Strategy<Value = Vec<Vec<Run>>> {
            prop::collection::vec(prop::collection::vec(run_strategy(), 0..8), 0..5)
        }

        proptest! {
            #[test]
            fn prop_invariants_hold(slides_runs in slides_strategy()) {
                let slides: Vec<Slide> = slides_runs
                    .into_iter()
                    .enumerate()
                    .map(|(idx, runs)| slide(idx + 1, vec![text_shape(runs)]))
                    .collect();
                let results = extract(&Document::new(slides));

                let mut last_number = 0;
                for result in &results {
                    // Ordinals strictly increasing, counts consistent.
                    prop_assert!(result.slide_number > last_number);
                    last_number = result.slide_number;
                    prop_assert_eq!(result.url_count, result.urls.len());

                    let mut seen = std::collections::HashSet::new();
                    for url in &result.urls {
                        prop_assert_eq!(url.slide, result.slide_number);
                        prop_assert!(!url.url.trim().is_empty());
                        prop_assert!(!url.url.starts_with('#'));
                        prop_assert!(url.text.chars().count() <= MAX_LINK_TEXT);
                        prop_assert!(seen.insert(url.url.clone()), "duplicate URL on slide");
                    }
                }
            }
        }
    }
}

//! Slide XML parsing: `<p:spTree>` into the owned shape model.
//!
//! Pull-parses DrawingML with `quick-xml`, matching on local names so the
//! namespace prefixes producers actually emit (`p:`, `a:`, or anything else)
//! never matter. Top-level children of the shape tree map onto [`Shape`]
//! variants; groups are descended recursively; text bodies become
//! paragraph/run structures with their hyperlink annotations attached.

use crate::error::{ParseError, Result};
use crate::pptx::hyperlinks::Hyperlink;
use crate::pptx::shape::{GroupShape, OtherShape, Shape, TableCell, TableRow, TableShape, TextShape};
use crate::pptx::textframe::{Paragraph, Run, TextFrame};
use quick_xml::Reader;
use quick_xml::events::{BytesRef, BytesStart, Event};

/// Parse a slide part's XML into its shapes, in document order.
pub(crate) fn parse_shapes(xml: &[u8]) -> Result<Vec<Shape>> {
    let mut reader = Reader::from_reader(xml);

    let mut shapes = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"spTree" => {
                parse_children(&mut reader, b"spTree", &mut shapes)?;
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e.to_string())),
            _ => {},
        }
    }

    Ok(shapes)
}

/// Parse the ordered slide rIds from the presentation part.
///
/// Reads `<p:sldId r:id="rIdN"/>` entries of `<p:sldIdLst>` in document
/// order, which is the presentation order. Only the relationship-namespaced
/// attribute is a rel ID; the bare `id` on a sldId is the numeric slide ID.
pub(crate) fn parse_slide_rids(xml: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml);

    let mut rids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"sldId" {
                    for attr in e.attributes().flatten() {
                        if attr.key.local_name().as_ref() == b"id" && attr.key.prefix().is_some() {
                            rids.push(attr.unescape_value()?.to_string());
                            break;
                        }
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e.to_string())),
            _ => {},
        }
    }

    Ok(rids)
}

/// Parse the children of a group-like element (`p:spTree` or `p:grpSp`)
/// until its end tag, appending one [`Shape`] per recognized child.
fn parse_children(reader: &mut Reader<&[u8]>, end_tag: &[u8], out: &mut Vec<Shape>) -> Result<()> {
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"sp" => out.push(Shape::Text(parse_text_shape(reader, b"sp")?)),
                b"graphicFrame" => out.push(parse_graphic_frame(reader)?),
                b"grpSp" => {
                    let mut children = Vec::new();
                    parse_children(reader, b"grpSp", &mut children)?;
                    out.push(Shape::Group(GroupShape { shapes: children }));
                },
                b"pic" | b"cxnSp" => {
                    let element = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    out.push(Shape::Other(parse_other_shape(reader, element)?));
                },
                // Non-shape children (nvGrpSpPr, grpSpPr, AlternateContent
                // wrappers) are skipped wholesale so nothing inside them is
                // mistaken for a top-level shape.
                _ => skip_subtree(reader)?,
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == end_tag => return Ok(()),
            Ok(Event::Eof) => return Err(truncated()),
            Err(e) => return Err(ParseError::Xml(e.to_string())),
            _ => {},
        }
    }
}

/// Parse a `p:sp` element into a [`TextShape`].
///
/// `a:hlinkClick`/`a:hlinkHover` outside the text body (they live under the
/// shape's `cNvPr`) are the shape-level click action; the text body itself
/// is handed to [`parse_text_frame`].
fn parse_text_shape(reader: &mut Reader<&[u8]>, end_tag: &[u8]) -> Result<TextShape> {
    let mut shape = TextShape::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"txBody" => shape.frame = parse_text_frame(reader, b"txBody")?,
                b"hlinkClick" | b"hlinkHover" => {
                    if let Some(link) = hyperlink_from_attrs(&e) {
                        shape.click_hyperlinks.push(link);
                    }
                },
                _ => {},
            },
            Ok(Event::Empty(e)) => {
                if matches!(e.local_name().as_ref(), b"hlinkClick" | b"hlinkHover")
                    && let Some(link) = hyperlink_from_attrs(&e)
                {
                    shape.click_hyperlinks.push(link);
                }
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == end_tag => break,
            Ok(Event::Eof) => return Err(truncated()),
            Err(e) => return Err(ParseError::Xml(e.to_string())),
            _ => {},
        }
    }

    Ok(shape)
}

/// Parse a `p:pic` or `p:cxnSp` element: click hyperlinks only, no text.
fn parse_other_shape(reader: &mut Reader<&[u8]>, element: String) -> Result<OtherShape> {
    let end_tag = element.as_bytes().to_vec();
    let mut shape = OtherShape {
        element,
        click_hyperlinks: Vec::new(),
    };

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if matches!(e.local_name().as_ref(), b"hlinkClick" | b"hlinkHover")
                    && let Some(link) = hyperlink_from_attrs(&e)
                {
                    shape.click_hyperlinks.push(link);
                }
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == end_tag.as_slice() => break,
            Ok(Event::Eof) => return Err(truncated()),
            Err(e) => return Err(ParseError::Xml(e.to_string())),
            _ => {},
        }
    }

    Ok(shape)
}

/// Parse a `p:graphicFrame` element.
///
/// A frame holding an `a:tbl` becomes a [`Shape::Table`]; anything else (a
/// chart, a diagram, an OLE object) is a [`Shape::Other`] that can at most
/// carry a click hyperlink.
fn parse_graphic_frame(reader: &mut Reader<&[u8]>) -> Result<Shape> {
    let mut table = None;
    let mut click_hyperlinks = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"tbl" => table = Some(parse_table(reader)?),
                b"hlinkClick" | b"hlinkHover" => {
                    if let Some(link) = hyperlink_from_attrs(&e) {
                        click_hyperlinks.push(link);
                    }
                },
                _ => {},
            },
            Ok(Event::Empty(e)) => {
                if matches!(e.local_name().as_ref(), b"hlinkClick" | b"hlinkHover")
                    && let Some(link) = hyperlink_from_attrs(&e)
                {
                    click_hyperlinks.push(link);
                }
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"graphicFrame" => break,
            Ok(Event::Eof) => return Err(truncated()),
            Err(e) => return Err(ParseError::Xml(e.to_string())),
            _ => {},
        }
    }

    Ok(match table {
        Some(table) => Shape::Table(table),
        None => Shape::Other(OtherShape {
            element: "graphicFrame".to_string(),
            click_hyperlinks,
        }),
    })
}

/// Parse an `a:tbl` element into rows of cells.
fn parse_table(reader: &mut Reader<&[u8]>) -> Result<TableShape> {
    let mut table = TableShape::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"tr" => {
                table.rows.push(parse_table_row(reader)?);
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"tbl" => break,
            Ok(Event::Eof) => return Err(truncated()),
            Err(e) => return Err(ParseError::Xml(e.to_string())),
            _ => {},
        }
    }

    Ok(table)
}

fn parse_table_row(reader: &mut Reader<&[u8]>) -> Result<TableRow> {
    let mut row = TableRow::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"tc" => {
                row.cells.push(parse_table_cell(reader)?);
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"tr" => break,
            Ok(Event::Eof) => return Err(truncated()),
            Err(e) => return Err(ParseError::Xml(e.to_string())),
            _ => {},
        }
    }

    Ok(row)
}

fn parse_table_cell(reader: &mut Reader<&[u8]>) -> Result<TableCell> {
    let mut cell = TableCell::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"txBody" => {
                cell.frame = parse_text_frame(reader, b"txBody")?;
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"tc" => break,
            Ok(Event::Eof) => return Err(truncated()),
            Err(e) => return Err(ParseError::Xml(e.to_string())),
            _ => {},
        }
    }

    Ok(cell)
}

/// Parse a text body (`p:txBody` or `a:txBody`) until its end tag.
fn parse_text_frame(reader: &mut Reader<&[u8]>, end_tag: &[u8]) -> Result<TextFrame> {
    let mut frame = TextFrame::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"p" => {
                frame.paragraphs.push(parse_paragraph(reader)?);
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == end_tag => break,
            Ok(Event::Eof) => return Err(truncated()),
            Err(e) => return Err(ParseError::Xml(e.to_string())),
            _ => {},
        }
    }

    Ok(frame)
}

/// Parse an `a:p` paragraph: runs in order plus the optional
/// paragraph-level hyperlink from `a:pPr`.
fn parse_paragraph(reader: &mut Reader<&[u8]>) -> Result<Paragraph> {
    let mut para = Paragraph::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"r" => para.runs.push(parse_run(reader)?),
                b"pPr" => {
                    let link = parse_paragraph_props(reader)?;
                    if para.hyperlink.is_none() {
                        para.hyperlink = link;
                    }
                },
                _ => {},
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"p" => break,
            Ok(Event::Eof) => return Err(truncated()),
            Err(e) => return Err(ParseError::Xml(e.to_string())),
            _ => {},
        }
    }

    Ok(para)
}

/// Scan `a:pPr` for a paragraph-level `a:hlinkClick`; first one wins.
fn parse_paragraph_props(reader: &mut Reader<&[u8]>) -> Result<Option<Hyperlink>> {
    let mut link = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"hlinkClick" && link.is_none() {
                    link = hyperlink_from_attrs(&e);
                }
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"pPr" => break,
            Ok(Event::Eof) => return Err(truncated()),
            Err(e) => return Err(ParseError::Xml(e.to_string())),
            _ => {},
        }
    }

    Ok(link)
}

/// Parse an `a:r` run: text content from `a:t` (entities resolved) and the
/// run-level hyperlink from `a:rPr/a:hlinkClick`.
fn parse_run(reader: &mut Reader<&[u8]>) -> Result<Run> {
    let mut run = Run::default();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"t" => in_text = true,
                b"hlinkClick" => {
                    if run.hyperlink.is_none() {
                        run.hyperlink = hyperlink_from_attrs(&e);
                    }
                },
                _ => {},
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"hlinkClick" && run.hyperlink.is_none() {
                    run.hyperlink = hyperlink_from_attrs(&e);
                }
            },
            Ok(Event::Text(t)) if in_text => match t.decode() {
                Ok(text) => run.text.push_str(&text),
                Err(err) => {
                    log::debug!("undecodable run text, keeping raw bytes: {err}");
                    run.text.push_str(&String::from_utf8_lossy(t.as_ref()));
                },
            },
            Ok(Event::GeneralRef(r)) if in_text => append_general_ref(&mut run.text, &r),
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"r" => break,
                _ => {},
            },
            Ok(Event::Eof) => return Err(truncated()),
            Err(e) => return Err(ParseError::Xml(e.to_string())),
            _ => {},
        }
    }

    Ok(run)
}

/// Build a [`Hyperlink`] from a `hlinkClick`/`hlinkHover` element's
/// attributes.
///
/// A relationship-namespaced `id` (any prefix) fills `r_id`; a bare `id`
/// fills `plain_id`. Returns `None` when the element carries neither, e.g.
/// a pure `ppaction://` navigation binding.
fn hyperlink_from_attrs(e: &BytesStart) -> Option<Hyperlink> {
    let mut link = Hyperlink::default();

    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() != b"id" {
            continue;
        }
        let Ok(value) = attr.unescape_value() else {
            log::debug!("undecodable hyperlink id attribute, skipping");
            continue;
        };
        if attr.key.prefix().is_some() {
            link.r_id = Some(value.to_string());
        } else {
            link.plain_id = Some(value.to_string());
        }
    }

    if link.is_empty() { None } else { Some(link) }
}

/// Append a general entity reference (`&amp;`, `&#238;`, ...) to `text`.
fn append_general_ref(text: &mut String, r: &BytesRef) {
    if let Ok(Some(ch)) = r.resolve_char_ref() {
        text.push(ch);
        return;
    }
    match &**r {
        b"amp" => text.push('&'),
        b"lt" => text.push('<'),
        b"gt" => text.push('>'),
        b"quot" => text.push('"'),
        b"apos" => text.push('\''),
        other => log::debug!(
            "unresolved entity reference &{};",
            String::from_utf8_lossy(other)
        ),
    }
}

/// Skip the rest of the subtree whose start tag was just consumed.
fn skip_subtree(reader: &mut Reader<&[u8]>) -> Result<()> {
    let mut depth = 1usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            },
            Ok(Event::Eof) => return Err(truncated()),
            Err(e) => return Err(ParseError::Xml(e.to_string())),
            _ => {},
        }
    }
}

fn truncated() -> ParseError {
    ParseError::Xml("unexpected end of slide XML".to_string())
}

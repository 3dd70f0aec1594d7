/// PowerPoint (.pptx) document loading and the slide model.
///
/// [`Document`] is the loader: it opens the OOXML package (a ZIP of XML
/// parts), verifies the main part's content type, resolves the slide order
/// from the presentation part, and parses every slide into the owned shape
/// model along with its relationship table. Extraction itself works over
/// the resulting in-memory model only; see [`crate::extract`].
pub mod hyperlinks;
mod parser;
pub mod shape;
pub mod textframe;

pub use hyperlinks::Hyperlink;
pub use shape::{GroupShape, OtherShape, Shape, TableCell, TableRow, TableShape, TextShape};
pub use textframe::{Paragraph, Run, TextFrame};

use crate::error::{ParseError, Result};
use crate::opc::content_types::content_type as ct;
use crate::opc::{self, ContentTypeMap, Relationships};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Relationship type of the package's main document part.
const RT_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// A parsed presentation: an ordered sequence of slides.
///
/// Read-only input to extraction, owned by the caller for its duration.
///
/// # Examples
///
/// ```rust,no_run
/// use decklinks::Document;
///
/// let doc = Document::open("presentation.pptx")?;
/// println!("{} slides", doc.slides().len());
/// # Ok::<(), decklinks::ParseError>(())
/// ```
#[derive(Debug)]
pub struct Document {
    /// Slides in presentation order
    slides: Vec<Slide>,
}

impl Document {
    /// Create a document from already-assembled slides.
    ///
    /// For callers that build the model themselves rather than loading a
    /// package.
    pub fn new(slides: Vec<Slide>) -> Self {
        Self { slides }
    }

    /// Open a .pptx package from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ParseError::PackageNotFound(path.display().to_string()));
        }

        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Open a .pptx package from owned bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(data))
    }

    /// Open a .pptx package from a reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        Self::load(&mut archive)
    }

    /// Get the slides in presentation order.
    #[inline]
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    fn load<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Self> {
        let ct_map = ContentTypeMap::parse(&read_part(archive, "/[Content_Types].xml")?)?;

        // The main part is located through the package-level rels, not by a
        // hard-coded path.
        let root_rels = Relationships::parse(&read_part(archive, "/_rels/.rels")?)?;
        let pres_partname = root_rels
            .iter()
            .find(|rel| rel.reltype() == RT_OFFICE_DOCUMENT)
            .map(|rel| opc::resolve_rel_ref("/", rel.target_ref()))
            .ok_or_else(|| ParseError::PartNotFound("main presentation part".to_string()))?;

        let got = ct_map
            .content_type_for(&pres_partname)
            .unwrap_or_default()
            .to_string();
        // Both regular and macro-enabled presentations are accepted.
        if got != ct::PML_PRESENTATION_MAIN && got != ct::PML_PRES_MACRO_MAIN {
            return Err(ParseError::InvalidContentType {
                expected: format!("{} or {}", ct::PML_PRESENTATION_MAIN, ct::PML_PRES_MACRO_MAIN),
                got,
            });
        }

        let pres_xml = read_part(archive, &pres_partname)?;
        let slide_rids = parser::parse_slide_rids(&pres_xml)?;
        let pres_rels = read_rels(archive, &pres_partname)?;
        let base_uri = base_uri(&pres_partname);

        let mut slides = Vec::with_capacity(slide_rids.len());
        for (idx, r_id) in slide_rids.iter().enumerate() {
            let rel = pres_rels.get(r_id).ok_or_else(|| {
                ParseError::InvalidRelationship(format!("slide relationship {} not found", r_id))
            })?;
            let partname = opc::resolve_rel_ref(base_uri, rel.target_ref());

            let slide_xml = read_part(archive, &partname)?;
            let shapes = parser::parse_shapes(&slide_xml)?;
            let rels = read_rels(archive, &partname)?;

            slides.push(Slide::new(idx + 1, shapes, rels));
        }

        log::debug!("loaded {} slides from presentation package", slides.len());
        Ok(Document::new(slides))
    }
}

/// One slide: its ordinal, shapes, and relationship table.
#[derive(Debug)]
pub struct Slide {
    /// 1-based position in presentation order
    number: usize,

    /// Shapes in document order
    shapes: Vec<Shape>,

    /// The slide part's relationship table, used for hyperlink resolution
    rels: Relationships,
}

impl Slide {
    /// Create a slide from its parts.
    pub fn new(number: usize, shapes: Vec<Shape>, rels: Relationships) -> Self {
        Self {
            number,
            shapes,
            rels,
        }
    }

    /// Get the 1-based slide ordinal.
    #[inline]
    pub fn number(&self) -> usize {
        self.number
    }

    /// Get the shapes in document order.
    #[inline]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Get the slide's relationship table.
    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }
}

/// Read a part's bytes by absolute partname.
fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, partname: &str) -> Result<Vec<u8>> {
    match read_part_opt(archive, partname)? {
        Some(data) => Ok(data),
        None => Err(ParseError::PartNotFound(partname.to_string())),
    }
}

/// Read a part's bytes, or `None` if the member is absent.
fn read_part_opt<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    partname: &str,
) -> Result<Option<Vec<u8>>> {
    let member = partname.trim_start_matches('/');
    let mut file = match archive.by_name(member) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(err) => return Err(ParseError::Zip(err)),
    };

    let mut data = Vec::new();
    file.read_to_end(&mut data)?;
    Ok(Some(data))
}

/// Read a part's relationship table; absent `.rels` means an empty table.
fn read_rels<R: Read + Seek>(archive: &mut ZipArchive<R>, partname: &str) -> Result<Relationships> {
    match read_part_opt(archive, &rels_partname(partname))? {
        Some(xml) => Relationships::parse(&xml),
        None => Ok(Relationships::new()),
    }
}

/// The partname of a part's sibling `.rels` part.
///
/// `/ppt/slides/slide1.xml` -> `/ppt/slides/_rels/slide1.xml.rels`.
fn rels_partname(partname: &str) -> String {
    match partname.rfind('/') {
        Some(pos) => format!("{}/_rels/{}.rels", &partname[..pos], &partname[pos + 1..]),
        None => format!("_rels/{}.rels", partname),
    }
}

/// The directory portion of a partname, e.g. `/ppt` for
/// `/ppt/presentation.xml`.
fn base_uri(partname: &str) -> &str {
    match partname.rfind('/') {
        Some(0) => "/",
        Some(pos) => &partname[..pos],
        None => "/",
    }
}

//! Decklinks - extract per-slide text and hyperlinks from PowerPoint presentations
//!
//! This library opens a .pptx package (OOXML), parses every slide into an
//! owned shape model, and extracts each slide's visible text together with
//! every distinct hyperlink on it.
//!
//! # Features
//!
//! - **Package loading**: ZIP-based OPC packages with content-type
//!   verification and slide ordering from the presentation part
//! - **Typed shape model**: text shapes, tables, groups, and pictures as a
//!   tagged union with explicit optional fields
//! - **Hyperlink resolution**: direct addresses and relationship-ID
//!   references resolved through each slide's relationship table, with a
//!   fixed fallback order
//! - **Per-slide dedup**: each URL appears once per slide, first display
//!   text wins
//!
//! # Example - Extracting a presentation
//!
//! ```no_run
//! use decklinks::extract_file;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! for slide in extract_file("presentation.pptx")? {
//!     println!("slide {}: {}", slide.slide_number, slide.text);
//!     for url in &slide.urls {
//!         println!("  {} ({})", url.url, url.text);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Separating loading from extraction
//!
//! ```no_run
//! use decklinks::{Document, extract};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = Document::open("presentation.pptx")?;
//! let results = extract(&doc);
//! println!("{} non-empty slides", results.len());
//! # Ok(())
//! # }
//! ```
//!
//! Extraction is pure and synchronous: the document is fully parsed into
//! memory first, each slide's dedup state is local to that slide, and
//! element-level oddities (an unresolvable relationship ID, a malformed
//! hyperlink attribute) are logged at debug level and skipped rather than
//! failing the document.

pub mod error;
pub mod extract;
pub mod opc;
pub mod pptx;

pub use error::{ParseError, Result};
pub use extract::{ExtractedUrl, MAX_LINK_TEXT, SlideResult, extract, extract_file};
pub use pptx::{Document, Slide};

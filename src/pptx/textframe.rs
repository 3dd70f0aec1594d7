//! Text frames, paragraphs, and runs.
//!
//! The owned text model behind every text-bearing shape and table cell.
//! Parsed eagerly from the slide XML so extraction works over plain data
//! with no XML access of its own.

use crate::pptx::hyperlinks::Hyperlink;

/// A text frame: the ordered paragraphs of one shape or table cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextFrame {
    /// Paragraphs in document order
    pub paragraphs: Vec<Paragraph>,
}

impl TextFrame {
    /// Flattened text of the frame.
    ///
    /// Paragraph texts joined by newlines, matching how PowerPoint renders a
    /// text body line-by-line.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for para in &self.paragraphs {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&para.text());
        }
        text
    }
}

/// A paragraph: ordered runs plus an optional paragraph-level hyperlink.
///
/// Paragraph-level hyperlinks (from `a:pPr`) are rare but valid; they are a
/// lower-priority hyperlink source than the runs they contain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    /// Runs in document order
    pub runs: Vec<Run>,

    /// Paragraph-level hyperlink annotation, if any
    pub hyperlink: Option<Hyperlink>,
}

impl Paragraph {
    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for run in &self.runs {
            text.push_str(&run.text);
        }
        text
    }
}

/// A run: the smallest styled text span within a paragraph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    /// The run's text content, entities resolved
    pub text: String,

    /// Run-level hyperlink annotation, if any
    pub hyperlink: Option<Hyperlink>,
}

impl Run {
    /// Create a plain run with no hyperlink.
    pub fn new(text: impl Into<String>) -> Self {
        Run {
            text: text.into(),
            hyperlink: None,
        }
    }

    /// Create a run annotated with a hyperlink.
    pub fn linked(text: impl Into<String>, hyperlink: Hyperlink) -> Self {
        Run {
            text: text.into(),
            hyperlink: Some(hyperlink),
        }
    }
}

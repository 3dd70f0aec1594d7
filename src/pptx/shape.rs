//! Shape model: a tagged union over the shape kinds a slide can hold.
//!
//! Dispatch is by variant rather than by probing for incidentally-present
//! members: a shape either has a text frame, holds a table grid, groups
//! child shapes, or is something else (picture, connector, non-table graphic
//! frame) that can at most carry a shape-level click hyperlink.

use crate::pptx::hyperlinks::Hyperlink;
use crate::pptx::textframe::TextFrame;

/// A shape on a slide.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A text shape (p:sp)
    Text(TextShape),
    /// A graphic frame holding a DrawingML table (p:graphicFrame + a:tbl)
    Table(TableShape),
    /// A group of child shapes (p:grpSp)
    Group(GroupShape),
    /// Any other shape: picture, connector, chart frame (p:pic, p:cxnSp, ...)
    Other(OtherShape),
}

impl Shape {
    /// Check if this shape is a group.
    ///
    /// Groups carry no text of their own and structurally cannot hold a
    /// click action.
    #[inline]
    pub fn is_group(&self) -> bool {
        matches!(self, Shape::Group(_))
    }

    /// The shape's own flattened text, if it has a text frame.
    pub fn text(&self) -> Option<String> {
        match self {
            Shape::Text(sp) => Some(sp.frame.text()),
            _ => None,
        }
    }

    /// Shape-level click hyperlinks. Empty for groups and tables.
    pub fn click_hyperlinks(&self) -> &[Hyperlink] {
        match self {
            Shape::Text(sp) => &sp.click_hyperlinks,
            Shape::Other(other) => &other.click_hyperlinks,
            Shape::Table(_) | Shape::Group(_) => &[],
        }
    }
}

/// A shape carrying a text frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextShape {
    /// The shape's text body
    pub frame: TextFrame,

    /// Click-action hyperlinks attached to the shape itself
    pub click_hyperlinks: Vec<Hyperlink>,
}

/// A table held in a graphic frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableShape {
    /// Rows in document order
    pub rows: Vec<TableRow>,
}

/// A row in a table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    /// Cells in document order
    pub cells: Vec<TableCell>,
}

/// A cell in a table, holding its own text frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableCell {
    /// The cell's text body
    pub frame: TextFrame,
}

impl TableCell {
    /// The cell's rendered text, trimmed.
    pub fn text(&self) -> String {
        self.frame.text().trim().to_string()
    }
}

/// A group of child shapes.
///
/// Children are parsed recursively so the model is complete, but the
/// extraction traversal treats the group as opaque: it contributes no text
/// and no hyperlinks of its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupShape {
    /// Child shapes in document order
    pub shapes: Vec<Shape>,
}

/// A non-text, non-table, non-group shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OtherShape {
    /// The source element's local name ("pic", "cxnSp", "graphicFrame")
    pub element: String,

    /// Click-action hyperlinks attached to the shape
    pub click_hyperlinks: Vec<Hyperlink>,
}

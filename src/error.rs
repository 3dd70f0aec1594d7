/// Error types for presentation parsing.
use thiserror::Error;

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Document-level failure: the package cannot be opened or is not a valid
/// PowerPoint presentation.
///
/// Per-element problems inside an otherwise readable package (an rId with no
/// relationship entry, a malformed hyperlink attribute) are never surfaced
/// here; they are logged at debug level and treated as "no hyperlink".
#[derive(Error, Debug)]
pub enum ParseError {
    /// Package file not found
    #[error("Package not found: {0}")]
    PackageNotFound(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Part not found
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// Invalid content type
    #[error("Invalid content type: expected {expected}, got {got}")]
    InvalidContentType { expected: String, got: String },

    /// Invalid relationship
    #[error("Invalid relationship: {0}")]
    InvalidRelationship(String),
}

impl From<quick_xml::Error> for ParseError {
    fn from(err: quick_xml::Error) -> Self {
        ParseError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for ParseError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        ParseError::Xml(err.to_string())
    }
}

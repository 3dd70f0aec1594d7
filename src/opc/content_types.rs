//! Content-type map parsed from `[Content_Types].xml`.
//!
//! Every OPC package carries a content-types part mapping either a file
//! extension (`Default` elements) or an explicit part name (`Override`
//! elements) to a MIME-style content type. The map is how a consumer tells a
//! presentation apart from, say, a workbook that happens to share the same
//! zip layout.

use crate::error::{ParseError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;

/// PresentationML content types accepted for the main part.
pub mod content_type {
    /// Regular presentation main part
    pub const PML_PRESENTATION_MAIN: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
    /// Macro-enabled presentation main part
    pub const PML_PRES_MACRO_MAIN: &str =
        "application/vnd.ms-powerpoint.presentation.macroEnabled.main+xml";
    /// Slide part
    pub const PML_SLIDE: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
}

/// Content-type lookup for package parts.
///
/// `Override` entries take precedence over `Default` extension entries,
/// per the OPC resolution rules.
#[derive(Debug, Default)]
pub struct ContentTypeMap {
    /// Extension (lowercase, no dot) -> content type
    defaults: HashMap<String, String>,

    /// Partname (absolute, e.g. "/ppt/presentation.xml") -> content type
    overrides: HashMap<String, String>,
}

impl ContentTypeMap {
    /// Parse the map from `[Content_Types].xml` bytes.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut map = ContentTypeMap::default();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"Default" => {
                        let mut extension = None;
                        let mut content_type = None;

                        for attr in e.attributes() {
                            let attr = attr?;
                            match attr.key.as_ref() {
                                b"Extension" => {
                                    extension = Some(attr.unescape_value()?.to_string());
                                },
                                b"ContentType" => {
                                    content_type = Some(attr.unescape_value()?.to_string());
                                },
                                _ => {},
                            }
                        }

                        if let (Some(ext), Some(ct)) = (extension, content_type) {
                            map.defaults.insert(ext.to_ascii_lowercase(), ct);
                        }
                    },
                    b"Override" => {
                        let mut partname = None;
                        let mut content_type = None;

                        for attr in e.attributes() {
                            let attr = attr?;
                            match attr.key.as_ref() {
                                b"PartName" => {
                                    partname = Some(attr.unescape_value()?.to_string());
                                },
                                b"ContentType" => {
                                    content_type = Some(attr.unescape_value()?.to_string());
                                },
                                _ => {},
                            }
                        }

                        if let (Some(pn), Some(ct)) = (partname, content_type) {
                            map.overrides.insert(pn, ct);
                        }
                    },
                    _ => {},
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(ParseError::Xml(e.to_string())),
                _ => {},
            }
        }

        Ok(map)
    }

    /// Look up the content type for an absolute partname.
    ///
    /// Checks `Override` entries first, then falls back to the `Default`
    /// entry for the partname's extension.
    pub fn content_type_for(&self, partname: &str) -> Option<&str> {
        if let Some(ct) = self.overrides.get(partname) {
            return Some(ct);
        }

        let extension = partname.rsplit('.').next()?;
        self.defaults
            .get(&extension.to_ascii_lowercase())
            .map(String::as_str)
    }
}

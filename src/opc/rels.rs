//! Relationship tables parsed from `.rels` parts.
//!
//! Each part in an OPC package may carry a sibling `.rels` part mapping
//! opaque relationship IDs ("rId1", "rId2", ...) to targets: either another
//! part (internal) or an arbitrary URI such as a hyperlink destination
//! (external). Hyperlink resolution and slide lookup both go through this
//! table.

use crate::error::{ParseError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;

/// Target mode constant used by external relationships.
const TARGET_MODE_EXTERNAL: &str = "External";

/// A single relationship from a source part to a target.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1", "rId2")
    r_id: String,

    /// Relationship type URI
    reltype: String,

    /// Target reference - either a part URI or an external URL
    target_ref: String,

    /// Whether this is an external relationship
    is_external: bool,
}

impl Relationship {
    /// Create a new relationship.
    pub fn new(r_id: String, reltype: String, target_ref: String, is_external: bool) -> Self {
        Self {
            r_id,
            reltype,
            target_ref,
            is_external,
        }
    }

    /// Get the relationship ID.
    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    /// Get the relationship type.
    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// Get the target reference.
    ///
    /// For internal relationships, this is a relative part reference.
    /// For external relationships, this is an absolute URL.
    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    /// Check if this is an external relationship.
    #[inline]
    pub fn is_external(&self) -> bool {
        self.is_external
    }
}

/// Collection of relationships from a single source part.
///
/// Uses a HashMap for O(1) lookup by relationship ID.
#[derive(Debug, Default)]
pub struct Relationships {
    /// Map of relationship ID to Relationship
    rels: HashMap<String, Relationship>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a collection from `.rels` XML bytes.
    ///
    /// Reads `<Relationship Id=".." Type=".." Target=".." TargetMode=".."/>`
    /// elements; entries missing an Id or Target are skipped.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut rels = Relationships::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    if e.local_name().as_ref() == b"Relationship" {
                        let mut r_id = None;
                        let mut reltype = String::new();
                        let mut target_ref = None;
                        let mut target_mode = String::new();

                        for attr in e.attributes() {
                            let attr = attr?;
                            match attr.key.as_ref() {
                                b"Id" => r_id = Some(attr.unescape_value()?.to_string()),
                                b"Type" => reltype = attr.unescape_value()?.to_string(),
                                b"Target" => {
                                    target_ref = Some(attr.unescape_value()?.to_string());
                                },
                                b"TargetMode" => {
                                    target_mode = attr.unescape_value()?.to_string();
                                },
                                _ => {},
                            }
                        }

                        if let (Some(r_id), Some(target_ref)) = (r_id, target_ref) {
                            rels.add(Relationship::new(
                                r_id,
                                reltype,
                                target_ref,
                                target_mode == TARGET_MODE_EXTERNAL,
                            ));
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(ParseError::Xml(e.to_string())),
                _ => {},
            }
        }

        Ok(rels)
    }

    /// Add a relationship to the collection.
    pub fn add(&mut self, rel: Relationship) {
        self.rels.insert(rel.r_id.clone(), rel);
    }

    /// Get a relationship by its ID.
    #[inline]
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.get(r_id)
    }

    /// Get the target reference for a relationship ID, if present.
    #[inline]
    pub fn target(&self, r_id: &str) -> Option<&str> {
        self.rels.get(r_id).map(|rel| rel.target_ref())
    }

    /// Get an iterator over all relationships.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.values()
    }

    /// Get the number of relationships in the collection.
    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    /// Check if the collection is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }
}

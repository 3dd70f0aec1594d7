//! Hyperlink annotations and target resolution.
//!
//! Authoring tools store slide hyperlinks inconsistently: sometimes as a
//! direct target URI, sometimes only as a relationship ID that must be
//! resolved through the owning slide's relationship table, and the ID
//! attribute itself may or may not carry the relationships namespace.
//! `Hyperlink` keeps all three possibilities as typed optional fields and
//! `resolve` tries them in a fixed order.

use crate::opc::Relationships;

/// A hyperlink annotation on a run, paragraph, or shape.
///
/// Absence of every field means the annotation was present in the XML but
/// carried nothing usable; resolution simply yields `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hyperlink {
    /// Direct target URI, when the source stores the address inline
    pub address: Option<String>,

    /// Relationship ID from the namespaced `r:id` attribute
    pub r_id: Option<String>,

    /// Relationship ID from a bare `id` attribute (legacy producers)
    pub plain_id: Option<String>,
}

impl Hyperlink {
    /// Create a hyperlink with a direct target address.
    pub fn direct(address: impl Into<String>) -> Self {
        Hyperlink {
            address: Some(address.into()),
            ..Default::default()
        }
    }

    /// Create a hyperlink carrying only a relationship ID.
    pub fn relationship(r_id: impl Into<String>) -> Self {
        Hyperlink {
            r_id: Some(r_id.into()),
            ..Default::default()
        }
    }

    /// Check whether the annotation carries nothing resolvable.
    pub fn is_empty(&self) -> bool {
        self.address.is_none() && self.r_id.is_none() && self.plain_id.is_none()
    }

    /// Resolve the target URI against the owning slide's relationship table.
    ///
    /// Ordered fallback: direct address, then the namespaced relationship ID,
    /// then the bare ID. Every step's failure is silent; exhausting the chain
    /// means "no hyperlink" rather than an error.
    pub fn resolve<'a>(&'a self, rels: &'a Relationships) -> Option<&'a str> {
        if let Some(address) = self.address.as_deref()
            && !address.is_empty()
        {
            return Some(address);
        }

        for r_id in [self.r_id.as_deref(), self.plain_id.as_deref()]
            .into_iter()
            .flatten()
        {
            match rels.target(r_id) {
                Some(target) => return Some(target),
                None => {
                    log::debug!("hyperlink relationship {r_id} not found in slide rels");
                },
            }
        }

        None
    }
}

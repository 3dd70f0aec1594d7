/// Open Packaging Conventions (OPC) support.
///
/// The subset of the OPC specification a read-only presentation consumer
/// needs: the content-type map from `[Content_Types].xml` and per-part
/// relationship tables from `.rels` parts. Parsing uses `quick-xml` with
/// attribute unescaping and minimal allocation.
pub mod content_types;
pub mod rels;

pub use content_types::ContentTypeMap;
pub use rels::{Relationship, Relationships};

/// Resolve a relative relationship target against a base URI.
///
/// OPC relationship targets are POSIX-style references relative to the
/// directory of the source part, e.g. `slides/slide1.xml` relative to `/ppt`
/// resolves to `/ppt/slides/slide1.xml`. Leading-slash targets are already
/// absolute. `.` and `..` segments are normalized.
pub fn resolve_rel_ref(base_uri: &str, target_ref: &str) -> String {
    let joined = if target_ref.starts_with('/') {
        target_ref.to_string()
    } else if base_uri.ends_with('/') {
        format!("{}{}", base_uri, target_ref)
    } else {
        format!("{}/{}", base_uri, target_ref)
    };

    let mut parts: Vec<&str> = Vec::new();
    for part in joined.split('/') {
        match part {
            "" | "." => {},
            ".." => {
                parts.pop();
            },
            _ => parts.push(part),
        }
    }

    let mut uri = String::with_capacity(joined.len());
    for part in parts {
        uri.push('/');
        uri.push_str(part);
    }
    if uri.is_empty() { "/".to_string() } else { uri }
}

//! Package relationships (`.rels` parts).

use super::xml::Element;
use crate::error::Result;

/// Namespace of relationship parts.
pub const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Relationship type URIs.
pub mod rel_type {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const FOOTNOTES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footnotes";
    pub const SETTINGS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings";
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const FOOTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";
}

/// The relationships of one package part.
#[derive(Debug, Clone)]
pub struct Relationships {
    root: Element,
}

impl Default for Relationships {
    fn default() -> Self {
        Self::new()
    }
}

impl Relationships {
    pub fn new() -> Self {
        Self {
            root: Element::new("Relationships").with_attr("xmlns", RELATIONSHIPS_NS),
        }
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            root: Element::parse(bytes)?,
        })
    }

    pub fn to_xml(&self) -> Result<Vec<u8>> {
        self.root.to_xml()
    }

    fn entries(&self) -> impl Iterator<Item = &Element> {
        self.root.children_named("Relationship")
    }

    /// Target of the first relationship of the given type.
    pub fn target_by_type(&self, rel_type: &str) -> Option<&str> {
        self.entries()
            .find(|r| r.attr("Type") == Some(rel_type) && r.attr("TargetMode") != Some("External"))
            .and_then(|r| r.attr("Target"))
    }

    /// Target of the relationship with the given id.
    pub fn target(&self, id: &str) -> Option<&str> {
        self.entries()
            .find(|r| r.attr("Id") == Some(id))
            .and_then(|r| r.attr("Target"))
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lowest `rIdN` not yet in use.
    pub fn next_id(&self) -> String {
        let mut n = self.len() + 1;
        loop {
            let candidate = format!("rId{}", n);
            if self.target(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }

    /// Add an internal relationship and return its id.
    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        let id = self.next_id();
        self.root.push(
            Element::new("Relationship")
                .with_attr("Id", id.as_str())
                .with_attr("Type", rel_type)
                .with_attr("Target", target),
        );
        id
    }
}

/// Name of the `.rels` part holding the relationships of `part`.
///
/// An empty part name means the package itself.
pub fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None if part.is_empty() => "_rels/.rels".to_string(),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target relative to its source part.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

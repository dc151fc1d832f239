//! `[Content_Types].xml` bookkeeping.

use super::xml::{Element, Node};
use crate::error::Result;

/// Name of the content types part.
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Content type of footer parts.
pub const FOOTER_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";

/// MIME type for an image extension.
pub fn image_content_type(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Parsed content types of a package.
#[derive(Debug, Clone)]
pub struct ContentTypes {
    root: Element,
}

impl ContentTypes {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            root: Element::parse(bytes)?,
        })
    }

    pub fn to_xml(&self) -> Result<Vec<u8>> {
        self.root.to_xml()
    }

    /// Whether a `Default` entry exists for the extension.
    pub fn has_default(&self, extension: &str) -> bool {
        self.root.children_named("Default").any(|d| {
            d.attr("Extension")
                .is_some_and(|e| e.eq_ignore_ascii_case(extension))
        })
    }

    /// Add a `Default` entry for the extension unless one exists.
    pub fn ensure_default(&mut self, extension: &str, content_type: &str) {
        if self.has_default(extension) {
            return;
        }
        let entry = Element::new("Default")
            .with_attr("Extension", extension)
            .with_attr("ContentType", content_type);
        // Defaults precede overrides
        let index = self
            .root
            .children
            .iter()
            .position(|n| matches!(n, Node::Element(e) if e.name == "Override"))
            .unwrap_or(self.root.children.len());
        self.root
            .children
            .insert(index, Node::Element(entry));
    }

    /// Content type override registered for a part, if any.
    pub fn override_for(&self, part: &str) -> Option<&str> {
        let part_name = format!("/{}", part.trim_start_matches('/'));
        self.root
            .children_named("Override")
            .find(|o| o.attr("PartName") == Some(part_name.as_str()))
            .and_then(|o| o.attr("ContentType"))
    }

    /// Set the `Override` entry for a part.
    pub fn ensure_override(&mut self, part: &str, content_type: &str) {
        let part_name = format!("/{}", part.trim_start_matches('/'));
        let existing = self
            .root
            .elements_mut()
            .find(|o| o.name == "Override" && o.attr("PartName") == Some(part_name.as_str()));
        if let Some(existing) = existing {
            existing.set_attr("ContentType", content_type);
            return;
        }
        self.root.push(
            Element::new("Override")
                .with_attr("PartName", part_name)
                .with_attr("ContentType", content_type),
        );
    }
}

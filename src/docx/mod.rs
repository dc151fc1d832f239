//! Minimal OOXML layer for modifying DOCX packages in place.
//!
//! The package is read into memory, its WordprocessingML parts are parsed into
//! [`xml::Element`] trees, and everything not touched is written back
//! byte-for-byte.

pub mod content_types;
pub mod document;
pub mod package;
pub mod relationships;
pub mod units;
pub mod wml;
pub mod xml;

pub use document::{Document, Media};
pub use package::Package;
pub use units::Length;
pub use xml::{Element, Node};

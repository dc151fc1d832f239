//! Styling configuration for the conversion pipeline.

mod document;
mod types;

pub use document::{DocumentConfig, DocumentConfigBuilder, MAX_STYLED_HEADING};
pub use types::{DocumentStyle, FooterText, Margins, PaperSize, Rgb};

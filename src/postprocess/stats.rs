//! Statistics collected while post-processing a document.

use serde::{Deserialize, Serialize};

/// Counters for what the post-processor changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostProcessStats {
    /// Image references extracted from the Markdown
    pub images_found: u32,

    /// Images embedded as pictures
    pub images_embedded: u32,

    /// Images whose file does not exist
    pub images_missing: u32,

    /// Images that exist but could not be decoded
    pub images_failed: u32,

    /// Placeholders left as text because no image reference remained
    pub placeholders_unfilled: u32,

    /// Image references with no matching placeholder
    pub images_unused: u32,

    /// Body paragraphs that received body formatting
    pub paragraphs_formatted: u32,

    /// Tables formatted
    pub table_count: u32,

    /// Table cells formatted
    pub cell_count: u32,

    /// Footnote paragraphs formatted
    pub footnote_paragraphs: u32,

    /// Sections configured
    pub section_count: u32,

    /// Sections that received odd and even footers
    pub footer_sections: u32,

    /// Named styles updated
    pub styles_configured: u32,

    /// Named styles that were not found in the document
    pub styles_skipped: Vec<String>,
}

impl PostProcessStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a configured style.
    pub fn add_style(&mut self) {
        self.styles_configured += 1;
    }

    /// Record a style that could not be found.
    pub fn skip_style(&mut self, name: &str) {
        self.styles_skipped.push(name.to_string());
    }

    /// Record a formatted body paragraph.
    pub fn add_paragraph(&mut self) {
        self.paragraphs_formatted += 1;
    }

    /// Record a formatted table.
    pub fn add_table(&mut self) {
        self.table_count += 1;
    }

    /// Record a formatted table cell.
    pub fn add_cell(&mut self) {
        self.cell_count += 1;
    }

    /// Number of image references that did not end up as pictures.
    pub fn images_not_embedded(&self) -> u32 {
        self.images_found.saturating_sub(self.images_embedded)
    }

    /// Whether every image reference was embedded.
    pub fn all_images_embedded(&self) -> bool {
        self.images_embedded == self.images_found && self.placeholders_unfilled == 0
    }
}

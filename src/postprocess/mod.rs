//! DOCX post-processing: applies the document configuration to pandoc output.
//!
//! The [`PostProcessor`] runs a fixed sequence of passes over an opened
//! [`Document`]:
//!
//! 1. document language
//! 2. Normal and Title styles
//! 3. Heading 1-3 styles
//! 4. page size and margins of every section
//! 5. title, author and date block
//! 6. body paragraphs and image placeholders
//! 7. tables
//! 8. footnotes
//! 9. odd and even page footers
//!
//! # Example
//!
//! ```no_run
//! use mdocx::config::DocumentConfig;
//! use mdocx::postprocess::PostProcessor;
//! use std::collections::VecDeque;
//! use std::path::Path;
//!
//! fn main() -> mdocx::Result<()> {
//!     let config = DocumentConfig::default();
//!     let processor = PostProcessor::new(&config, Path::new("."));
//!     let stats = processor.process_file("raw.docx", "styled.docx", "My Report", VecDeque::new())?;
//!     println!("{} paragraphs formatted", stats.paragraphs_formatted);
//!     Ok(())
//! }
//! ```

mod footer;
mod footnotes;
mod images;
mod paragraphs;
mod stats;
mod styles;
mod tables;
mod title;

#[cfg(test)]
pub(crate) mod test_support;

pub use images::{fit_width, MAX_IMAGE_WIDTH};
pub use stats::PostProcessStats;

use crate::config::DocumentConfig;
use crate::docx::Document;
use crate::error::Result;
use crate::markdown::{ImageRef, IMAGE_DIR};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Applies a [`DocumentConfig`] to a converted document.
#[derive(Debug, Clone)]
pub struct PostProcessor<'a> {
    config: &'a DocumentConfig,
    image_dir: PathBuf,
}

impl<'a> PostProcessor<'a> {
    /// Create a post-processor resolving images under `<work_dir>/img`.
    pub fn new(config: &'a DocumentConfig, work_dir: &Path) -> Self {
        Self {
            config,
            image_dir: work_dir.join(IMAGE_DIR),
        }
    }

    /// Directory image paths are resolved against.
    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// Run every pass over an opened document.
    pub fn process(
        &self,
        doc: &mut Document,
        title: &str,
        images: VecDeque<ImageRef>,
    ) -> Result<PostProcessStats> {
        let config = self.config;
        let mut stats = PostProcessStats::new();

        styles::set_document_language(doc, config);
        styles::configure_styles(doc, config, &styles::standard_styles(config), &mut stats);
        styles::configure_styles(doc, config, &styles::heading_styles(config), &mut stats);
        styles::configure_sections(doc, config, &mut stats)?;
        title::format_title_block(doc, config, title)?;
        paragraphs::process_paragraphs(doc, config, &self.image_dir, images, &mut stats)?;
        tables::format_tables(doc, config, &mut stats)?;
        footnotes::format_footnotes(doc, config, &mut stats);
        footer::add_footers(doc, config, &mut stats)?;

        log::info!(
            "Post-processing complete: {} styles, {} sections, {} tables, {} footnote paragraphs",
            stats.styles_configured,
            stats.section_count,
            stats.table_count,
            stats.footnote_paragraphs
        );
        Ok(stats)
    }

    /// Open `input`, process it and save the result to `output`.
    pub fn process_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
        title: &str,
        images: VecDeque<ImageRef>,
    ) -> Result<PostProcessStats> {
        let mut doc = Document::open(input)?;
        let stats = self.process(&mut doc, title, images)?;
        doc.save(output)?;
        Ok(stats)
    }
}

//! # mdocx
//!
//! Markdown to styled Word (DOCX) conversion.
//!
//! The Markdown is converted by pandoc, then the generated document is
//! post-processed to apply consistent typography and layout: fonts, heading
//! colors, page size and margins, a centered title block, embedded and
//! resized images, formatted tables and footnotes, and odd/even page footers
//! with page numbers.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mdocx::{DocumentConfig, Mdocx, PaperSize};
//!
//! fn main() -> mdocx::Result<()> {
//!     let report = Mdocx::new()
//!         .with_paper_size(PaperSize::A4)
//!         .with_author("Jane Doe")
//!         .with_working_dir("./docs")
//!         .convert("guide.md", "guide.docx")?;
//!     println!("Saved {}", report.output.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Styles**: Normal, Title and Heading 1-3 with per-level colors
//! - **Images**: `![alt](img/file.png)` embedded from `<working_dir>/img`,
//!   scaled down to 6 inches wide
//! - **Layout**: Letter, Legal or A4 paper with custom margins
//! - **Footers**: different odd and even page footers with page numbers
//! - **Presets**: report, note, letter and memo templates

pub mod config;
pub mod convert;
pub mod detect;
pub mod docx;
pub mod error;
pub mod markdown;
pub mod postprocess;

// Re-export commonly used types
pub use config::{
    DocumentConfig, DocumentConfigBuilder, DocumentStyle, FooterText, Margins, PaperSize, Rgb,
};
pub use convert::{ConvertReport, Converter, MarkdownBackend, PandocBackend, RenderJob};
pub use error::{Error, Result};
pub use markdown::{preprocess, ImageRef, Preprocessed};
pub use postprocess::{PostProcessStats, PostProcessor};

use std::path::{Path, PathBuf};

/// Convert a Markdown file with the default configuration.
///
/// Relative paths resolve against the current directory.
///
/// # Example
///
/// ```no_run
/// let report = mdocx::convert_file("notes.md", "notes.docx").unwrap();
/// println!("{} images embedded", report.stats.images_embedded);
/// ```
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<ConvertReport> {
    convert_file_with_config(input, output, DocumentConfig::default())
}

/// Convert a Markdown file with a custom configuration.
///
/// # Example
///
/// ```no_run
/// use mdocx::{convert_file_with_config, DocumentConfig};
///
/// let config = DocumentConfig::note().with_author("Team").build().unwrap();
/// convert_file_with_config("memo.md", "memo.docx", config).unwrap();
/// ```
pub fn convert_file_with_config<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    config: DocumentConfig,
) -> Result<ConvertReport> {
    Converter::new(config)?.convert(input, output, None)
}

/// Builder for configuring and running a conversion.
///
/// # Example
///
/// ```no_run
/// use mdocx::{DocumentStyle, Mdocx, Rgb};
///
/// let report = Mdocx::with_style(DocumentStyle::Note)
///     .with_heading_color(1, Rgb::new(200, 30, 30))
///     .with_toc(false)
///     .convert("note.md", "note.docx")?;
/// # Ok::<(), mdocx::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Mdocx {
    config: DocumentConfigBuilder,
    working_dir: Option<PathBuf>,
}

impl Mdocx {
    /// Create a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a style preset.
    pub fn with_style(style: DocumentStyle) -> Self {
        Self {
            config: DocumentConfig::for_style(style),
            working_dir: None,
        }
    }

    /// Start from an existing configuration.
    pub fn with_config(config: DocumentConfig) -> Self {
        Self {
            config: config.into_builder(),
            working_dir: None,
        }
    }

    /// Set the working directory used for relative paths and images.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Set the paper size.
    pub fn with_paper_size(mut self, paper_size: PaperSize) -> Self {
        self.config = self.config.with_paper_size(paper_size);
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.config = self.config.with_author(author);
        self
    }

    /// Set the date.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.config = self.config.with_date(date);
        self
    }

    /// Set the color of one heading level.
    pub fn with_heading_color(mut self, level: u8, color: Rgb) -> Self {
        self.config = self.config.with_heading_color(level, color);
        self
    }

    /// Set the font name.
    pub fn with_font(mut self, font_name: impl Into<String>) -> Self {
        self.config = self.config.with_font_name(font_name);
        self
    }

    /// Set the document language tag.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.config = self.config.with_language(language);
        self
    }

    /// Enable or disable the table of contents.
    pub fn with_toc(mut self, generate: bool) -> Self {
        self.config = self.config.with_toc(generate);
        self
    }

    /// Validate and return the configuration.
    pub fn config(&self) -> Result<DocumentConfig> {
        self.config.clone().build()
    }

    /// Convert with pandoc.
    pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(self, input: P, output: Q) -> Result<ConvertReport> {
        let config = self.config()?;
        Converter::new(config)?.convert(input, output, self.working_dir.as_deref())
    }

    /// Convert with a custom backend.
    pub fn convert_with<B, P, Q>(self, backend: B, input: P, output: Q) -> Result<ConvertReport>
    where
        B: MarkdownBackend,
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let config = self.config()?;
        Converter::with_backend(config, backend).convert(input, output, self.working_dir.as_deref())
    }
}

//! Markdown to DOCX conversion pipeline.
//!
//! A [`Converter`] pre-processes the Markdown, hands it to a
//! [`MarkdownBackend`] (pandoc by default) and post-processes the
//! resulting document.
//!
//! # Example
//!
//! ```no_run
//! use mdocx::config::DocumentConfig;
//! use mdocx::convert::Converter;
//!
//! fn main() -> mdocx::Result<()> {
//!     let converter = Converter::new(DocumentConfig::default())?;
//!     let report = converter.convert("guide.md", "guide.docx", None)?;
//!     println!("{} images embedded", report.stats.images_embedded);
//!     Ok(())
//! }
//! ```

mod pandoc;

pub use pandoc::{install_hint, PandocBackend, LUA_FILTER};

use crate::config::DocumentConfig;
use crate::error::{Error, Result};
use crate::markdown::{self, IMAGE_DIR};
use crate::postprocess::{PostProcessStats, PostProcessor};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// Everything a backend needs to render one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    /// Pre-processed Markdown file
    pub input: PathBuf,
    /// DOCX file to produce
    pub output: PathBuf,
    /// Directory the backend runs in
    pub working_dir: PathBuf,
    /// Document title metadata
    pub title: String,
    /// Document author metadata
    pub author: String,
    /// Document date metadata
    pub date: String,
    /// Whether to generate a table of contents
    pub toc: bool,
}

/// Trait for Markdown to DOCX renderers.
///
/// Implement this trait to replace the external converter.
pub trait MarkdownBackend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Render `job.input` into `job.output`.
    fn render(&self, job: &RenderJob) -> Result<()>;
}

/// Result of a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertReport {
    /// Written DOCX file
    pub output: PathBuf,
    /// Title extracted from the Markdown
    pub title: String,
    /// What the post-processor changed
    pub stats: PostProcessStats,
}

/// Converts Markdown files to styled DOCX documents.
#[derive(Debug, Clone)]
pub struct Converter<B: MarkdownBackend = PandocBackend> {
    config: DocumentConfig,
    backend: B,
}

impl Converter<PandocBackend> {
    /// Create a converter using pandoc from `PATH`.
    ///
    /// Fails with [`Error::ToolNotFound`] when pandoc is not installed.
    pub fn new(config: DocumentConfig) -> Result<Self> {
        let backend = PandocBackend::locate()?;
        Ok(Self { config, backend })
    }
}

impl<B: MarkdownBackend> Converter<B> {
    /// Create a converter with a custom backend.
    pub fn with_backend(config: DocumentConfig, backend: B) -> Self {
        Self { config, backend }
    }

    /// Document configuration.
    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Rendering backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Convert `input` to `output`.
    ///
    /// Relative paths resolve against `working_dir`, which defaults to the
    /// current directory. Images are looked up under `<working_dir>/img`.
    pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
        working_dir: Option<&Path>,
    ) -> Result<ConvertReport> {
        let work_dir = resolve_work_dir(working_dir)?;
        let input = work_dir.join(input.as_ref());
        let output = work_dir.join(output.as_ref());

        if !input.is_file() {
            return Err(Error::InputNotFound(input));
        }
        if !markdown::is_markdown_path(&input) {
            log::warn!("Input file {} may not be a markdown file", input.display());
        }

        let img_dir = work_dir.join(IMAGE_DIR);
        if !img_dir.exists() {
            std::fs::create_dir_all(&img_dir)?;
            log::info!("Created image directory: {}", img_dir.display());
        }

        let content = std::fs::read_to_string(&input)?;
        let pre = markdown::preprocess(&content);
        log::info!("Document title: {}", pre.title);

        let temp_md = write_temp_markdown(&work_dir, &pre.content)?;
        let temp_docx = temp_output(&output)?;

        let job = RenderJob {
            input: temp_md.to_path_buf(),
            output: temp_docx.to_path_buf(),
            working_dir: work_dir.clone(),
            title: pre.title.clone(),
            author: self.config.author().to_string(),
            date: self.config.date().to_string(),
            toc: self.config.generate_toc(),
        };
        self.backend.render(&job)?;

        let stats = PostProcessor::new(&self.config, &work_dir).process_file(
            &temp_docx,
            &output,
            &pre.title,
            pre.images,
        )?;
        log::info!("Conversion successful! File saved: {}", output.display());

        Ok(ConvertReport {
            output,
            title: pre.title,
            stats,
        })
    }
}

fn resolve_work_dir(working_dir: Option<&Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    let dir = match working_dir {
        Some(dir) => cwd.join(dir),
        None => cwd,
    };
    if !dir.is_dir() {
        return Err(Error::WorkingDirNotFound(dir));
    }
    Ok(dir)
}

/// Pre-processed Markdown, written into the working directory.
fn write_temp_markdown(work_dir: &Path, content: &str) -> Result<TempPath> {
    let file = tempfile::Builder::new()
        .prefix(".mdocx-")
        .suffix(".md")
        .tempfile_in(work_dir)?;
    std::fs::write(file.path(), content)?;
    Ok(file.into_temp_path())
}

/// Intermediate DOCX, next to the final output.
fn temp_output(output: &Path) -> Result<TempPath> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file = tempfile::Builder::new()
        .prefix(".mdocx-")
        .suffix(".docx")
        .tempfile_in(dir)?;
    Ok(file.into_temp_path())
}

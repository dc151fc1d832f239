//! Markdown pre-processing: title extraction and image placeholder substitution.
//!
//! Images are pulled out of the Markdown before conversion and replaced with
//! [`IMAGE_PLACEHOLDER`]. The post-processor later fills each placeholder,
//! in document order, with the next [`ImageRef`] from the queue.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::OnceLock;

/// Marker substituted for every image reference.
pub const IMAGE_PLACEHOLDER: &str = "[IMAGE_PLACEHOLDER]";

/// Title used when the document has no H1 heading.
pub const DEFAULT_TITLE: &str = "Untitled Document";

/// Directory, relative to the working directory, that holds the images.
pub const IMAGE_DIR: &str = "img";

/// Directory prefix stripped from image paths; images resolve under [`IMAGE_DIR`].
pub const IMAGE_DIR_PREFIX: &str = "img/";

fn image_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").expect("valid image regex"))
}

/// An image reference found in the Markdown source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Alternative text
    pub alt_text: String,
    /// Path relative to the image directory
    pub path: String,
    /// Markup as it appeared in the source
    pub original_markdown: String,
}

/// Result of pre-processing a Markdown document.
#[derive(Debug, Clone)]
pub struct Preprocessed {
    /// Document title (first H1, or [`DEFAULT_TITLE`])
    pub title: String,
    /// Image references in document order
    pub images: VecDeque<ImageRef>,
    /// Markdown with images replaced by placeholders
    pub content: String,
}

/// Extract the main title (first H1) from Markdown content.
pub fn extract_title(content: &str) -> String {
    content
        .lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().to_string())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// Extract image references in document order.
pub fn extract_image_refs(content: &str) -> Vec<ImageRef> {
    let refs: Vec<ImageRef> = image_pattern()
        .captures_iter(content)
        .map(|caps| {
            let path = caps[2].trim();
            let path = path.strip_prefix(IMAGE_DIR_PREFIX).unwrap_or(path);
            ImageRef {
                alt_text: caps[1].to_string(),
                path: path.to_string(),
                original_markdown: caps[0].to_string(),
            }
        })
        .collect();

    log::info!("Found {} image references", refs.len());
    refs
}

/// Replace every image reference with [`IMAGE_PLACEHOLDER`].
pub fn replace_images(content: &str) -> String {
    image_pattern()
        .replace_all(content, regex::NoExpand(IMAGE_PLACEHOLDER))
        .into_owned()
}

/// Run the full pre-processing step.
pub fn preprocess(content: &str) -> Preprocessed {
    Preprocessed {
        title: extract_title(content),
        images: extract_image_refs(content).into(),
        content: replace_images(content),
    }
}

/// Whether a path has a Markdown extension.
pub fn is_markdown_path(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "md" | "markdown"))
        .unwrap_or(false)
}

//! Error types for mdocx library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mdocx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during Markdown to DOCX conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A required external tool is not installed.
    #[error("{tool} is not installed.\nInstallation: {hint}")]
    ToolNotFound {
        /// Name of the missing executable
        tool: String,
        /// Platform-specific installation instructions
        hint: String,
    },

    /// The input Markdown file does not exist.
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The working directory does not exist.
    #[error("Working directory not found: {}", .0.display())]
    WorkingDirNotFound(PathBuf),

    /// The external converter exited with an error.
    #[error("Pandoc conversion failed: {0}")]
    Conversion(String),

    /// The configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The DOCX package is missing a required part or is structurally broken.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// ZIP archive error.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML parsing or serialization error.
    #[error("XML error: {0}")]
    Xml(String),

    /// Error decoding an image.
    #[error("Image error: {0}")]
    Image(String),

    /// The document could not be written to its destination.
    #[error("Cannot save document: {0}")]
    Save(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Error::Io(e),
            _ => Error::Image(err.to_string()),
        }
    }
}

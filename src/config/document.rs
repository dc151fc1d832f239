//! Document configuration and its builder.

use super::types::{DocumentStyle, FooterText, Margins, PaperSize, Rgb};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Highest heading level that carries its own color.
pub const MAX_STYLED_HEADING: u8 = 3;

/// Configuration for document conversion and styling.
///
/// A `DocumentConfig` is always valid: it can only be obtained from
/// [`DocumentConfig::default`], [`DocumentConfigBuilder::build`] or the JSON
/// loaders, all of which validate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentConfig {
    style: DocumentStyle,
    paper_size: PaperSize,
    author: String,
    date: String,
    heading_colors: BTreeMap<u8, Rgb>,
    footer_text: FooterText,
    font_name: String,
    base_font_size: f64,
    margins: Margins,
    line_spacing: f64,
    generate_toc: bool,
    language: String,
    center_title: bool,
}

impl DocumentConfig {
    /// Title font size in points.
    pub const TITLE_SIZE: f64 = 24.0;
    /// Heading 1 font size in points.
    pub const HEADING_1_SIZE: f64 = 18.0;
    /// Heading 2 font size in points.
    pub const HEADING_2_SIZE: f64 = 16.0;
    /// Heading 3 font size in points.
    pub const HEADING_3_SIZE: f64 = 14.0;
    /// Table text size in points.
    pub const TABLE_FONT_SIZE: f64 = 10.0;
    /// Footer text size in points.
    pub const FOOTER_FONT_SIZE: f64 = 10.0;
    /// Footnote text size in points.
    pub const FOOTNOTE_FONT_SIZE: f64 = 10.0;
    /// Space before and after body paragraphs in points.
    pub const PARAGRAPH_SPACING: f64 = 6.0;
    /// Space before and after table cell paragraphs in points.
    pub const TABLE_CELL_SPACING: f64 = 2.0;

    /// Start building a configuration from the defaults.
    pub fn builder() -> DocumentConfigBuilder {
        DocumentConfigBuilder::new()
    }

    /// Preconfigured style for reports.
    pub fn report() -> DocumentConfigBuilder {
        let accent = Rgb::new(37, 150, 190);
        DocumentConfigBuilder::new()
            .with_style(DocumentStyle::Report)
            .with_paper_size(PaperSize::Letter)
            .with_heading_colors([(1, accent), (2, accent), (3, accent)])
            .with_footer_text(FooterText::new("Right text | Page", "Page | Left text"))
            .with_center_title(true)
    }

    /// Preconfigured style for internal notes.
    pub fn note() -> DocumentConfigBuilder {
        DocumentConfigBuilder::new()
            .with_style(DocumentStyle::Note)
            .with_paper_size(PaperSize::Legal)
            .with_heading_colors([
                (1, Rgb::new(70, 70, 70)),
                (2, Rgb::new(100, 100, 100)),
                (3, Rgb::new(130, 130, 130)),
            ])
            .with_footer_text(FooterText::new(
                "Internal Note | Page",
                "Page | Internal Note",
            ))
            .with_margins(Margins::uniform(1.5))
            .with_center_title(true)
    }

    /// Builder preset for a given style template.
    pub fn for_style(style: DocumentStyle) -> DocumentConfigBuilder {
        match style {
            DocumentStyle::Report => Self::report(),
            DocumentStyle::Note => Self::note(),
            other => DocumentConfigBuilder::new().with_style(other),
        }
    }

    /// Load and validate a configuration from a JSON string.
    ///
    /// Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: DocumentConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Serialize the configuration as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Other(e.to_string()))
    }

    /// Continue building from this configuration.
    pub fn into_builder(self) -> DocumentConfigBuilder {
        DocumentConfigBuilder { config: self }
    }

    fn validate(&self) -> Result<()> {
        if !(self.base_font_size > 0.0) || !self.base_font_size.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "Base font size must be positive, got {}",
                self.base_font_size
            )));
        }

        if self
            .margins
            .as_array()
            .iter()
            .any(|m| !(*m >= 0.0) || !m.is_finite())
        {
            return Err(Error::InvalidConfig(format!(
                "Margins must be non-negative, got {:?}",
                self.margins.as_array()
            )));
        }

        if !(self.line_spacing > 0.0) || !self.line_spacing.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "Line spacing must be positive, got {}",
                self.line_spacing
            )));
        }

        if let Some(level) = self
            .heading_colors
            .keys()
            .find(|level| !(1..=MAX_STYLED_HEADING).contains(*level))
        {
            return Err(Error::InvalidConfig(format!(
                "Heading color level must be 1-{}, got {}",
                MAX_STYLED_HEADING, level
            )));
        }

        if self.font_name.trim().is_empty() {
            return Err(Error::InvalidConfig("Font name must not be empty".into()));
        }

        if self.language.trim().is_empty() {
            return Err(Error::InvalidConfig("Language must not be empty".into()));
        }

        Ok(())
    }

    /// Document style template.
    pub fn style(&self) -> DocumentStyle {
        self.style
    }

    /// Paper size.
    pub fn paper_size(&self) -> PaperSize {
        self.paper_size
    }

    /// Author passed to the converter as metadata.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Date passed to the converter as metadata.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Color for a heading level; black when not configured.
    pub fn heading_color(&self, level: u8) -> Rgb {
        self.heading_colors
            .get(&level)
            .copied()
            .unwrap_or(Rgb::BLACK)
    }

    /// All configured heading colors.
    pub fn heading_colors(&self) -> &BTreeMap<u8, Rgb> {
        &self.heading_colors
    }

    pub fn footer_text(&self) -> &FooterText {
        &self.footer_text
    }

    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    /// Base font size in points.
    pub fn base_font_size(&self) -> f64 {
        self.base_font_size
    }

    /// Page margins in centimetres.
    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// Line spacing multiplier.
    pub fn line_spacing(&self) -> f64 {
        self.line_spacing
    }

    /// Whether a table of contents is generated.
    pub fn generate_toc(&self) -> bool {
        self.generate_toc
    }

    /// Language tag (e.g. `en-US`, `fr-CA`).
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Whether the title block is centered.
    pub fn center_title(&self) -> bool {
        self.center_title
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        let accent = Rgb::new(37, 150, 190);
        Self {
            style: DocumentStyle::Report,
            paper_size: PaperSize::Letter,
            author: String::new(),
            date: String::new(),
            heading_colors: BTreeMap::from([(1, accent), (2, accent), (3, accent)]),
            footer_text: FooterText::default(),
            font_name: "Arial".to_string(),
            base_font_size: 12.0,
            margins: Margins::default(),
            line_spacing: 1.0,
            generate_toc: true,
            language: "en-US".to_string(),
            center_title: true,
        }
    }
}

/// Builder for [`DocumentConfig`]; validation runs in [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct DocumentConfigBuilder {
    config: DocumentConfig,
}

impl DocumentConfigBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the style template label.
    pub fn with_style(mut self, style: DocumentStyle) -> Self {
        self.config.style = style;
        self
    }

    /// Set the paper size.
    pub fn with_paper_size(mut self, paper_size: PaperSize) -> Self {
        self.config.paper_size = paper_size;
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.config.author = author.into();
        self
    }

    /// Set the date.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.config.date = date.into();
        self
    }

    /// Set the color of one heading level.
    pub fn with_heading_color(mut self, level: u8, color: Rgb) -> Self {
        self.config.heading_colors.insert(level, color);
        self
    }

    /// Replace all heading colors.
    pub fn with_heading_colors(mut self, colors: impl IntoIterator<Item = (u8, Rgb)>) -> Self {
        self.config.heading_colors = colors.into_iter().collect();
        self
    }

    /// Set the footer text.
    pub fn with_footer_text(mut self, footer: FooterText) -> Self {
        self.config.footer_text = footer;
        self
    }

    /// Set the base font family.
    pub fn with_font_name(mut self, font_name: impl Into<String>) -> Self {
        self.config.font_name = font_name.into();
        self
    }

    /// Set the base font size in points.
    pub fn with_base_font_size(mut self, size: f64) -> Self {
        self.config.base_font_size = size;
        self
    }

    /// Set the page margins in centimetres.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.config.margins = margins;
        self
    }

    /// Set the line spacing multiplier.
    pub fn with_line_spacing(mut self, spacing: f64) -> Self {
        self.config.line_spacing = spacing;
        self
    }

    /// Enable or disable the table of contents.
    pub fn with_toc(mut self, generate: bool) -> Self {
        self.config.generate_toc = generate;
        self
    }

    /// Set the language tag.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.config.language = language.into();
        self
    }

    /// Center or left-align the title block.
    pub fn with_center_title(mut self, center: bool) -> Self {
        self.config.center_title = center;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<DocumentConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

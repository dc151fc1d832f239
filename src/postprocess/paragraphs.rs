//! Body paragraph pass: image placeholders and body text formatting.

use super::images::{embed_image, Embedded};
use super::stats::PostProcessStats;
use super::styles::style_names;
use crate::config::DocumentConfig;
use crate::docx::wml::{
    add_run, clear_paragraph, format_runs, paragraph_style, paragraph_text, set_alignment,
    set_spacing, Alignment, RunFormat, Spacing,
};
use crate::docx::{Document, Element, Media};
use crate::error::Result;
use crate::markdown::{ImageRef, IMAGE_PLACEHOLDER};
use std::collections::{HashMap, VecDeque};
use std::path::Path;

/// Style names whose paragraphs receive body formatting.
const BODY_STYLES: &[&str] = &["normal", "body text", "first paragraph"];

struct ParagraphPass<'a> {
    config: &'a DocumentConfig,
    image_dir: &'a Path,
    style_names: HashMap<String, String>,
    images: VecDeque<ImageRef>,
    body_format: RunFormat,
    stats: &'a mut PostProcessStats,
}

impl ParagraphPass<'_> {
    fn visit(&mut self, container: &mut Element, media: &mut Media, in_table: bool) {
        for child in container.elements_mut() {
            match child.name.as_str() {
                "w:p" => self.paragraph(child, media, in_table),
                "w:tbl" => self.visit(child, media, true),
                "w:sectPr" | "w:pPr" | "w:tblPr" | "w:tblGrid" => {}
                _ => self.visit(child, media, in_table),
            }
        }
    }

    fn is_body_style(&self, p: &Element) -> bool {
        match paragraph_style(p) {
            None => true,
            Some(id) => {
                let name = self
                    .style_names
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| id.to_ascii_lowercase());
                BODY_STYLES.contains(&name.as_str())
            }
        }
    }

    fn paragraph(&mut self, p: &mut Element, media: &mut Media, in_table: bool) {
        let text = paragraph_text(p);
        if text.contains(IMAGE_PLACEHOLDER) {
            if self.images.is_empty() {
                let count = text.matches(IMAGE_PLACEHOLDER).count() as u32;
                log::warn!("No image reference left for {} placeholder(s)", count);
                self.stats.placeholders_unfilled += count;
            } else {
                self.fill_placeholders(p, &text, media);
                return;
            }
        }

        if !in_table && self.is_body_style(p) {
            set_spacing(
                p,
                Spacing::new(
                    DocumentConfig::PARAGRAPH_SPACING,
                    DocumentConfig::PARAGRAPH_SPACING,
                    self.config.line_spacing(),
                ),
            );
            format_runs(p, &self.body_format);
            self.stats.add_paragraph();
        }
    }

    /// Rebuild the paragraph with each placeholder replaced by the next image.
    fn fill_placeholders(&mut self, p: &mut Element, text: &str, media: &mut Media) {
        clear_paragraph(p);
        let plain = RunFormat::new();
        let mut pictures = 0;

        let mut segments = text.split(IMAGE_PLACEHOLDER).peekable();
        while let Some(segment) = segments.next() {
            if !segment.trim().is_empty() {
                add_run(p, segment, &plain);
            }
            if segments.peek().is_none() {
                break;
            }
            match self.images.pop_front() {
                Some(image) => match embed_image(&image, self.image_dir, media, self.stats) {
                    Embedded::Picture(run) => {
                        p.push(run);
                        pictures += 1;
                    }
                    Embedded::Fallback(run) => {
                        p.push(run);
                    }
                },
                None => {
                    log::warn!("No image reference left for placeholder");
                    self.stats.placeholders_unfilled += 1;
                    add_run(p, IMAGE_PLACEHOLDER, &plain);
                }
            }
        }

        if pictures > 0 {
            set_alignment(p, Alignment::Center);
        }
    }
}

/// Walk every body paragraph in document order, filling image placeholders
/// and formatting body text outside tables.
pub(crate) fn process_paragraphs(
    doc: &mut Document,
    config: &DocumentConfig,
    image_dir: &Path,
    images: VecDeque<ImageRef>,
    stats: &mut PostProcessStats,
) -> Result<()> {
    stats.images_found = images.len() as u32;
    let style_names = style_names(doc.styles());
    let body_format = RunFormat::new()
        .font(config.font_name())
        .size(config.base_font_size())
        .language(config.language());

    let mut pass = ParagraphPass {
        config,
        image_dir,
        style_names,
        images,
        body_format,
        stats,
    };
    let (body, media) = doc.body_and_media()?;
    pass.visit(body, media, false);

    if !pass.images.is_empty() {
        for image in &pass.images {
            log::warn!("Image reference has no placeholder: {}", image.original_markdown);
        }
        pass.stats.images_unused = pass.images.len() as u32;
    }

    log::info!(
        "Formatted {} paragraphs, embedded {} of {} images",
        pass.stats.paragraphs_formatted,
        pass.stats.images_embedded,
        pass.stats.images_found
    );
    Ok(())
}

//! Title, author and date block at the top of the document.

use super::styles::{style_id, style_names};
use crate::config::DocumentConfig;
use crate::docx::wml::{
    add_run, clear_paragraph, paragraph_style, paragraph_text, set_alignment, set_paragraph_style,
    Alignment, RunFormat,
};
use crate::docx::{Document, Element};
use crate::error::Result;

/// Paragraphs after the title that may carry author and date.
const MAX_BYLINE_PARAGRAPHS: usize = 2;

fn is_byline(style: Option<&str>, names: &std::collections::HashMap<String, String>) -> bool {
    let Some(id) = style else {
        return false;
    };
    let name = names
        .get(id)
        .map(String::as_str)
        .unwrap_or(id)
        .to_ascii_lowercase();
    matches!(name.as_str(), "author" | "date")
}

fn rewrite_paragraph(p: &mut Element, text: &str, format: &RunFormat, center: bool) {
    clear_paragraph(p);
    add_run(p, text, format);
    if center {
        set_alignment(p, Alignment::Center);
    }
}

/// Restyle the first paragraph whose text equals `title`, and the author and
/// date paragraphs following it.
///
/// Returns whether the title paragraph was found.
pub(crate) fn format_title_block(
    doc: &mut Document,
    config: &DocumentConfig,
    title: &str,
) -> Result<bool> {
    let title_style = style_id(doc.styles(), "Title").unwrap_or_else(|| "Title".to_string());
    let names = style_names(doc.styles());
    let center = config.center_title();

    let title_format = RunFormat::new()
        .font(config.font_name())
        .size(DocumentConfig::TITLE_SIZE)
        .bold(true);
    let byline_format = RunFormat::new()
        .font(config.font_name())
        .size(config.base_font_size())
        .bold(false);

    let body = doc.body_mut()?;
    let mut paragraphs = body.elements_mut().filter(|e| e.name == "w:p");

    let Some(title_paragraph) = paragraphs.find(|p| paragraph_text(p) == title) else {
        log::warn!("Title paragraph '{}' not found", title);
        return Ok(false);
    };
    set_paragraph_style(title_paragraph, &title_style);
    rewrite_paragraph(title_paragraph, title, &title_format, center);

    for p in paragraphs.take(MAX_BYLINE_PARAGRAPHS) {
        if !is_byline(paragraph_style(p), &names) {
            break;
        }
        let text = paragraph_text(p);
        rewrite_paragraph(p, &text, &byline_format, center);
    }

    log::debug!("Formatted title block '{}'", title);
    Ok(true)
}

//! Footnote styles and footnote paragraph formatting.

use super::stats::PostProcessStats;
use super::styles::find_style_mut;
use crate::config::DocumentConfig;
use crate::docx::wml::{
    apply_spacing, for_each_run, language_element, run_properties, RunFormat, Spacing, P_PR_ORDER,
    R_PR_ORDER, STYLE_ORDER,
};
use crate::docx::{Document, Element};

fn configure_footnote_styles(
    doc: &mut Document,
    config: &DocumentConfig,
    stats: &mut PostProcessStats,
) {
    let Some(styles) = doc.styles_mut() else {
        stats.skip_style("Footnote Text");
        stats.skip_style("Footnote Reference");
        return;
    };

    match find_style_mut(styles, "Footnote Text") {
        Some(style) => {
            RunFormat::new()
                .font(config.font_name())
                .size(DocumentConfig::FOOTNOTE_FONT_SIZE)
                .language(config.language())
                .apply(style.get_or_insert("w:rPr", STYLE_ORDER));
            apply_spacing(
                style.get_or_insert("w:pPr", STYLE_ORDER),
                Spacing::new(0.0, 0.0, 1.0),
            );
            stats.add_style();
        }
        None => {
            log::warn!("Footnote style not found: Footnote Text");
            stats.skip_style("Footnote Text");
        }
    }

    match find_style_mut(styles, "Footnote Reference") {
        Some(style) => {
            RunFormat::new()
                .font(config.font_name())
                .size(DocumentConfig::FOOTNOTE_FONT_SIZE)
                .superscript()
                .apply(style.get_or_insert("w:rPr", STYLE_ORDER));
            stats.add_style();
        }
        None => {
            log::warn!("Footnote style not found: Footnote Reference");
            stats.skip_style("Footnote Reference");
        }
    }
}

fn footnote_spacing() -> Element {
    Element::new("w:spacing")
        .with_attr("w:before", "0")
        .with_attr("w:after", "0")
        .with_attr("w:line", "240")
        .with_attr("w:lineRule", "auto")
}

/// Configure footnote styles and reformat every paragraph of the footnotes part.
pub(crate) fn format_footnotes(
    doc: &mut Document,
    config: &DocumentConfig,
    stats: &mut PostProcessStats,
) {
    configure_footnote_styles(doc, config, stats);

    let Some(footnotes) = doc.footnotes_mut() else {
        log::debug!("Document has no footnotes part");
        return;
    };

    let language = language_element(config.language());
    let mut count = 0;
    for footnote in footnotes.elements_mut().filter(|e| e.name == "w:footnote") {
        footnote.walk_mut(&mut |element| {
            if element.name != "w:p" {
                return;
            }
            element
                .get_or_insert_first("w:pPr")
                .replace_child(footnote_spacing(), P_PR_ORDER);
            for_each_run(element, &mut |run| {
                run_properties(run).replace_child(language.clone(), R_PR_ORDER);
            });
            count += 1;
        });
    }

    stats.footnote_paragraphs = count;
    log::debug!("Formatted {} footnote paragraphs", count);
}

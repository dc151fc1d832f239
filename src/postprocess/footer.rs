//! Odd and even page footers with page numbers.

use super::stats::PostProcessStats;
use crate::config::DocumentConfig;
use crate::docx::wml::{
    add_run, page_number_field, set_alignment, set_spacing, Alignment, RunFormat, Spacing, R_NS,
    SECT_PR_ORDER, SETTINGS_ORDER, W_NS,
};
use crate::docx::{Document, Element, Node};
use crate::error::Result;

/// Space above the footer paragraph, in points.
const FOOTER_SPACE_BEFORE: f64 = 12.0;

fn footer_root(paragraph: Element) -> Element {
    Element::new("w:ftr")
        .with_attr("xmlns:w", W_NS)
        .with_attr("xmlns:r", R_NS)
        .with_child(paragraph)
}

/// Footer for odd pages: right aligned, text then page number.
fn odd_footer(text: &str, format: &RunFormat) -> Element {
    let mut p = Element::new("w:p");
    set_alignment(&mut p, Alignment::Right);
    set_spacing(
        &mut p,
        Spacing {
            before: Some(FOOTER_SPACE_BEFORE),
            ..Spacing::default()
        },
    );
    add_run(&mut p, &format!("{} | ", text), format);
    for run in page_number_field(format) {
        p.push(run);
    }
    footer_root(p)
}

/// Footer for even pages: left aligned, page number then text.
fn even_footer(text: &str, format: &RunFormat) -> Element {
    let mut p = Element::new("w:p");
    set_alignment(&mut p, Alignment::Left);
    set_spacing(
        &mut p,
        Spacing {
            before: Some(FOOTER_SPACE_BEFORE),
            ..Spacing::default()
        },
    );
    for run in page_number_field(format) {
        p.push(run);
    }
    add_run(&mut p, &format!(" | {}", text), format);
    footer_root(p)
}

fn footer_reference(kind: &str, rel_id: &str) -> Element {
    Element::new("w:footerReference")
        .with_attr("w:type", kind)
        .with_attr("r:id", rel_id)
}

/// Attach footers to every section and enable distinct odd and even pages.
pub(crate) fn add_footers(
    doc: &mut Document,
    config: &DocumentConfig,
    stats: &mut PostProcessStats,
) -> Result<()> {
    let format = RunFormat::new()
        .font(config.font_name())
        .size(DocumentConfig::FOOTER_FONT_SIZE);
    let footer = config.footer_text();

    let odd_id = doc.add_footer(&odd_footer(&footer.odd, &format))?;
    let even_id = doc.add_footer(&even_footer(&footer.even, &format))?;

    let mut sections = 0;
    doc.body_mut()?.walk_mut(&mut |element| {
        if element.name != "w:sectPr" {
            return;
        }
        element.children.retain(|node| match node {
            Node::Element(e) if e.name == "w:footerReference" => {
                !matches!(e.attr("w:type"), Some("default") | Some("even") | None)
            }
            _ => true,
        });
        element.insert_ordered(footer_reference("default", &odd_id), SECT_PR_ORDER);
        element.insert_ordered(footer_reference("even", &even_id), SECT_PR_ORDER);
        element.get_or_insert("w:titlePg", SECT_PR_ORDER);
        sections += 1;
    });

    match doc.settings_mut() {
        Some(settings) => {
            settings.get_or_insert("w:evenAndOddHeaders", SETTINGS_ORDER);
        }
        None => log::warn!("Document has no settings part; odd and even footers may not show"),
    }

    if sections == 0 {
        log::warn!("No sections found; footers were not attached");
    }
    stats.footer_sections = sections;
    log::debug!("Attached footers to {} sections", sections);
    Ok(())
}

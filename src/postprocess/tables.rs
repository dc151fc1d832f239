//! Table cell formatting and borders.

use super::stats::PostProcessStats;
use crate::config::DocumentConfig;
use crate::docx::wml::{add_run, format_runs, has_runs, set_spacing, RunFormat, Spacing, TC_PR_ORDER};
use crate::docx::{Document, Element};
use crate::error::Result;

const BORDER_EDGES: [&str; 4] = ["w:top", "w:left", "w:bottom", "w:right"];

fn cell_borders() -> Element {
    BORDER_EDGES
        .iter()
        .fold(Element::new("w:tcBorders"), |borders, edge| {
            borders.with_child(
                Element::new(*edge)
                    .with_attr("w:val", "single")
                    .with_attr("w:sz", "4")
                    .with_attr("w:space", "0")
                    .with_attr("w:color", "auto"),
            )
        })
}

/// Add single borders to a cell that has none.
fn ensure_borders(cell: &mut Element) {
    let tcpr = cell.get_or_insert_first("w:tcPr");
    if !tcpr.has_child("w:tcBorders") {
        tcpr.insert_ordered(cell_borders(), TC_PR_ORDER);
    }
}

fn format_cell(cell: &mut Element, format: &RunFormat) {
    let spacing = Spacing::new(
        DocumentConfig::TABLE_CELL_SPACING,
        DocumentConfig::TABLE_CELL_SPACING,
        1.0,
    );
    for p in cell.elements_mut().filter(|e| e.name == "w:p") {
        format_runs(p, format);
        if !has_runs(p) {
            add_run(p, "", format);
        }
        set_spacing(p, spacing);
    }
}

fn format_table(table: &mut Element, config: &DocumentConfig, stats: &mut PostProcessStats) {
    let cell_format = RunFormat::new()
        .font(config.font_name())
        .size(DocumentConfig::TABLE_FONT_SIZE)
        .language(config.language());
    let header_format = cell_format.clone().bold(true);

    for (row_index, row) in table
        .elements_mut()
        .filter(|e| e.name == "w:tr")
        .enumerate()
    {
        let format = if row_index == 0 {
            &header_format
        } else {
            &cell_format
        };
        for cell in row.elements_mut().filter(|e| e.name == "w:tc") {
            format_cell(cell, format);
            ensure_borders(cell);
            stats.add_cell();
        }
    }
    stats.add_table();
}

fn visit_tables(element: &mut Element, config: &DocumentConfig, stats: &mut PostProcessStats) {
    for child in element.elements_mut() {
        if child.name == "w:tbl" {
            format_table(child, config, stats);
        }
        visit_tables(child, config, stats);
    }
}

/// Format every table in the body, including nested tables.
pub(crate) fn format_tables(
    doc: &mut Document,
    config: &DocumentConfig,
    stats: &mut PostProcessStats,
) -> Result<()> {
    visit_tables(doc.body_mut()?, config, stats);
    log::debug!(
        "Formatted {} tables ({} cells)",
        stats.table_count,
        stats.cell_count
    );
    Ok(())
}

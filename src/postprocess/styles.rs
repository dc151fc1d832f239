//! Document language, named styles and section geometry.

use super::stats::PostProcessStats;
use crate::config::{DocumentConfig, Rgb};
use crate::docx::units::Length;
use crate::docx::wml::{
    apply_spacing, language_element, RunFormat, Spacing, R_PR_ORDER, SECT_PR_ORDER, STYLE_ORDER,
};
use crate::docx::{Document, Element};
use crate::error::Result;
use std::collections::HashMap;

const DOC_DEFAULTS_ORDER: &[&str] = &["w:rPrDefault", "w:pPrDefault"];

/// Formatting applied to one named style.
#[derive(Debug, Clone)]
pub(crate) struct StyleSpec {
    pub name: &'static str,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub color: Option<Rgb>,
    pub spacing: Spacing,
    pub heading: bool,
}

/// Find a style by display name, ignoring case.
pub(crate) fn find_style_mut<'a>(styles: &'a mut Element, name: &str) -> Option<&'a mut Element> {
    styles.elements_mut().find(|style| {
        style.name == "w:style"
            && style
                .child("w:name")
                .and_then(|n| n.attr("w:val"))
                .is_some_and(|n| n.eq_ignore_ascii_case(name))
    })
}

/// Map of style id to lowercase display name.
pub(crate) fn style_names(styles: Option<&Element>) -> HashMap<String, String> {
    let Some(styles) = styles else {
        return HashMap::new();
    };
    styles
        .children_named("w:style")
        .filter_map(|style| {
            let id = style.attr("w:styleId")?;
            let name = style.child("w:name").and_then(|n| n.attr("w:val")).unwrap_or(id);
            Some((id.to_string(), name.to_ascii_lowercase()))
        })
        .collect()
}

/// Style id for a display name, if the style exists.
pub(crate) fn style_id(styles: Option<&Element>, name: &str) -> Option<String> {
    styles?
        .children_named("w:style")
        .find(|style| {
            style
                .child("w:name")
                .and_then(|n| n.attr("w:val"))
                .is_some_and(|n| n.eq_ignore_ascii_case(name))
        })
        .and_then(|style| style.attr("w:styleId"))
        .map(str::to_string)
}

/// Set the default run language in `w:docDefaults` and the core properties.
pub(crate) fn set_document_language(doc: &mut Document, config: &DocumentConfig) {
    let language = config.language();

    match doc.styles_mut() {
        Some(styles) => {
            let rpr = styles
                .get_or_insert_first("w:docDefaults")
                .get_or_insert("w:rPrDefault", DOC_DEFAULTS_ORDER)
                .get_or_insert_first("w:rPr");
            rpr.replace_child(language_element(language), R_PR_ORDER);
        }
        None => log::warn!("Document has no styles part; default language not set"),
    }

    if let Some(core) = doc.core_properties_mut() {
        set_core_text(core, "dc:language", language);
        let modified = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        if core.attr("xmlns:xsi").is_none() {
            core.set_attr("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance");
        }
        if core.attr("xmlns:dcterms").is_none() {
            core.set_attr("xmlns:dcterms", "http://purl.org/dc/terms/");
        }
        set_core_text(core, "dcterms:modified", &modified)
            .set_attr("xsi:type", "dcterms:W3CDTF");
    }

    log::debug!("Document language set to {}", language);
}

fn set_core_text<'a>(core: &'a mut Element, name: &str, text: &str) -> &'a mut Element {
    if name.starts_with("dc:") && core.attr("xmlns:dc").is_none() {
        core.set_attr("xmlns:dc", "http://purl.org/dc/elements/1.1/");
    }
    let element = core.get_or_insert(name, &[]);
    element.children.clear();
    element.push_text(text);
    element
}

fn apply_spec(style: &mut Element, spec: &StyleSpec, config: &DocumentConfig) {
    let mut format = RunFormat::new()
        .font(config.font_name())
        .size(spec.size)
        .bold(spec.bold);
    if spec.italic {
        format = format.italic(true);
    }
    if let Some(color) = spec.color {
        format = format.color(color);
    }
    format.apply(style.get_or_insert("w:rPr", STYLE_ORDER));

    let ppr = style.get_or_insert("w:pPr", STYLE_ORDER);
    apply_spacing(ppr, spec.spacing);
    if spec.heading {
        ppr.remove_children("w:numPr");
        style.remove_children("w:basedOn");
    }
}

/// Apply a list of style specs; missing styles are logged and skipped.
pub(crate) fn configure_styles(
    doc: &mut Document,
    config: &DocumentConfig,
    specs: &[StyleSpec],
    stats: &mut PostProcessStats,
) {
    let Some(styles) = doc.styles_mut() else {
        log::warn!("Document has no styles part; named styles not configured");
        for spec in specs {
            stats.skip_style(spec.name);
        }
        return;
    };

    for spec in specs {
        match find_style_mut(styles, spec.name) {
            Some(style) => {
                apply_spec(style, spec, config);
                stats.add_style();
            }
            None => {
                log::warn!("Style '{}' not found", spec.name);
                stats.skip_style(spec.name);
            }
        }
    }
}

/// Normal and Title.
pub(crate) fn standard_styles(config: &DocumentConfig) -> Vec<StyleSpec> {
    vec![
        StyleSpec {
            name: "Normal",
            size: config.base_font_size(),
            bold: false,
            italic: false,
            color: None,
            spacing: Spacing::new(0.0, 0.0, config.line_spacing()),
            heading: false,
        },
        StyleSpec {
            name: "Title",
            size: DocumentConfig::TITLE_SIZE,
            bold: true,
            italic: false,
            color: None,
            spacing: Spacing::new(12.0, 12.0, 1.0),
            heading: false,
        },
    ]
}

/// Heading 1 to 3.
pub(crate) fn heading_styles(config: &DocumentConfig) -> Vec<StyleSpec> {
    let heading = |name, level, size, before, after| StyleSpec {
        name,
        size,
        bold: true,
        italic: level == 3,
        color: Some(config.heading_color(level)),
        spacing: Spacing::new(before, after, 1.0),
        heading: true,
    };
    vec![
        heading("Heading 1", 1, DocumentConfig::HEADING_1_SIZE, 18.0, 12.0),
        heading("Heading 2", 2, DocumentConfig::HEADING_2_SIZE, 16.0, 10.0),
        heading("Heading 3", 3, DocumentConfig::HEADING_3_SIZE, 14.0, 8.0),
    ]
}

/// Apply paper size and margins to every section.
pub(crate) fn configure_sections(
    doc: &mut Document,
    config: &DocumentConfig,
    stats: &mut PostProcessStats,
) -> Result<()> {
    let (width_in, height_in) = config.paper_size().dimensions_inches();
    let width = Length::inches(width_in).as_twips().to_string();
    let height = Length::inches(height_in).as_twips().to_string();
    let margins = config.margins();
    let [top, right, bottom, left] = margins.as_array().map(|cm| Length::cm(cm).as_twips().to_string());

    let mut count = 0;
    doc.body_mut()?.walk_mut(&mut |element| {
        if element.name != "w:sectPr" {
            return;
        }
        let size = element.get_or_insert("w:pgSz", SECT_PR_ORDER);
        let (w, h) = if size.attr("w:orient") == Some("landscape") {
            (&height, &width)
        } else {
            (&width, &height)
        };
        size.set_attr("w:w", w.as_str());
        size.set_attr("w:h", h.as_str());

        let margin = element.get_or_insert("w:pgMar", SECT_PR_ORDER);
        margin.set_attr("w:top", top.as_str());
        margin.set_attr("w:right", right.as_str());
        margin.set_attr("w:bottom", bottom.as_str());
        margin.set_attr("w:left", left.as_str());
        for (key, default) in [("w:header", "720"), ("w:footer", "720"), ("w:gutter", "0")] {
            if margin.attr(key).is_none() {
                margin.set_attr(key, default);
            }
        }
        count += 1;
    });

    stats.section_count = count;
    log::debug!("Configured {} sections ({:?})", count, config.paper_size());
    Ok(())
}

//! WordprocessingML helpers: paragraphs, runs and their properties.

use super::units::{half_points, line_spacing_value, pt_to_twips};
use super::xml::{Element, Node};
use crate::config::Rgb;

/// WordprocessingML main namespace.
pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
/// Office relationships namespace (`r:` prefix).
pub const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
/// Drawing placement namespace (`wp:` prefix).
pub const WP_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
/// DrawingML main namespace (`a:` prefix).
pub const A_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
/// DrawingML picture namespace (`pic:` prefix).
pub const PIC_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";

/// Child order of `w:pPr`.
pub const P_PR_ORDER: &[&str] = &[
    "w:pStyle",
    "w:keepNext",
    "w:keepLines",
    "w:pageBreakBefore",
    "w:framePr",
    "w:widowControl",
    "w:numPr",
    "w:suppressLineNumbers",
    "w:pBdr",
    "w:shd",
    "w:tabs",
    "w:suppressAutoHyphens",
    "w:kinsoku",
    "w:wordWrap",
    "w:overflowPunct",
    "w:topLinePunct",
    "w:autoSpaceDE",
    "w:autoSpaceDN",
    "w:bidi",
    "w:adjustRightInd",
    "w:snapToGrid",
    "w:spacing",
    "w:ind",
    "w:contextualSpacing",
    "w:mirrorIndents",
    "w:suppressOverlap",
    "w:jc",
    "w:textDirection",
    "w:textAlignment",
    "w:textboxTightWrap",
    "w:outlineLvl",
    "w:divId",
    "w:cnfStyle",
    "w:rPr",
    "w:sectPr",
    "w:pPrChange",
];

/// Child order of `w:rPr`.
pub const R_PR_ORDER: &[&str] = &[
    "w:rStyle",
    "w:rFonts",
    "w:b",
    "w:bCs",
    "w:i",
    "w:iCs",
    "w:caps",
    "w:smallCaps",
    "w:strike",
    "w:dstrike",
    "w:outline",
    "w:shadow",
    "w:emboss",
    "w:imprint",
    "w:noProof",
    "w:snapToGrid",
    "w:vanish",
    "w:webHidden",
    "w:color",
    "w:spacing",
    "w:w",
    "w:kern",
    "w:position",
    "w:sz",
    "w:szCs",
    "w:highlight",
    "w:u",
    "w:effect",
    "w:bdr",
    "w:shd",
    "w:fitText",
    "w:vertAlign",
    "w:rtl",
    "w:cs",
    "w:em",
    "w:lang",
    "w:eastAsianLayout",
    "w:specVanish",
    "w:oMath",
];

/// Child order of `w:style`.
pub const STYLE_ORDER: &[&str] = &[
    "w:name",
    "w:aliases",
    "w:basedOn",
    "w:next",
    "w:link",
    "w:autoRedefine",
    "w:hidden",
    "w:uiPriority",
    "w:semiHidden",
    "w:unhideWhenUsed",
    "w:qFormat",
    "w:locked",
    "w:personal",
    "w:personalCompose",
    "w:personalReply",
    "w:rsid",
    "w:pPr",
    "w:rPr",
    "w:tblPr",
    "w:trPr",
    "w:tcPr",
    "w:tblStylePr",
];

/// Child order of `w:tcPr`.
pub const TC_PR_ORDER: &[&str] = &[
    "w:cnfStyle",
    "w:tcW",
    "w:gridSpan",
    "w:hMerge",
    "w:vMerge",
    "w:tcBorders",
    "w:shd",
    "w:noWrap",
    "w:tcMar",
    "w:textDirection",
    "w:tcFitText",
    "w:vAlign",
    "w:hideMark",
];

/// Child order of `w:sectPr`.
pub const SECT_PR_ORDER: &[&str] = &[
    "w:headerReference",
    "w:footerReference",
    "w:footnotePr",
    "w:endnotePr",
    "w:type",
    "w:pgSz",
    "w:pgMar",
    "w:paperSrc",
    "w:pgBorders",
    "w:lnNumType",
    "w:pgNumType",
    "w:cols",
    "w:formProt",
    "w:vAlign",
    "w:noEndnote",
    "w:titlePg",
    "w:textDirection",
    "w:bidi",
    "w:rtlGutter",
    "w:docGrid",
    "w:printerSettings",
    "w:sectPrChange",
];

/// Child order of `w:settings`.
pub const SETTINGS_ORDER: &[&str] = &[
    "w:writeProtection",
    "w:view",
    "w:zoom",
    "w:removePersonalInformation",
    "w:removeDateAndTime",
    "w:doNotDisplayPageBoundaries",
    "w:displayBackgroundShape",
    "w:printPostScriptOverText",
    "w:printFractionalCharacterWidth",
    "w:printFormsData",
    "w:embedTrueTypeFonts",
    "w:embedSystemFonts",
    "w:saveSubsetFonts",
    "w:saveFormsData",
    "w:mirrorMargins",
    "w:alignBordersAndEdges",
    "w:bordersDoNotSurroundHeader",
    "w:bordersDoNotSurroundFooter",
    "w:gutterAtTop",
    "w:hideSpellingErrors",
    "w:hideGrammaticalErrors",
    "w:activeWritingStyle",
    "w:proofState",
    "w:formsDesign",
    "w:attachedTemplate",
    "w:linkStyles",
    "w:stylePaneFormatFilter",
    "w:stylePaneSortMethod",
    "w:documentType",
    "w:mailMerge",
    "w:revisionView",
    "w:trackRevisions",
    "w:doNotTrackMoves",
    "w:doNotTrackFormatting",
    "w:documentProtection",
    "w:autoFormatOverride",
    "w:styleLockTheme",
    "w:styleLockQFSet",
    "w:defaultTabStop",
    "w:autoHyphenation",
    "w:consecutiveHyphenLimit",
    "w:hyphenationZone",
    "w:doNotHyphenateCaps",
    "w:showEnvelope",
    "w:summaryLength",
    "w:clickAndTypeStyle",
    "w:defaultTableStyle",
    "w:evenAndOddHeaders",
    "w:bookFoldRevPrinting",
    "w:bookFoldPrinting",
    "w:bookFoldPrintingSheets",
    "w:drawingGridHorizontalSpacing",
    "w:drawingGridVerticalSpacing",
    "w:displayHorizontalDrawingGridEvery",
    "w:displayVerticalDrawingGridEvery",
    "w:doNotUseMarginsForDrawingGridOrigin",
    "w:drawingGridHorizontalOrigin",
    "w:drawingGridVerticalOrigin",
    "w:doNotShadeFormData",
    "w:noPunctuationKerning",
    "w:characterSpacingControl",
    "w:printTwoOnOne",
    "w:strictFirstAndLastChars",
    "w:noLineBreaksAfter",
    "w:noLineBreaksBefore",
    "w:savePreviewPicture",
    "w:doNotValidateAgainstSchema",
    "w:saveInvalidXml",
    "w:ignoreMixedContent",
    "w:alwaysShowPlaceholderText",
    "w:doNotDemarcateInvalidXml",
    "w:saveXmlDataOnly",
    "w:useXSLTWhenSaving",
    "w:saveThroughXslt",
    "w:showXMLTags",
    "w:alwaysMergeEmptyNamespace",
    "w:updateFields",
    "w:hdrShapeDefaults",
    "w:footnotePr",
    "w:endnotePr",
    "w:compat",
    "w:docVars",
    "w:rsids",
    "m:mathPr",
    "w:attachedSchema",
    "w:themeFontLang",
    "w:clrSchemeMapping",
    "w:doNotIncludeSubdocsInStats",
    "w:doNotAutoCompressPictures",
    "w:forceUpgrade",
    "w:captions",
    "w:readModeInkLockDown",
    "w:smartTagType",
    "sl:schemaLibrary",
    "w:shapeDefaults",
    "w:doNotEmbedSmartTags",
    "w:decimalSymbol",
    "w:listSeparator",
];

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Both,
}

impl Alignment {
    fn as_str(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Both => "both",
        }
    }
}

/// Paragraph spacing in points; line spacing as a multiplier.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Spacing {
    pub before: Option<f64>,
    pub after: Option<f64>,
    pub line: Option<f64>,
}

impl Spacing {
    pub fn new(before: f64, after: f64, line: f64) -> Self {
        Self {
            before: Some(before),
            after: Some(after),
            line: Some(line),
        }
    }
}

/// Character formatting applied to runs.
///
/// `None` leaves the corresponding property untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunFormat {
    pub font: Option<String>,
    pub size: Option<f64>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub color: Option<Rgb>,
    pub superscript: bool,
    pub language: Option<String>,
}

impl RunFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    /// Size in points.
    pub fn size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    pub fn superscript(mut self) -> Self {
        self.superscript = true;
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Write the formatting into a `w:rPr` element.
    pub fn apply(&self, rpr: &mut Element) {
        if let Some(font) = &self.font {
            rpr.replace_child(
                Element::new("w:rFonts")
                    .with_attr("w:ascii", font.as_str())
                    .with_attr("w:hAnsi", font.as_str())
                    .with_attr("w:eastAsia", font.as_str())
                    .with_attr("w:cs", font.as_str()),
                R_PR_ORDER,
            );
        }
        if let Some(bold) = self.bold {
            rpr.replace_child(toggle("w:b", bold), R_PR_ORDER);
        }
        if let Some(italic) = self.italic {
            rpr.replace_child(toggle("w:i", italic), R_PR_ORDER);
        }
        if let Some(color) = self.color {
            rpr.replace_child(
                Element::new("w:color").with_attr("w:val", color.to_hex()),
                R_PR_ORDER,
            );
        }
        if let Some(size) = self.size {
            let value = half_points(size).to_string();
            rpr.replace_child(
                Element::new("w:sz").with_attr("w:val", value.as_str()),
                R_PR_ORDER,
            );
            rpr.replace_child(
                Element::new("w:szCs").with_attr("w:val", value),
                R_PR_ORDER,
            );
        }
        if self.superscript {
            rpr.replace_child(
                Element::new("w:vertAlign").with_attr("w:val", "superscript"),
                R_PR_ORDER,
            );
        }
        if let Some(language) = &self.language {
            rpr.replace_child(language_element(language), R_PR_ORDER);
        }
    }
}

fn toggle(name: &str, on: bool) -> Element {
    if on {
        Element::new(name)
    } else {
        Element::new(name).with_attr("w:val", "0")
    }
}

/// A `w:lang` element setting the Latin, East Asian and complex-script language.
pub fn language_element(language: &str) -> Element {
    Element::new("w:lang")
        .with_attr("w:val", language)
        .with_attr("w:eastAsia", language)
        .with_attr("w:bidi", language)
}

/// Plain text of a paragraph: `w:t` content, tabs and breaks.
pub fn paragraph_text(p: &Element) -> String {
    let mut out = String::new();
    collect_run_text(p, &mut out);
    out
}

fn collect_run_text(element: &Element, out: &mut String) {
    for child in element.elements() {
        match child.name.as_str() {
            "w:t" => out.push_str(&child.text()),
            "w:tab" => out.push('\t'),
            "w:br" | "w:cr" => out.push('\n'),
            "w:pPr" | "w:rPr" | "w:instrText" | "w:delText" | "w:drawing" | "w:pict" => {}
            _ => collect_run_text(child, out),
        }
    }
}

/// Style id of a paragraph, if any.
pub fn paragraph_style(p: &Element) -> Option<&str> {
    p.child("w:pPr")
        .and_then(|ppr| ppr.child("w:pStyle"))
        .and_then(|style| style.attr("w:val"))
}

/// `w:pPr` of a paragraph, created when missing.
pub fn paragraph_properties(p: &mut Element) -> &mut Element {
    p.get_or_insert_first("w:pPr")
}

/// `w:rPr` of a run, created when missing.
pub fn run_properties(r: &mut Element) -> &mut Element {
    r.get_or_insert_first("w:rPr")
}

/// Set the paragraph style id.
pub fn set_paragraph_style(p: &mut Element, style_id: &str) {
    paragraph_properties(p).replace_child(
        Element::new("w:pStyle").with_attr("w:val", style_id),
        P_PR_ORDER,
    );
}

/// Set the paragraph alignment.
pub fn set_alignment(p: &mut Element, alignment: Alignment) {
    paragraph_properties(p).replace_child(
        Element::new("w:jc").with_attr("w:val", alignment.as_str()),
        P_PR_ORDER,
    );
}

/// Write spacing into a `w:pPr` element, keeping attributes not being set.
pub fn apply_spacing(ppr: &mut Element, spacing: Spacing) {
    let element = ppr.get_or_insert("w:spacing", P_PR_ORDER);
    if let Some(before) = spacing.before {
        element.remove_attr("w:beforeAutospacing");
        element.set_attr("w:before", pt_to_twips(before).to_string());
    }
    if let Some(after) = spacing.after {
        element.remove_attr("w:afterAutospacing");
        element.set_attr("w:after", pt_to_twips(after).to_string());
    }
    if let Some(line) = spacing.line {
        element.set_attr("w:line", line_spacing_value(line).to_string());
        element.set_attr("w:lineRule", "auto");
    }
}

/// Set paragraph spacing.
pub fn set_spacing(p: &mut Element, spacing: Spacing) {
    apply_spacing(paragraph_properties(p), spacing);
}

/// Remove all content of a paragraph except its properties.
pub fn clear_paragraph(p: &mut Element) {
    p.children
        .retain(|node| matches!(node, Node::Element(e) if e.name == "w:pPr"));
}

/// Whether the paragraph contains any run.
pub fn has_runs(p: &Element) -> bool {
    let mut found = false;
    visit_runs(p, &mut |_| found = true);
    found
}

fn visit_runs(element: &Element, f: &mut dyn FnMut(&Element)) {
    for child in element.elements() {
        match child.name.as_str() {
            "w:r" => f(child),
            "w:pPr" => {}
            _ => visit_runs(child, f),
        }
    }
}

/// Apply `f` to every run of a paragraph, including runs in hyperlinks and
/// tracked insertions.
pub fn for_each_run(p: &mut Element, f: &mut dyn FnMut(&mut Element)) {
    for child in p.elements_mut() {
        match child.name.as_str() {
            "w:r" => f(child),
            "w:pPr" => {}
            _ => for_each_run(child, f),
        }
    }
}

/// Apply a format to every run of a paragraph.
pub fn format_runs(p: &mut Element, format: &RunFormat) {
    for_each_run(p, &mut |r| format.apply(run_properties(r)));
}

/// Build a text run.
pub fn new_run(text: &str, format: &RunFormat) -> Element {
    let mut rpr = Element::new("w:rPr");
    format.apply(&mut rpr);

    let mut run = Element::new("w:r");
    if !rpr.children.is_empty() {
        run.push(rpr);
    }
    if !text.is_empty() {
        run.push(
            Element::new("w:t")
                .with_attr("xml:space", "preserve")
                .with_text(text),
        );
    }
    run
}

/// Append a text run to a paragraph.
pub fn add_run<'a>(p: &'a mut Element, text: &str, format: &RunFormat) -> &'a mut Element {
    p.push(new_run(text, format))
}

fn field_char(kind: &str, format: &RunFormat) -> Element {
    let mut run = new_run("", format);
    run.push(Element::new("w:fldChar").with_attr("w:fldCharType", kind));
    run
}

/// Runs forming a dynamic `PAGE` field.
pub fn page_number_field(format: &RunFormat) -> Vec<Element> {
    let mut instruction = new_run("", format);
    instruction.push(
        Element::new("w:instrText")
            .with_attr("xml:space", "preserve")
            .with_text("PAGE"),
    );
    vec![
        field_char("begin", format),
        instruction,
        field_char("separate", format),
        new_run("1", format),
        field_char("end", format),
    ]
}

/// An inline picture run referencing an image relationship.
pub fn inline_picture(rel_id: &str, id: u32, descr: &str, cx: i64, cy: i64) -> Element {
    let name = format!("Picture {}", id);
    let id = id.to_string();
    let cx = cx.to_string();
    let cy = cy.to_string();

    let pic = Element::new("pic:pic")
        .with_attr("xmlns:pic", PIC_NS)
        .with_child(
            Element::new("pic:nvPicPr")
                .with_child(
                    Element::new("pic:cNvPr")
                        .with_attr("id", "0")
                        .with_attr("name", name.as_str())
                        .with_attr("descr", descr),
                )
                .with_child(Element::new("pic:cNvPicPr")),
        )
        .with_child(
            Element::new("pic:blipFill")
                .with_child(Element::new("a:blip").with_attr("r:embed", rel_id))
                .with_child(Element::new("a:stretch").with_child(Element::new("a:fillRect"))),
        )
        .with_child(
            Element::new("pic:spPr")
                .with_child(
                    Element::new("a:xfrm")
                        .with_child(Element::new("a:off").with_attr("x", "0").with_attr("y", "0"))
                        .with_child(
                            Element::new("a:ext")
                                .with_attr("cx", cx.as_str())
                                .with_attr("cy", cy.as_str()),
                        ),
                )
                .with_child(
                    Element::new("a:prstGeom")
                        .with_attr("prst", "rect")
                        .with_child(Element::new("a:avLst")),
                ),
        );

    let inline = Element::new("wp:inline")
        .with_attr("distT", "0")
        .with_attr("distB", "0")
        .with_attr("distL", "0")
        .with_attr("distR", "0")
        .with_attr("xmlns:wp", WP_NS)
        .with_child(
            Element::new("wp:extent")
                .with_attr("cx", cx.as_str())
                .with_attr("cy", cy.as_str()),
        )
        .with_child(
            Element::new("wp:docPr")
                .with_attr("id", id.as_str())
                .with_attr("name", name.as_str())
                .with_attr("descr", descr),
        )
        .with_child(
            Element::new("wp:cNvGraphicFramePr").with_child(
                Element::new("a:graphicFrameLocks")
                    .with_attr("xmlns:a", A_NS)
                    .with_attr("noChangeAspect", "1"),
            ),
        )
        .with_child(
            Element::new("a:graphic").with_attr("xmlns:a", A_NS).with_child(
                Element::new("a:graphicData")
                    .with_attr("uri", PIC_NS)
                    .with_child(pic),
            ),
        );

    Element::new("w:r").with_child(Element::new("w:drawing").with_child(inline))
}

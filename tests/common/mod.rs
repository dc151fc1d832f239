//! Shared fixtures: a pandoc-shaped DOCX builder and a mock backend.

#![allow(dead_code)]

use mdocx::docx::Package;
use mdocx::error::{Error, Result};
use mdocx::{MarkdownBackend, RenderJob};
use std::path::Path;
use std::sync::Mutex;

const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

fn styles_xml() -> String {
    let paragraph = |id: &str, name: &str| {
        format!(
            r#"<w:style w:type="paragraph" w:styleId="{}"><w:name w:val="{}"/><w:basedOn w:val="Normal"/></w:style>"#,
            id, name
        )
    };
    let heading = |level: u8| {
        format!(
            r#"<w:style w:type="paragraph" w:styleId="Heading{0}"><w:name w:val="heading {0}"/><w:basedOn w:val="Normal"/><w:pPr><w:numPr><w:ilvl w:val="0"/></w:numPr><w:outlineLvl w:val="{1}"/></w:pPr></w:style>"#,
            level,
            level - 1
        )
    };
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:styles xmlns:w="{W}"><w:docDefaults><w:rPrDefault><w:rPr/></w:rPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>{}{}{}{}{}{}{}{}{}<w:style w:type="character" w:styleId="FootnoteReference"><w:name w:val="Footnote Reference"/></w:style></w:styles>"#,
        paragraph("BodyText", "Body Text"),
        paragraph("FirstParagraph", "First Paragraph"),
        paragraph("Compact", "Compact"),
        paragraph("Title", "Title"),
        paragraph("Author", "Author"),
        paragraph("Date", "Date"),
        heading(1),
        heading(2),
        heading(3),
    )
}

/// A DOCX package shaped like pandoc output around `body`.
pub fn pandoc_like_docx(body: &str, footnotes: &str) -> Vec<u8> {
    let mut package = Package::new();
    package.set_part(
        "[Content_Types].xml",
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/word/footnotes.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.footnotes+xml"/><Override PartName="/word/settings.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml"/></Types>"#.to_vec(),
    );
    package.set_part(
        "_rels/.rels",
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#.to_vec(),
    );
    package.set_part(
        "word/_rels/document.xml.rels",
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/footnotes" Target="footnotes.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings" Target="settings.xml"/></Relationships>"#.to_vec(),
    );
    package.set_part(
        "word/document.xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{W}"><w:body>{}<w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr></w:body></w:document>"#,
            body
        )
        .into_bytes(),
    );
    package.set_part("word/styles.xml", styles_xml().into_bytes());
    package.set_part(
        "word/footnotes.xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:footnotes xmlns:w="{W}">{}</w:footnotes>"#,
            footnotes
        )
        .into_bytes(),
    );
    package.set_part(
        "word/settings.xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:settings xmlns:w="{W}"><w:zoom w:percent="100"/></w:settings>"#
        )
        .into_bytes(),
    );
    package.to_bytes().expect("fixture package serializes")
}

/// A paragraph with an optional style and one run.
pub fn para(style: Option<&str>, text: &str) -> String {
    let ppr = style
        .map(|s| format!(r#"<w:pPr><w:pStyle w:val="{}"/></w:pPr>"#, s))
        .unwrap_or_default();
    format!(
        r#"<w:p>{}<w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        ppr,
        escape(text)
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn table(rows: &[Vec<String>]) -> String {
    let mut xml = String::from("<w:tbl><w:tblPr/>");
    for row in rows {
        xml.push_str("<w:tr>");
        for cell in row {
            xml.push_str(&format!("<w:tc>{}</w:tc>", para(Some("Compact"), cell)));
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
    xml
}

/// Render a small Markdown subset the way pandoc lays it out.
///
/// Handles title metadata, ATX headings with the level shift applied,
/// pipe tables and plain paragraphs.
pub fn render_markdown(markdown: &str, job: &RenderJob) -> String {
    let mut body = String::new();
    body.push_str(&para(Some("Title"), &job.title));
    if !job.author.is_empty() {
        body.push_str(&para(Some("Author"), &job.author));
    }
    if !job.date.is_empty() {
        body.push_str(&para(Some("Date"), &job.date));
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut first = true;
    for line in markdown.lines().map(str::trim) {
        if line.starts_with('|') {
            if !line.contains("---") {
                rows.push(
                    line.trim_matches('|')
                        .split('|')
                        .map(|c| c.trim().to_string())
                        .collect(),
                );
            }
            continue;
        }
        if !rows.is_empty() {
            body.push_str(&table(&rows));
            rows.clear();
        }
        if line.is_empty() {
            continue;
        }

        let hashes = line.chars().take_while(|c| *c == '#').count();
        if hashes > 0 && line[hashes..].starts_with(' ') {
            let level = if hashes > 1 { hashes - 1 } else { 1 };
            body.push_str(&para(Some(&format!("Heading{}", level)), line[hashes..].trim()));
            first = true;
        } else {
            let style = if first { "FirstParagraph" } else { "BodyText" };
            body.push_str(&para(Some(style), line));
            first = false;
        }
    }
    if !rows.is_empty() {
        body.push_str(&table(&rows));
    }
    body
}

/// Backend producing pandoc-shaped output without running pandoc.
#[derive(Default)]
pub struct MockPandoc {
    pub jobs: Mutex<Vec<RenderJob>>,
    pub fail_with: Option<String>,
}

impl MockPandoc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            jobs: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    pub fn last_job(&self) -> Option<RenderJob> {
        self.jobs.lock().unwrap().last().cloned()
    }
}

impl MarkdownBackend for MockPandoc {
    fn name(&self) -> &str {
        "mock-pandoc"
    }

    fn render(&self, job: &RenderJob) -> Result<()> {
        self.jobs.lock().unwrap().push(job.clone());
        if let Some(ref message) = self.fail_with {
            return Err(Error::Conversion(message.clone()));
        }
        let markdown = std::fs::read_to_string(&job.input)?;
        let body = render_markdown(&markdown, job);
        std::fs::write(&job.output, pandoc_like_docx(&body, ""))?;
        Ok(())
    }
}

/// Write a solid PNG of the given pixel size.
pub fn write_png(path: &Path, width: u32, height: u32) {
    image::RgbImage::from_pixel(width, height, image::Rgb([30, 120, 200]))
        .save(path)
        .expect("png written");
}

/// File names in a directory, sorted.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("readable dir")
        .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

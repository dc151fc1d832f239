//! Integration tests for the conversion pipeline.

mod common;

use common::{dir_entries, write_png, MockPandoc};
use mdocx::docx::wml::paragraph_text;
use mdocx::docx::{Document, Package};
use mdocx::{
    ConvertReport, Converter, DocumentConfig, Error, MarkdownBackend, PandocBackend, PaperSize,
    Rgb,
};
use std::path::Path;

const SAMPLE: &str = "# Quarterly Report

Revenue grew in every region.

![Revenue chart](img/chart.png)

## Details

| Region | Growth |
|--------|--------|
| North  | 12%    |
| South  | 9%     |
";

fn setup(markdown: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("img")).unwrap();
    std::fs::write(dir.path().join("report.md"), markdown).unwrap();
    dir
}

fn convert(dir: &Path, config: DocumentConfig) -> (ConvertReport, Converter<MockPandoc>) {
    let converter = Converter::with_backend(config, MockPandoc::new());
    let report = converter
        .convert("report.md", "report.docx", Some(dir))
        .unwrap();
    (report, converter)
}

#[test]
fn test_full_pipeline() {
    let dir = setup(SAMPLE);
    write_png(&dir.path().join("img/chart.png"), 300, 150);

    let (report, converter) = convert(dir.path(), DocumentConfig::default());
    assert_eq!(report.title, "Quarterly Report");
    assert_eq!(report.stats.images_found, 1);
    assert_eq!(report.stats.images_embedded, 1);
    assert_eq!(report.stats.table_count, 1);
    assert_eq!(report.stats.cell_count, 6);
    assert!(report.stats.all_images_embedded());

    let job = converter.backend().last_job().unwrap();
    assert_eq!(job.title, "Quarterly Report");
    assert!(job.toc);

    let output = dir.path().join("report.docx");
    assert!(std::fs::metadata(&output).unwrap().len() > 0);

    let package = Package::open(&output).unwrap();
    assert!(package.part_names().any(|name| name.starts_with("word/media/")));
    assert!(package.contains("word/footer1.xml"));
    assert!(package.contains("word/footer2.xml"));

    let doc = Document::open(&output).unwrap();
    let body = doc.body().unwrap();
    assert_eq!(body.descendants("w:drawing").len(), 1);
    assert!(body
        .descendants("w:p")
        .iter()
        .all(|p| !paragraph_text(p).contains("[IMAGE_PLACEHOLDER]")));

    // Only the source Markdown, the output and the image folder remain
    assert_eq!(dir_entries(dir.path()), ["img", "report.docx", "report.md"]);
}

#[test]
fn test_temporaries_removed_after_failure() {
    let dir = setup(SAMPLE);
    let converter = Converter::with_backend(
        DocumentConfig::default(),
        MockPandoc::failing("pandoc: unknown extension"),
    );
    let err = converter
        .convert("report.md", "report.docx", Some(dir.path()))
        .unwrap_err();

    match err {
        Error::Conversion(message) => assert!(message.contains("unknown extension")),
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(dir_entries(dir.path()), ["img", "report.md"]);
}

#[test]
fn test_missing_image_degrades() {
    let dir = setup("# Doc\n\nIntro\n\n![Missing](img/nope.png)\n");
    let (report, _) = convert(dir.path(), DocumentConfig::default());

    assert_eq!(report.stats.images_found, 1);
    assert_eq!(report.stats.images_embedded, 0);
    assert_eq!(report.stats.images_missing, 1);

    let doc = Document::open(dir.path().join("report.docx")).unwrap();
    let texts: Vec<String> = doc
        .body()
        .unwrap()
        .descendants("w:p")
        .iter()
        .map(|p| paragraph_text(p))
        .collect();
    assert!(texts.iter().any(|t| t == "[Image not found: Missing]"));
}

#[test]
fn test_corrupt_image_degrades() {
    let dir = setup("# Doc\n\n![Broken](broken.png)\n");
    std::fs::write(dir.path().join("img/broken.png"), b"\x89PNG garbage").unwrap();
    let (report, _) = convert(dir.path(), DocumentConfig::default());

    assert_eq!(report.stats.images_failed, 1);
    let doc = Document::open(dir.path().join("report.docx")).unwrap();
    assert!(doc
        .body()
        .unwrap()
        .descendants("w:p")
        .iter()
        .any(|p| paragraph_text(p) == "[Image: Broken]"));
}

#[test]
fn test_wide_image_scaled_to_six_inches() {
    let dir = setup("# Wide\n\n![Banner](img/banner.png)\n");
    // 1200 px at the default 72 dpi is 16.7 inches
    write_png(&dir.path().join("img/banner.png"), 1200, 300);
    convert(dir.path(), DocumentConfig::default());

    let doc = Document::open(dir.path().join("report.docx")).unwrap();
    let body = doc.body().unwrap();
    let extent = body.descendants("wp:extent")[0];
    let cx: i64 = extent.attr("cx").unwrap().parse().unwrap();
    let cy: i64 = extent.attr("cy").unwrap().parse().unwrap();
    assert_eq!(cx, 6 * 914_400);
    assert!((cy - cx / 4).abs() <= 1);
}

#[test]
fn test_multiple_images_in_order() {
    let dir = setup("# Gallery\n\n![One](a.png)\n\n![Two](b.png)\n\n![Three](c.png)\n");
    for name in ["a.png", "b.png", "c.png"] {
        write_png(&dir.path().join("img").join(name), 20, 20);
    }
    let (report, _) = convert(dir.path(), DocumentConfig::default());
    assert_eq!(report.stats.images_embedded, 3);

    let doc = Document::open(dir.path().join("report.docx")).unwrap();
    let descriptions: Vec<&str> = doc
        .body()
        .unwrap()
        .descendants("wp:docPr")
        .iter()
        .filter_map(|d| d.attr("descr"))
        .collect();
    assert_eq!(descriptions, ["One", "Two", "Three"]);
}

#[test]
fn test_styles_follow_config() {
    let dir = setup("No heading here.\n");
    let config = DocumentConfig::builder()
        .with_paper_size(PaperSize::Legal)
        .with_heading_color(2, Rgb::new(200, 10, 10))
        .with_font_name("Georgia")
        .with_author("Ann Example")
        .with_toc(false)
        .build()
        .unwrap();
    let (report, converter) = convert(dir.path(), config);

    assert_eq!(report.title, "Untitled Document");
    let job = converter.backend().last_job().unwrap();
    assert_eq!(job.author, "Ann Example");
    assert!(!job.toc);
    assert_eq!(report.stats.styles_skipped, ["Footnote Text"]);

    let mut doc = Document::open(dir.path().join("report.docx")).unwrap();
    let body = doc.body().unwrap();
    let size = body.descendants("w:pgSz")[0];
    assert_eq!(size.attr("w:h"), Some("20160"));

    let styles = doc.styles_mut().unwrap();
    let h2 = styles
        .children_named("w:style")
        .find(|s| s.attr("w:styleId") == Some("Heading2"))
        .unwrap();
    assert_eq!(h2.descendants("w:color")[0].attr("w:val"), Some("C80A0A"));
    assert_eq!(
        h2.descendants("w:rFonts")[0].attr("w:ascii"),
        Some("Georgia")
    );
}

#[test]
fn test_input_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let converter = Converter::with_backend(DocumentConfig::default(), MockPandoc::new());
    let err = converter
        .convert("missing.md", "out.docx", Some(dir.path()))
        .unwrap_err();
    assert!(matches!(err, Error::InputNotFound(_)));
    assert!(converter.backend().last_job().is_none());
}

#[test]
fn test_image_dir_created() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("report.md"), "# T\n").unwrap();
    convert(dir.path(), DocumentConfig::default());
    assert!(dir.path().join("img").is_dir());
}

/// Runs only where pandoc is installed.
#[test]
fn test_with_real_pandoc() {
    let Ok(backend) = PandocBackend::locate() else {
        return;
    };
    assert_eq!(backend.name(), "pandoc");

    let dir = setup(SAMPLE);
    write_png(&dir.path().join("img/chart.png"), 64, 64);
    let converter = Converter::with_backend(DocumentConfig::default(), backend);
    let report = converter
        .convert("report.md", "report.docx", Some(dir.path()))
        .unwrap();

    assert_eq!(report.stats.images_embedded, 1);
    assert_eq!(dir_entries(dir.path()), ["img", "report.docx", "report.md"]);
}

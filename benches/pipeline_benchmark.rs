//! Benchmarks for mdocx pre- and post-processing.
//!
//! Run with: cargo bench
//!
//! Post-processing runs over synthetic pandoc-shaped documents, so pandoc
//! is not needed.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use mdocx::docx::{Document, Package};
use mdocx::{DocumentConfig, PostProcessor};
use std::collections::VecDeque;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Creates Markdown with the given number of sections.
fn create_markdown(sections: usize) -> String {
    let mut content = String::from("# Benchmark Document\n\n");
    for i in 0..sections {
        content.push_str(&format!(
            "## Section {}\n\nSome body text for section {} with *emphasis*.\n\n![Figure {}](img/figure{}.png)\n\n| A | B |\n|---|---|\n| 1 | 2 |\n\n",
            i, i, i, i
        ));
    }
    content
}

fn paragraph(style: &str, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="{}"/></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>"#,
        style, text
    )
}

/// Creates a DOCX package laid out like pandoc output.
fn create_docx(sections: usize) -> Vec<u8> {
    let mut body = paragraph("Title", "Benchmark Document");
    for i in 0..sections {
        body.push_str(&paragraph("Heading1", &format!("Section {}", i)));
        body.push_str(&paragraph("BodyText", "Some body text."));
        body.push_str(&format!(
            "<w:tbl><w:tr><w:tc>{}</w:tc><w:tc>{}</w:tc></w:tr><w:tr><w:tc>{}</w:tc><w:tc>{}</w:tc></w:tr></w:tbl>",
            paragraph("Compact", "A"),
            paragraph("Compact", "B"),
            paragraph("Compact", "1"),
            paragraph("Compact", "2"),
        ));
    }

    let mut package = Package::new();
    package.set_part(
        "[Content_Types].xml",
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#.to_vec(),
    );
    package.set_part(
        "_rels/.rels",
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#.to_vec(),
    );
    package.set_part(
        "word/_rels/document.xml.rels",
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#.to_vec(),
    );
    package.set_part(
        "word/document.xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{}"><w:body>{}<w:sectPr/></w:body></w:document>"#,
            W_NS, body
        )
        .into_bytes(),
    );
    package.set_part(
        "word/styles.xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:styles xmlns:w="{}"><w:style w:type="paragraph" w:styleId="Normal"><w:name w:val="Normal"/></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style></w:styles>"#,
            W_NS
        )
        .into_bytes(),
    );
    package.to_bytes().expect("benchmark package serializes")
}

/// Benchmark Markdown pre-processing at various sizes.
fn bench_preprocess(c: &mut Criterion) {
    let mut group = c.benchmark_group("preprocess");

    for sections in [1, 10, 100].iter() {
        let markdown = create_markdown(*sections);

        group.bench_function(format!("{}_sections", sections), |b| {
            b.iter(|| mdocx::preprocess(black_box(&markdown)));
        });
    }

    group.finish();
}

/// Benchmark the post-processing passes at various sizes.
fn bench_postprocess(c: &mut Criterion) {
    let mut group = c.benchmark_group("postprocess");
    let config = DocumentConfig::default();
    let work_dir = std::env::temp_dir();

    for sections in [1, 10, 100].iter() {
        let data = create_docx(*sections);

        group.bench_function(format!("{}_sections", sections), |b| {
            b.iter_batched(
                || Document::from_bytes(&data).expect("benchmark document parses"),
                |mut doc| {
                    let processor = PostProcessor::new(&config, &work_dir);
                    let _ = processor.process(&mut doc, "Benchmark Document", VecDeque::new());
                    let _ = doc.to_bytes();
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark builder pattern overhead.
fn bench_builder_creation(c: &mut Criterion) {
    c.bench_function("builder_creation", |b| {
        b.iter(|| {
            let _config = mdocx::Mdocx::with_style(mdocx::DocumentStyle::Report)
                .with_paper_size(mdocx::PaperSize::A4)
                .with_author("Bench")
                .config();
        });
    });
}

criterion_group!(
    benches,
    bench_preprocess,
    bench_postprocess,
    bench_builder_creation,
);
criterion_main!(benches);

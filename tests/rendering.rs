use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::NaiveDate;
use genpdf::elements::Paragraph;
use image::{ImageBuffer, Rgb};
use portfolio_report::builder::DocumentBuilder;
use portfolio_report::composer::{gallery_image_bounds, main_image_bounds, BULLET};
use portfolio_report::decorator::OverlayTemplate;
use portfolio_report::fonts;
use portfolio_report::model::{ContentBlock, Dimensions, Figure};
use portfolio_report::record::{DEFAULT_FEATURES, DEFAULT_TITLE};
use portfolio_report::{PortfolioData, ReportConfig, ReportGenerator};
use sha2::{Digest, Sha256};
use tempfile::TempDir;

const SKIP_REASON: &str =
    "fonts missing. Set PORTFOLIO_FONTS_DIR or copy assets/fonts next to the binary.";

fn generated_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 15).expect("valid date")
}

fn generator_without_images() -> ReportGenerator {
    ReportGenerator::new(
        ReportConfig::default()
            .with_main_images(Vec::<PathBuf>::new())
            .with_gallery_images(Vec::<PathBuf>::new()),
    )
}

fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let buffer = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    buffer.save(&path).expect("write png fixture");
    path
}

fn figures(blocks: &[ContentBlock]) -> Vec<&Figure> {
    blocks
        .iter()
        .flat_map(|block| match block {
            ContentBlock::Figure(figure) => vec![figure],
            ContentBlock::ImageRow(cells) => cells.iter().collect(),
            _ => Vec::new(),
        })
        .collect()
}

fn assert_close(actual: Dimensions, expected: Dimensions) {
    assert!(
        (actual.width - expected.width).abs() < 1e-6
            && (actual.height - expected.height).abs() < 1e-6,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

const VOLATILE_MARKERS: &[(&[u8], &[u8])] = &[
    (b"/CreationDate(", b")"),
    (b"/ModDate(", b")"),
    (b"/ID[", b"]"),
    (b"/Producer(", b")"),
    (b"<xmp:CreateDate>", b"</xmp:CreateDate>"),
    (b"<xmp:ModifyDate>", b"</xmp:ModifyDate>"),
    (b"<xmp:MetadataDate>", b"</xmp:MetadataDate>"),
    (b"<xmpMM:DocumentID>", b"</xmpMM:DocumentID>"),
    (b"<xmpMM:InstanceID>", b"</xmpMM:InstanceID>"),
    (b"<xmpMM:VersionID>", b"</xmpMM:VersionID>"),
];

/// Blanks out the metadata printpdf derives from the clock or a random source.
fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn blank_between(data: &mut [u8], open: &[u8], close: &[u8]) {
        let mut offset = 0;
        while let Some(found) = find(&data[offset..], open) {
            let start = offset + found + open.len();
            let Some(length) = find(&data[start..], close) else {
                break;
            };
            for byte in &mut data[start..start + length] {
                if !matches!(*byte, b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                    *byte = b'0';
                }
            }
            offset = start + length + close.len();
        }
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack
            .windows(needle.len())
            .position(|window| window == needle)
    }

    let mut normalized = bytes.to_vec();
    for (open, close) in VOLATILE_MARKERS {
        blank_between(&mut normalized, open, close);
    }
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(scrub_pdf(bytes)).into()
}

#[test]
fn default_report_is_a_pdf() {
    if !fonts::default_fonts_available() {
        eprintln!("Skipping default_report_is_a_pdf: {}", SKIP_REASON);
        return;
    }

    let report = ReportGenerator::default()
        .generate_on(None, generated_on())
        .expect("render default report");
    assert!(report.bytes.starts_with(b"%PDF-"));
    assert!(!report.is_empty());
}

#[test]
fn every_page_gets_an_overlay() {
    if !fonts::default_fonts_available() {
        eprintln!("Skipping every_page_gets_an_overlay: {}", SKIP_REASON);
        return;
    }

    let pages = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&pages);
    let template = OverlayTemplate::new("Studio", generated_on());
    let mut document = DocumentBuilder::new()
        .with_overlay(move |page| {
            seen.borrow_mut().push(page);
            template.overlay(page)
        })
        .build()
        .expect("build document");
    for index in 0..150 {
        document.push(Paragraph::new(format!("Line {}", index)));
    }

    let mut bytes = Vec::new();
    document.render(&mut bytes).expect("render multi-page document");
    assert!(bytes.starts_with(b"%PDF-"));

    let pages = pages.borrow();
    assert!(pages.len() >= 2, "expected several pages, got {:?}", pages);
    assert_eq!(pages[..2], [1, 2]);
}

#[test]
fn long_report_renders_across_pages() {
    if !fonts::default_fonts_available() {
        eprintln!("Skipping long_report_renders_across_pages: {}", SKIP_REASON);
        return;
    }

    let data = PortfolioData {
        features: Some((1..=120).map(|n| format!("Feature {}", n)).collect()),
        ..PortfolioData::default()
    };
    let report = ReportGenerator::default()
        .generate_on(Some(&data), generated_on())
        .expect("render long report");
    assert!(report.bytes.starts_with(b"%PDF-"));
}

#[test]
fn rendering_is_deterministic() {
    if !fonts::default_fonts_available() {
        eprintln!("Skipping rendering_is_deterministic: {}", SKIP_REASON);
        return;
    }

    let generator = generator_without_images();
    let data = PortfolioData {
        title: Some("Inventory Tracker".into()),
        ..PortfolioData::default()
    };
    let first = generator
        .generate_on(Some(&data), generated_on())
        .expect("first render");
    let second = generator
        .generate_on(Some(&data), generated_on())
        .expect("second render");

    assert_eq!(first.len(), second.len(), "PDF sizes should match");
    assert_eq!(
        normalized_hash(&first.bytes),
        normalized_hash(&second.bytes),
        "PDF renders must be deterministic after metadata normalization"
    );
}

#[test]
fn empty_record_composes_every_default() {
    let blocks = generator_without_images().compose(Some(&PortfolioData::default()));
    let texts: Vec<&str> = blocks.iter().filter_map(ContentBlock::text).collect();

    assert!(texts.contains(&DEFAULT_TITLE));
    assert!(texts.contains(&"Angular, Express.js, PostgreSQL, GraphQL, Firebase"));

    let bullets: Vec<&str> = texts
        .iter()
        .filter_map(|text| text.strip_prefix(BULLET))
        .collect();
    assert_eq!(bullets, DEFAULT_FEATURES);
}

#[test]
fn features_keep_their_order() {
    let data = PortfolioData::from_json(r#"{"features": ["Zeta", "Alpha", "Mu"], "extra": 1}"#)
        .expect("valid json");
    let blocks = generator_without_images().compose(Some(&data));

    let bullets: Vec<&str> = blocks
        .iter()
        .filter_map(ContentBlock::text)
        .filter_map(|text| text.strip_prefix(BULLET))
        .collect();
    assert_eq!(bullets, vec!["Zeta", "Alpha", "Mu"]);
}

#[test]
fn missing_images_become_slot_sized_placeholders() {
    let dir = TempDir::new().expect("tempdir");
    let generator = ReportGenerator::new(
        ReportConfig::default()
            .with_image_root(dir.path())
            .with_main_images(["missing-main.webp"])
            .with_gallery_images(["missing-1.webp", "missing-2.webp", "missing-3.webp"]),
    );

    let blocks = generator.compose(None);
    let figures = figures(&blocks);
    assert_eq!(figures.len(), 4);

    let main = figures[0].placeholder().expect("main placeholder");
    assert_eq!(main.label, "Portfolio Image");
    assert_close(main.size, main_image_bounds());

    for figure in &figures[1..] {
        assert_close(
            figure.placeholder().expect("gallery placeholder").size,
            gallery_image_bounds(),
        );
    }

    let rows: Vec<usize> = blocks
        .iter()
        .filter_map(|block| match block {
            ContentBlock::ImageRow(cells) => Some(cells.len()),
            _ => None,
        })
        .collect();
    assert_eq!(rows, vec![2, 1]);
}

#[test]
fn images_are_fitted_into_their_slots() {
    let dir = TempDir::new().expect("tempdir");
    write_png(dir.path(), "wide.png", 800, 400);
    write_png(dir.path(), "small.png", 100, 50);

    let generator = ReportGenerator::new(
        ReportConfig::default()
            .with_image_root(dir.path())
            .with_main_images(["wide.png"])
            .with_gallery_images(["wide.png", "small.png"]),
    );
    let blocks = generator.compose(None);
    let figures = figures(&blocks);

    // 800x400pt fitted width-first into 5in x 3.5in
    assert_close(figures[0].size(), Dimensions::from_inches(5.0, 2.5));
    assert_close(figures[1].size(), Dimensions::from_inches(2.5, 1.25));
    // smaller than the slot, kept at natural size
    assert_close(figures[2].size(), Dimensions::from_inches(100.0 / 72.0, 50.0 / 72.0));
    assert!(figures.iter().all(|figure| figure.placeholder().is_none()));
}

#[test]
fn report_with_real_images_renders() {
    if !fonts::default_fonts_available() {
        eprintln!("Skipping report_with_real_images_renders: {}", SKIP_REASON);
        return;
    }

    let dir = TempDir::new().expect("tempdir");
    for (name, width, height) in [
        ("main-1.png", 640, 480),
        ("main-2.png", 300, 600),
        ("gallery-1.png", 400, 300),
        ("gallery-2.png", 200, 200),
        ("gallery-3.png", 500, 250),
    ] {
        write_png(dir.path(), name, width, height);
    }

    let generator = ReportGenerator::new(
        ReportConfig::default()
            .with_image_root(dir.path())
            .with_main_images(["main-1.png", "main-2.png", "missing.png"])
            .with_gallery_images(["gallery-1.png", "gallery-2.png", "gallery-3.png"]),
    );
    let report = generator
        .generate_on(None, generated_on())
        .expect("render report with images");
    assert!(report.bytes.starts_with(b"%PDF-"));
}

//! End-to-end pipeline tests for pdf2text.
//!
//! These tests drive the full orchestrator through stub implementations of
//! the external-tool traits, so they run everywhere — no poppler, no
//! tesseract, no fixture PDFs. The capability interfaces exist precisely so
//! that the decision logic (classification, routing, isolation, cleaning)
//! can be exercised without spawning a single process.

use async_trait::async_trait;
use pdf2text::tools::{OcrEngine, PageImage, Rasterizer, TextLayerTool, ToolError};
use pdf2text::{extract, extract_to_file, ExtractionConfig, ExtractionMethod};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;

// ── Stub tools ───────────────────────────────────────────────────────────────

/// Text-layer stub returning a fixed string, counting invocations.
struct StubTextLayer {
    text: String,
    calls: AtomicUsize,
}

impl StubTextLayer {
    fn new(text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            text: text.into(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl TextLayerTool for StubTextLayer {
    async fn extract(
        &self,
        _pdf: &Path,
        _last_page: Option<u32>,
        _timeout: Duration,
    ) -> Result<String, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.clone())
    }
}

/// Rasteriser stub producing `pages` tiny fake page images.
struct StubRasterizer {
    pages: usize,
}

#[async_trait]
impl Rasterizer for StubRasterizer {
    async fn rasterize(&self, _pdf: &Path, _dpi: u32) -> Result<Vec<PageImage>, ToolError> {
        Ok((1..=self.pages)
            .map(|number| PageImage {
                number,
                png: vec![0u8; 8],
            })
            .collect())
    }
}

/// Rasteriser stub that fails for the whole document.
struct FailingRasterizer;

#[async_trait]
impl Rasterizer for FailingRasterizer {
    async fn rasterize(&self, _pdf: &Path, _dpi: u32) -> Result<Vec<PageImage>, ToolError> {
        Err(ToolError::Failed {
            tool: "pdftoppm",
            stderr: "corrupt xref table".into(),
        })
    }
}

/// OCR stub: recognises "Recognized text for page N", failing on the listed
/// page numbers.
struct StubOcr {
    fail_pages: Vec<usize>,
}

impl StubOcr {
    fn flawless() -> Arc<Self> {
        Arc::new(Self { fail_pages: vec![] })
    }

    fn failing_on(pages: &[usize]) -> Arc<Self> {
        Arc::new(Self {
            fail_pages: pages.to_vec(),
        })
    }
}

#[async_trait]
impl OcrEngine for StubOcr {
    async fn recognize(&self, image: &PageImage) -> Result<String, ToolError> {
        if self.fail_pages.contains(&image.number) {
            Err(ToolError::Failed {
                tool: "tesseract",
                stderr: "empty page".into(),
            })
        } else {
            Ok(format!("Recognized text for page {}", image.number))
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// A minimal on-disk file that passes the `%PDF` magic check.
fn fake_pdf() -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("tempfile");
    f.write_all(b"%PDF-1.4\n% fake body for tests\n").unwrap();
    f
}

fn ten_words() -> &'static str {
    "one two three four five six seven eight nine ten"
}

fn many_words(n: usize) -> String {
    vec!["word"; n].join(" ")
}

// ── Routing ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn sparse_text_layer_routes_to_ocr() {
    // A document whose first pages yield only 10 words is image-based and
    // must go through OCR, no force flag needed.
    let pdf = fake_pdf();
    let config = ExtractionConfig::builder()
        .text_tool(StubTextLayer::new(ten_words()))
        .rasterizer(Arc::new(StubRasterizer { pages: 2 }))
        .ocr_engine(StubOcr::flawless())
        .build()
        .unwrap();

    let output = extract(pdf.path(), &config).await.unwrap();
    assert_eq!(output.method, ExtractionMethod::Ocr);
    assert_eq!(output.stats.ocr_pages, 2);
    assert!(output.text.contains("Recognized text for page 1"));
    assert!(output.text.contains("Recognized text for page 2"));
}

#[tokio::test]
async fn rich_text_layer_routes_to_text_extraction() {
    let pdf = fake_pdf();
    let config = ExtractionConfig::builder()
        .text_tool(StubTextLayer::new(many_words(200)))
        .rasterizer(Arc::new(FailingRasterizer)) // must never be reached
        .ocr_engine(StubOcr::flawless())
        .build()
        .unwrap();

    let output = extract(pdf.path(), &config).await.unwrap();
    assert_eq!(output.method, ExtractionMethod::TextLayer);
    assert_eq!(output.stats.ocr_pages, 0);
    assert!(output.pages.is_empty());
    assert_eq!(output.stats.words, 200);
}

#[tokio::test]
async fn exactly_fifty_words_is_image_based() {
    // Boundary: the comparison is strictly greater-than.
    let pdf = fake_pdf();
    let config = ExtractionConfig::builder()
        .text_tool(StubTextLayer::new(many_words(50)))
        .rasterizer(Arc::new(StubRasterizer { pages: 1 }))
        .ocr_engine(StubOcr::flawless())
        .build()
        .unwrap();

    let output = extract(pdf.path(), &config).await.unwrap();
    assert_eq!(output.method, ExtractionMethod::Ocr);
}

#[tokio::test]
async fn force_ocr_never_invokes_classifier() {
    let pdf = fake_pdf();
    // Clearly text-bearing document, but --force-ocr must win without the
    // classifier ever sampling it.
    let text_tool = StubTextLayer::new(many_words(500));
    let config = ExtractionConfig::builder()
        .method(ExtractionMethod::Ocr)
        .text_tool(text_tool.clone())
        .rasterizer(Arc::new(StubRasterizer { pages: 3 }))
        .ocr_engine(StubOcr::flawless())
        .build()
        .unwrap();

    let output = extract(pdf.path(), &config).await.unwrap();
    assert_eq!(output.method, ExtractionMethod::Ocr);
    assert_eq!(text_tool.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn force_text_skips_classifier_and_ocr() {
    let pdf = fake_pdf();
    let text_tool = StubTextLayer::new("Full document text layer.");
    let config = ExtractionConfig::builder()
        .method(ExtractionMethod::TextLayer)
        .text_tool(text_tool.clone())
        .rasterizer(Arc::new(FailingRasterizer))
        .ocr_engine(StubOcr::flawless())
        .build()
        .unwrap();

    let output = extract(pdf.path(), &config).await.unwrap();
    assert_eq!(output.method, ExtractionMethod::TextLayer);
    // Exactly one text-layer call: the full extraction, no sampling call.
    assert_eq!(text_tool.calls.load(Ordering::SeqCst), 1);
    assert_eq!(output.text, "Full document text layer.");
}

// ── Per-page failure isolation ───────────────────────────────────────────────

#[tokio::test]
async fn single_page_failure_is_isolated() {
    let pdf = fake_pdf();
    let config = ExtractionConfig::builder()
        .method(ExtractionMethod::Ocr)
        .rasterizer(Arc::new(StubRasterizer { pages: 3 }))
        .ocr_engine(StubOcr::failing_on(&[2]))
        .clean(false)
        .build()
        .unwrap();

    let output = extract(pdf.path(), &config).await.unwrap();
    assert_eq!(
        output.text,
        "Recognized text for page 1\n\n[OCR ERROR on page 2]\n\nRecognized text for page 3"
    );
    assert_eq!(output.stats.ocr_pages, 3);
    assert_eq!(output.stats.failed_pages, 1);
    assert!(output.pages[1].error.is_some());
}

#[tokio::test]
async fn rasterizer_failure_is_fatal() {
    let pdf = fake_pdf();
    let config = ExtractionConfig::builder()
        .method(ExtractionMethod::Ocr)
        .rasterizer(Arc::new(FailingRasterizer))
        .ocr_engine(StubOcr::flawless())
        .build()
        .unwrap();

    let err = extract(pdf.path(), &config).await.unwrap_err();
    assert!(err.to_string().contains("Rasterisation failed"));
}

// ── Cleaning integration ─────────────────────────────────────────────────────

#[tokio::test]
async fn boilerplate_is_cleaned_by_default() {
    let pdf = fake_pdf();
    let raw = "Title line with enough words to look like content\n\
               Copyright © 2020 Some Press\n\
               42\n\
               Real content here.";
    let config = ExtractionConfig::builder()
        .method(ExtractionMethod::TextLayer)
        .text_tool(StubTextLayer::new(raw))
        .build()
        .unwrap();

    let output = extract(pdf.path(), &config).await.unwrap();
    assert!(!output.text.contains("Copyright"));
    assert!(!output.text.contains("\n42"));
    assert!(output.text.contains("Real content here."));
}

#[tokio::test]
async fn no_clean_keeps_boilerplate() {
    let pdf = fake_pdf();
    let raw = "Copyright © 2020 Some Press\nReal content here.";
    let config = ExtractionConfig::builder()
        .method(ExtractionMethod::TextLayer)
        .text_tool(StubTextLayer::new(raw))
        .clean(false)
        .build()
        .unwrap();

    let output = extract(pdf.path(), &config).await.unwrap();
    assert_eq!(output.text, raw);
}

#[tokio::test]
async fn custom_patterns_reach_the_filter() {
    let pdf = fake_pdf();
    let raw = "JOURNAL OF EXAMPLES vol 3\nActual sentence.";
    let config = ExtractionConfig::builder()
        .method(ExtractionMethod::TextLayer)
        .text_tool(StubTextLayer::new(raw))
        .extra_patterns(["JOURNAL OF EXAMPLES"])
        .build()
        .unwrap();

    let output = extract(pdf.path(), &config).await.unwrap();
    assert_eq!(output.text, "Actual sentence.");
}

#[tokio::test]
async fn invalid_custom_pattern_fails_before_extraction() {
    let pdf = fake_pdf();
    let text_tool = StubTextLayer::new("whatever");
    let config = ExtractionConfig::builder()
        .method(ExtractionMethod::TextLayer)
        .text_tool(text_tool.clone())
        .extra_patterns(["(unclosed"])
        .build()
        .unwrap();

    let err = extract(pdf.path(), &config).await.unwrap_err();
    assert!(err.to_string().contains("Invalid configuration"));
    assert_eq!(text_tool.calls.load(Ordering::SeqCst), 0);
}

// ── Stats and file output ────────────────────────────────────────────────────

#[tokio::test]
async fn stats_reflect_final_text() {
    let pdf = fake_pdf();
    let config = ExtractionConfig::builder()
        .method(ExtractionMethod::TextLayer)
        .text_tool(StubTextLayer::new("alpha beta\ngamma delta epsilon"))
        .clean(false)
        .build()
        .unwrap();

    let output = extract(pdf.path(), &config).await.unwrap();
    assert_eq!(output.stats.lines, 2);
    assert_eq!(output.stats.words, 5);
}

#[tokio::test]
async fn extract_to_file_writes_utf8_text() {
    let pdf = fake_pdf();
    let out_dir = tempfile::tempdir().unwrap();
    let out_path = out_dir.path().join("result.txt");

    let config = ExtractionConfig::builder()
        .method(ExtractionMethod::TextLayer)
        .text_tool(StubTextLayer::new("héllo — wörld"))
        .clean(false)
        .build()
        .unwrap();

    let stats = extract_to_file(pdf.path(), &out_path, &config)
        .await
        .unwrap();
    assert_eq!(stats.words, 3);

    let written = std::fs::read_to_string(&out_path).unwrap();
    assert_eq!(written, "héllo — wörld");
}

#[tokio::test]
async fn missing_input_is_fatal() {
    let config = ExtractionConfig::default();
    let err = extract("/definitely/not/a/real/file.pdf", &config)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not found"));
}

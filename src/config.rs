//! Configuration types for PDF text extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs, serialise the plain fields for logging, and
//! diff two runs to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A dozen-field constructor is unreadable and breaks on every new field.
//! The builder pattern lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::error::ExtractError;
use crate::progress::ProgressCallback;
use crate::tools::{OcrEngine, Rasterizer, TextLayerTool};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Configuration for a PDF text extraction run.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2text::{ExtractionConfig, ExtractionMethod};
///
/// let config = ExtractionConfig::builder()
///     .dpi(300)
///     .method(ExtractionMethod::Ocr)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Rasterisation DPI for the OCR path. Range: 72–600. Default: 400.
    ///
    /// 400 DPI is deliberately generous: OCR accuracy on small print keeps
    /// improving up to roughly this density, and the page images are
    /// short-lived so the extra pixels cost memory only transiently. Drop to
    /// 300 for faster runs on clean scans.
    pub dpi: u32,

    /// Forced extraction method. Default: `None` (classify automatically).
    ///
    /// When set, the classifier is never invoked and exactly this method
    /// runs. The method is decided once, before any extraction work, and is
    /// never revisited mid-document.
    pub method: Option<ExtractionMethod>,

    /// Run the boilerplate filter on the extracted text. Default: true.
    pub clean: bool,

    /// Additional removal patterns, appended after the built-in rules.
    ///
    /// Each entry is a regex fragment matched case-insensitively from the
    /// start of the whitespace-stripped line, with the same removal
    /// authority as the built-ins. An invalid fragment fails the run with
    /// [`ExtractError::InvalidConfig`] before any extraction work starts.
    pub extra_patterns: Vec<String>,

    /// OCR recognition language. Default: "eng".
    pub language: String,

    /// Pages sampled by the classifier. Default: 2.
    ///
    /// Sampling a short prefix instead of the whole document keeps
    /// classification cheap on large scanned files where a full text-layer
    /// pass would be wasted work.
    pub sample_pages: u32,

    /// Word-count threshold for the text-bearing decision. Default: 50.
    ///
    /// Scanned PDFs sometimes carry a thin embedded OCR layer or metadata
    /// yielding a handful of spurious words; 50 filters that noise while
    /// still accepting short but genuine text pages. The comparison is
    /// strict: exactly 50 words classifies as image-based.
    pub min_text_words: usize,

    /// Timeout for the classifier's sampling call, in seconds. Default: 30.
    ///
    /// Exceeding it is treated as a classification failure, which routes the
    /// document to OCR rather than surfacing an error.
    pub classify_timeout_secs: u64,

    /// Timeout for the full-document text-layer extraction, in seconds.
    /// Default: 120.
    ///
    /// Generous for large documents. Unlike the sampling call, exceeding
    /// this one is fatal: at this stage OCR is not an automatic fallback.
    pub extract_timeout_secs: u64,

    /// Text-layer tool override. Default: `pdftotext` via [`crate::tools::PdfToText`].
    ///
    /// Primarily a test seam: inject a stub so suites never spawn a real
    /// process.
    pub text_tool: Option<Arc<dyn TextLayerTool>>,

    /// Rasteriser override. Default: `pdftoppm` via [`crate::tools::PdfToPpm`].
    pub rasterizer: Option<Arc<dyn Rasterizer>>,

    /// OCR engine override. Default: `tesseract` via [`crate::tools::Tesseract`].
    pub ocr_engine: Option<Arc<dyn OcrEngine>>,

    /// Per-page progress callback for the OCR path.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            dpi: 400,
            method: None,
            clean: true,
            extra_patterns: Vec::new(),
            language: "eng".to_string(),
            sample_pages: 2,
            min_text_words: 50,
            classify_timeout_secs: 30,
            extract_timeout_secs: 120,
            text_tool: None,
            rasterizer: None,
            ocr_engine: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("dpi", &self.dpi)
            .field("method", &self.method)
            .field("clean", &self.clean)
            .field("extra_patterns", &self.extra_patterns)
            .field("language", &self.language)
            .field("sample_pages", &self.sample_pages)
            .field("min_text_words", &self.min_text_words)
            .field("classify_timeout_secs", &self.classify_timeout_secs)
            .field("extract_timeout_secs", &self.extract_timeout_secs)
            .field("text_tool", &self.text_tool.as_ref().map(|_| "<dyn TextLayerTool>"))
            .field("rasterizer", &self.rasterizer.as_ref().map(|_| "<dyn Rasterizer>"))
            .field("ocr_engine", &self.ocr_engine.as_ref().map(|_| "<dyn OcrEngine>"))
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 600);
        self
    }

    pub fn method(mut self, method: ExtractionMethod) -> Self {
        self.config.method = Some(method);
        self
    }

    pub fn clean(mut self, v: bool) -> Self {
        self.config.clean = v;
        self
    }

    pub fn extra_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .extra_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn language(mut self, lang: impl Into<String>) -> Self {
        self.config.language = lang.into();
        self
    }

    pub fn sample_pages(mut self, pages: u32) -> Self {
        self.config.sample_pages = pages.max(1);
        self
    }

    pub fn min_text_words(mut self, words: usize) -> Self {
        self.config.min_text_words = words;
        self
    }

    pub fn classify_timeout_secs(mut self, secs: u64) -> Self {
        self.config.classify_timeout_secs = secs;
        self
    }

    pub fn extract_timeout_secs(mut self, secs: u64) -> Self {
        self.config.extract_timeout_secs = secs;
        self
    }

    pub fn text_tool(mut self, tool: Arc<dyn TextLayerTool>) -> Self {
        self.config.text_tool = Some(tool);
        self
    }

    pub fn rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> Self {
        self.config.rasterizer = Some(rasterizer);
        self
    }

    pub fn ocr_engine(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.config.ocr_engine = Some(engine);
        self
    }

    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.config.progress_callback = Some(callback);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 600 {
            return Err(ExtractError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        if c.language.is_empty() {
            return Err(ExtractError::InvalidConfig(
                "OCR language must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How text is pulled out of the document.
///
/// Decided exactly once per run — either forced by the caller or derived
/// from the classifier — and never changed mid-document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionMethod {
    /// Read the embedded text layer directly (`pdftotext`-style).
    TextLayer,
    /// Rasterise each page and run optical character recognition.
    Ocr,
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionMethod::TextLayer => write!(f, "text-layer"),
            ExtractionMethod::Ocr => write!(f, "ocr"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = ExtractionConfig::default();
        assert_eq!(c.dpi, 400);
        assert_eq!(c.sample_pages, 2);
        assert_eq!(c.min_text_words, 50);
        assert_eq!(c.classify_timeout_secs, 30);
        assert_eq!(c.extract_timeout_secs, 120);
        assert_eq!(c.language, "eng");
        assert!(c.clean);
        assert!(c.method.is_none());
    }

    #[test]
    fn builder_clamps_dpi() {
        let c = ExtractionConfig::builder().dpi(10_000).build().unwrap();
        assert_eq!(c.dpi, 600);
        let c = ExtractionConfig::builder().dpi(1).build().unwrap();
        assert_eq!(c.dpi, 72);
    }

    #[test]
    fn builder_rejects_empty_language() {
        let err = ExtractionConfig::builder().language("").build();
        assert!(matches!(err, Err(ExtractError::InvalidConfig(_))));
    }

    #[test]
    fn method_display() {
        assert_eq!(ExtractionMethod::TextLayer.to_string(), "text-layer");
        assert_eq!(ExtractionMethod::Ocr.to_string(), "ocr");
    }

    #[test]
    fn extra_patterns_accumulate() {
        let c = ExtractionConfig::builder()
            .extra_patterns(["FIRST HEADER"])
            .extra_patterns(vec!["SECOND".to_string()])
            .build()
            .unwrap();
        assert_eq!(c.extra_patterns, vec!["FIRST HEADER", "SECOND"]);
    }
}

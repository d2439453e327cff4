//! Error types for the pdf2text library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ExtractError`] — **Fatal**: the extraction cannot proceed at all
//!   (missing input, missing external tools, text-layer tool failure).
//!   Returned as `Err(ExtractError)` from the top-level `extract*` functions.
//!
//! * [`PageError`] — **Non-fatal**: OCR failed on a single page but all other
//!   pages are fine. Stored inside [`crate::output::PageResult`] so the run
//!   completes with a visible placeholder rather than losing the whole
//!   document to one bad page.
//!
//! Classification failures are a third category that never surfaces here at
//! all: a failed sampling call simply routes the document to OCR (see
//! [`crate::pipeline::classify`]).

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2text library.
///
/// Per-page OCR failures use [`PageError`] and are stored in
/// [`crate::output::PageResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Environment errors ────────────────────────────────────────────────
    /// One or more required external tools are absent from PATH.
    #[error(
        "Missing dependencies: {}\n\nInstall with:\n  sudo apt install tesseract-ocr poppler-utils",
        .tools.join(", ")
    )]
    MissingDependencies { tools: Vec<String> },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The text-layer tool failed on the full-document extraction.
    ///
    /// Fatal: once the text-layer method has been chosen (or forced), OCR is
    /// not an automatic fallback.
    #[error("Text-layer extraction failed: {detail}")]
    TextLayerFailed { detail: String },

    /// The full-document text-layer call exceeded its timeout.
    #[error("Text-layer extraction timed out after {secs}s\nVery large documents may need --force-ocr instead.")]
    TextLayerTimeout { secs: u64 },

    /// Rasterisation of the document into page images failed.
    ///
    /// The rasteriser fails per document, not per page, so this aborts the
    /// OCR path entirely.
    #[error("Rasterisation failed: {detail}")]
    RasterizationFailed { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output text file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed or a caller-supplied removal pattern did not compile.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single OCR page.
///
/// Stored alongside [`crate::output::PageResult`] when a page fails. The
/// overall extraction continues; the failed page is rendered as the literal
/// placeholder `[OCR ERROR on page N]` at assembly time so the page count
/// and ordering stay intact.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// The OCR engine failed on this page.
    #[error("Page {page}: OCR failed: {detail}")]
    OcrFailed { page: usize, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dependencies_lists_tools() {
        let e = ExtractError::MissingDependencies {
            tools: vec!["tesseract".into(), "pdftoppm".into()],
        };
        let msg = e.to_string();
        assert!(msg.contains("tesseract, pdftoppm"), "got: {msg}");
        assert!(msg.contains("apt install"));
    }

    #[test]
    fn text_layer_timeout_display() {
        let e = ExtractError::TextLayerTimeout { secs: 120 };
        assert!(e.to_string().contains("120s"));
    }

    #[test]
    fn page_error_display() {
        let e = PageError::OcrFailed {
            page: 3,
            detail: "engine crashed".into(),
        };
        assert!(e.to_string().contains("Page 3"));
        assert!(e.to_string().contains("engine crashed"));
    }

    #[test]
    fn not_a_pdf_display() {
        let e = ExtractError::NotAPdf {
            path: PathBuf::from("/tmp/x.pdf"),
            magic: *b"PK\x03\x04",
        };
        assert!(e.to_string().contains("not a valid PDF"));
    }
}

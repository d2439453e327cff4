//! Output types: the extracted text plus per-page results and summary stats.

use crate::config::ExtractionMethod;
use crate::error::PageError;
use serde::{Deserialize, Serialize};

/// The result of OCR on a single page.
///
/// A failed page keeps its slot: `text` is empty and `error` records what
/// went wrong, so the assembled document can render the
/// `[OCR ERROR on page N]` placeholder in the right position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-indexed page number.
    pub page_num: usize,
    /// Recognised text; empty when `error` is set.
    pub text: String,
    /// Wall-clock OCR time for this page.
    pub duration_ms: u64,
    /// Set when OCR failed on this page. Never aborts the run.
    pub error: Option<PageError>,
}

/// Summary statistics for one extraction run.
///
/// Informational only: `lines` and `words` are computed from the final
/// emitted text, after cleaning if cleaning ran.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// The method that actually ran.
    pub method: ExtractionMethod,
    /// Pages processed by the OCR path; 0 on the text-layer path.
    pub ocr_pages: usize,
    /// Pages that failed OCR and were replaced by a placeholder.
    pub failed_pages: usize,
    /// Line count of the final text.
    pub lines: usize,
    /// Whitespace-delimited word count of the final text.
    pub words: usize,
    /// Total wall-clock time for the run.
    pub total_duration_ms: u64,
}

/// Complete result of [`crate::extract::extract`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// The final text, cleaned unless cleaning was disabled.
    pub text: String,
    /// The extraction method that ran.
    pub method: ExtractionMethod,
    /// Per-page OCR results, in page order. Empty on the text-layer path.
    pub pages: Vec<PageResult>,
    /// Summary statistics.
    pub stats: ExtractionStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_serialise_with_kebab_case_method() {
        let stats = ExtractionStats {
            method: ExtractionMethod::TextLayer,
            ocr_pages: 0,
            failed_pages: 0,
            lines: 10,
            words: 42,
            total_duration_ms: 7,
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"text-layer\""), "got: {json}");
    }
}

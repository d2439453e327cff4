//! Extraction-method classification: does the PDF carry a usable text layer?
//!
//! ## Why sample instead of extracting everything?
//!
//! Classification only needs to know whether *any* substantial text layer
//! exists, and the answer is already present in the first couple of pages.
//! A full text-layer pass over a 600-page scanned document would be pure
//! waste, so the sampling call is limited to a short page prefix and a tight
//! timeout.
//!
//! ## Why fail toward OCR?
//!
//! OCR works on every PDF, text-bearing or not; the text layer only works on
//! some. When the sampling call fails — missing tool, corrupt file, timeout —
//! the safe answer is "not text-bearing", which routes the document to the
//! universally applicable method instead of surfacing an error the caller
//! can do nothing about.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::ExtractionConfig;
use crate::tools::TextLayerTool;

/// Decide whether the document is text-bearing.
///
/// Samples the text layer of the first `config.sample_pages` pages and
/// counts whitespace-delimited words; the document is text-bearing iff the
/// count strictly exceeds `config.min_text_words`. Any failure of the
/// sampling call resolves to `false`.
pub async fn is_text_bearing(
    tool: &Arc<dyn TextLayerTool>,
    pdf: &Path,
    config: &ExtractionConfig,
) -> bool {
    let timeout = Duration::from_secs(config.classify_timeout_secs);

    match tool.extract(pdf, Some(config.sample_pages), timeout).await {
        Ok(sample) => {
            let words = sample.split_whitespace().count();
            debug!(
                "Sampled {} words from the first {} pages",
                words, config.sample_pages
            );
            words > config.min_text_words
        }
        Err(e) => {
            debug!("Text-layer sampling failed ({e}); treating document as image-based");
            false
        }
    }
}

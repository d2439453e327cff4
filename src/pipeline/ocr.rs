//! OCR extraction: rasterise every page, recognise each one independently.
//!
//! ## Failure isolation
//!
//! Rasterisation fails per document — if `pdftoppm` cannot process the file
//! there is nothing to recognise, so that error is fatal. Recognition fails
//! per page: one bad page must not throw away the other 300, so a page
//! failure is recorded as a tagged [`PageResult`] and the run continues.
//! The literal `[OCR ERROR on page N]` placeholder is rendered only at the
//! final join in [`join_pages`], keeping the isolation logic decoupled from
//! formatting.
//!
//! ## Memory
//!
//! The rasteriser materialises all page images before recognition starts
//! (one external call for the whole document), but each image is dropped as
//! soon as its text is obtained — pages are consumed in order, one at a
//! time, with no retention across pages.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::ExtractionConfig;
use crate::error::{ExtractError, PageError};
use crate::output::PageResult;
use crate::tools::{OcrEngine, Rasterizer};

/// Run the OCR path over the whole document.
///
/// Returns one [`PageResult`] per page, in page order, successful or not.
/// Only rasterisation errors abort the run.
pub async fn extract_ocr(
    rasterizer: &Arc<dyn Rasterizer>,
    engine: &Arc<dyn OcrEngine>,
    pdf: &Path,
    config: &ExtractionConfig,
) -> Result<Vec<PageResult>, ExtractError> {
    info!("Rasterising document at {} DPI", config.dpi);
    let images = rasterizer
        .rasterize(pdf, config.dpi)
        .await
        .map_err(|e| ExtractError::RasterizationFailed {
            detail: e.to_string(),
        })?;

    let total = images.len();
    info!("Processing {} pages", total);
    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_start(total);
    }

    let mut results = Vec::with_capacity(total);

    // `into_iter` so each image is dropped at the end of its iteration.
    for image in images {
        let page_num = image.number;
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page_num, total);
        }
        let start = Instant::now();

        match engine.recognize(&image).await {
            Ok(text) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                debug!("OCR page {page_num}/{total}: {} bytes in {duration_ms}ms", text.len());
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_complete(page_num, total, text.len());
                }
                results.push(PageResult {
                    page_num,
                    text,
                    duration_ms,
                    error: None,
                });
            }
            Err(e) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                warn!("OCR page {page_num}/{total} failed: {e}");
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_error(page_num, total, e.to_string());
                }
                results.push(PageResult {
                    page_num,
                    text: String::new(),
                    duration_ms,
                    error: Some(PageError::OcrFailed {
                        page: page_num,
                        detail: e.to_string(),
                    }),
                });
            }
        }
    }

    if let Some(ref cb) = config.progress_callback {
        let succeeded = results.iter().filter(|p| p.error.is_none()).count();
        cb.on_extraction_complete(total, succeeded);
    }

    Ok(results)
}

/// Assemble the per-page results into one document.
///
/// Pages are joined in page order with a blank-line separator (exactly one
/// blank line, i.e. two line breaks) that doubles as the page boundary
/// marker for downstream cleaning. Failed pages render as the literal
/// `[OCR ERROR on page N]` placeholder so the page count and ordering stay
/// visible in the output.
pub fn join_pages(pages: &[PageResult]) -> String {
    pages
        .iter()
        .map(|page| match page.error {
            None => page.text.clone(),
            Some(_) => format!("[OCR ERROR on page {}]", page.page_num),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

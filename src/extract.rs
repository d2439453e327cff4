//! Top-level extraction entry points.
//!
//! The orchestrator composes the pipeline stages: resolve the input, decide
//! the extraction method (forced or classified), run exactly one extractor,
//! optionally clean, and compute summary statistics. Each run is a pure
//! function of its inputs plus external-tool side effects — no state is
//! retained between invocations.

use crate::config::{ExtractionConfig, ExtractionMethod};
use crate::error::ExtractError;
use crate::output::{ExtractionOutput, ExtractionStats};
use crate::pipeline::{classify, clean::CleanRules, ocr, textlayer};
use crate::tools::{OcrEngine, PdfToPpm, PdfToText, Rasterizer, Tesseract, TextLayerTool};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Extract text from a PDF file.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input`  — Path to a local PDF file
/// * `config` — Extraction configuration
///
/// # Returns
/// `Ok(ExtractionOutput)` on success, even if some OCR pages failed
/// (check `output.stats.failed_pages`).
///
/// # Errors
/// Returns `Err(ExtractError)` only for fatal errors:
/// - File not found / permission denied / not a PDF
/// - Invalid removal pattern in the config
/// - Text-layer extraction failure or timeout (when that method runs)
/// - Rasterisation failure (when OCR runs)
pub async fn extract(
    input: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let total_start = Instant::now();
    let pdf = resolve_input(input.as_ref())?;
    info!("Starting extraction: {}", pdf.display());

    // Compile cleaning rules up front so a bad caller pattern fails before
    // any extraction work is spent.
    let rules = if config.clean {
        Some(CleanRules::new(&config.extra_patterns)?)
    } else {
        None
    };

    let text_tool = resolve_text_tool(config);

    // ── Decide the method once; it is never revisited mid-run ────────────
    let method = match config.method {
        Some(forced) => {
            info!("Extraction method forced: {forced}");
            forced
        }
        None => {
            if classify::is_text_bearing(&text_tool, &pdf, config).await {
                info!("Detected: text-based PDF");
                ExtractionMethod::TextLayer
            } else {
                info!("Detected: image-based (scanned) PDF");
                ExtractionMethod::Ocr
            }
        }
    };

    // ── Run exactly one extractor ────────────────────────────────────────
    let (raw, pages) = match method {
        ExtractionMethod::TextLayer => {
            let text = textlayer::extract_full(&text_tool, &pdf, config).await?;
            (text, Vec::new())
        }
        ExtractionMethod::Ocr => {
            let rasterizer = resolve_rasterizer(config);
            let engine = resolve_ocr_engine(config);
            let pages = ocr::extract_ocr(&rasterizer, &engine, &pdf, config).await?;
            (ocr::join_pages(&pages), pages)
        }
    };

    // ── Clean ────────────────────────────────────────────────────────────
    let text = match &rules {
        Some(rules) => {
            debug!("Cleaning headers/footers");
            rules.clean(&raw)
        }
        None => raw,
    };

    // ── Stats from the final emitted text ────────────────────────────────
    let failed_pages = pages.iter().filter(|p| p.error.is_some()).count();
    let stats = ExtractionStats {
        method,
        ocr_pages: pages.len(),
        failed_pages,
        lines: text.matches('\n').count() + 1,
        words: text.split_whitespace().count(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Extraction complete: {} lines, {} words, {}ms",
        stats.lines, stats.words, stats.total_duration_ms
    );

    Ok(ExtractionOutput {
        text,
        method,
        pages,
        stats,
    })
}

/// Extract a PDF and write the text directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files; the
/// output is UTF-8 and overwrites any existing file at `output_path`.
pub async fn extract_to_file(
    input: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionStats, ExtractError> {
    let output = extract(input, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ExtractError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                }
            })?;
        }
    }

    let tmp_path = path.with_extension("txt.tmp");
    tokio::fs::write(&tmp_path, &output.text)
        .await
        .map_err(|e| ExtractError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| ExtractError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output.stats)
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_sync(
    input: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ExtractError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(extract(input, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Validate the input path: it must exist, be readable, and carry the PDF
/// magic bytes.
fn resolve_input(path: &Path) -> Result<PathBuf, ExtractError> {
    if !path.exists() {
        return Err(ExtractError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(ExtractError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ExtractError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(ExtractError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    debug!("Resolved input PDF: {}", path.display());
    Ok(path.to_path_buf())
}

fn resolve_text_tool(config: &ExtractionConfig) -> Arc<dyn TextLayerTool> {
    config
        .text_tool
        .clone()
        .unwrap_or_else(|| Arc::new(PdfToText))
}

fn resolve_rasterizer(config: &ExtractionConfig) -> Arc<dyn Rasterizer> {
    config
        .rasterizer
        .clone()
        .unwrap_or_else(|| Arc::new(PdfToPpm))
}

fn resolve_ocr_engine(config: &ExtractionConfig) -> Arc<dyn OcrEngine> {
    config
        .ocr_engine
        .clone()
        .unwrap_or_else(|| Arc::new(Tesseract::new(&config.language)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_is_file_not_found() {
        let err = resolve_input(Path::new("/definitely/not/a/real/file.pdf")).unwrap_err();
        assert!(matches!(err, ExtractError::FileNotFound { .. }));
    }

    #[test]
    fn non_pdf_magic_is_rejected() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        use std::io::Write;
        tmp.write_all(b"PK\x03\x04 definitely a zip").unwrap();
        let err = resolve_input(tmp.path()).unwrap_err();
        assert!(matches!(err, ExtractError::NotAPdf { .. }));
    }

    #[test]
    fn pdf_magic_is_accepted() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        use std::io::Write;
        tmp.write_all(b"%PDF-1.4\nrest of file").unwrap();
        assert!(resolve_input(tmp.path()).is_ok());
    }
}

//! Capability interfaces over the external extraction tools.
//!
//! Each external binary is wrapped behind its own trait — [`TextLayerTool`]
//! for `pdftotext`, [`Rasterizer`] for `pdftoppm`, [`OcrEngine`] for
//! `tesseract` — so the pipeline never spawns a process directly and test
//! suites can substitute stubs via [`crate::config::ExtractionConfig`]
//! without any real binary installed.
//!
//! All invocations are blocking one-shot calls driven through
//! `tokio::process`; timeouts are plain `tokio::time::timeout` wrappers, and
//! a timed-out child is killed rather than left running (`kill_on_drop`).

use std::io::Cursor;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::ExtractError;

const PDFTOTEXT: &str = "pdftotext";
const PDFTOPPM: &str = "pdftoppm";
const TESSERACT: &str = "tesseract";

/// External tools that must be on PATH for the default pipeline.
const REQUIRED_TOOLS: [&str; 3] = [PDFTOTEXT, PDFTOPPM, TESSERACT];

/// Errors at the external-tool boundary.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The binary is not installed or not on PATH.
    #[error("external tool not found: {tool}")]
    NotFound { tool: &'static str },

    /// The tool ran but exited non-zero.
    #[error("{tool} failed: {stderr}")]
    Failed { tool: &'static str, stderr: String },

    /// The call exceeded its deadline. The child process is killed.
    #[error("{tool} timed out after {secs}s")]
    Timeout { tool: &'static str, secs: u64 },

    /// Spawning or talking to the child process failed.
    #[error("io error running {tool}: {source}")]
    Io {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// A single rasterised page held in memory.
///
/// Produced by a [`Rasterizer`], consumed by an [`OcrEngine`], and discarded
/// once the page's text is obtained.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// 1-indexed page number; page order always equals source order.
    pub number: usize,
    /// PNG-encoded raster data.
    pub png: Vec<u8>,
}

/// Pulls a document's embedded text layer verbatim, layout preserved.
#[async_trait]
pub trait TextLayerTool: Send + Sync {
    /// Extract the text layer of `pdf`.
    ///
    /// `last_page` restricts extraction to pages `1..=last_page`; `None`
    /// extracts the whole document. The call is abandoned (and the tool
    /// killed) after `timeout`.
    async fn extract(
        &self,
        pdf: &Path,
        last_page: Option<u32>,
        timeout: Duration,
    ) -> Result<String, ToolError>;
}

/// Turns a document into one image per page at a given resolution.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    /// Rasterise every page of `pdf` at `dpi`, in page order.
    ///
    /// Fails per document, never per page.
    async fn rasterize(&self, pdf: &Path, dpi: u32) -> Result<Vec<PageImage>, ToolError>;
}

/// Recognises the text on one page image.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Run OCR over a single page image and return its plain text.
    async fn recognize(&self, image: &PageImage) -> Result<String, ToolError>;
}

// ── Default implementations ─────────────────────────────────────────────────

/// `pdftotext` from poppler-utils, in layout-preserving mode.
pub struct PdfToText;

#[async_trait]
impl TextLayerTool for PdfToText {
    async fn extract(
        &self,
        pdf: &Path,
        last_page: Option<u32>,
        timeout: Duration,
    ) -> Result<String, ToolError> {
        let mut cmd = Command::new(PDFTOTEXT);
        cmd.args(["-layout", "-enc", "UTF-8"]);
        if let Some(last) = last_page {
            cmd.args(["-l", &last.to_string()]);
        }
        cmd.arg(pdf).arg("-"); // text to stdout
        run_with_timeout(cmd, PDFTOTEXT, timeout).await
    }
}

/// `pdftoppm` from poppler-utils, producing one PNG per page in a temporary
/// directory that is read back into memory and then discarded.
pub struct PdfToPpm;

#[async_trait]
impl Rasterizer for PdfToPpm {
    async fn rasterize(&self, pdf: &Path, dpi: u32) -> Result<Vec<PageImage>, ToolError> {
        let dir = tempfile::tempdir().map_err(|e| ToolError::Io {
            tool: PDFTOPPM,
            source: e,
        })?;

        let mut cmd = Command::new(PDFTOPPM);
        cmd.args(["-png", "-r", &dpi.to_string()])
            .arg(pdf)
            .arg(dir.path().join("page"))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        let output = cmd.output().await.map_err(|e| spawn_error(e, PDFTOPPM))?;
        if !output.status.success() {
            return Err(ToolError::Failed {
                tool: PDFTOPPM,
                stderr: stderr_of(&output),
            });
        }

        // pdftoppm names pages with a uniform zero-padded width
        // (page-01.png, page-02.png, …), so a lexicographic sort restores
        // page order.
        let mut paths: Vec<_> = std::fs::read_dir(dir.path())
            .map_err(|e| ToolError::Io {
                tool: PDFTOPPM,
                source: e,
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "png"))
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(ToolError::Failed {
                tool: PDFTOPPM,
                stderr: "no page images produced".to_string(),
            });
        }

        let mut pages = Vec::with_capacity(paths.len());
        for (i, path) in paths.iter().enumerate() {
            let png = tokio::fs::read(path).await.map_err(|e| ToolError::Io {
                tool: PDFTOPPM,
                source: e,
            })?;
            let (w, h) = png_dimensions(&png).map_err(|e| ToolError::Failed {
                tool: PDFTOPPM,
                stderr: format!("unreadable page image {}: {e}", path.display()),
            })?;
            debug!("Rasterised page {} → {}x{} px", i + 1, w, h);
            pages.push(PageImage {
                number: i + 1,
                png,
            });
        }

        Ok(pages)
    }
}

/// Probe the dimensions of a PNG without decoding the pixel data.
fn png_dimensions(png: &[u8]) -> Result<(u32, u32), image::ImageError> {
    image::ImageReader::new(Cursor::new(png))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)?
        .into_dimensions()
}

/// `tesseract`, fed one page PNG over stdin.
pub struct Tesseract {
    lang: String,
}

impl Tesseract {
    /// Create an engine for the given recognition language (e.g. `"eng"`).
    pub fn new(lang: impl Into<String>) -> Self {
        Self { lang: lang.into() }
    }
}

#[async_trait]
impl OcrEngine for Tesseract {
    async fn recognize(&self, image: &PageImage) -> Result<String, ToolError> {
        // --psm 4 assumes a single column of text of variable sizes, which
        // keeps reading order intact for typical document/academic layouts.
        // --oem 3 is the default engine selection.
        let mut child = Command::new(TESSERACT)
            .args(["stdin", "stdout", "-l", &self.lang, "--oem", "3", "--psm", "4"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| spawn_error(e, TESSERACT))?;

        let mut stdin = child.stdin.take().ok_or_else(|| ToolError::Failed {
            tool: TESSERACT,
            stderr: "stdin unavailable".to_string(),
        })?;
        stdin
            .write_all(&image.png)
            .await
            .map_err(|e| ToolError::Io {
                tool: TESSERACT,
                source: e,
            })?;
        drop(stdin); // close stdin so tesseract sees EOF

        let output = child.wait_with_output().await.map_err(|e| ToolError::Io {
            tool: TESSERACT,
            source: e,
        })?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(ToolError::Failed {
                tool: TESSERACT,
                stderr: stderr_of(&output),
            })
        }
    }
}

// ── Process helpers ─────────────────────────────────────────────────────────

/// Run a command to completion, capturing stdout, bounded by `timeout`.
async fn run_with_timeout(
    mut cmd: Command,
    tool: &'static str,
    timeout: Duration,
) -> Result<String, ToolError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(result) => result.map_err(|e| spawn_error(e, tool))?,
        Err(_) => {
            return Err(ToolError::Timeout {
                tool,
                secs: timeout.as_secs(),
            })
        }
    };

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        Err(ToolError::Failed {
            tool,
            stderr: stderr_of(&output),
        })
    }
}

fn spawn_error(e: std::io::Error, tool: &'static str) -> ToolError {
    if e.kind() == std::io::ErrorKind::NotFound {
        ToolError::NotFound { tool }
    } else {
        ToolError::Io { tool, source: e }
    }
}

fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

// ── Dependency check ────────────────────────────────────────────────────────

/// Verify the external tools are installed, reporting every missing one.
///
/// Intended as a pre-flight check before any extraction work starts; the
/// library itself does not call this (a missing tool surfaces naturally as
/// [`ToolError::NotFound`]), but the CLI runs it first so users get the full
/// list of missing packages in one go.
pub fn check_dependencies() -> Result<(), ExtractError> {
    let missing: Vec<String> = REQUIRED_TOOLS
        .iter()
        .filter(|tool| which::which(tool).is_err())
        .map(|tool| tool.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ExtractError::MissingDependencies { tools: missing })
    }
}

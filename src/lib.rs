//! # pdf2text
//!
//! Extract plain text from PDF documents, handling both text-based and
//! image-based (scanned) files.
//!
//! ## Why this crate?
//!
//! Some PDFs carry a machine-readable text layer; others are just page
//! scans. Running OCR on a text-bearing document is slow and lossy, while
//! reading the "text layer" of a scan yields nothing. This crate decides per
//! document — a cheap sampling heuristic over the first pages — then runs
//! the right strategy and strips recurring publisher boilerplate (page
//! numbers, copyright lines, running headers) from the result.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Classify  sample the first 2 pages' text layer, count words
//!  ├─ 2. Extract   text layer (pdftotext -layout) or OCR
//!  │               (pdftoppm → tesseract, page by page, failures isolated)
//!  ├─ 3. Clean     line-oriented boilerplate filter + blank-run cap
//!  └─ 4. Output    final text + line/word statistics
//! ```
//!
//! The external tools sit behind capability traits ([`tools::TextLayerTool`],
//! [`tools::Rasterizer`], [`tools::OcrEngine`]) so tests substitute stubs and
//! never spawn a real binary.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2text::{extract, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::default();
//!     let output = extract("document.pdf", &config).await?;
//!     println!("{}", output.text);
//!     eprintln!("{} lines, {} words via {}",
//!         output.stats.lines,
//!         output.stats.words,
//!         output.method);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2text` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdf2text = { version = "0.3", default-features = false }
//! ```
//!
//! ## External tools
//!
//! The default pipeline shells out to `pdftotext` and `pdftoppm` (from
//! poppler-utils) and `tesseract`. [`tools::check_dependencies`] reports any
//! missing binary before extraction starts.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod tools;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, ExtractionMethod};
pub use error::{ExtractError, PageError};
pub use extract::{extract, extract_sync, extract_to_file};
pub use output::{ExtractionOutput, ExtractionStats, PageResult};
pub use progress::{ExtractionProgressCallback, ProgressCallback};
pub use tools::check_dependencies;

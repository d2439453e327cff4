//! Pipeline stages for PDF text extraction.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. substitute stub tools in tests) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! classify ──▶ textlayer ──or──▶ ocr ──▶ clean
//! (sample 2pp)  (pdftotext)  (pdftoppm   (boilerplate
//!                            +tesseract)  filter)
//! ```
//!
//! 1. [`classify`]  — sample the first pages' text layer and decide
//!    text-bearing vs image-only; failures resolve to the OCR route
//! 2. [`textlayer`] — full-document embedded-text extraction, layout
//!    preserved; failures here are fatal
//! 3. [`ocr`]       — rasterise every page, recognise each independently;
//!    failures isolate to single pages
//! 4. [`clean`]     — line-oriented boilerplate removal with blank-run
//!    normalisation

pub mod classify;
pub mod clean;
pub mod ocr;
pub mod textlayer;

//! # docs-pdf2md
//!
//! Batch-convert a directory of PDF documents into Markdown files, extracting
//! every embedded image to disk and linking it from the Markdown.
//!
//! ## Why this crate?
//!
//! Documentation often arrives as a pile of PDFs. Markdown is what search
//! tools, diff viewers and static-site generators want. This crate walks an
//! input directory, pulls the plain text of each page in reading order,
//! saves each page's images in their native format, and writes one Markdown
//! file per PDF with a predictable layout.
//!
//! ## Pipeline Overview
//!
//! ```text
//! docs/nfse-nacional/*.pdf
//!  │
//!  ├─ 1. Discover  non-recursive, filename order
//!  ├─ 2. Validate  exists, readable, %PDF magic
//!  ├─ 3. Open      pdfium (or any PdfBackend)
//!  ├─ 4. Per page  text → "## Page n", images → files + "### Images from Page n"
//!  └─ 5. Write     docs/markdown/<stem>.md, docs/markdown/images/<stem>/
//! ```
//!
//! A failure in one document never stops the batch; a failure in one image
//! never stops the document.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docs_pdf2md::{Batch, BatchConfig, PdfiumBackend};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BatchConfig::builder().root("/srv/project").build()?;
//!     let batch = Batch::prepare(config)?;
//!     if batch.is_empty() {
//!         return Ok(());
//!     }
//!     let backend = PdfiumBackend::bind(None)?;
//!     let report = batch.run(&backend);
//!     eprintln!(
//!         "{} converted, {} failed, {} images",
//!         report.converted.len(),
//!         report.failed.len(),
//!         report.images_written()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `convert-pdfs` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! docs-pdf2md = { version = "0.1", default-features = false }
//! ```
//!
//! ## PDFium
//!
//! The production [`PdfiumBackend`] loads the pdfium shared library at
//! runtime. Point `PDFIUM_LIB_PATH` at it, or place it next to the
//! executable or in the working directory.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{discover_pdfs, Batch};
pub use config::{BatchConfig, BatchConfigBuilder};
pub use convert::convert_document;
pub use error::{ConvertError, ImageError};
pub use output::{BatchReport, DocumentReport, FailedDocument};
pub use pipeline::backend::{PageContent, PdfBackend, PdfSource, PdfiumBackend, PDFIUM_LIB_PATH_ENV};
pub use pipeline::encode::{EmbeddedImage, ImageEncoding};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};

//! Error types for the docs-pdf2md library.
//!
//! Two distinct error types reflect the two isolation tiers of a batch run:
//!
//! * [`ConvertError`] - **Fatal for one document** (bad input file, corrupt
//!   PDF, output write failure) or for batch setup (output directories,
//!   input listing, PDFium binding). The batch driver catches it per file,
//!   reports it, and moves on to the next PDF.
//!
//! * [`ImageError`] - **Non-fatal**: a single embedded image could not be
//!   exported or written. The image is omitted from the Markdown and
//!   the rest of the page is unaffected.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the docs-pdf2md library.
///
/// Image-level failures use [`ImageError`] and never surface here.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}' (first bytes: {magic:?})")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password; encrypted inputs are not supported.
    #[error("PDF '{path}' is encrypted and requires a password")]
    PasswordRequired { path: PathBuf },

    /// The engine could not load a page or its text layer.
    #[error("Failed to read page {page} of '{path}': {detail}")]
    PageReadFailed {
        path: PathBuf,
        page: usize,
        detail: String,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create an output or images directory.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not list the input directory.
    #[error("Failed to read input directory '{path}': {source}")]
    InputDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium (or pass --pdfium-lib).\n\
  • Place libpdfium next to the executable or in the working directory.\n\
  • Install pdfium system-wide.\n"
    )]
    PdfiumBindingFailed(String),
}

/// A non-fatal error for a single embedded image.
///
/// Page number and image index are attached by the caller when the error is
/// reported; the error itself only describes what went wrong.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The engine could not decode the image's pixel data.
    #[error("decoding failed: {detail}")]
    DecodeFailed { detail: String },

    /// The stored stream bytes of a JPEG or JPEG 2000 image could not be read.
    #[error("reading image stream failed: {detail}")]
    RawDataFailed { detail: String },

    /// The decoded pixels could not be encoded for writing.
    #[error("encoding as {format} failed: {detail}")]
    EncodeFailed { format: &'static str, detail: String },

    /// The image file could not be written.
    #[error("failed to write '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

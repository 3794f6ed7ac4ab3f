//! Pipeline stages for PDF-to-Markdown conversion.
//!
//! Each submodule implements one step of converting a single document.
//! Keeping stages separate makes each independently testable and keeps the
//! pdfium dependency confined to [`backend`].
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ backend ──▶ markdown (page text)
//! (check)   (pdfium) ─▶ encode ──▶ images (files + references)
//! ```
//!
//! 1. [`input`]    - reject missing, unreadable and non-PDF files early
//! 2. [`backend`]  - open the document, load text and image objects per page
//! 3. [`encode`]   - keep stored JPEG bytes, encode everything else as PNG
//! 4. [`images`]   - store image files and build their Markdown references
//! 5. [`markdown`] - normalise page text and assemble the output fragments

pub mod backend;
pub mod encode;
pub mod images;
pub mod input;
pub mod markdown;

//! Progress-callback trait for per-document conversion events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::BatchConfigBuilder::progress_callback`] to receive events
//! as the batch driver walks the input directory.
//!
//! The library itself never prints: it logs through `tracing` and reports
//! through this trait. The `convert-pdfs` binary implements it to produce
//! the operator-facing console output.
//!
//! # Example
//!
//! ```rust
//! use docs_pdf2md::{BatchConfig, BatchProgressCallback, DocumentReport};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     created: AtomicUsize,
//! }
//!
//! impl BatchProgressCallback for CountingCallback {
//!     fn on_document_complete(&self, report: &DocumentReport) {
//!         self.created.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("wrote {}", report.output_path.display());
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { created: AtomicUsize::new(0) });
//!
//! let config = BatchConfig::builder()
//!     .progress_callback(counter as Arc<dyn BatchProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::error::{ConvertError, ImageError};
use crate::output::{BatchReport, DocumentReport};
use std::path::Path;
use std::sync::Arc;

/// Called by the batch and document drivers as work progresses.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events arrive strictly in order from a single
/// thread; the `Send + Sync` bound only lets the callback live in a shared
/// [`crate::config::BatchConfig`].
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after discovery, before any document is opened.
    ///
    /// # Arguments
    /// * `total_files` - number of PDFs that will be processed
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called just before a PDF is opened.
    ///
    /// # Arguments
    /// * `path`  - input PDF path
    /// * `index` - 1-indexed position in the batch
    /// * `total` - number of PDFs in the batch
    fn on_document_start(&self, path: &Path, index: usize, total: usize) {
        let _ = (path, index, total);
    }

    /// Called when one embedded image is skipped.
    ///
    /// # Arguments
    /// * `page_num`    - 1-indexed page number
    /// * `image_index` - 1-indexed position of the image on the page
    /// * `error`       - why the image was skipped
    fn on_image_skipped(&self, page_num: usize, image_index: usize, error: &ImageError) {
        let _ = (page_num, image_index, error);
    }

    /// Called after a document's Markdown file has been written.
    fn on_document_complete(&self, report: &DocumentReport) {
        let _ = report;
    }

    /// Called when a document is abandoned after a fatal error.
    fn on_document_error(&self, path: &Path, error: &ConvertError) {
        let _ = (path, error);
    }

    /// Called once after every discovered document has been attempted.
    fn on_batch_complete(&self, report: &BatchReport) {
        let _ = report;
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::BatchConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;

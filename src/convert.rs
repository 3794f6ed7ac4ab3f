//! Single-document conversion.
//!
//! [`convert_document`] is the document driver: it validates and opens one
//! PDF, walks its pages strictly in order, and writes
//! `<output_dir>/<stem>.md`. Any error it returns is fatal for that document
//! only; the batch driver decides what to do with it.

use crate::config::BatchConfig;
use crate::error::ConvertError;
use crate::output::DocumentReport;
use crate::pipeline::backend::PdfBackend;
use crate::pipeline::images::write_page_images;
use crate::pipeline::markdown::MarkdownDocument;
use crate::pipeline::input;
use crate::progress::{BatchProgressCallback, NoopProgressCallback};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Convert one PDF to Markdown, extracting its images.
///
/// # Arguments
/// * `backend`  - PDF engine used to open the document
/// * `pdf_path` - input PDF
/// * `config`   - supplies the output and images directories and the
///   progress callback for image-level warnings
///
/// # Errors
/// Returns `Err(ConvertError)` when the file is not a readable PDF, the
/// engine cannot load the document or one of its pages, the per-document
/// images directory cannot be created, or the Markdown file cannot be
/// written. Individual image failures are reported through the progress
/// callback and never returned here.
///
/// An existing Markdown file with the same stem is overwritten, and image
/// files from earlier runs are overwritten name by name.
pub fn convert_document<B: PdfBackend + ?Sized>(
    backend: &B,
    pdf_path: &Path,
    config: &BatchConfig,
) -> Result<DocumentReport, ConvertError> {
    let noop = NoopProgressCallback;
    let progress: &dyn BatchProgressCallback = match config.progress_callback {
        Some(ref cb) => cb.as_ref(),
        None => &noop,
    };

    let stem = document_stem(pdf_path);
    let source_name = pdf_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| stem.clone());
    let images_root = config.images_dir();
    let output_path = output_path_for(pdf_path, config);

    info!("Converting: {}", pdf_path.display());

    input::validate_pdf(pdf_path)?;
    let source = backend.open(pdf_path)?;
    let page_count = source.page_count();
    debug!("{} has {} pages", source_name, page_count);

    let mut markdown = MarkdownDocument::new(&stem, &source_name);
    let mut text_pages = 0;
    let mut images_written = 0;
    let mut images_skipped = 0;

    for index in 0..page_count {
        let page_num = index + 1;
        let content = source.load_page(index)?;

        if markdown.push_page_text(page_num, &content.text) {
            text_pages += 1;
        } else {
            debug!("Page {} has no text", page_num);
        }

        let page_images =
            write_page_images(content.images, page_num, &stem, &images_root, progress)?;
        images_written += page_images.references.len();
        images_skipped += page_images.skipped;
        markdown.push_page_images(page_num, &page_images.references);
    }

    // Close the document before touching the output file.
    drop(source);

    std::fs::write(&output_path, markdown.finish()).map_err(|e| {
        ConvertError::OutputWriteFailed {
            path: output_path.clone(),
            source: e,
        }
    })?;

    info!(
        "Created {} ({} pages, {} with text, {} images, {} skipped)",
        output_path.display(),
        page_count,
        text_pages,
        images_written,
        images_skipped
    );

    Ok(DocumentReport {
        source: pdf_path.to_path_buf(),
        output_path,
        stem,
        page_count,
        text_pages,
        images_written,
        images_skipped,
    })
}

/// Document identifier: the filename with its last extension removed.
pub fn document_stem(pdf_path: &Path) -> String {
    pdf_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Output Markdown path for a PDF under the given configuration.
pub fn output_path_for(pdf_path: &Path, config: &BatchConfig) -> PathBuf {
    config
        .output_dir()
        .join(format!("{}.md", document_stem(pdf_path)))
}

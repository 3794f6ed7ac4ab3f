//! Batch conversion: discover every PDF in the input directory and convert
//! each one in filename order.
//!
//! Setup failures (output directories, unreadable input directory) abort the
//! run. Everything after that is isolated per document: a PDF that fails is
//! logged, reported through the progress callback, and the batch moves on.

use crate::config::{BatchConfig, PDF_EXTENSION};
use crate::convert::convert_document;
use crate::error::ConvertError;
use crate::output::{BatchReport, FailedDocument};
use crate::pipeline::backend::PdfBackend;
use crate::progress::{BatchProgressCallback, NoopProgressCallback};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// List the PDFs directly inside `dir`, sorted by filename.
///
/// Only regular files whose name ends in `.pdf` (lowercase) are returned,
/// dot-files included; subdirectories are ignored. A missing directory yields
/// an empty list.
pub fn discover_pdfs(dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Input directory {} does not exist", dir.display());
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(ConvertError::InputDirUnreadable {
                path: dir.to_path_buf(),
                source: e,
            })
        }
    };

    let suffix = format!(".{PDF_EXTENSION}");
    let mut pdfs = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| ConvertError::InputDirUnreadable {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();

        if !name.ends_with(&suffix) || !path.is_file() {
            continue;
        }
        pdfs.push(path);
    }

    pdfs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(pdfs)
}

/// A batch whose output tree exists and whose inputs have been discovered.
#[derive(Debug)]
pub struct Batch {
    config: BatchConfig,
    pdfs: Vec<PathBuf>,
}

impl Batch {
    /// Create the output and images directories, then discover inputs.
    ///
    /// The output tree is created even when no PDF is found.
    pub fn prepare(config: BatchConfig) -> Result<Self, ConvertError> {
        for dir in [config.output_dir(), config.images_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| ConvertError::CreateDirFailed {
                path: dir.clone(),
                source: e,
            })?;
        }

        let pdfs = discover_pdfs(&config.input_dir())?;
        info!(
            "Found {} PDF files in {}",
            pdfs.len(),
            config.input_dir().display()
        );

        Ok(Self { config, pdfs })
    }

    /// Discovered inputs, in processing order.
    pub fn pdfs(&self) -> &[PathBuf] {
        &self.pdfs
    }

    pub fn is_empty(&self) -> bool {
        self.pdfs.is_empty()
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Convert every discovered PDF, one at a time.
    ///
    /// Never fails as a whole: per-document errors land in
    /// [`BatchReport::failed`].
    pub fn run<B: PdfBackend + ?Sized>(&self, backend: &B) -> BatchReport {
        let noop = NoopProgressCallback;
        let progress: &dyn BatchProgressCallback = match self.config.progress_callback {
            Some(ref cb) => cb.as_ref(),
            None => &noop,
        };

        let total = self.pdfs.len();
        let mut report = BatchReport {
            found: total,
            ..BatchReport::default()
        };
        progress.on_batch_start(total);

        for (idx, pdf) in self.pdfs.iter().enumerate() {
            progress.on_document_start(pdf, idx + 1, total);

            match convert_document(backend, pdf, &self.config) {
                Ok(doc) => {
                    progress.on_document_complete(&doc);
                    report.converted.push(doc);
                }
                Err(e) => {
                    warn!("Error converting {}: {}", pdf.display(), e);
                    progress.on_document_error(pdf, &e);
                    report.failed.push(FailedDocument {
                        source: pdf.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Batch complete: {} converted, {} failed",
            report.converted.len(),
            report.failed.len()
        );
        progress.on_batch_complete(&report);
        report
    }
}

//! PDF engine access: open documents, read page text, export page images.
//!
//! The drivers only ever talk to the [`PdfBackend`] / [`PdfSource`] traits.
//! [`PdfiumBackend`] is the production implementation on top of
//! `pdfium-render`; tests substitute an in-memory backend so the whole
//! conversion can be exercised without the native library.
//!
//! ## Library binding
//!
//! pdfium is a shared library loaded at runtime. [`PdfiumBackend::bind`]
//! tries, in order:
//!
//! 1. an explicit path (`--pdfium-lib` / `PDFIUM_LIB_PATH`),
//! 2. the directory containing the running executable,
//! 3. the current working directory,
//! 4. the system library search path.

use crate::error::{ConvertError, ImageError};
use crate::pipeline::encode::{encode_png, stored_image, EmbeddedImage, ImageEncoding};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit pdfium library file.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Everything the formatter needs from one page.
#[derive(Debug)]
pub struct PageContent {
    /// Plain text in the engine's reading order (possibly empty).
    pub text: String,
    /// Embedded images in the order the engine lists them. Each entry is
    /// exported independently; a failed entry does not affect the others.
    pub images: Vec<Result<EmbeddedImage, ImageError>>,
}

/// An opened PDF document.
pub trait PdfSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Load the page at `index` (0-indexed).
    fn load_page(&self, index: usize) -> Result<PageContent, ConvertError>;
}

/// A PDF engine capable of opening documents from disk.
pub trait PdfBackend {
    /// Open the PDF at `path`. The returned source closes the document when
    /// dropped.
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn PdfSource + 'a>, ConvertError>;
}

/// [`PdfBackend`] backed by the pdfium library.
pub struct PdfiumBackend {
    pdfium: Pdfium,
}

impl PdfiumBackend {
    /// Wrap an already-bound pdfium instance.
    pub fn from_pdfium(pdfium: Pdfium) -> Self {
        Self { pdfium }
    }

    /// The bound pdfium instance, e.g. for authoring documents.
    pub fn pdfium(&self) -> &Pdfium {
        &self.pdfium
    }

    /// Bind to pdfium, honouring `explicit` first, then `PDFIUM_LIB_PATH`,
    /// then the executable and working directories, then the system library.
    pub fn bind(explicit: Option<&Path>) -> Result<Self, ConvertError> {
        let mut failures = Vec::new();

        for candidate in library_candidates(explicit) {
            if !candidate.exists() {
                debug!("No pdfium library at {}", candidate.display());
                continue;
            }
            match Pdfium::bind_to_library(&candidate) {
                Ok(bindings) => {
                    info!("Bound pdfium from {}", candidate.display());
                    return Ok(Self::from_pdfium(Pdfium::new(bindings)));
                }
                Err(e) => failures.push(format!("{}: {:?}", candidate.display(), e)),
            }
        }

        match Pdfium::bind_to_system_library() {
            Ok(bindings) => {
                info!("Bound system pdfium library");
                Ok(Self::from_pdfium(Pdfium::new(bindings)))
            }
            Err(e) => {
                failures.push(format!("system library: {:?}", e));
                Err(ConvertError::PdfiumBindingFailed(failures.join("; ")))
            }
        }
    }
}

/// Candidate library files, most specific first.
fn library_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = explicit {
        candidates.push(path.to_path_buf());
    }
    if let Ok(env_path) = std::env::var(PDFIUM_LIB_PATH_ENV) {
        if !env_path.is_empty() {
            candidates.push(PathBuf::from(env_path));
        }
    }
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(PathBuf::from(
            Pdfium::pdfium_platform_library_name_at_path(&exe_dir),
        ));
    }
    candidates.push(PathBuf::from(
        Pdfium::pdfium_platform_library_name_at_path("./"),
    ));

    candidates
}

impl PdfBackend for PdfiumBackend {
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn PdfSource + 'a>, ConvertError> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| classify_load_error(path, e))?;

        debug!(
            "Opened {} ({} pages)",
            path.display(),
            document.pages().len()
        );

        Ok(Box::new(PdfiumSource {
            document,
            path: path.to_path_buf(),
        }))
    }
}

fn classify_load_error(path: &Path, e: PdfiumError) -> ConvertError {
    let err_str = format!("{:?}", e);
    if err_str.contains("Password") || err_str.contains("password") {
        ConvertError::PasswordRequired {
            path: path.to_path_buf(),
        }
    } else {
        ConvertError::CorruptPdf {
            path: path.to_path_buf(),
            detail: err_str,
        }
    }
}

struct PdfiumSource<'a> {
    document: PdfDocument<'a>,
    path: PathBuf,
}

impl PdfiumSource<'_> {
    fn page_error(&self, index: usize, e: PdfiumError) -> ConvertError {
        ConvertError::PageReadFailed {
            path: self.path.clone(),
            page: index + 1,
            detail: format!("{:?}", e),
        }
    }
}

impl PdfSource for PdfiumSource<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn load_page(&self, index: usize) -> Result<PageContent, ConvertError> {
        let page = self
            .document
            .pages()
            .get(index as u16)
            .map_err(|e| self.page_error(index, e))?;

        let text = page
            .text()
            .map_err(|e| self.page_error(index, e))?
            .all();

        let mut images = Vec::new();
        for object in page.objects().iter() {
            collect_images(&object, &mut images);
        }

        debug!(
            "Loaded page {}: {} bytes of text, {} images",
            index + 1,
            text.len(),
            images.len()
        );

        Ok(PageContent { text, images })
    }
}

/// Export every image reachable from `object`, descending into form XObjects
/// so images drawn through a form are found in content-stream order.
fn collect_images(object: &PdfPageObject<'_>, images: &mut Vec<Result<EmbeddedImage, ImageError>>) {
    if let Some(image) = object.as_image_object() {
        images.push(export_image(image));
    } else if let Some(form) = object.as_x_object_form_object() {
        for child in form.iter() {
            collect_images(&child, images);
        }
    }
}

/// Export one image object: stored JPEG / JPEG 2000 streams are copied
/// verbatim, everything else is decoded and written as PNG.
fn export_image(object: &PdfPageImageObject) -> Result<EmbeddedImage, ImageError> {
    let filter_names: Vec<String> = object
        .filters()
        .iter()
        .map(|filter| filter.name().to_string())
        .collect();
    let encoding = ImageEncoding::from_filters(filter_names.iter().map(String::as_str));

    if encoding.is_stored_as_is() {
        let raw = object
            .get_raw_image_data()
            .map_err(|e| ImageError::RawDataFailed {
                detail: format!("{:?}", e),
            })?;
        return stored_image(raw, encoding);
    }

    let decoded = object
        .get_raw_image()
        .map_err(|e| ImageError::DecodeFailed {
            detail: format!("{:?}", e),
        })?;

    encode_png(&decoded)
}

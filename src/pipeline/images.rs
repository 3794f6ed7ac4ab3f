//! Image extraction: write a page's embedded images and reference them.
//!
//! Files land in `<images_root>/<stem>/page<N>_img<K>.<ext>`, where `N` is the
//! 1-indexed page and `K` the 1-indexed position of the image in the page's
//! image list. `K` counts every listed image, including ones that fail, so a
//! skipped image leaves a gap in the numbering rather than shifting the
//! names of its successors.

use crate::error::{ConvertError, ImageError};
use crate::pipeline::encode::EmbeddedImage;
use crate::pipeline::markdown::image_reference;
use crate::progress::BatchProgressCallback;
use std::path::Path;
use tracing::{debug, warn};

/// What happened to the images of one page.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageImages {
    /// Markdown references for every written image, in page order.
    pub references: Vec<String>,
    /// Images that were listed but could not be exported or written.
    pub skipped: usize,
}

/// File name for the `image_index`-th image of page `page_num`.
pub fn image_file_name(page_num: usize, image_index: usize, extension: &str) -> String {
    format!("page{}_img{}.{}", page_num, image_index, extension)
}

/// Write every successfully exported image of a page and return references.
///
/// The per-document directory is created on first use, and only when the
/// page lists at least one image. Failing to create it aborts the document;
/// failing to export or write one image only skips that image.
pub fn write_page_images(
    images: Vec<Result<EmbeddedImage, ImageError>>,
    page_num: usize,
    stem: &str,
    images_root: &Path,
    progress: &dyn BatchProgressCallback,
) -> Result<PageImages, ConvertError> {
    let mut result = PageImages::default();
    if images.is_empty() {
        return Ok(result);
    }

    let document_dir = images_root.join(stem);
    std::fs::create_dir_all(&document_dir).map_err(|e| ConvertError::CreateDirFailed {
        path: document_dir.clone(),
        source: e,
    })?;

    for (idx, exported) in images.into_iter().enumerate() {
        let image_index = idx + 1;

        let written = exported.and_then(|image| {
            let file_name = image_file_name(page_num, image_index, image.extension());
            let path = document_dir.join(&file_name);
            std::fs::write(&path, &image.bytes).map_err(|e| ImageError::WriteFailed {
                path: path.clone(),
                source: e,
            })?;
            debug!("Wrote {} ({} bytes)", path.display(), image.bytes.len());
            Ok(file_name)
        });

        match written {
            Ok(file_name) => result.references.push(image_reference(stem, &file_name)),
            Err(e) => {
                warn!(
                    "Could not extract image {} from page {}: {}",
                    image_index, page_num, e
                );
                progress.on_image_skipped(page_num, image_index, &e);
                result.skipped += 1;
            }
        }
    }

    Ok(result)
}

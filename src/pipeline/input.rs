//! Input validation: make sure a discovered path is a readable PDF.
//!
//! pdfium reports every load failure with the same opaque error, so a text
//! file renamed to `.pdf` and a truncated PDF look alike. Checking existence,
//! read permission and the `%PDF` signature up front gives the operator a
//! message that says what is actually wrong with the file.

use crate::error::ConvertError;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::debug;

/// How far into the file the `%PDF` signature may appear.
///
/// Readers (pdfium included) tolerate junk before the header, so the first
/// byte is not required to be `%`.
const HEADER_SEARCH_WINDOW: usize = 1024;

const PDF_MAGIC: &[u8] = b"%PDF";

/// Validate that `path` exists, is readable and carries a PDF signature.
pub fn validate_pdf(path: &Path) -> Result<(), ConvertError> {
    let mut file = std::fs::File::open(path).map_err(|e| match e.kind() {
        ErrorKind::PermissionDenied => ConvertError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => ConvertError::FileNotFound {
            path: path.to_path_buf(),
        },
    })?;

    let mut head = Vec::with_capacity(HEADER_SEARCH_WINDOW);
    file.by_ref()
        .take(HEADER_SEARCH_WINDOW as u64)
        .read_to_end(&mut head)
        .map_err(|e| match e.kind() {
            ErrorKind::PermissionDenied => ConvertError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => ConvertError::CorruptPdf {
                path: path.to_path_buf(),
                detail: e.to_string(),
            },
        })?;

    if !has_pdf_signature(&head) {
        let mut magic = [0u8; 4];
        let n = head.len().min(4);
        magic[..n].copy_from_slice(&head[..n]);
        return Err(ConvertError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }

    debug!("Validated PDF input: {}", path.display());
    Ok(())
}

fn has_pdf_signature(head: &[u8]) -> bool {
    head.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC)
}

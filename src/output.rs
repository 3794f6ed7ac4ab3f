//! Result records produced by a conversion run.
//!
//! These are informational: the Markdown and image files on disk are the real
//! output. Reports let the binary print its summary and let tests assert on
//! what happened without re-parsing the generated Markdown.

use std::path::PathBuf;

/// Outcome of converting one PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReport {
    /// Input PDF path.
    pub source: PathBuf,
    /// Written Markdown path (`<output_dir>/<stem>.md`).
    pub output_path: PathBuf,
    /// Document identifier: the input filename without its extension.
    pub stem: String,
    /// Pages in the document.
    pub page_count: usize,
    /// Pages that produced a `## Page <n>` section.
    pub text_pages: usize,
    /// Image files written and referenced from the Markdown.
    pub images_written: usize,
    /// Images listed on a page but skipped after a decode/encode/write failure.
    pub images_skipped: usize,
}

/// A PDF that could not be converted, with the rendered error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDocument {
    pub source: PathBuf,
    pub error: String,
}

/// Outcome of a whole batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// PDF files discovered in the input directory.
    pub found: usize,
    /// Documents converted, in processing (filename) order.
    pub converted: Vec<DocumentReport>,
    /// Documents skipped after a fatal per-document error.
    pub failed: Vec<FailedDocument>,
}

impl BatchReport {
    /// Total images written across all converted documents.
    pub fn images_written(&self) -> usize {
        self.converted.iter().map(|d| d.images_written).sum()
    }

    /// Total images skipped across all converted documents.
    pub fn images_skipped(&self) -> usize {
        self.converted.iter().map(|d| d.images_skipped).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(stem: &str, written: usize, skipped: usize) -> DocumentReport {
        DocumentReport {
            source: PathBuf::from(format!("{stem}.pdf")),
            output_path: PathBuf::from(format!("{stem}.md")),
            stem: stem.to_string(),
            page_count: 2,
            text_pages: 2,
            images_written: written,
            images_skipped: skipped,
        }
    }

    #[test]
    fn image_totals_sum_over_documents() {
        let batch = BatchReport {
            found: 3,
            converted: vec![report("a", 2, 1), report("b", 3, 0)],
            failed: vec![FailedDocument {
                source: PathBuf::from("c.pdf"),
                error: "corrupt".into(),
            }],
        };
        assert_eq!(batch.images_written(), 5);
        assert_eq!(batch.images_skipped(), 1);
    }

    #[test]
    fn empty_batch_has_no_images() {
        let batch = BatchReport::default();
        assert_eq!(batch.images_written(), 0);
        assert_eq!(batch.found, 0);
    }
}

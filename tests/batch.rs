//! Batch conversion tests against an in-memory PDF engine.
//!
//! `FakeBackend` maps input filenames to page content, so the drivers,
//! directory layout and Markdown output are exercised end to end without
//! the native pdfium library. Input files only need a `%PDF` header to pass
//! validation.

use docs_pdf2md::{
    convert_document, Batch, BatchConfig, BatchProgressCallback, BatchReport, ConvertError,
    DocumentReport, EmbeddedImage, ImageEncoding, ImageError, PageContent, PdfBackend, PdfSource,
    ProgressCallback,
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ── Fake engine ──────────────────────────────────────────────────────────────

#[derive(Clone)]
enum FakeImage {
    Ok(ImageEncoding, Vec<u8>),
    Broken(&'static str),
}

#[derive(Clone, Default)]
struct FakePage {
    text: String,
    images: Vec<FakeImage>,
}

fn text_page(text: &str) -> FakePage {
    FakePage {
        text: text.to_string(),
        images: Vec::new(),
    }
}

#[derive(Clone)]
enum FakeDoc {
    Pages(Vec<FakePage>),
    Corrupt,
    /// Opens, but the page at this 0-based index fails to load.
    BadPage(Vec<FakePage>, usize),
}

#[derive(Default)]
struct FakeBackend {
    docs: HashMap<String, FakeDoc>,
}

impl FakeBackend {
    fn with(mut self, name: &str, doc: FakeDoc) -> Self {
        self.docs.insert(name.to_string(), doc);
        self
    }
}

struct FakeSource {
    path: PathBuf,
    pages: Vec<FakePage>,
    bad_page: Option<usize>,
}

impl PdfBackend for FakeBackend {
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn PdfSource + 'a>, ConvertError> {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        let (pages, bad_page) = match self.docs.get(&name) {
            Some(FakeDoc::Pages(pages)) => (pages.clone(), None),
            Some(FakeDoc::BadPage(pages, idx)) => (pages.clone(), Some(*idx)),
            Some(FakeDoc::Corrupt) | None => {
                return Err(ConvertError::CorruptPdf {
                    path: path.to_path_buf(),
                    detail: "no xref table".into(),
                })
            }
        };
        Ok(Box::new(FakeSource {
            path: path.to_path_buf(),
            pages,
            bad_page,
        }))
    }
}

impl PdfSource for FakeSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn load_page(&self, index: usize) -> Result<PageContent, ConvertError> {
        if self.bad_page == Some(index) {
            return Err(ConvertError::PageReadFailed {
                path: self.path.clone(),
                page: index + 1,
                detail: "bad content stream".into(),
            });
        }
        let page = &self.pages[index];
        let images = page
            .images
            .iter()
            .map(|img| match img {
                FakeImage::Ok(encoding, bytes) => Ok(EmbeddedImage {
                    encoding: *encoding,
                    bytes: bytes.clone(),
                }),
                FakeImage::Broken(detail) => Err(ImageError::DecodeFailed {
                    detail: detail.to_string(),
                }),
            })
            .collect();
        Ok(PageContent {
            text: page.text.clone(),
            images,
        })
    }
}

// ── Progress recorder ────────────────────────────────────────────────────────

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl BatchProgressCallback for Recorder {
    fn on_batch_start(&self, total_files: usize) {
        self.push(format!("batch {total_files}"));
    }

    fn on_document_start(&self, path: &Path, index: usize, total: usize) {
        let name = path.file_name().unwrap().to_string_lossy();
        self.push(format!("start {name} {index}/{total}"));
    }

    fn on_image_skipped(&self, page_num: usize, image_index: usize, _error: &ImageError) {
        self.push(format!("skip p{page_num} i{image_index}"));
    }

    fn on_document_complete(&self, report: &DocumentReport) {
        self.push(format!("done {}", report.stem));
    }

    fn on_document_error(&self, path: &Path, _error: &ConvertError) {
        let name = path.file_name().unwrap().to_string_lossy();
        self.push(format!("error {name}"));
    }

    fn on_batch_complete(&self, report: &BatchReport) {
        self.push(format!(
            "complete {}/{}",
            report.converted.len(),
            report.found
        ));
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

struct Workspace {
    root: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn input(&self) -> PathBuf {
        self.root.path().join("docs/nfse-nacional")
    }

    fn output(&self) -> PathBuf {
        self.root.path().join("docs/markdown")
    }

    fn add_pdf(&self, name: &str) -> PathBuf {
        fs::create_dir_all(self.input()).unwrap();
        let path = self.input().join(name);
        fs::write(&path, b"%PDF-1.7\n%fake\n").unwrap();
        path
    }

    fn config(&self) -> BatchConfig {
        BatchConfig::builder().root(self.root.path()).build().unwrap()
    }

    fn config_with(&self, callback: ProgressCallback) -> BatchConfig {
        BatchConfig::builder()
            .root(self.root.path())
            .progress_callback(callback)
            .build()
            .unwrap()
    }

    fn markdown(&self, stem: &str) -> String {
        fs::read_to_string(self.output().join(format!("{stem}.md"))).unwrap()
    }
}

fn png(bytes: &[u8]) -> FakeImage {
    FakeImage::Ok(ImageEncoding::Png, bytes.to_vec())
}

fn jpeg(bytes: &[u8]) -> FakeImage {
    FakeImage::Ok(ImageEncoding::Jpeg, bytes.to_vec())
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn title_and_provenance_header() {
    let ws = Workspace::new();
    ws.add_pdf("nfse-nacional-manual.pdf");
    let backend = FakeBackend::default().with(
        "nfse-nacional-manual.pdf",
        FakeDoc::Pages(vec![text_page("hello")]),
    );

    let report = Batch::prepare(ws.config()).unwrap().run(&backend);
    assert_eq!(report.converted.len(), 1);

    let md = ws.markdown("nfse-nacional-manual");
    assert!(md.starts_with(
        "# Nfse Nacional Manual\n\n*Converted from: nfse-nacional-manual.pdf*\n\n---\n"
    ));
}

#[test]
fn one_heading_per_page_with_text() {
    let ws = Workspace::new();
    ws.add_pdf("guide.pdf");
    let backend = FakeBackend::default().with(
        "guide.pdf",
        FakeDoc::Pages(vec![
            text_page("one"),
            text_page("   \n\t\n"),
            text_page(""),
            text_page("  four  \n\n  more "),
        ]),
    );

    let report = Batch::prepare(ws.config()).unwrap().run(&backend);
    let doc = &report.converted[0];
    assert_eq!(doc.page_count, 4);
    assert_eq!(doc.text_pages, 2);

    let md = ws.markdown("guide");
    assert_eq!(md.matches("## Page ").count(), 2);
    assert!(md.contains("\n## Page 1\n\none\n"));
    assert!(md.contains("\n## Page 4\n\nfour\nmore\n"));
    assert!(!md.contains("## Page 2"));
    assert!(!md.contains("## Page 3"));
}

#[test]
fn whitespace_only_document_is_header_only() {
    let ws = Workspace::new();
    ws.add_pdf("blank.pdf");
    let backend = FakeBackend::default().with(
        "blank.pdf",
        FakeDoc::Pages(vec![text_page(" "), text_page("\n\n")]),
    );

    Batch::prepare(ws.config()).unwrap().run(&backend);
    assert_eq!(
        ws.markdown("blank"),
        "# Blank\n\n*Converted from: blank.pdf*\n\n---\n"
    );
    assert!(!ws.output().join("images/blank").exists());
}

#[test]
fn images_are_written_and_referenced() {
    let ws = Workspace::new();
    ws.add_pdf("manual.pdf");
    let backend = FakeBackend::default().with(
        "manual.pdf",
        FakeDoc::Pages(vec![
            FakePage {
                text: "cover".into(),
                images: vec![png(b"\x89PNG\r\n\x1a\nA"), jpeg(b"\xff\xd8\xffB")],
            },
            FakePage {
                text: String::new(),
                images: vec![png(b"\x89PNG\r\n\x1a\nC")],
            },
        ]),
    );

    let report = Batch::prepare(ws.config()).unwrap().run(&backend);
    assert_eq!(report.images_written(), 3);

    let images = ws.output().join("images/manual");
    for name in ["page1_img1.png", "page1_img2.jpeg", "page2_img1.png"] {
        let meta = fs::metadata(images.join(name)).unwrap();
        assert!(meta.len() > 0, "{name} is empty");
    }

    let md = ws.markdown("manual");
    assert_eq!(md.matches("![Image](").count(), 3);
    assert!(md.contains(
        "\n### Images from Page 1\n\n\
         ![Image](images/manual/page1_img1.png)\n\n\
         ![Image](images/manual/page1_img2.jpeg)\n"
    ));
    // An image-only page has an images section but no text heading.
    assert!(md.contains("### Images from Page 2"));
    assert!(!md.contains("## Page 2\n"));
}

#[test]
fn broken_image_is_skipped_without_failing_document() {
    let ws = Workspace::new();
    ws.add_pdf("scan.pdf");
    let recorder = Arc::new(Recorder::default());
    let backend = FakeBackend::default().with(
        "scan.pdf",
        FakeDoc::Pages(vec![FakePage {
            text: "scanned".into(),
            images: vec![FakeImage::Broken("JBIG2 globals missing"), png(b"ok")],
        }]),
    );

    let report = Batch::prepare(ws.config_with(recorder.clone()))
        .unwrap()
        .run(&backend);

    let doc = &report.converted[0];
    assert_eq!(doc.images_written, 1);
    assert_eq!(doc.images_skipped, 1);
    assert!(recorder.events().contains(&"skip p1 i1".to_string()));

    let md = ws.markdown("scan");
    assert!(md.contains("![Image](images/scan/page1_img2.png)"));
    assert!(!md.contains("page1_img1"));
}

#[test]
fn page_with_only_broken_images_has_no_images_section() {
    let ws = Workspace::new();
    ws.add_pdf("scan.pdf");
    let backend = FakeBackend::default().with(
        "scan.pdf",
        FakeDoc::Pages(vec![FakePage {
            text: "text".into(),
            images: vec![FakeImage::Broken("unsupported filter")],
        }]),
    );

    Batch::prepare(ws.config()).unwrap().run(&backend);
    assert!(!ws.markdown("scan").contains("### Images"));
}

#[test]
fn corrupt_file_does_not_stop_batch() {
    let ws = Workspace::new();
    ws.add_pdf("a-good.pdf");
    ws.add_pdf("b-broken.pdf");
    // A text file renamed to .pdf fails validation before reaching the engine.
    fs::write(ws.input().join("c-renamed.pdf"), b"just some notes").unwrap();
    ws.add_pdf("d-good.pdf");

    let recorder = Arc::new(Recorder::default());
    let backend = FakeBackend::default()
        .with("a-good.pdf", FakeDoc::Pages(vec![text_page("a")]))
        .with("b-broken.pdf", FakeDoc::Corrupt)
        .with("c-renamed.pdf", FakeDoc::Pages(vec![text_page("c")]))
        .with("d-good.pdf", FakeDoc::Pages(vec![text_page("d")]));

    let report = Batch::prepare(ws.config_with(recorder.clone()))
        .unwrap()
        .run(&backend);

    assert_eq!(report.found, 4);
    let converted: Vec<_> = report.converted.iter().map(|d| d.stem.as_str()).collect();
    assert_eq!(converted, vec!["a-good", "d-good"]);
    assert_eq!(report.failed.len(), 2);
    assert!(report.failed[0].error.contains("corrupt"));
    assert!(report.failed[1].error.contains("not a valid PDF"));

    assert!(ws.output().join("a-good.md").exists());
    assert!(!ws.output().join("b-broken.md").exists());
    assert!(!ws.output().join("c-renamed.md").exists());
    assert!(ws.output().join("d-good.md").exists());

    assert_eq!(
        recorder.events(),
        vec![
            "batch 4",
            "start a-good.pdf 1/4",
            "done a-good",
            "start b-broken.pdf 2/4",
            "error b-broken.pdf",
            "start c-renamed.pdf 3/4",
            "error c-renamed.pdf",
            "start d-good.pdf 4/4",
            "done d-good",
            "complete 2/4",
        ]
    );
}

#[test]
fn failing_page_abandons_document_without_output() {
    let ws = Workspace::new();
    ws.add_pdf("partial.pdf");
    let backend = FakeBackend::default().with(
        "partial.pdf",
        FakeDoc::BadPage(vec![text_page("one"), text_page("two")], 1),
    );

    let report = Batch::prepare(ws.config()).unwrap().run(&backend);
    assert!(report.converted.is_empty());
    assert!(report.failed[0].error.contains("page 2"));
    assert!(!ws.output().join("partial.md").exists());
}

#[test]
fn rerun_is_idempotent() {
    let ws = Workspace::new();
    ws.add_pdf("doc.pdf");
    let backend = FakeBackend::default().with(
        "doc.pdf",
        FakeDoc::Pages(vec![FakePage {
            text: "body".into(),
            images: vec![jpeg(b"\xff\xd8\xffdata")],
        }]),
    );

    Batch::prepare(ws.config()).unwrap().run(&backend);
    let first_md = ws.markdown("doc");
    let first_img = fs::read(ws.output().join("images/doc/page1_img1.jpeg")).unwrap();

    Batch::prepare(ws.config()).unwrap().run(&backend);
    assert_eq!(ws.markdown("doc"), first_md);
    assert_eq!(
        fs::read(ws.output().join("images/doc/page1_img1.jpeg")).unwrap(),
        first_img
    );
    assert_eq!(fs::read_dir(ws.output().join("images/doc")).unwrap().count(), 1);
}

#[test]
fn existing_output_is_overwritten() {
    let ws = Workspace::new();
    ws.add_pdf("doc.pdf");
    fs::create_dir_all(ws.output()).unwrap();
    fs::write(ws.output().join("doc.md"), "stale").unwrap();

    let backend = FakeBackend::default().with("doc.pdf", FakeDoc::Pages(vec![text_page("new")]));
    Batch::prepare(ws.config()).unwrap().run(&backend);

    let md = ws.markdown("doc");
    assert!(!md.contains("stale"));
    assert!(md.contains("new"));
}

#[test]
fn empty_input_directory_creates_tree_only() {
    let ws = Workspace::new();
    fs::create_dir_all(ws.input()).unwrap();
    fs::write(ws.input().join("readme.txt"), "not a pdf").unwrap();

    let batch = Batch::prepare(ws.config()).unwrap();
    assert!(batch.is_empty());

    let report = batch.run(&FakeBackend::default());
    assert_eq!(report, BatchReport::default());
    assert!(ws.output().join("images").is_dir());
    assert_eq!(fs::read_dir(ws.output()).unwrap().count(), 1);
}

#[test]
fn files_are_processed_in_name_order() {
    let ws = Workspace::new();
    for name in ["zeta.pdf", "alpha.pdf", "Mid.pdf"] {
        ws.add_pdf(name);
    }
    let backend = FakeBackend::default()
        .with("zeta.pdf", FakeDoc::Pages(vec![]))
        .with("alpha.pdf", FakeDoc::Pages(vec![]))
        .with("Mid.pdf", FakeDoc::Pages(vec![]));

    let report = Batch::prepare(ws.config()).unwrap().run(&backend);
    let order: Vec<_> = report.converted.iter().map(|d| d.stem.as_str()).collect();
    assert_eq!(order, vec!["Mid", "alpha", "zeta"]);
}

#[test]
fn dot_files_are_converted_first() {
    let ws = Workspace::new();
    for name in ["alpha.pdf", ".draft.pdf"] {
        ws.add_pdf(name);
    }
    let backend = FakeBackend::default()
        .with("alpha.pdf", FakeDoc::Pages(vec![text_page("a")]))
        .with(".draft.pdf", FakeDoc::Pages(vec![text_page("d")]));

    let report = Batch::prepare(ws.config()).unwrap().run(&backend);
    let order: Vec<_> = report.converted.iter().map(|d| d.stem.as_str()).collect();
    assert_eq!(order, vec![".draft", "alpha"]);
    assert!(ws.markdown(".draft").contains("*Converted from: .draft.pdf*"));
}

#[test]
fn jpx_images_keep_their_extension() {
    let ws = Workspace::new();
    ws.add_pdf("scan.pdf");
    let backend = FakeBackend::default().with(
        "scan.pdf",
        FakeDoc::Pages(vec![FakePage {
            text: String::new(),
            images: vec![FakeImage::Ok(ImageEncoding::Jpx, b"\x00\x00\x00\x0cjP".to_vec())],
        }]),
    );

    let report = Batch::prepare(ws.config()).unwrap().run(&backend);
    assert_eq!(report.converted[0].images_written, 1);
    assert_eq!(
        fs::read(ws.output().join("images/scan/page1_img1.jpx")).unwrap(),
        b"\x00\x00\x00\x0cjP"
    );
    assert!(ws.markdown("scan").contains("![Image](images/scan/page1_img1.jpx)"));
}

#[test]
fn convert_document_writes_to_configured_output() {
    let ws = Workspace::new();
    let pdf = ws.add_pdf("single.pdf");
    let out = ws.root.path().join("site");
    let config = BatchConfig::builder()
        .root(ws.root.path())
        .output_dir("site")
        .build()
        .unwrap();
    fs::create_dir_all(config.images_dir()).unwrap();

    let backend = FakeBackend::default().with(
        "single.pdf",
        FakeDoc::Pages(vec![FakePage {
            text: "x".into(),
            images: vec![png(b"p")],
        }]),
    );
    let report = convert_document(&backend, &pdf, &config).unwrap();

    assert_eq!(report.output_path, out.join("single.md"));
    assert!(out.join("images/single/page1_img1.png").is_file());
}

#[test]
fn missing_pdf_is_reported_as_not_found() {
    let ws = Workspace::new();
    let config = ws.config();
    let err = convert_document(
        &FakeBackend::default(),
        &ws.input().join("ghost.pdf"),
        &config,
    )
    .unwrap_err();
    assert!(matches!(err, ConvertError::FileNotFound { .. }));
}

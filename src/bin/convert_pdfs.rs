//! CLI binary for docs-pdf2md.
//!
//! A thin shim over the library crate that maps CLI flags to `BatchConfig`,
//! binds pdfium, and prints progress. Run without arguments it converts
//! `./docs/nfse-nacional/*.pdf` into `./docs/markdown/`.

use anyhow::{Context, Result};
use clap::Parser;
use docs_pdf2md::{
    Batch, BatchConfig, BatchProgressCallback, BatchReport, ConvertError, DocumentReport,
    ImageError, PdfiumBackend, ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

static COLOR: AtomicBool = AtomicBool::new(false);

fn paint(code: &str, s: &str) -> String {
    if COLOR.load(Ordering::Relaxed) {
        format!("\x1b[{code}m{s}\x1b[0m")
    } else {
        s.to_string()
    }
}
fn green(s: &str) -> String {
    paint("32", s)
}
fn red(s: &str) -> String {
    paint("31", s)
}
fn yellow(s: &str) -> String {
    paint("33", s)
}
fn bold(s: &str) -> String {
    paint("1", s)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ── CLI progress callback ────────────────────────────────────────────────────

/// Console reporter: one line per event on stdout, plus an optional
/// document-level progress bar on stderr.
struct CliProgressCallback {
    /// Bar over documents; `None` when disabled or not interactive.
    bar: Option<ProgressBar>,
    /// Suppress informational lines (errors still go to stderr).
    quiet: bool,
}

impl CliProgressCallback {
    fn new(show_bar: bool, quiet: bool) -> Arc<Self> {
        let bar = show_bar.then(|| {
            let bar = ProgressBar::new(0);
            let style = ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} PDFs  \
                 ⏱ {elapsed_precise}  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
            bar.set_style(style);
            bar.set_prefix("Converting");
            bar
        });
        Arc::new(Self { bar, quiet })
    }

    /// Print a stdout line without tearing the progress bar.
    fn say(&self, line: String) {
        if self.quiet {
            return;
        }
        match self.bar {
            Some(ref bar) => bar.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }

    /// Print an error line; shown even in quiet mode.
    fn shout(&self, line: String) {
        let print = || {
            if self.quiet {
                eprintln!("{line}");
            } else {
                println!("{line}");
            }
        };
        match self.bar {
            Some(ref bar) => bar.suspend(print),
            None => print(),
        }
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        if let Some(ref bar) = self.bar {
            bar.set_length(total_files as u64);
            bar.enable_steady_tick(Duration::from_millis(80));
        }
    }

    fn on_document_start(&self, path: &Path, _index: usize, _total: usize) {
        let name = file_name(path);
        if let Some(ref bar) = self.bar {
            bar.set_message(name.clone());
        }
        self.say(format!("Converting: {name}"));
    }

    fn on_image_skipped(&self, page_num: usize, image_index: usize, error: &ImageError) {
        self.say(yellow(&format!(
            "    Warning: Could not extract image {image_index} from page {page_num}: {error}"
        )));
    }

    fn on_document_complete(&self, report: &DocumentReport) {
        self.say(format!(
            "  -> Created: {}",
            green(&file_name(&report.output_path))
        ));
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    fn on_document_error(&self, path: &Path, error: &ConvertError) {
        self.shout(red(&format!(
            "  Error converting {}: {error}",
            file_name(path)
        )));
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    fn on_batch_complete(&self, _report: &BatchReport) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert ./docs/nfse-nacional/*.pdf into ./docs/markdown/
  convert-pdfs

  # Run against another checkout
  convert-pdfs --root /srv/project

  # Custom directories (relative to --root unless absolute)
  convert-pdfs --input-dir manuals --output-dir site/md

  # Explicit pdfium library
  convert-pdfs --pdfium-lib /opt/pdfium/lib/libpdfium.so

OUTPUT LAYOUT:
  <output-dir>/<stem>.md
  <output-dir>/images/<stem>/page<N>_img<K>.png|jpeg|jpx

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to the pdfium shared library
  RUST_LOG          Log filter for diagnostics on stderr (overrides -v)
"#;

/// Batch-convert a directory of PDFs to Markdown with extracted images.
#[derive(Parser, Debug)]
#[command(
    name = "convert-pdfs",
    version,
    about = "Batch-convert a directory of PDFs to Markdown with extracted images",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Base directory for relative input/output paths.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Directory scanned for *.pdf (non-recursive).
    #[arg(long, default_value = docs_pdf2md::config::DEFAULT_INPUT_DIR)]
    input_dir: PathBuf,

    /// Directory receiving <stem>.md and images/.
    #[arg(long, default_value = docs_pdf2md::config::DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Path to the pdfium shared library.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs on stderr.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress everything except errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Disable the progress bar.
    #[arg(long)]
    no_progress: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Library logs stay quiet unless asked for; the stdout lines are the
    // operator-facing report.
    let filter = if cli.verbose { "debug" } else { "error" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    COLOR.store(io::stdout().is_terminal(), Ordering::Relaxed);

    let show_bar = !cli.quiet && !cli.no_progress && !cli.verbose && io::stderr().is_terminal();
    let reporter = CliProgressCallback::new(show_bar, cli.quiet);

    // ── Build config ─────────────────────────────────────────────────────
    let config = BatchConfig::builder()
        .root(&cli.root)
        .input_dir(&cli.input_dir)
        .output_dir(&cli.output_dir)
        .progress_callback(reporter.clone() as ProgressCallback)
        .build()
        .context("Invalid directory configuration")?;

    let batch = Batch::prepare(config).context("Failed to prepare output directories")?;
    let input_dir = batch.config().input_dir();

    if batch.is_empty() {
        reporter.say(format!("No PDF files found in {}", input_dir.display()));
        return Ok(());
    }

    reporter.say(format!(
        "Found {} PDF files to convert\n",
        bold(&batch.pdfs().len().to_string())
    ));

    // ── Bind pdfium ──────────────────────────────────────────────────────
    let backend =
        PdfiumBackend::bind(cli.pdfium_lib.as_deref()).context("Failed to load PDFium")?;

    // ── Run conversion ───────────────────────────────────────────────────
    let report = batch.run(&backend);
    tracing::debug!(
        "{} of {} converted, {} images written, {} skipped",
        report.converted.len(),
        report.found,
        report.images_written(),
        report.images_skipped()
    );

    reporter.say("\nConversion complete!".to_string());
    reporter.say(format!(
        "Markdown files saved to: {}",
        batch.config().output_dir().display()
    ));
    reporter.say(format!(
        "Images saved to: {}",
        batch.config().images_dir().display()
    ));

    Ok(())
}

//! Configuration types for a batch conversion run.
//!
//! Every path the drivers touch is resolved through [`BatchConfig`], built
//! via its [`BatchConfigBuilder`]. Invoked without overrides the layout is
//! fixed:
//!
//! ```text
//! <root>/docs/nfse-nacional/*.pdf                      input
//! <root>/docs/markdown/<stem>.md                       output
//! <root>/docs/markdown/images/<stem>/page<N>_img<K>.*  extracted images
//! ```

use crate::error::ConvertError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::{Path, PathBuf};

/// Default input directory, relative to the root.
pub const DEFAULT_INPUT_DIR: &str = "docs/nfse-nacional";

/// Default output directory, relative to the root.
pub const DEFAULT_OUTPUT_DIR: &str = "docs/markdown";

/// Name of the images directory inside the output directory.
///
/// Markdown image references are written relative to the output directory,
/// so this name is part of every `![Image](images/...)` link.
pub const IMAGES_DIR_NAME: &str = "images";

/// File extension (without dot, case-sensitive) of discovered inputs.
pub const PDF_EXTENSION: &str = "pdf";

/// Configuration for a batch conversion.
///
/// Built via [`BatchConfig::builder()`] or using [`BatchConfig::default()`].
///
/// # Example
/// ```rust
/// use docs_pdf2md::BatchConfig;
///
/// let config = BatchConfig::builder()
///     .root("/srv/project")
///     .build()
///     .unwrap();
/// assert!(config.images_dir().ends_with("docs/markdown/images"));
/// ```
#[derive(Clone)]
pub struct BatchConfig {
    /// Base directory that relative input/output paths are resolved against.
    /// Default: the current working directory (`.`).
    pub root: PathBuf,

    /// Directory scanned (non-recursively) for `*.pdf`. Default: `docs/nfse-nacional`.
    pub input_dir: PathBuf,

    /// Directory receiving `<stem>.md` files. Default: `docs/markdown`.
    pub output_dir: PathBuf,

    /// Optional progress observer. Default: None.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("root", &self.root)
            .field("input_dir", &self.input_dir)
            .field("output_dir", &self.output_dir)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl BatchConfig {
    /// Create a new builder for `BatchConfig`.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder {
            config: Self::default(),
        }
    }

    /// Absolute-or-root-relative input directory.
    pub fn input_dir(&self) -> PathBuf {
        resolve(&self.root, &self.input_dir)
    }

    /// Absolute-or-root-relative output directory.
    pub fn output_dir(&self) -> PathBuf {
        resolve(&self.root, &self.output_dir)
    }

    /// Images root: always `<output_dir>/images`.
    pub fn images_dir(&self) -> PathBuf {
        self.output_dir().join(IMAGES_DIR_NAME)
    }
}

fn resolve(root: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        root.join(dir)
    }
}

/// Builder for [`BatchConfig`].
#[derive(Debug)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.input_dir = dir.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    /// Attach a progress observer.
    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.config.progress_callback = Some(callback);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BatchConfig, ConvertError> {
        let c = &self.config;
        if c.input_dir.as_os_str().is_empty() || c.output_dir.as_os_str().is_empty() {
            return Err(ConvertError::InvalidConfig(
                "input and output directories must not be empty".into(),
            ));
        }
        if c.input_dir() == c.output_dir() {
            return Err(ConvertError::InvalidConfig(format!(
                "input and output directories must differ, both are '{}'",
                c.input_dir().display()
            )));
        }
        Ok(self.config)
    }
}

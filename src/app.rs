// One complete run over a document file: decode, transform, save.

use crate::api::ImageUploader;
use crate::document::{transform, ImagePassReport, TransformOptions};
use crate::encoding::{decode, SaveEncoding};
use crate::output::{fix_accents, output_path, save, DEFAULT_SUFFIX};
use crate::resolve::default_base_dir;
use crate::ui::choose_save_encoding;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Settings for [`run`] beyond the document itself.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory relative image paths are resolved against. Defaults to the
    /// document's directory.
    pub base_dir: Option<PathBuf>,
    pub transform: TransformOptions,
    /// Apply the `õ→ő`, `û→ű` repair before saving.
    pub fix_accents: bool,
    pub suffix: String,
    /// Save encoding; `None` asks interactively.
    pub save_encoding: Option<SaveEncoding>,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            base_dir: None,
            transform: TransformOptions::default(),
            fix_accents: false,
            suffix: DEFAULT_SUFFIX.into(),
            save_encoding: None,
        }
    }
}

/// What a run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub output: PathBuf,
    pub images: ImagePassReport,
    /// Name of the encoding the output was written in.
    pub encoding: &'static str,
}

/// Transform `input` and write the result alongside it. Per-image
/// failures are logged and counted; only I/O and decode errors abort.
pub fn run(input: &Path, uploader: &dyn ImageUploader, options: &RunOptions) -> Result<RunSummary> {
    let raw = std::fs::read(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let decoded = decode(&raw).with_context(|| format!("Failed to decode {}", input.display()))?;
    info!("Detected encoding: {}", decoded.encoding.name());

    let base_dir = options
        .base_dir
        .clone()
        .unwrap_or_else(|| default_base_dir(input));
    let (mut html, images) = transform(&decoded.text, &base_dir, uploader, options.transform)?;

    if options.fix_accents {
        html = fix_accents(&html);
    }

    let choice = options
        .save_encoding
        .unwrap_or_else(|| choose_save_encoding(decoded.encoding));
    let target = choice.resolve(decoded.encoding);
    let output = output_path(input, &options.suffix);
    let written = save(&output, &html, target)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if written.fell_back {
        warn!(
            "Text cannot be represented in {}; saved {} as {} instead",
            target.name(),
            output.display(),
            written.encoding.name()
        );
    } else {
        info!(
            "Modified HTML saved to: {} with encoding {}",
            output.display(),
            written.encoding.name()
        );
    }

    Ok(RunSummary {
        output,
        images,
        encoding: written.encoding.name(),
    })
}

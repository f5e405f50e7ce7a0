// UI layer: the interactive bits of a run. A `dialoguer` select for the
// save encoding and an `indicatif` spinner shown while images upload.

use crate::api::ImageUploader;
use crate::encoding::{Charset, SaveEncoding};
use crate::error::UploadError;
use dialoguer::Select;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Ask which encoding to save with. UTF-8 is preselected, and is also used
/// when the prompt cannot be shown (for example without a terminal).
///
/// `Select::interact()` is keyboard-driven: arrow keys and Enter.
pub fn choose_save_encoding(original: Charset) -> SaveEncoding {
    let items: Vec<String> = SaveEncoding::ALL
        .iter()
        .map(|choice| match choice {
            SaveEncoding::Original => {
                format!("Use original detected encoding ({})", original.name())
            }
            SaveEncoding::Utf8 => "Use UTF-8 (recommended)".into(),
            SaveEncoding::Windows1252 => "Use Windows-1252".into(),
            SaveEncoding::Iso88591 => "Use ISO-8859-1".into(),
        })
        .collect();
    let default = SaveEncoding::ALL
        .iter()
        .position(|c| *c == SaveEncoding::default())
        .unwrap_or(0);

    match Select::new()
        .with_prompt("Choose encoding for saving the file")
        .items(&items)
        .default(default)
        .interact()
    {
        Ok(i) => SaveEncoding::ALL.get(i).copied().unwrap_or_default(),
        Err(e) => {
            warn!("Encoding prompt unavailable ({e}); saving as UTF-8");
            SaveEncoding::default()
        }
    }
}

/// Wraps another uploader and shows a spinner naming the file in flight.
/// The spinner is cleared before the upload result is logged.
pub struct SpinnerUploader<U> {
    inner: U,
}

impl<U: ImageUploader> SpinnerUploader<U> {
    pub fn new(inner: U) -> Self {
        SpinnerUploader { inner }
    }
}

impl<U: ImageUploader> ImageUploader for SpinnerUploader<U> {
    fn upload_image(&self, file_path: &Path) -> Result<String, UploadError> {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("Uploading {}...", file_path.display()));
        spinner.enable_steady_tick(Duration::from_millis(100));
        let result = self.inner.upload_image(file_path);
        spinner.finish_and_clear();
        result
    }
}

// Error types shared by the library modules.
//
// Only configuration and decoding errors are fatal for a run. Upload
// errors are reported per image and never abort the document pass.

use std::path::PathBuf;

/// Errors raised while locating, reading or writing the credential file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found at {}; run `d2htools init` and fill in your API details", .0.display())]
    Missing(PathBuf),

    #[error("config file {} already exists (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),

    #[error("invalid config {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a single image upload produced no URL.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("upload failed ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response: {0}")]
    MissingUrl(String),

    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

/// Raised when no encoding in the fallback chain can decode the input.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("document is not valid {tried}; giving up")]
    Corrupt { tried: String },
}

/// Errors produced while rewriting the document markup.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to rewrite document: {0}")]
    Rewrite(#[from] lol_html::errors::RewritingError),
}

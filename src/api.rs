// API client module: a small blocking HTTP client that sends one image
// per request to the hosting API and reads back its public URL.
// Uploads are strictly sequential; there are no retries.

use crate::config::Config;
use crate::error::UploadError;
use reqwest::blocking::{multipart, Client};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::path::Path;
use tracing::{info, warn};

/// Anything that can turn a local image file into a remote URL.
///
/// The document driver only talks to this trait, which keeps the HTML
/// passes independent of the network.
pub trait ImageUploader {
    fn upload_image(&self, file_path: &Path) -> Result<String, UploadError>;

    /// Upload and log the outcome. Every failure is reported and turned
    /// into `None`; callers leave the reference untouched in that case.
    fn upload(&self, file_path: &Path) -> Option<String> {
        info!("Uploading: {}", file_path.display());
        match self.upload_image(file_path) {
            Ok(url) => {
                info!("Uploaded {} -> {url}", file_path.display());
                Some(url)
            }
            Err(e) => {
                warn!("Failed to upload {}: {e}", file_path.display());
                None
            }
        }
    }
}

/// HTTP uploader holding a reqwest blocking client, the upload endpoint
/// and the bearer token sent with every request.
#[derive(Clone)]
pub struct UploadClient {
    client: Client,
    api_url: String,
    token: String,
}

/// Expected success payload: `{"url": "..."}`. Other keys are ignored.
#[derive(serde::Deserialize, Debug)]
struct UploadResponse {
    url: Option<String>,
}

impl UploadClient {
    /// Build a client for the given endpoint and token. Transport defaults
    /// (timeouts, TLS) are left as reqwest configures them.
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Result<Self, UploadError> {
        let client = Client::builder().build()?;
        Ok(UploadClient {
            client,
            api_url: api_url.into(),
            token: token.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, UploadError> {
        Self::new(config.api_url.clone(), config.api_token.clone())
    }

    /// Build the Authorization header map. A token that is not a valid
    /// header value is sent without the header and the server decides.
    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        match HeaderValue::from_str(&format!("Bearer {}", self.token)) {
            Ok(val) => {
                headers.insert(AUTHORIZATION, val);
            }
            Err(_) => warn!("API token contains characters not allowed in a header"),
        }
        headers
    }
}

impl ImageUploader for UploadClient {
    /// POST the file as multipart field `image`. Only a 200 response whose
    /// JSON body carries a `url` key counts as success.
    fn upload_image(&self, file_path: &Path) -> Result<String, UploadError> {
        let data = std::fs::read(file_path)?;
        let file_name = file_path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("image")
            .to_string();

        let part = multipart::Part::bytes(data)
            .file_name(file_name)
            .mime_str(guess_mime(file_path))?;
        let form = multipart::Form::new().part("image", part);

        let res = self
            .client
            .post(&self.api_url)
            .headers(self.auth_headers())
            .multipart(form)
            .send()?;

        let status = res.status();
        let txt = res.text().unwrap_or_default();
        if status.as_u16() != 200 {
            return Err(UploadError::Status {
                status: status.as_u16(),
                body: txt,
            });
        }

        let parsed: UploadResponse = serde_json::from_str(&txt)?;
        parsed.url.ok_or(UploadError::MissingUrl(txt))
    }
}

/// Content type for the multipart part, by file extension.
fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        Some("tif" | "tiff") => "image/tiff",
        _ => "application/octet-stream",
    }
}

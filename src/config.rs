// Credential configuration: where the upload endpoint lives and which
// bearer token to send. Stored as a small JSON file in the user's home
// directory, in the same spirit as the CLI's persisted token file.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory (under the home directory) holding the config file.
pub const CONFIG_DIR_NAME: &str = ".d2htools";
/// Config file name inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.json";

const TEMPLATE_API_URL: &str = "https://example.com/api/upload-image";
const TEMPLATE_API_TOKEN: &str = "your_api_token_here";

/// Upload API credentials read from `config.json`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub api_token: String,
}

/// Raw file shape; both fields may be absent so we can report which one is.
#[derive(Deserialize, Debug, Default)]
struct RawConfig {
    #[serde(default)]
    api_url: Option<String>,
    #[serde(default)]
    api_token: Option<String>,
}

impl Config {
    /// Template written by [`init`]. Its values are rejected by [`load`].
    pub fn template() -> Self {
        Config {
            api_url: TEMPLATE_API_URL.into(),
            api_token: TEMPLATE_API_TOKEN.into(),
        }
    }
}

/// Default config location: `~/.d2htools/config.json`, or relative to the
/// working directory when no home directory can be determined.
pub fn default_path() -> PathBuf {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)
}

/// Read and validate the config file. Never creates or modifies files.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::Missing(path.to_path_buf()));
    }
    let data = fs::read_to_string(path)?;
    let raw: RawConfig = serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let api_url = required(path, "api_url", raw.api_url, TEMPLATE_API_URL)?;
    let api_token = required(path, "api_token", raw.api_token, TEMPLATE_API_TOKEN)?;
    Ok(Config { api_url, api_token })
}

fn required(
    path: &Path,
    field: &str,
    value: Option<String>,
    template: &str,
) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        path: path.to_path_buf(),
        reason,
    };
    match value.map(|v| v.trim().to_string()) {
        None => Err(invalid(format!("`{field}` must be set"))),
        Some(v) if v.is_empty() => Err(invalid(format!("`{field}` must not be empty"))),
        Some(v) if v == template => Err(invalid(format!(
            "`{field}` still has its template value"
        ))),
        Some(v) => Ok(v),
    }
}

/// Write the config template to `path`, creating parent directories.
/// Refuses to replace an existing file unless `force` is set.
pub fn init(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_string_pretty(&Config::template()).map_err(|source| {
        ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    fs::write(path, body)?;
    Ok(())
}

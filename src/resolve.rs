// Classifies `img` sources as remote, local-and-present, or missing.

use std::path::{Path, PathBuf};

const REMOTE_PREFIXES: [&str; 3] = ["http://", "https://", "data:"];

/// Where an `img` source points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Absolute URL or data URI; left as is.
    Remote,
    /// Existing file on disk that should be uploaded.
    Local(PathBuf),
    /// Local reference whose file does not exist.
    Missing(PathBuf),
}

/// Resolve `src` against `base_dir`. Absolute paths are used verbatim.
pub fn resolve(src: &str, base_dir: &Path) -> ImageRef {
    if REMOTE_PREFIXES.iter().any(|p| src.starts_with(p)) {
        return ImageRef::Remote;
    }

    let candidate = Path::new(src);
    let path = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base_dir.join(candidate)
    };

    if path.exists() {
        ImageRef::Local(path)
    } else {
        ImageRef::Missing(path)
    }
}

/// Default base directory: the directory containing the document.
pub fn default_base_dir(document: &Path) -> PathBuf {
    let absolute = std::path::absolute(document).unwrap_or_else(|_| document.to_path_buf());
    absolute
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

// Writing the transformed document next to its source.

use crate::encoding::{encode, Charset, Encoded};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Suffix inserted before the extension of the output file.
pub const DEFAULT_SUFFIX: &str = "_uploaded";

/// Accent repairs for documents where `ő`/`ű` were mis-decoded as `õ`/`û`.
/// Any genuine `õ` or `û` in the text is rewritten too.
const ACCENT_FIXUPS: [(&str, &str); 2] = [("õ", "ő"), ("û", "ű")];

/// `dir/name.html` -> `dir/name<suffix>.html`.
pub fn output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    input.with_file_name(name)
}

pub fn fix_accents(text: &str) -> String {
    ACCENT_FIXUPS
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Encode and write `text`, falling back to UTF-8 when `target` cannot
/// represent it. Returns what was actually written.
pub fn save(path: &Path, text: &str, target: Charset) -> io::Result<Encoded> {
    let encoded = encode(text, target);
    fs::write(path, &encoded.bytes)?;
    Ok(encoded)
}

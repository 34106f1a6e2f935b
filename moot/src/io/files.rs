//! Describe local files as wizard uploads.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use crate::core::upload::FileMeta;

/// MIME types by lowercase extension; anything else is `application/octet-stream`.
const MIME_TABLE: [(&str, &str); 7] = [
    ("mp4", "video/mp4"),
    ("mov", "video/mov"),
    ("webm", "video/webm"),
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("txt", "text/plain"),
];

pub fn mime_for_name(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    MIME_TABLE
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or("application/octet-stream")
}

/// Read name, size and guessed MIME type for `path`. Contents are not read.
pub fn inspect_file(path: &Path) -> Result<FileMeta> {
    let metadata =
        fs::metadata(path).with_context(|| format!("stat upload {}", path.display()))?;
    if !metadata.is_file() {
        return Err(anyhow!("{} is not a regular file", path.display()));
    }
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("{} has no usable file name", path.display()))?
        .to_string();
    let mime = mime_for_name(&name);
    Ok(FileMeta::new(name, mime, metadata.len()))
}

//! File acceptance rules for wizard uploads.

use serde::{Deserialize, Serialize};

/// 500 MiB.
pub const DEFAULT_MAX_VIDEO_BYTES: u64 = 500 * 1024 * 1024;

pub const DEFAULT_VIDEO_MIME_TYPES: [&str; 3] = ["video/mp4", "video/mov", "video/webm"];

pub const DEFAULT_DOCUMENT_EXTENSIONS: [&str; 3] = [".doc", ".docx", ".pdf"];

/// Metadata for a file offered to the wizard. Contents are never read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    pub mime: String,
    pub size: u64,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            size,
        }
    }

    /// Lowercased extension including the dot (`".pdf"`), if any.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(format!(".{}", ext.to_ascii_lowercase()))
    }
}

/// Accept lists and size cap applied by the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_video_bytes: u64,
    pub video_mime_types: Vec<String>,
    pub document_extensions: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_video_bytes: DEFAULT_MAX_VIDEO_BYTES,
            video_mime_types: DEFAULT_VIDEO_MIME_TYPES.map(String::from).to_vec(),
            document_extensions: DEFAULT_DOCUMENT_EXTENSIONS.map(String::from).to_vec(),
        }
    }
}

impl UploadPolicy {
    pub fn accepts_video_type(&self, file: &FileMeta) -> bool {
        self.video_mime_types
            .iter()
            .any(|mime| mime.eq_ignore_ascii_case(&file.mime))
    }

    pub fn accepts_document(&self, file: &FileMeta) -> bool {
        file.extension().is_some_and(|ext| {
            self.document_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(&ext))
        })
    }
}

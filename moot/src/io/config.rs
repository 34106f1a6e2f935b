//! Platform configuration stored in `moot.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::upload::{
    DEFAULT_DOCUMENT_EXTENSIONS, DEFAULT_MAX_VIDEO_BYTES, DEFAULT_VIDEO_MIME_TYPES, UploadPolicy,
};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "moot.toml";

/// Platform configuration (TOML).
///
/// Missing fields default to the values the hosted platform uses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MootConfig {
    /// JSON catalog replacing the built-in sample data. Relative paths are
    /// resolved against the config file's directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,

    pub upload: UploadConfig,

    pub latency: LatencyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UploadConfig {
    /// Largest accepted video, in bytes.
    pub max_video_bytes: u64,
    pub video_mime_types: Vec<String>,
    /// Extensions (with leading dot) accepted for skeleton arguments and case files.
    pub document_extensions: Vec<String>,
}

/// Simulated network delay for uploads and the final submit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LatencyConfig {
    pub upload_ms: u64,
    pub submit_ms: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_video_bytes: DEFAULT_MAX_VIDEO_BYTES,
            video_mime_types: DEFAULT_VIDEO_MIME_TYPES.map(String::from).to_vec(),
            document_extensions: DEFAULT_DOCUMENT_EXTENSIONS.map(String::from).to_vec(),
        }
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            upload_ms: 1500,
            submit_ms: 2000,
        }
    }
}

impl UploadConfig {
    pub fn policy(&self) -> UploadPolicy {
        UploadPolicy {
            max_video_bytes: self.max_video_bytes,
            video_mime_types: self.video_mime_types.clone(),
            document_extensions: self.document_extensions.clone(),
        }
    }
}

impl LatencyConfig {
    pub fn upload(&self) -> Duration {
        Duration::from_millis(self.upload_ms)
    }

    pub fn submit(&self) -> Duration {
        Duration::from_millis(self.submit_ms)
    }
}

impl MootConfig {
    pub fn validate(&self) -> Result<()> {
        if self.upload.max_video_bytes == 0 {
            return Err(anyhow!("upload.max_video_bytes must be > 0"));
        }
        if self.upload.video_mime_types.is_empty()
            || self.upload.video_mime_types.iter().any(|m| m.trim().is_empty())
        {
            return Err(anyhow!(
                "upload.video_mime_types must be a non-empty array of non-empty strings"
            ));
        }
        if self.upload.document_extensions.is_empty() {
            return Err(anyhow!("upload.document_extensions must be a non-empty array"));
        }
        if let Some(ext) = self
            .upload
            .document_extensions
            .iter()
            .find(|ext| !ext.starts_with('.') || ext.len() < 2)
        {
            return Err(anyhow!(
                "upload.document_extensions entries must look like '.pdf' (got '{}')",
                ext
            ));
        }
        Ok(())
    }

    /// Catalog path resolved against the directory holding `config_path`.
    pub fn resolved_catalog_path(&self, config_path: &Path) -> Option<PathBuf> {
        let path = self.catalog_path.as_ref()?;
        if path.is_absolute() {
            return Some(path.clone());
        }
        let base = config_path.parent().unwrap_or_else(|| Path::new("."));
        Some(base.join(path))
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `MootConfig::default()`.
pub fn load_config(path: &Path) -> Result<MootConfig> {
    if !path.exists() {
        let cfg = MootConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: MootConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &MootConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

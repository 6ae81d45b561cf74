use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use utoipa::ToSchema;

/// Reference pair for a binary object living in the remote object store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RemoteAsset {
    pub remote_id: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Image,
    Video,
    Raw,
}

impl ResourceKind {
    /// Detects the resource kind from the file extension.
    pub fn detect(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "webp" | "bmp" | "svg" | "avif" | "heic" => {
                ResourceKind::Image
            }
            "mp4" | "mov" | "webm" | "mkv" | "avi" | "m4v" | "mpeg" | "mpg" | "mp3" | "wav"
            | "ogg" | "flac" => ResourceKind::Video,
            _ => ResourceKind::Raw,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Video => "video",
            ResourceKind::Raw => "raw",
        }
    }
}

/// What the object store reports back after a successful store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub remote_id: String,
    pub url: String,
    /// Media duration in seconds, when the store can tell.
    pub duration: Option<f64>,
}

impl From<StoredObject> for RemoteAsset {
    fn from(obj: StoredObject) -> Self {
        Self {
            remote_id: obj.remote_id,
            url: obj.url,
        }
    }
}

/// Remote object store collaborator
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn store(&self, local_path: &Path, kind: ResourceKind) -> Result<StoredObject>;
    async fn delete(&self, remote_id: &str, kind: ResourceKind) -> Result<()>;
}

/// A local temporary file that is removed when the value is dropped.
///
/// Ownership is the cleanup contract: whoever holds the `TempFile` last
/// deletes it, so the file is removed exactly once on every path.
#[derive(Debug)]
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("removed temp file {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("temp file already gone: {}", self.path.display())
            }
            Err(e) => tracing::error!("failed to remove temp file {}: {}", self.path.display(), e),
        }
    }
}

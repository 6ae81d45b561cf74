use crate::domain::assets::{ObjectStore, ResourceKind, StoredObject};
use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    /// Public base URL objects are served from (bucket endpoint or CDN).
    pub base_url: String,
}

impl S3Config {
    pub fn new(bucket: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            base_url: base_url.into(),
        }
    }

    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

/// Object keys look like `image/<uuid>.png`; the key doubles as the remote id.
pub fn object_key(local_path: &Path, kind: ResourceKind) -> String {
    match local_path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!(
            "{}/{}.{}",
            kind.as_str(),
            Uuid::new_v4(),
            ext.to_ascii_lowercase()
        ),
        None => format!("{}/{}", kind.as_str(), Uuid::new_v4()),
    }
}

fn content_type(local_path: &Path) -> &'static str {
    let ext = local_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        _ => "application/octet-stream",
    }
}

#[derive(Clone)]
pub struct S3ObjectStore {
    client: Arc<Client>,
    config: S3Config,
}

impl S3ObjectStore {
    pub fn new(client: Arc<Client>, config: S3Config) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    #[tracing::instrument(skip(self), fields(bucket = %self.config.bucket))]
    async fn store(&self, local_path: &Path, kind: ResourceKind) -> anyhow::Result<StoredObject> {
        let key = object_key(local_path, kind);
        let body = ByteStream::from_path(local_path)
            .await
            .with_context(|| format!("failed to read {}", local_path.display()))?;

        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(&key)
            .content_type(content_type(local_path))
            .body(body)
            .send()
            .await
            .with_context(|| format!("failed to upload {key}"))?;

        tracing::debug!("stored object {}", key);

        Ok(StoredObject {
            url: self.config.object_url(&key),
            remote_id: key,
            // S3 does not probe media, so the caller supplies the duration
            duration: None,
        })
    }

    #[tracing::instrument(skip(self), fields(bucket = %self.config.bucket))]
    async fn delete(&self, remote_id: &str, _kind: ResourceKind) -> anyhow::Result<()> {
        self.client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(remote_id)
            .send()
            .await
            .with_context(|| format!("failed to delete {remote_id}"))?;

        Ok(())
    }
}

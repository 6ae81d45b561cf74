use crate::domain::assets::{ObjectStore, RemoteAsset, ResourceKind, StoredObject, TempFile};
use crate::shared::error::AppError;
use std::future::Future;
use std::sync::Arc;

/// Moves uploaded temp files into the remote object store and retires
/// remote objects once nothing points at them.
///
/// Local cleanup rides on [`TempFile`]'s drop: every method that takes a
/// `TempFile` consumes it, so the file is gone when the call returns
/// whatever the outcome.
#[derive(Clone)]
pub struct AssetManager {
    store: Arc<dyn ObjectStore>,
}

impl AssetManager {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Uploads and reports everything the store returned, duration included.
    #[tracing::instrument(skip(self, file), fields(path = %file.path().display()))]
    pub async fn upload_media(&self, file: TempFile) -> Option<StoredObject> {
        let kind = ResourceKind::detect(file.path());
        match self.store.store(file.path(), kind).await {
            Ok(stored) => {
                tracing::debug!(remote_id = %stored.remote_id, "uploaded {}", kind.as_str());
                Some(stored)
            }
            Err(e) => {
                tracing::error!("upload to object store failed: {:?}", e);
                None
            }
        }
    }

    pub async fn upload(&self, file: TempFile) -> Option<RemoteAsset> {
        self.upload_media(file).await.map(Into::into)
    }

    /// Swaps `previous` for a freshly uploaded asset.
    ///
    /// `commit` persists the new reference. The old object is deleted only
    /// after `commit` succeeds; if it fails the new object is deleted
    /// instead, so the stored reference always points at a live object.
    pub async fn replace<T, F, Fut>(
        &self,
        previous: Option<RemoteAsset>,
        previous_kind: ResourceKind,
        file: TempFile,
        commit: F,
    ) -> Result<T, AppError>
    where
        F: FnOnce(RemoteAsset) -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let new_kind = ResourceKind::detect(file.path());
        let asset = self
            .upload(file)
            .await
            .ok_or_else(|| AppError::DependencyError("Error while uploading file".to_string()))?;
        let new_remote_id = asset.remote_id.clone();

        match commit(asset).await {
            Ok(value) => {
                if let Some(previous) = previous {
                    self.remove(Some(&previous.remote_id), previous_kind).await;
                }
                Ok(value)
            }
            Err(e) => {
                self.remove(Some(&new_remote_id), new_kind).await;
                Err(e)
            }
        }
    }

    /// Best-effort delete; failures are logged and swallowed.
    pub async fn remove(&self, remote_id: Option<&str>, kind: ResourceKind) {
        let Some(remote_id) = remote_id else {
            return;
        };

        if let Err(e) = self.store.delete(remote_id, kind).await {
            tracing::warn!(remote_id, "failed to delete remote asset: {:?}", e);
        }
    }
}

use crate::domain::assets::{ObjectStore, ResourceKind, StoredObject};
use anyhow::{anyhow, bail};
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct Objects {
    live: HashSet<String>,
    deleted: Vec<String>,
}

/// Object store kept in process memory. Failures can be switched on to
/// exercise cleanup paths.
#[derive(Clone, Default)]
pub struct InMemoryObjectStore {
    objects: Arc<Mutex<Objects>>,
    counter: Arc<AtomicUsize>,
    fail_store: Arc<AtomicBool>,
    fail_delete: Arc<AtomicBool>,
    /// When set, only stores of this kind fail.
    fail_kind: Arc<Mutex<Option<ResourceKind>>>,
    duration: Arc<Mutex<Option<f64>>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn objects(&self) -> MutexGuard<'_, Objects> {
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn fail_stores(&self, fail: bool) {
        self.fail_store.store(fail, Ordering::SeqCst);
    }

    pub fn fail_stores_of(&self, kind: Option<ResourceKind>) {
        *self.fail_kind.lock().unwrap_or_else(|e| e.into_inner()) = kind;
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    /// Duration reported for stored videos.
    pub fn report_duration(&self, seconds: Option<f64>) {
        *self.duration.lock().unwrap_or_else(|e| e.into_inner()) = seconds;
    }

    pub fn contains(&self, remote_id: &str) -> bool {
        self.objects().live.contains(remote_id)
    }

    pub fn live_count(&self) -> usize {
        self.objects().live.len()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.objects().deleted.clone()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn store(&self, local_path: &Path, kind: ResourceKind) -> anyhow::Result<StoredObject> {
        let kind_fails = *self.fail_kind.lock().unwrap_or_else(|e| e.into_inner()) == Some(kind);
        if self.fail_store.load(Ordering::SeqCst) || kind_fails {
            bail!("object store unavailable");
        }
        if !local_path.exists() {
            return Err(anyhow!("local file missing: {}", local_path.display()));
        }

        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let remote_id = format!("{}/{}", kind.as_str(), n);
        self.objects().live.insert(remote_id.clone());

        let duration = match kind {
            ResourceKind::Video => *self.duration.lock().unwrap_or_else(|e| e.into_inner()),
            _ => None,
        };

        Ok(StoredObject {
            url: format!("memory://{remote_id}"),
            remote_id,
            duration,
        })
    }

    async fn delete(&self, remote_id: &str, _kind: ResourceKind) -> anyhow::Result<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            bail!("object store unavailable");
        }
        let mut objects = self.objects();
        objects.live.remove(remote_id);
        objects.deleted.push(remote_id.to_string());
        Ok(())
    }
}

//! C1: flat in-memory object store — path to bytes, no hierarchy, no
//! persistence. Grounded in `examples/original_source/filesystem/memory_fs`.

use std::collections::HashMap;

use bytes::Bytes;
use tokio::sync::RwLock;

/// Outcome of a store operation. Not an error type: `AlreadyExists` and
/// `FileNotFound` are expected, recoverable outcomes a caller branches on,
/// not faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    Success,
    AlreadyExists,
    FileNotFound,
}

/// Flat path -> bytes map, guarded for concurrent readers / exclusive writers.
#[derive(Debug, Default)]
pub struct ObjectStore {
    entries: RwLock<HashMap<String, Bytes>>,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts `path` only if absent. Never overwrites.
    pub async fn add(&self, path: impl Into<String>, bytes: Bytes) -> StoreStatus {
        let path = path.into();
        let mut entries = self.entries.write().await;
        if entries.contains_key(&path) {
            return StoreStatus::AlreadyExists;
        }
        entries.insert(path, bytes);
        StoreStatus::Success
    }

    /// Returns a cheap clone of the stored bytes (`Bytes` is refcounted).
    pub async fn get(&self, path: &str) -> (StoreStatus, Option<Bytes>) {
        let entries = self.entries.read().await;
        match entries.get(path) {
            Some(bytes) => (StoreStatus::Success, Some(bytes.clone())),
            None => (StoreStatus::FileNotFound, None),
        }
    }

    pub async fn remove(&self, path: &str) -> StoreStatus {
        let mut entries = self.entries.write().await;
        if entries.remove(path).is_some() {
            StoreStatus::Success
        } else {
            StoreStatus::FileNotFound
        }
    }

    /// All stored paths, in no defined order.
    pub async fn list(&self) -> Vec<String> {
        let entries = self.entries.read().await;
        entries.keys().cloned().collect()
    }
}

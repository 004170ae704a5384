//! In-memory object store
//!
//! Backs tests and demos. Keys list in lexical order, deletes of missing
//! keys are no-ops, and puts report begin/end progress events, matching the
//! contract real transports must provide.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{ObjectEntry, ObjectStore, ProgressEvent, ProgressSink, StoreError};

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    last_modified: DateTime<Utc>,
}

/// Tokio-locked map of key to object
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<BTreeMap<String, StoredObject>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object synchronously, for test setup
    pub fn seed(&mut self, key: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.objects.get_mut().insert(
            key.into(),
            StoredObject {
                data: data.into(),
                last_modified: Utc::now(),
            },
        );
    }

    /// Number of stored objects
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Whether the store holds no objects
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    /// Whether `key` currently exists
    pub async fn contains(&self, key: &str) -> bool {
        self.objects.read().await.contains_key(key)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectEntry>, StoreError> {
        let objects = self.objects.read().await;
        Ok(objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, object)| ObjectEntry {
                key: key.clone(),
                size: object.data.len() as u64,
                last_modified: object.last_modified,
            })
            .collect())
    }

    async fn signed_url(&self, key: &str, expires_secs: u64) -> Result<String, StoreError> {
        // Deterministic stand-in for a presigned URL
        Ok(format!("memory://{}?expires={}", key, expires_secs))
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let objects = self.objects.read().await;
        objects
            .get(key)
            .map(|object| object.data.clone())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn delete_objects(&self, keys: &[String]) -> Result<(), StoreError> {
        let mut objects = self.objects.write().await;
        for key in keys {
            // Missing keys are ignored, per the boundary contract
            objects.remove(key);
        }
        Ok(())
    }

    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        progress: ProgressSink,
    ) -> Result<(), StoreError> {
        let total = body.len() as u64;
        if let Some(sink) = &progress {
            let _ = sink.send(ProgressEvent {
                key: key.to_string(),
                loaded: 0,
                total,
            });
        }
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                data: body,
                last_modified: Utc::now(),
            },
        );
        if let Some(sink) = &progress {
            let _ = sink.send(ProgressEvent {
                key: key.to_string(),
                loaded: total,
                total,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn list_filters_by_prefix_in_lexical_order() {
        let mut store = MemoryStore::new();
        store.seed("cases/b.mp3", b"bb".to_vec());
        store.seed("cases/a.mp3", b"aa".to_vec());
        store.seed("other/c.mp3", b"cc".to_vec());

        let entries = store.list("cases/").await.unwrap();
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["cases/a.mp3", "cases/b.mp3"]);
    }

    #[tokio::test]
    async fn delete_of_missing_key_is_a_noop() {
        let mut store = MemoryStore::new();
        store.seed("cases/a.mp3", b"aa".to_vec());

        store
            .delete_objects(&["cases/a.mp3".to_string(), "cases/ghost.mp3".to_string()])
            .await
            .unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn get_missing_object_is_not_found() {
        let store = MemoryStore::new();
        match store.get_object("nope").await {
            Err(StoreError::NotFound(key)) => assert_eq!(key, "nope"),
            other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn put_reports_progress_and_stores() {
        let store = MemoryStore::new();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        store
            .put_object("cases/new.mp3", b"abcdef".to_vec(), Some(tx))
            .await
            .unwrap();

        let first = rx.recv().await.unwrap();
        assert_eq!((first.loaded, first.total), (0, 6));
        let last = rx.recv().await.unwrap();
        assert_eq!((last.loaded, last.total), (6, 6));
        assert!(store.contains("cases/new.mp3").await);
    }
}

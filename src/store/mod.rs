//! Abstract object-store boundary
//!
//! The core treats the store as a flat key-value blob store with a signed-URL
//! capability. Real transports (S3 and friends) implement [`ObjectStore`]
//! outside this crate; [`MemoryStore`] backs tests and demos.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::mpsc;

pub mod memory;

pub use memory::MemoryStore;

/// Raw store record for one object
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectEntry {
    /// Full object key
    pub key: String,
    /// Object size in bytes
    pub size: u64,
    /// Last modification time
    pub last_modified: DateTime<Utc>,
}

/// Object store failure taxonomy
#[derive(Debug, Error)]
pub enum StoreError {
    /// Requested object does not exist. Expected for derived artifacts that
    /// were never produced; callers treat this as "feature unavailable".
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Transport or authorization failure
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Byte-progress event for one in-flight upload
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    /// Destination key of the upload this event belongs to
    pub key: String,
    pub loaded: u64,
    pub total: u64,
}

/// Optional channel a store implementation reports upload progress on
pub type ProgressSink = Option<mpsc::UnboundedSender<ProgressEvent>>;

/// Asynchronous blob store boundary.
///
/// All operations are non-blocking; the core's pure computations run in the
/// continuations of these calls.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List all objects whose key starts with `prefix`
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectEntry>, StoreError>;

    /// Produce a time-limited, credential-free retrieval URL.
    ///
    /// Does not check existence; a URL for a missing object simply fails
    /// at retrieval time.
    async fn signed_url(&self, key: &str, expires_secs: u64) -> Result<String, StoreError>;

    /// Fetch an object's bytes
    async fn get_object(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Delete a batch of objects. Keys that do not exist are silently
    /// ignored; deletion closures routinely reference artifacts that were
    /// never produced.
    async fn delete_objects(&self, keys: &[String]) -> Result<(), StoreError>;

    /// Store an object, reporting byte progress on `progress` when given
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        progress: ProgressSink,
    ) -> Result<(), StoreError>;
}

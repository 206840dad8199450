//! Object storage abstraction backing the manifest and arc-state stores.
//!
//! The contract is deliberately small: whole-object get/put/delete, prefix
//! listing, and a head probe. Writes accept a precondition so write-once
//! semantics can ride on the backend's conditional put where one exists; a
//! failed precondition is a normal result, not an error.
//!
//! The version token is an opaque `String` so backends with different
//! conditional-write currencies (numeric generations, etags, version ids)
//! fit the same trait.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{Error, Result};

/// Precondition for conditional writes.
#[derive(Debug, Clone)]
pub enum WritePrecondition {
    /// Write only if no object exists at the key.
    DoesNotExist,
    /// Write unconditionally.
    None,
}

/// Result of a conditional write.
#[derive(Debug, Clone)]
pub enum WriteResult {
    /// Write succeeded, returns the new version token.
    Success {
        /// The new version token after the write.
        version: String,
    },
    /// Precondition failed, returns the current version token.
    PreconditionFailed {
        /// The version of the object that caused the precondition to fail.
        current_version: String,
    },
}

/// Metadata about a stored object.
#[derive(Debug, Clone)]
pub struct ObjectMeta {
    /// Object key.
    pub path: String,
    /// Object size in bytes.
    pub size: u64,
    /// Opaque version token.
    pub version: String,
    /// Last modification timestamp.
    pub last_modified: Option<DateTime<Utc>>,
}

/// Object storage backend.
///
/// State and manifest stores are addressed through this trait so handlers can
/// run against cloud object storage in deployment and [`MemoryBackend`] in
/// tests.
#[async_trait]
pub trait StorageBackend: Send + Sync + 'static {
    /// Reads an entire object.
    ///
    /// Returns [`Error::NotFound`] if no object exists at the key.
    async fn get(&self, path: &str) -> Result<Bytes>;

    /// Writes an object, honoring the precondition.
    ///
    /// A failed precondition returns [`WriteResult::PreconditionFailed`],
    /// never an error.
    async fn put(
        &self,
        path: &str,
        data: Bytes,
        precondition: WritePrecondition,
    ) -> Result<WriteResult>;

    /// Deletes an object. Idempotent, deleting a missing key succeeds.
    async fn delete(&self, path: &str) -> Result<()>;

    /// Lists objects under the given key prefix.
    ///
    /// Ordering is backend-defined; callers needing a deterministic order
    /// sort the results themselves.
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>>;

    /// Probes for an object without reading its content.
    ///
    /// Returns `None` if no object exists at the key.
    async fn head(&self, path: &str) -> Result<Option<ObjectMeta>>;
}

/// In-memory storage backend for tests and local diagnostics.
///
/// Thread-safe via `RwLock`, with numeric versions exposed as strings.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    objects: Arc<RwLock<HashMap<String, StoredObject>>>,
}

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    version: i64,
    last_modified: DateTime<Utc>,
}

impl MemoryBackend {
    /// Creates a new empty memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn meta_of(path: &str, obj: &StoredObject) -> ObjectMeta {
    ObjectMeta {
        path: path.to_string(),
        size: obj.data.len() as u64,
        version: obj.version.to_string(),
        last_modified: Some(obj.last_modified),
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, path: &str) -> Result<Bytes> {
        let objects = self
            .objects
            .read()
            .map_err(|_| Error::internal("lock poisoned"))?;

        objects
            .get(path)
            .map(|o| o.data.clone())
            .ok_or_else(|| Error::NotFound(format!("object not found: {path}")))
    }

    async fn put(
        &self,
        path: &str,
        data: Bytes,
        precondition: WritePrecondition,
    ) -> Result<WriteResult> {
        let mut objects = self
            .objects
            .write()
            .map_err(|_| Error::internal("lock poisoned"))?;

        let current = objects.get(path);

        if let WritePrecondition::DoesNotExist = precondition {
            if let Some(obj) = current {
                return Ok(WriteResult::PreconditionFailed {
                    current_version: obj.version.to_string(),
                });
            }
        }

        let new_version = current.map_or(1, |o| o.version + 1);
        objects.insert(
            path.to_string(),
            StoredObject {
                data,
                version: new_version,
                last_modified: Utc::now(),
            },
        );
        drop(objects);

        Ok(WriteResult::Success {
            version: new_version.to_string(),
        })
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.objects
            .write()
            .map_err(|_| Error::internal("lock poisoned"))?
            .remove(path);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>> {
        let objects = self
            .objects
            .read()
            .map_err(|_| Error::internal("lock poisoned"))?;

        Ok(objects
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(path, obj)| meta_of(path, obj))
            .collect())
    }

    async fn head(&self, path: &str) -> Result<Option<ObjectMeta>> {
        let objects = self
            .objects
            .read()
            .map_err(|_| Error::internal("lock poisoned"))?;

        Ok(objects.get(path).map(|obj| meta_of(path, obj)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn roundtrip() {
        let backend = MemoryBackend::new();
        let data = Bytes::from("lot contents");

        let result = backend
            .put("state/file", data.clone(), WritePrecondition::None)
            .await
            .expect("put should succeed");
        assert!(matches!(result, WriteResult::Success { ref version } if version == "1"));

        let retrieved = backend.get("state/file").await.expect("get should succeed");
        assert_eq!(retrieved, data);
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let backend = MemoryBackend::new();

        let err = backend.get("absent").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn does_not_exist_precondition_rejects_second_write() {
        let backend = MemoryBackend::new();

        let first = backend
            .put("once", Bytes::from("a"), WritePrecondition::DoesNotExist)
            .await
            .expect("should succeed");
        assert!(matches!(first, WriteResult::Success { .. }));

        let second = backend
            .put("once", Bytes::from("b"), WritePrecondition::DoesNotExist)
            .await
            .expect("should succeed");
        assert!(matches!(second, WriteResult::PreconditionFailed { .. }));

        // first write wins
        assert_eq!(backend.get("once").await.unwrap(), Bytes::from("a"));
    }

    #[tokio::test]
    async fn list_filters_by_prefix() {
        let backend = MemoryBackend::new();

        for key in ["lot=1/running.arc", "lot=1/complete.arc", "lot=2/running.arc"] {
            backend
                .put(key, Bytes::new(), WritePrecondition::None)
                .await
                .unwrap();
        }

        let lot_one = backend.list("lot=1/").await.expect("should succeed");
        assert_eq!(lot_one.len(), 2);

        let none = backend.list("lot=3/").await.expect("should succeed");
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let backend = MemoryBackend::new();

        backend
            .put("gone", Bytes::from("x"), WritePrecondition::None)
            .await
            .unwrap();
        backend.delete("gone").await.expect("should succeed");
        backend.delete("gone").await.expect("should still succeed");

        assert!(backend.head("gone").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn head_reports_metadata() {
        let backend = MemoryBackend::new();
        backend
            .put("meta", Bytes::from("data"), WritePrecondition::None)
            .await
            .unwrap();

        let meta = backend
            .head("meta")
            .await
            .expect("head should succeed")
            .expect("object should exist");

        assert_eq!(meta.path, "meta");
        assert_eq!(meta.size, 4);
        assert!(!meta.version.is_empty());
        assert!(meta.last_modified.is_some());
    }
}

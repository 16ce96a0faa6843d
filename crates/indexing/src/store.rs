//! Record store seam.
//!
//! The indexing engine reads related records through [`RecordStore`] when it
//! follows a chained reference that is not available in a compound document.
//! Storage itself lives outside this crate; [`InMemoryRecordStore`] serves
//! tests and command-line tools.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::error::StoreError;
use crate::types::RecordIdentity;

/// A stored record body as returned by a [`RecordStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// The serialized body.
    pub body: Vec<u8>,
    /// The version id, if the store tracks one.
    pub version_id: Option<String>,
}

impl RawRecord {
    /// Creates a raw record without a version.
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            version_id: None,
        }
    }

    /// Sets the version id.
    pub fn with_version(mut self, version_id: impl Into<String>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }
}

/// Read access to stored records.
///
/// A read is the only suspension point of an indexing call. Implementations
/// apply no timeout of their own unless documented; callers that need one
/// wrap the indexing call.
///
/// # Example
///
/// ```
/// use helios_indexing::store::{InMemoryRecordStore, RecordStore};
///
/// # tokio_test::block_on(async {
/// let store = InMemoryRecordStore::new();
/// store.insert_json(&serde_json::json!({"resourceType": "Patient", "id": "p1"}));
///
/// let found = store.read("Patient", "p1").await.unwrap();
/// assert!(found.is_some());
/// assert!(store.read("Patient", "p2").await.unwrap().is_none());
/// # });
/// ```
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns a human-readable name for this store.
    fn backend_name(&self) -> &'static str;

    /// Reads the current body of a record.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the record does not exist, which is not an error.
    ///
    /// # Errors
    ///
    /// * `StoreError::Unavailable` - the store could not be reached
    /// * `StoreError::Backend` - the store failed while serving the read
    async fn read(&self, kind: &str, id: &str) -> Result<Option<RawRecord>, StoreError>;
}

/// A [`RecordStore`] backed by a map.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<RecordIdentity, RawRecord>>,
}

impl InMemoryRecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a body under a kind and id, replacing any previous body.
    pub fn insert(&self, kind: &str, id: &str, record: RawRecord) {
        self.records
            .write()
            .insert(RecordIdentity::new(kind, id), record);
    }

    /// Stores a JSON record under its own `resourceType` and `id`.
    ///
    /// Returns the identity it was stored under, or `None` if the value has
    /// no kind or id.
    pub fn insert_json(&self, value: &Value) -> Option<RecordIdentity> {
        let kind = value.get("resourceType")?.as_str()?;
        let id = value.get("id")?.as_str()?;
        let body = serde_json::to_vec(value).ok()?;
        let version = value
            .get("meta")
            .and_then(|meta| meta.get("versionId"))
            .and_then(Value::as_str);

        let mut record = RawRecord::new(body);
        if let Some(version) = version {
            record = record.with_version(version);
        }
        self.insert(kind, id, record);
        Some(RecordIdentity::new(kind, id))
    }

    /// Removes a record.
    pub fn remove(&self, kind: &str, id: &str) -> Option<RawRecord> {
        self.records.write().remove(&RecordIdentity::new(kind, id))
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn read(&self, kind: &str, id: &str) -> Result<Option<RawRecord>, StoreError> {
        let record = self
            .records
            .read()
            .get(&RecordIdentity::new(kind, id))
            .cloned();
        tracing::trace!(kind = kind, id = id, found = record.is_some(), "In-memory read");
        Ok(record)
    }
}

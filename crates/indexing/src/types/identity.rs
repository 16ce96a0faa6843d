//! Record identity types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a record: its kind and logical id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordIdentity {
    /// The resource kind (e.g., "Patient").
    pub kind: String,
    /// The logical id.
    pub id: String,
}

impl RecordIdentity {
    /// Creates a new identity.
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Returns the relative reference form, `Kind/id`.
    pub fn relative(&self) -> String {
        format!("{}/{}", self.kind, self.id)
    }
}

impl fmt::Display for RecordIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

/// A record as known to the storage layer, prior to indexing.
///
/// The body travels separately as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    identity: RecordIdentity,
    version_id: Option<String>,
}

impl StoredRecord {
    /// Creates a stored record handle.
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            identity: RecordIdentity::new(kind, id),
            version_id: None,
        }
    }

    /// Sets the version id.
    pub fn with_version(mut self, version_id: impl Into<String>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }

    /// Returns the record identity.
    pub fn identity(&self) -> &RecordIdentity {
        &self.identity
    }

    /// Returns the resource kind.
    pub fn kind(&self) -> &str {
        &self.identity.kind
    }

    /// Returns the logical id.
    pub fn id(&self) -> &str {
        &self.identity.id
    }

    /// Returns the version id, if known.
    pub fn version_id(&self) -> Option<&str> {
        self.version_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_forms() {
        let identity = RecordIdentity::new("Patient", "123");
        assert_eq!(identity.relative(), "Patient/123");
        assert_eq!(identity.to_string(), "Patient/123");
    }

    #[test]
    fn test_stored_record() {
        let stored = StoredRecord::new("CarePlan", "cp1").with_version("3");
        assert_eq!(stored.kind(), "CarePlan");
        assert_eq!(stored.id(), "cp1");
        assert_eq!(stored.version_id(), Some("3"));
    }
}

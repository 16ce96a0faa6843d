//! Error types for the indexing engine.
//!
//! Only record-level failures surface to callers as [`IndexingError`].
//! Field-level and chain-level problems are logged and skipped, so they have
//! no variant here. [`StoreError`] is produced by [`RecordStore`] implementations
//! and consumed (logged) by the chain coordinator.
//!
//! [`RecordStore`]: crate::store::RecordStore

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// Fatal, record-level indexing failure.
///
/// No partial index is produced when one of these is returned.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// The record body could not be parsed into a typed record.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The parsed body declares a different kind than the stored record.
    #[error("record kind mismatch: expected {expected}, body declares {actual}")]
    KindMismatch { expected: String, actual: String },

    /// No extractor is registered for the record's own kind.
    #[error("unsupported resource kind: {kind}")]
    UnsupportedKind { kind: String },
}

/// Errors raised while turning a raw body into a [`Record`](crate::model::Record).
#[derive(Error, Debug)]
pub enum ParseError {
    /// The body is not valid JSON.
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    /// The body is valid JSON but not an object.
    #[error("record body must be a JSON object")]
    NotAnObject,

    /// The body has no `resourceType` string.
    #[error("record body is missing resourceType")]
    MissingResourceType,
}

/// Errors returned by record stores.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("record store unavailable: {message}")]
    Unavailable { message: String },

    /// The store failed while serving the read.
    #[error("record store error reading {kind}/{id}: {message}")]
    Backend {
        kind: String,
        id: String,
        message: String,
    },
}

/// Result alias for fatal indexing operations.
pub type IndexingResult<T> = Result<T, IndexingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = IndexingError::KindMismatch {
            expected: "Patient".to_string(),
            actual: "Observation".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "record kind mismatch: expected Patient, body declares Observation"
        );

        let err = IndexingError::UnsupportedKind {
            kind: "Unicorn".to_string(),
        };
        assert!(err.to_string().contains("Unicorn"));
    }

    #[test]
    fn test_parse_error_conversion() {
        let json_err = serde_json::from_slice::<serde_json::Value>(b"{not json").unwrap_err();
        let err: IndexingError = ParseError::from(json_err).into();
        assert!(matches!(err, IndexingError::Parse(ParseError::Json(_))));
    }
}

//! Helios FHIR Server Search Parameter Indexing
//!
//! This crate derives the search index of stored FHIR records. Given a record's
//! raw body it produces the flat list of [`ParameterRecord`] rows a search
//! backend stores and queries: one row per searchable value, typed, normalized
//! for matching, and labeled with the search parameter it answers.
//!
//! # Features
//!
//! - **Per-kind extraction**: declarative rule tables for each supported kind
//! - **Normalization**: token `system|code` keys, folded strings, date ranges,
//!   exact-decimal quantity keys
//! - **References**: resolution against the server base, typed targets, and
//!   chained indexing of referenced records
//! - **Compound documents**: chains resolve against sibling bundle entries
//!   before the record store is consulted
//! - **Composites**: `$`-joined keys over related component values
//!
//! # Architecture
//!
//! - [`service`] - the [`IndexingService`] entry point
//! - [`registry`] - the kind-to-extractor registry
//! - [`extract`] - extractors, rule tables, and the extraction context
//! - [`chain`] - chained reference resolution and splicing
//! - [`model`] - typed access to parsed records
//! - [`encoding`] - value normalization and key encodings
//! - [`reference`] - reference resolution and compound documents
//! - [`store`] - the record store seam
//! - [`types`] - index rows and identities
//! - [`error`] - error types
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use helios_indexing::{IndexingService, StoredRecord};
//! use helios_indexing::store::InMemoryRecordStore;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let store = Arc::new(InMemoryRecordStore::new());
//! store.insert_json(&json!({
//!     "resourceType": "ServiceRequest",
//!     "id": "42",
//!     "status": "active"
//! }));
//!
//! let service = IndexingService::new().with_store(store);
//! let body = json!({
//!     "resourceType": "CarePlan",
//!     "id": "cp1",
//!     "basedOn": [{"reference": "ServiceRequest/42"}]
//! });
//!
//! let rows = service
//!     .index(
//!         &StoredRecord::new("CarePlan", "cp1"),
//!         &serde_json::to_vec(&body).unwrap(),
//!         "http://x/fhir",
//!         None,
//!     )
//!     .await
//!     .unwrap();
//!
//! assert!(rows.iter().any(|r| r.param_name == "based-on"
//!     && r.value == "http://x/fhir/ServiceRequest/42"));
//! assert!(rows.iter().any(|r| r.param_name == "based-on.status"
//!     && r.value == "active"));
//! # });
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod chain;
pub mod config;
pub mod encoding;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod reference;
pub mod registry;
pub mod service;
pub mod store;
pub mod tags;
pub mod types;

// Re-export commonly used types at crate root
pub use config::IndexingConfig;
pub use error::{IndexingError, IndexingResult, ParseError, StoreError};
pub use service::IndexingService;
pub use types::{DateRange, ParamType, ParameterRecord, RecordIdentity, StoredRecord};

// Re-export extension seams
pub use extract::{ExtractionContext, Extractor};
pub use parser::{JsonRecordParser, RecordParser};
pub use reference::CompoundDocument;
pub use registry::ExtractorRegistry;
pub use store::{InMemoryRecordStore, RecordStore};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! The indexing entry point.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::chain::ChainCoordinator;
use crate::config::IndexingConfig;
use crate::error::{IndexingError, IndexingResult};
use crate::extract::ExtractionContext;
use crate::model::Record;
use crate::parser::{JsonRecordParser, RecordParser};
use crate::reference::CompoundDocument;
use crate::registry::ExtractorRegistry;
use crate::store::RecordStore;
use crate::tags::tag_rows;
use crate::types::{ParameterRecord, StoredRecord};

/// Derives the index rows of stored records.
///
/// The service is cheap to clone and safe to share across tasks. Each call is
/// an independent computation over its inputs; the only suspension points are
/// store reads made while following chained references.
///
/// # Example
///
/// ```
/// use helios_indexing::{IndexingService, StoredRecord};
///
/// # tokio_test::block_on(async {
/// let service = IndexingService::new();
/// let body = br#"{"resourceType": "Patient", "id": "p1", "gender": "female"}"#;
///
/// let rows = service
///     .index(&StoredRecord::new("Patient", "p1"), body, "http://x/fhir", None)
///     .await
///     .unwrap();
/// assert_eq!(rows[0].param_name, "_id");
/// assert!(rows.iter().any(|r| r.param_name == "gender" && r.value == "female"));
/// # });
/// ```
#[derive(Clone)]
pub struct IndexingService {
    registry: Arc<ExtractorRegistry>,
    parser: Arc<dyn RecordParser>,
    store: Option<Arc<dyn RecordStore>>,
    config: IndexingConfig,
}

impl IndexingService {
    /// Creates a service over the shared registry and the JSON parser, with
    /// no store and the default configuration.
    pub fn new() -> Self {
        Self {
            registry: ExtractorRegistry::shared(),
            parser: Arc::new(JsonRecordParser::new()),
            store: None,
            config: IndexingConfig::default(),
        }
    }

    /// Sets the store chained references are read from.
    pub fn with_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replaces the registry.
    pub fn with_registry(mut self, registry: Arc<ExtractorRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Replaces the body parser.
    pub fn with_parser(mut self, parser: Arc<dyn RecordParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: IndexingConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &IndexingConfig {
        &self.config
    }

    /// The registry in use.
    pub fn registry(&self) -> &Arc<ExtractorRegistry> {
        &self.registry
    }

    /// Indexes a stored record from its raw body.
    ///
    /// # Arguments
    ///
    /// * `stored` - the record's identity as known to storage
    /// * `raw_body` - the serialized body
    /// * `base_url` - server base URL relative references resolve against
    /// * `compound` - sibling records to resolve chained references in
    ///
    /// # Errors
    ///
    /// * `IndexingError::Parse` - the body is not a parsable record
    /// * `IndexingError::KindMismatch` - the body declares another kind
    /// * `IndexingError::UnsupportedKind` - no extractor exists for the kind
    ///
    /// Problems with individual fields or chained references are logged and
    /// only remove the affected rows.
    #[instrument(skip(self, raw_body, compound), fields(kind = %stored.kind(), id = %stored.id()))]
    pub async fn index(
        &self,
        stored: &StoredRecord,
        raw_body: &[u8],
        base_url: &str,
        compound: Option<Arc<CompoundDocument>>,
    ) -> IndexingResult<Vec<ParameterRecord>> {
        let record = self.parser.parse(raw_body)?;
        self.index_record(stored, &record, base_url, compound).await
    }

    /// Indexes an already parsed record.
    ///
    /// Same contract as [`index`](Self::index) without the parse step.
    pub async fn index_record(
        &self,
        stored: &StoredRecord,
        record: &Record,
        base_url: &str,
        compound: Option<Arc<CompoundDocument>>,
    ) -> IndexingResult<Vec<ParameterRecord>> {
        if record.kind() != stored.kind() {
            return Err(IndexingError::KindMismatch {
                expected: stored.kind().to_string(),
                actual: record.kind().to_string(),
            });
        }
        let extractor =
            self.registry
                .lookup(stored.kind())
                .ok_or_else(|| IndexingError::UnsupportedKind {
                    kind: stored.kind().to_string(),
                })?;

        let owner = stored.identity().clone();
        let ctx = ExtractionContext::new(owner.clone(), base_url)
            .with_chaining(self.config.max_chain_depth > 0)
            .with_compound(compound)
            .with_max_composite_combinations(self.config.max_composite_combinations);

        let extraction = extractor.extract(record, &ctx);
        let requested_chains = extraction.chains.len();

        let mut rows = self
            .coordinator()
            .splice(&owner, extraction, base_url)
            .await;
        if self.config.index_tags {
            rows.extend(tag_rows(&owner, record.meta()));
        }

        debug!(
            rows = rows.len(),
            chains = requested_chains,
            "Indexed record"
        );
        Ok(rows)
    }

    fn coordinator(&self) -> ChainCoordinator {
        let coordinator = ChainCoordinator::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.parser),
            self.config.clone(),
        );
        match &self.store {
            Some(store) => coordinator.with_store(Arc::clone(store)),
            None => coordinator,
        }
    }
}

impl Default for IndexingService {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IndexingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexingService")
            .field("registry", &self.registry)
            .field("store", &self.store.as_ref().map(|s| s.backend_name()))
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    #[tokio::test]
    async fn test_kind_mismatch_is_fatal() {
        let service = IndexingService::new();
        let result = service
            .index(
                &StoredRecord::new("Patient", "p1"),
                br#"{"resourceType": "Observation", "id": "p1"}"#,
                "http://x/fhir",
                None,
            )
            .await;
        assert!(matches!(result, Err(IndexingError::KindMismatch { .. })));
    }

    #[tokio::test]
    async fn test_unsupported_kind_is_fatal() {
        let service = IndexingService::new();
        let result = service
            .index(
                &StoredRecord::new("Unicorn", "u1"),
                br#"{"resourceType": "Unicorn", "id": "u1"}"#,
                "http://x/fhir",
                None,
            )
            .await;
        assert!(matches!(result, Err(IndexingError::UnsupportedKind { .. })));
    }

    #[tokio::test]
    async fn test_parse_failure_is_fatal() {
        let service = IndexingService::new();
        let result = service
            .index(&StoredRecord::new("Patient", "p1"), b"not json", "", None)
            .await;
        assert!(matches!(result, Err(IndexingError::Parse(ParseError::Json(_)))));
    }

    #[tokio::test]
    async fn test_tag_rows_can_be_disabled() {
        let body = br#"{"resourceType": "Patient", "id": "p1", "meta": {"tag": [{"code": "x"}]}}"#;
        let stored = StoredRecord::new("Patient", "p1");

        let with_tags = IndexingService::new()
            .index(&stored, body, "", None)
            .await
            .unwrap();
        assert!(with_tags.iter().any(|r| r.param_name == "_tag"));

        let without = IndexingService::new()
            .with_config(IndexingConfig::default().with_index_tags(false))
            .index(&stored, body, "", None)
            .await
            .unwrap();
        assert!(without.iter().all(|r| r.param_name != "_tag"));
    }

    #[tokio::test]
    async fn test_owner_comes_from_stored_record() {
        let rows = IndexingService::new()
            .index(
                &StoredRecord::new("Patient", "stored-id"),
                br#"{"resourceType": "Patient", "id": "body-id"}"#,
                "",
                None,
            )
            .await
            .unwrap();
        assert!(rows.iter().all(|r| r.owner.id == "stored-id"));
        assert_eq!(rows[0].value, "stored-id");
    }
}

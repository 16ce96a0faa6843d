//! Chained-reference resolution.
//!
//! A [`ChainRequest`] asks for the record behind a reference to be indexed
//! under the parent parameter. The related record is taken from the request's
//! compound document when it is there, and from the [`RecordStore`]
//! otherwise. Its rows are relabeled `param:Kind.child` (and `param.child`
//! when the reference admits a single kind) and attributed to the parent's
//! owner.
//!
//! Store-backed chains go one level deep: the related record is extracted
//! with chaining disabled. Chains inside a compound document recurse, bounded
//! by [`IndexingConfig::max_chain_depth`] and by the records already on the
//! current chain path, so `A -> B -> A` stops at the second `A`.
//!
//! A chain that cannot be resolved contributes no rows and never fails the
//! parent.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::config::IndexingConfig;
use crate::extract::{ChainRequest, Extraction, ExtractionContext};
use crate::parser::RecordParser;
use crate::reference::bundle::BundleEntry;
use crate::reference::ParsedReference;
use crate::registry::ExtractorRegistry;
use crate::store::RecordStore;
use crate::types::{ParameterRecord, RecordIdentity};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Resolves chain requests and splices their rows into the parent's rows.
#[derive(Clone)]
pub struct ChainCoordinator {
    registry: Arc<ExtractorRegistry>,
    parser: Arc<dyn RecordParser>,
    store: Option<Arc<dyn RecordStore>>,
    config: IndexingConfig,
}

impl ChainCoordinator {
    /// Creates a coordinator without a store.
    pub fn new(
        registry: Arc<ExtractorRegistry>,
        parser: Arc<dyn RecordParser>,
        config: IndexingConfig,
    ) -> Self {
        Self {
            registry,
            parser,
            store: None,
            config,
        }
    }

    /// Sets the store consulted for references outside compound documents.
    pub fn with_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Resolves every chain request of a top-level extraction, in field
    /// order, and returns the rows with chained rows spliced in after their
    /// parent reference rows.
    pub async fn splice(
        &self,
        root: &RecordIdentity,
        extraction: Extraction,
        base_url: &str,
    ) -> Vec<ParameterRecord> {
        let mut path = root_path(root, &extraction);
        self.splice_at(extraction, base_url, 1, &mut path).await
    }

    /// Resolves a single request as a first-level chain.
    ///
    /// The returned rows are relabeled and owned by the request's owner.
    pub async fn resolve(&self, request: &ChainRequest, base_url: &str) -> Vec<ParameterRecord> {
        let mut path = vec![request.owner.relative()];
        self.resolve_at(request, base_url, 1, &mut path).await
    }

    fn splice_at<'a>(
        &'a self,
        extraction: Extraction,
        base_url: &'a str,
        depth: usize,
        path: &'a mut Vec<String>,
    ) -> BoxFuture<'a, Vec<ParameterRecord>> {
        Box::pin(async move {
            let Extraction { rows, chains } = extraction;
            if chains.is_empty() {
                return rows;
            }

            let mut out = Vec::with_capacity(rows.len());
            let mut rows = rows.into_iter();
            let mut emitted = 0;
            for request in &chains {
                let take = request.position.saturating_sub(emitted);
                out.extend(rows.by_ref().take(take));
                emitted += take;
                let chained = self.resolve_at(request, base_url, depth, path).await;
                out.extend(chained);
            }
            out.extend(rows);
            out
        })
    }

    fn resolve_at<'a>(
        &'a self,
        request: &'a ChainRequest,
        base_url: &'a str,
        depth: usize,
        path: &'a mut Vec<String>,
    ) -> BoxFuture<'a, Vec<ParameterRecord>> {
        Box::pin(async move {
            if depth > self.config.max_chain_depth {
                tracing::debug!(
                    param = %request.param_name,
                    reference = %request.raw_reference,
                    depth = depth,
                    "Chain depth limit reached, skipping"
                );
                return Vec::new();
            }

            let parsed = ParsedReference::parse(&request.raw_reference);
            if let Some(document) = request.compound.as_deref() {
                if let Some(entry) = document.locate(&request.raw_reference) {
                    return self
                        .resolve_in_document(request, entry, &parsed, base_url, depth, path)
                        .await;
                }
                if !self.config.chain_store_fallback {
                    tracing::debug!(
                        param = %request.param_name,
                        reference = %request.raw_reference,
                        "Reference not found in compound document, skipping"
                    );
                    return Vec::new();
                }
            }

            self.resolve_in_store(request, &parsed, base_url).await
        })
    }

    async fn resolve_in_document(
        &self,
        request: &ChainRequest,
        entry: &BundleEntry,
        parsed: &ParsedReference,
        base_url: &str,
        depth: usize,
        path: &mut Vec<String>,
    ) -> Vec<ParameterRecord> {
        let record = &entry.record;
        let kind = parsed.kind().unwrap_or(record.kind());
        if kind != record.kind() {
            tracing::debug!(
                reference = %request.raw_reference,
                declared = %record.kind(),
                "Compound document entry has a different kind than referenced, skipping"
            );
            return Vec::new();
        }
        if !accepts(request.targets, kind) {
            tracing::debug!(
                param = %request.param_name,
                kind = %kind,
                "Chain target not allowed, skipping"
            );
            return Vec::new();
        }
        let Some(extractor) = self.registry.lookup(kind) else {
            tracing::debug!(kind = %kind, "No extractor for chained kind, skipping");
            return Vec::new();
        };

        let keys = visit_keys(entry);
        if keys.iter().any(|key| path.contains(key)) {
            tracing::debug!(
                param = %request.param_name,
                reference = %request.raw_reference,
                "Chain cycle detected, skipping"
            );
            return Vec::new();
        }

        let source = RecordIdentity::new(record.kind(), record.id().unwrap_or_default());
        let ctx = ExtractionContext::new(source, base_url)
            .with_chaining(depth < self.config.max_chain_depth)
            .with_compound(request.compound.clone())
            .with_max_composite_combinations(self.config.max_composite_combinations);
        let extraction = extractor.extract(record, &ctx);

        let pushed = keys.len();
        path.extend(keys);
        let rows = self.splice_at(extraction, base_url, depth + 1, path).await;
        path.truncate(path.len() - pushed);

        relabel(request, kind, rows)
    }

    async fn resolve_in_store(
        &self,
        request: &ChainRequest,
        parsed: &ParsedReference,
        base_url: &str,
    ) -> Vec<ParameterRecord> {
        let Some(store) = self.store.as_ref() else {
            tracing::debug!(
                reference = %request.raw_reference,
                "No record store configured, skipping chain"
            );
            return Vec::new();
        };

        let (kind, id) = match parsed {
            ParsedReference::Relative { kind, id, .. } => (kind.as_str(), id.as_str()),
            ParsedReference::Absolute {
                url,
                kind: Some(kind),
                id: Some(id),
            } if is_local(url, base_url) => (kind.as_str(), id.as_str()),
            _ => {
                tracing::debug!(
                    reference = %request.raw_reference,
                    "Reference cannot be read from the store, skipping"
                );
                return Vec::new();
            }
        };

        if !accepts(request.targets, kind) {
            tracing::debug!(
                param = %request.param_name,
                kind = %kind,
                "Chain target not allowed, skipping"
            );
            return Vec::new();
        }
        let Some(extractor) = self.registry.lookup(kind) else {
            tracing::debug!(kind = %kind, "No extractor for chained kind, skipping");
            return Vec::new();
        };

        let raw = match store.read(kind, id).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(kind = %kind, id = %id, "Chained record not found, skipping");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(
                    kind = %kind,
                    id = %id,
                    backend = store.backend_name(),
                    error = %e,
                    "Failed to read chained record, skipping"
                );
                return Vec::new();
            }
        };

        let record = match self.parser.parse(&raw.body) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(
                    kind = %kind,
                    id = %id,
                    error = %e,
                    "Failed to parse chained record, skipping"
                );
                return Vec::new();
            }
        };
        if record.kind() != kind {
            tracing::warn!(
                expected = %kind,
                actual = %record.kind(),
                "Stored record has a different kind than referenced, skipping"
            );
            return Vec::new();
        }

        let ctx = ExtractionContext::new(RecordIdentity::new(kind, id), base_url)
            .with_chaining(false)
            .with_max_composite_combinations(self.config.max_composite_combinations);
        let extraction = extractor.extract(&record, &ctx);
        relabel(request, kind, extraction.rows)
    }
}

impl std::fmt::Debug for ChainCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainCoordinator")
            .field("store", &self.store.as_ref().map(|s| s.backend_name()))
            .field("config", &self.config)
            .finish()
    }
}

fn accepts(targets: &[&str], kind: &str) -> bool {
    targets.is_empty() || targets.iter().any(|target| *target == kind)
}

fn is_local(url: &str, base_url: &str) -> bool {
    let base = base_url.trim_end_matches('/');
    !base.is_empty()
        && url
            .strip_prefix(base)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Keys a compound-document entry is known by on the chain path.
fn visit_keys(entry: &BundleEntry) -> Vec<String> {
    let mut keys: Vec<String> = entry.full_url.iter().cloned().collect();
    keys.extend(entry.record.identity().map(|identity| identity.relative()));
    keys
}

/// Chain path a top-level extraction starts from: the root's relative key,
/// plus its full URL when a compound document holds it.
fn root_path(root: &RecordIdentity, extraction: &Extraction) -> Vec<String> {
    let relative = root.relative();
    let full_url = extraction
        .chains
        .iter()
        .find_map(|request| request.compound.as_deref())
        .and_then(|doc| doc.locate(&relative))
        .and_then(|entry| entry.full_url.clone());
    let mut path = vec![relative];
    path.extend(full_url);
    path
}

/// Relabels chained rows under the parent parameter and owner.
fn relabel(request: &ChainRequest, kind: &str, rows: Vec<ParameterRecord>) -> Vec<ParameterRecord> {
    let single_target = request.targets.len() == 1;
    let mut out = Vec::with_capacity(rows.len() * if single_target { 2 } else { 1 });
    for row in rows {
        out.push(row.relabeled(
            format!("{}:{}.{}", request.param_name, kind, row.param_name),
            &request.owner,
        ));
        if single_target {
            out.push(row.relabeled(
                format!("{}.{}", request.param_name, row.param_name),
                &request.owner,
            ));
        }
    }
    out
}

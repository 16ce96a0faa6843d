//! Per-kind extraction of index rows.
//!
//! An [`Extractor`] turns one [`Record`] into its index rows plus the chain
//! requests for references that should be followed. Most kinds are handled
//! by [`RuleExtractor`] over a static [`KindTable`]; kinds that need to look
//! at their own envelope (such as `Bundle`) implement [`Extractor`] directly.
//!
//! Extractors never fail: malformed elements are logged at `debug` and
//! skipped, and record-level problems are reported by the caller before an
//! extractor is invoked.

mod bundle;
mod composite;
mod emit;
mod rules;

pub mod rule;
pub mod tables;

use std::fmt;
use std::sync::Arc;

pub use bundle::BundleExtractor;
pub use rule::{
    ComponentKind, CompositeComponent, CompositeRule, ExtractionRule, FieldShape, KindTable,
    ReferenceRule,
};
pub use rules::RuleExtractor;

use crate::model::Record;
use crate::reference::CompoundDocument;
use crate::types::{ParamType, ParameterRecord, RecordIdentity};

/// Default cap on composite keys produced per group element.
pub const DEFAULT_MAX_COMPOSITE_COMBINATIONS: usize = 64;

/// Produces index rows for one kind.
pub trait Extractor: Send + Sync + fmt::Debug {
    /// The kind this extractor handles.
    fn kind(&self) -> &str;

    /// Extracts rows and chain requests from a record.
    fn extract(&self, record: &Record, ctx: &ExtractionContext) -> Extraction;

    /// Parameter names and types this extractor emits, excluding the
    /// resource-level and tag parameters every kind shares.
    fn param_types(&self) -> Vec<(&'static str, ParamType)>;
}

/// Inputs shared by every rule while extracting one record.
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    /// Identity rows are attributed to.
    pub owner: RecordIdentity,
    /// Server base URL relative references are resolved against.
    pub base_url: String,
    /// Whether chainable references produce chain requests.
    pub chaining: bool,
    /// Sibling records available for local reference resolution.
    pub compound: Option<Arc<CompoundDocument>>,
    /// Cap on composite keys produced per group element.
    pub max_composite_combinations: usize,
}

impl ExtractionContext {
    /// Creates a context with chaining enabled and no compound document.
    pub fn new(owner: RecordIdentity, base_url: impl Into<String>) -> Self {
        Self {
            owner,
            base_url: base_url.into(),
            chaining: true,
            compound: None,
            max_composite_combinations: DEFAULT_MAX_COMPOSITE_COMBINATIONS,
        }
    }

    /// Enables or disables chain requests.
    pub fn with_chaining(mut self, chaining: bool) -> Self {
        self.chaining = chaining;
        self
    }

    /// Sets the compound document.
    pub fn with_compound(mut self, compound: Option<Arc<CompoundDocument>>) -> Self {
        self.compound = compound;
        self
    }

    /// Sets the composite combination cap.
    pub fn with_max_composite_combinations(mut self, max: usize) -> Self {
        self.max_composite_combinations = max;
        self
    }
}

/// A request to index a referenced record under a parent parameter.
///
/// Created by an extractor and consumed by the chain coordinator; never
/// persisted.
#[derive(Debug, Clone)]
pub struct ChainRequest {
    /// Owner of the parent row.
    pub owner: RecordIdentity,
    /// Parent parameter name.
    pub param_name: String,
    /// The reference as written in the record.
    pub raw_reference: String,
    /// Kinds the reference may point to. Empty means any kind.
    pub targets: &'static [&'static str],
    /// Compound document to resolve the reference in.
    pub compound: Option<Arc<CompoundDocument>>,
    /// Row index where chained rows are spliced in.
    pub position: usize,
}

/// Output of one extraction.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Rows in emission order.
    pub rows: Vec<ParameterRecord>,
    /// Chain requests in field order.
    pub chains: Vec<ChainRequest>,
}

impl Extraction {
    /// Returns true if nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.chains.is_empty()
    }
}

//! Extractor registry.
//!
//! The registry maps kind names to extractors and answers the parameter type
//! of `(kind, param)` pairs. It is assembled once through
//! [`ExtractorRegistryBuilder`] and is immutable afterwards; lookups are
//! case-insensitive.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use crate::extract::{BundleExtractor, Extractor, RuleExtractor, tables};
use crate::types::ParamType;

/// Parameters every kind carries.
pub const COMMON_PARAMS: &[(&str, ParamType)] = &[
    ("_id", ParamType::Token),
    ("_lastUpdated", ParamType::Date),
    ("_tag", ParamType::Tag),
    ("_profile", ParamType::Tag),
    ("_security", ParamType::Tag),
];

static SHARED: LazyLock<Arc<ExtractorRegistry>> =
    LazyLock::new(|| Arc::new(ExtractorRegistry::builder().with_builtin().build()));

struct Entry {
    extractor: Arc<dyn Extractor>,
    param_types: HashMap<&'static str, ParamType>,
}

/// Immutable map from kind to extractor.
pub struct ExtractorRegistry {
    by_kind: HashMap<String, Entry>,
}

impl ExtractorRegistry {
    /// The process-wide registry with every built-in extractor.
    pub fn shared() -> Arc<ExtractorRegistry> {
        Arc::clone(&*SHARED)
    }

    /// Starts an empty registry.
    pub fn builder() -> ExtractorRegistryBuilder {
        ExtractorRegistryBuilder::default()
    }

    /// Finds the extractor for a kind, ignoring case.
    pub fn lookup(&self, kind: &str) -> Option<Arc<dyn Extractor>> {
        self.by_kind
            .get(&kind.to_ascii_lowercase())
            .map(|entry| Arc::clone(&entry.extractor))
    }

    /// Returns true if the kind has an extractor.
    pub fn contains(&self, kind: &str) -> bool {
        self.by_kind.contains_key(&kind.to_ascii_lowercase())
    }

    /// The type of a parameter of a kind.
    ///
    /// Parameters shared by every kind (`_id`, `_lastUpdated`, `_tag`,
    /// `_profile`, `_security`) resolve for any registered kind.
    pub fn param_type(&self, kind: &str, param: &str) -> Option<ParamType> {
        let entry = self.by_kind.get(&kind.to_ascii_lowercase())?;
        entry.param_types.get(param).copied().or_else(|| {
            COMMON_PARAMS
                .iter()
                .find(|(name, _)| *name == param)
                .map(|(_, ty)| *ty)
        })
    }

    /// Registered kind names, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self
            .by_kind
            .values()
            .map(|entry| entry.extractor.kind())
            .collect();
        kinds.sort_unstable();
        kinds
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.by_kind.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

/// Assembles an [`ExtractorRegistry`].
#[derive(Default)]
pub struct ExtractorRegistryBuilder {
    extractors: Vec<Arc<dyn Extractor>>,
}

impl ExtractorRegistryBuilder {
    /// Adds every built-in rule table and the `Bundle` extractor.
    pub fn with_builtin(mut self) -> Self {
        for table in tables::all().iter().copied() {
            self.extractors.push(Arc::new(RuleExtractor::new(table)));
        }
        self.extractors.push(Arc::new(BundleExtractor::new()));
        self
    }

    /// Adds an extractor. A later extractor for the same kind replaces an
    /// earlier one.
    pub fn with_extractor(mut self, extractor: Arc<dyn Extractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    /// Freezes the registry.
    pub fn build(self) -> ExtractorRegistry {
        let mut by_kind = HashMap::with_capacity(self.extractors.len());
        for extractor in self.extractors {
            let param_types = extractor.param_types().into_iter().collect();
            let key = extractor.kind().to_ascii_lowercase();
            if by_kind.contains_key(&key) {
                tracing::debug!(kind = %extractor.kind(), "Replacing registered extractor");
            }
            by_kind.insert(
                key,
                Entry {
                    extractor,
                    param_types,
                },
            );
        }
        ExtractorRegistry { by_kind }
    }
}

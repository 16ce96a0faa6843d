//! Indexing configuration.

use serde::{Deserialize, Serialize};

use crate::extract::DEFAULT_MAX_COMPOSITE_COMBINATIONS;

/// Settings for an [`IndexingService`](crate::service::IndexingService).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexingConfig {
    /// Maximum nesting of chains followed through a compound document.
    #[serde(default = "default_max_chain_depth")]
    pub max_chain_depth: usize,

    /// Consult the record store for relative references a compound document
    /// does not contain.
    #[serde(default)]
    pub chain_store_fallback: bool,

    /// Cap on composite keys produced per group element.
    #[serde(default = "default_max_composite_combinations")]
    pub max_composite_combinations: usize,

    /// Emit `_tag`, `_profile`, and `_security` rows.
    #[serde(default = "default_index_tags")]
    pub index_tags: bool,
}

fn default_max_chain_depth() -> usize {
    4
}

fn default_max_composite_combinations() -> usize {
    DEFAULT_MAX_COMPOSITE_COMBINATIONS
}

fn default_index_tags() -> bool {
    true
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            max_chain_depth: default_max_chain_depth(),
            chain_store_fallback: false,
            max_composite_combinations: default_max_composite_combinations(),
            index_tags: default_index_tags(),
        }
    }
}

impl IndexingConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum chain depth.
    pub fn with_max_chain_depth(mut self, depth: usize) -> Self {
        self.max_chain_depth = depth;
        self
    }

    /// Enables or disables the store fallback for compound-document chains.
    pub fn with_chain_store_fallback(mut self, enabled: bool) -> Self {
        self.chain_store_fallback = enabled;
        self
    }

    /// Sets the composite combination cap.
    pub fn with_max_composite_combinations(mut self, max: usize) -> Self {
        self.max_composite_combinations = max;
        self
    }

    /// Enables or disables tag rows.
    pub fn with_index_tags(mut self, enabled: bool) -> Self {
        self.index_tags = enabled;
        self
    }
}

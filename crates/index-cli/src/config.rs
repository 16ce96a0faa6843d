//! Command-line configuration.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use helios_indexing::IndexingConfig;

/// Indexes a FHIR record and prints its search index rows as JSON.
///
/// Configuration can be provided via command-line arguments or environment
/// variables. Command-line arguments take precedence.
#[derive(Debug, Clone, Parser)]
#[command(name = "hfs-index")]
#[command(about = "Derive the search index rows of a FHIR record")]
pub struct CliConfig {
    /// Record to index (JSON).
    pub input: PathBuf,

    /// Stored kind of the record. Defaults to the body's resourceType.
    #[arg(long)]
    pub kind: Option<String>,

    /// Stored id of the record. Defaults to the body's id.
    #[arg(long)]
    pub id: Option<String>,

    /// Records chained references may be read from. A Bundle file
    /// contributes each of its entries.
    #[arg(long = "related", value_name = "FILE")]
    pub related: Vec<PathBuf>,

    /// Bundle whose entries chained references resolve against first.
    #[arg(long, value_name = "FILE")]
    pub compound: Option<PathBuf>,

    /// Server base URL relative references resolve against.
    #[arg(long, env = "HFS_INDEX_BASE_URL", default_value = "http://localhost:8080")]
    pub base_url: String,

    /// Maximum nesting of chains followed through a compound document.
    #[arg(long, env = "HFS_INDEX_MAX_CHAIN_DEPTH", default_value = "4")]
    pub max_chain_depth: usize,

    /// Read references missing from the compound document from related records.
    #[arg(
        long,
        env = "HFS_INDEX_CHAIN_STORE_FALLBACK",
        default_value = "false",
        action = ArgAction::Set
    )]
    pub chain_store_fallback: bool,

    /// Cap on composite keys produced per group element.
    #[arg(long, env = "HFS_INDEX_MAX_COMPOSITE_COMBINATIONS", default_value = "64")]
    pub max_composite_combinations: usize,

    /// Emit _tag, _profile, and _security rows.
    #[arg(long, env = "HFS_INDEX_TAGS", default_value = "true", action = ArgAction::Set)]
    pub index_tags: bool,

    /// Pretty-print the output.
    #[arg(long)]
    pub pretty: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "HFS_INDEX_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl CliConfig {
    /// Validates the configuration.
    ///
    /// Returns every problem found rather than stopping at the first.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.max_composite_combinations == 0 {
            errors.push("max_composite_combinations must be greater than 0".to_string());
        }
        if !self.base_url.is_empty()
            && !self.base_url.starts_with("http://")
            && !self.base_url.starts_with("https://")
        {
            errors.push(format!("base_url must be an http(s) URL: {}", self.base_url));
        }
        if self.kind.as_deref().is_some_and(str::is_empty) {
            errors.push("kind must not be empty".to_string());
        }
        if self.id.as_deref().is_some_and(str::is_empty) {
            errors.push("id must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// The indexing configuration these arguments describe.
    pub fn indexing_config(&self) -> IndexingConfig {
        IndexingConfig::new()
            .with_max_chain_depth(self.max_chain_depth)
            .with_chain_store_fallback(self.chain_store_fallback)
            .with_max_composite_combinations(self.max_composite_combinations)
            .with_index_tags(self.index_tags)
    }
}

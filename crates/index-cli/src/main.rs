//! Helios FHIR Server search index driver
//!
//! Indexes one record from a file and prints its rows as JSON. Related
//! records are loaded into an in-memory store so chained references can be
//! followed.

mod config;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use helios_indexing::model::Record;
use helios_indexing::{CompoundDocument, InMemoryRecordStore, IndexingService, StoredRecord};
use serde_json::Value;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use config::CliConfig;

/// Initializes logging to stderr at the given level.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("helios_indexing={},hfs_index={}", level, level))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Loads related records into a store. Bundles contribute their entries.
fn load_related(paths: &[std::path::PathBuf]) -> anyhow::Result<InMemoryRecordStore> {
    let store = InMemoryRecordStore::new();
    for path in paths {
        let value = read_json(path)?;
        let records: Vec<&Value> = match value.get("resourceType").and_then(Value::as_str) {
            Some("Bundle") => value
                .get("entry")
                .and_then(Value::as_array)
                .map(|entries| entries.iter().filter_map(|e| e.get("resource")).collect())
                .unwrap_or_default(),
            _ => vec![&value],
        };
        for record in records {
            match store.insert_json(record) {
                Some(identity) => debug!(record = %identity, "Loaded related record"),
                None => warn!(
                    file = %path.display(),
                    "Skipping related record without resourceType or id"
                ),
            }
        }
    }
    Ok(store)
}

fn load_compound(path: &Path) -> anyhow::Result<Arc<CompoundDocument>> {
    let bundle = Record::from_value(read_json(path)?)
        .with_context(|| format!("{} is not a FHIR record", path.display()))?;
    if bundle.kind() != "Bundle" {
        anyhow::bail!("{} is a {}, expected a Bundle", path.display(), bundle.kind());
    }
    Ok(Arc::new(CompoundDocument::from_bundle(&bundle)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let raw = std::fs::read(&config.input)
        .with_context(|| format!("Failed to read {}", config.input.display()))?;
    let body: Value = serde_json::from_slice(&raw)
        .with_context(|| format!("Invalid JSON in {}", config.input.display()))?;

    let kind = match &config.kind {
        Some(kind) => kind.clone(),
        None => body
            .get("resourceType")
            .and_then(Value::as_str)
            .context("Record has no resourceType; pass --kind")?
            .to_string(),
    };
    let id = match &config.id {
        Some(id) => id.clone(),
        None => body
            .get("id")
            .and_then(Value::as_str)
            .context("Record has no id; pass --id")?
            .to_string(),
    };

    let store = load_related(&config.related)?;
    let compound = config.compound.as_deref().map(load_compound).transpose()?;

    info!(
        kind = %kind,
        id = %id,
        related = store.len(),
        compound = compound.as_ref().map(|doc| doc.len()),
        base_url = %config.base_url,
        "Indexing record"
    );

    let service = IndexingService::new()
        .with_store(Arc::new(store))
        .with_config(config.indexing_config());
    let rows = service
        .index(&StoredRecord::new(kind, id), &raw, &config.base_url, compound)
        .await?;

    let output = if config.pretty {
        serde_json::to_string_pretty(&rows)?
    } else {
        serde_json::to_string(&rows)?
    };
    println!("{}", output);

    Ok(())
}

//! Compound documents and local entry lookup.
//!
//! A compound document is an ordered list of sibling records, each with an
//! optional full URL. References between siblings are resolved against the
//! document before any store is consulted.

use serde_json::Value;

use super::resolver::{ParsedReference, is_absolute_url, is_urn};
use crate::model::Record;

/// One sibling record of a compound document.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleEntry {
    /// The entry's full URL, if declared.
    pub full_url: Option<String>,
    /// The entry's record.
    pub record: Record,
}

impl BundleEntry {
    /// Creates an entry.
    pub fn new(full_url: Option<String>, record: Record) -> Self {
        Self { full_url, record }
    }

    fn full_url_ends_with(&self, relative: &str) -> bool {
        match self.full_url.as_deref() {
            Some(url) if url == relative => true,
            Some(url) => url
                .strip_suffix(relative)
                .is_some_and(|head| head.ends_with('/')),
            None => false,
        }
    }
}

/// A read-only, ordered set of sibling records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompoundDocument {
    entries: Vec<BundleEntry>,
}

impl CompoundDocument {
    /// Creates a document from entries.
    pub fn new(entries: Vec<BundleEntry>) -> Self {
        Self { entries }
    }

    /// Builds a document from a `Bundle` record's `entry` list.
    ///
    /// Entries without a parsable `resource` are skipped.
    pub fn from_bundle(bundle: &Record) -> Self {
        let entries = bundle
            .nodes(&["entry"])
            .into_iter()
            .filter_map(|entry| {
                let resource = entry.get("resource")?;
                let record = match Record::from_value(resource.clone()) {
                    Ok(record) => record,
                    Err(e) => {
                        tracing::debug!(error = %e, "Skipping unparsable bundle entry");
                        return None;
                    }
                };
                let full_url = entry
                    .get("fullUrl")
                    .and_then(Value::as_str)
                    .filter(|url| !url.is_empty())
                    .map(str::to_string);
                Some(BundleEntry::new(full_url, record))
            })
            .collect();
        Self { entries }
    }

    /// The entries, in document order.
    pub fn entries(&self) -> &[BundleEntry] {
        &self.entries
    }

    /// The first entry, if any.
    pub fn first(&self) -> Option<&BundleEntry> {
        self.entries.first()
    }

    /// Returns true if the document has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Finds the sibling a reference points to.
    ///
    /// Absolute URLs and URNs match an entry's full URL exactly. Relative
    /// `Kind/id` references (a version suffix is ignored) match an entry whose
    /// full URL ends with `Kind/id` on a segment boundary, or whose record has
    /// that kind and id. The first matching entry wins. `None` is a normal
    /// outcome.
    pub fn locate(&self, reference: &str) -> Option<&BundleEntry> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }

        if is_absolute_url(reference) || is_urn(reference) {
            return self
                .entries
                .iter()
                .find(|entry| entry.full_url.as_deref() == Some(reference));
        }

        let ParsedReference::Relative { kind, id, .. } = ParsedReference::parse(reference) else {
            return None;
        };
        let relative = format!("{}/{}", kind, id);

        self.entries.iter().find(|entry| {
            entry.full_url_ends_with(&relative)
                || (entry.record.kind() == kind && entry.record.id() == Some(id.as_str()))
        })
    }
}

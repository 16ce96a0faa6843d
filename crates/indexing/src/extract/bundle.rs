//! Extraction for `Bundle` records.
//!
//! A document or message bundle is indexed through its first entry: the
//! `composition` (or `message`) parameter references that entry, and the
//! entry is chained with the bundle's own entries as the compound document,
//! so references between entries resolve locally.

use std::sync::Arc;

use crate::model::{Record, Reference};
use crate::reference::CompoundDocument;
use crate::types::ParamType;

use super::emit::Emitter;
use super::rule::{ExtractionRule, FieldShape, KindTable, ReferenceRule, rule};
use super::rules::apply_rule;
use super::{ChainRequest, Extraction, ExtractionContext, Extractor};

static BUNDLE_RULES: &[ExtractionRule] = &[
    rule("identifier", &["identifier"], FieldShape::Identifier),
    rule("type", &["type"], FieldShape::Code),
    rule("timestamp", &["timestamp"], FieldShape::Date),
];

const COMPOSITION: &[&str] = &["Composition"];
const MESSAGE_HEADER: &[&str] = &["MessageHeader"];

static BUNDLE: KindTable = KindTable {
    kind: "Bundle",
    rules: BUNDLE_RULES,
    composites: &[],
};

/// Envelope-aware extractor for `Bundle`.
#[derive(Debug, Default)]
pub struct BundleExtractor;

impl BundleExtractor {
    /// Creates the extractor.
    pub fn new() -> Self {
        Self
    }

    /// The parameter and kind the first entry is indexed under, by bundle type.
    fn first_entry_param(
        bundle_type: Option<&str>,
    ) -> Option<(&'static str, &'static [&'static str])> {
        match bundle_type {
            Some("document") => Some(("composition", COMPOSITION)),
            Some("message") => Some(("message", MESSAGE_HEADER)),
            _ => None,
        }
    }
}

impl Extractor for BundleExtractor {
    fn kind(&self) -> &str {
        BUNDLE.kind
    }

    fn extract(&self, record: &Record, ctx: &ExtractionContext) -> Extraction {
        let mut out = Extraction::default();
        let bundle_type = record.strings(&["type"]).first().copied();

        let mut emitter = Emitter::new(ctx, &mut out);
        emitter.resource_rows(record.meta().last_updated.as_deref());
        for rule in BUNDLE.rules {
            apply_rule(&mut emitter, rule, record);
        }

        let Some((param, targets)) = Self::first_entry_param(bundle_type) else {
            return out;
        };

        let document = CompoundDocument::from_bundle(record);
        let Some(first) = document.first() else {
            return out;
        };
        if !targets.iter().any(|target| *target == first.record.kind()) {
            tracing::debug!(
                bundle_type = ?bundle_type,
                first_kind = %first.record.kind(),
                "First bundle entry has an unexpected kind, skipping"
            );
            return out;
        }

        let Some(raw) = first
            .full_url
            .clone()
            .or_else(|| first.record.identity().map(|identity| identity.relative()))
        else {
            return out;
        };

        let before = out.rows.len();
        let reference = Reference {
            reference: Some(raw.clone()),
            ..Default::default()
        };
        let unchained = ReferenceRule {
            targets,
            chain: false,
            strict: false,
        };
        Emitter::new(ctx, &mut out).reference(param, &reference, &unchained);
        if ctx.chaining && out.rows.len() > before {
            out.chains.push(ChainRequest {
                owner: ctx.owner.clone(),
                param_name: param.to_string(),
                raw_reference: raw,
                targets,
                compound: Some(Arc::new(document)),
                position: out.rows.len(),
            });
        }
        out
    }

    fn param_types(&self) -> Vec<(&'static str, ParamType)> {
        let mut types = BUNDLE.param_types();
        types.push(("composition", ParamType::Reference));
        types.push(("message", ParamType::Reference));
        types
    }
}

//! Row construction from typed elements.

use std::sync::Arc;

use crate::encoding::date::{parse_bounds, range_of, range_of_period};
use crate::encoding::{casefold, normalize_string, quantity_key, token_key};
use crate::model::{
    Address, ChoiceValue, CodeableConcept, Coding, ContactPoint, HumanName, Identifier, Period,
    Quantity, Reference,
};
use crate::reference::{ParsedReference, resolve};
use crate::types::{DateRange, ParamType, ParameterRecord};

use super::rule::ReferenceRule;
use super::{ChainRequest, Extraction, ExtractionContext};

/// Appends rows (and chain requests) to an [`Extraction`].
pub(crate) struct Emitter<'a> {
    ctx: &'a ExtractionContext,
    out: &'a mut Extraction,
}

impl<'a> Emitter<'a> {
    pub(crate) fn new(ctx: &'a ExtractionContext, out: &'a mut Extraction) -> Self {
        Self { ctx, out }
    }

    fn row(&self, param: &str, param_type: ParamType, value: &str) -> Option<ParameterRecord> {
        ParameterRecord::new(self.ctx.owner.clone(), param, param_type, value.trim())
    }

    fn push(&mut self, row: Option<ParameterRecord>) {
        if let Some(row) = row {
            self.out.rows.push(row);
        }
    }

    /// `_id` and `_lastUpdated`.
    pub(crate) fn resource_rows(&mut self, last_updated: Option<&str>) {
        let id = self.ctx.owner.id.clone();
        self.token("_id", &id, None, None);
        if let Some(last_updated) = last_updated {
            self.date("_lastUpdated", last_updated);
        }
    }

    pub(crate) fn token(
        &mut self,
        param: &str,
        code: &str,
        system: Option<&str>,
        display: Option<&str>,
    ) {
        let system = system.filter(|s| !s.is_empty());
        let row = self.row(param, ParamType::Token, code).map(|row| {
            let key = token_key(system, &row.value);
            row.with_normalized(key)
                .with_system(system)
                .with_text(display)
        });
        self.push(row);
    }

    pub(crate) fn boolean(&mut self, param: &str, value: bool) {
        self.token(param, if value { "true" } else { "false" }, None, None);
    }

    pub(crate) fn coding(&mut self, param: &str, coding: &Coding, fallback_text: Option<&str>) {
        match coding.code.as_deref() {
            Some(code) => self.token(
                param,
                code,
                coding.system.as_deref(),
                coding.display.as_deref().or(fallback_text),
            ),
            None => tracing::debug!(param = param, "Coding without code, skipping"),
        }
    }

    pub(crate) fn concept(&mut self, param: &str, concept: &CodeableConcept) {
        for coding in &concept.coding {
            self.coding(param, coding, concept.text.as_deref());
        }
    }

    pub(crate) fn identifier(&mut self, param: &str, identifier: &Identifier) {
        if let Some(value) = identifier.value.as_deref() {
            let type_text = identifier.type_.as_ref().and_then(|t| t.text.as_deref());
            self.token(param, value, identifier.system.as_deref(), type_text);
        }
    }

    pub(crate) fn contact_point(
        &mut self,
        param: &str,
        contact: &ContactPoint,
        only: Option<&str>,
    ) {
        if only.is_some_and(|system| contact.system.as_deref() != Some(system)) {
            return;
        }
        if let Some(value) = contact.value.as_deref() {
            self.token(param, value, None, contact.use_.as_deref());
        }
    }

    pub(crate) fn string(&mut self, param: &str, value: &str) {
        let row = self
            .row(param, ParamType::String, value)
            .map(|row| {
                let normalized = normalize_string(&row.value);
                row.with_normalized(normalized)
            });
        self.push(row);
    }

    pub(crate) fn human_name(&mut self, param: &str, name: &HumanName) {
        let parts = name
            .text
            .iter()
            .chain(name.family.iter())
            .chain(name.given.iter())
            .chain(name.prefix.iter())
            .chain(name.suffix.iter());
        for part in parts {
            self.string(param, part);
        }
    }

    pub(crate) fn address(&mut self, param: &str, address: &Address) {
        for part in address.parts() {
            self.string(param, part);
        }
    }

    pub(crate) fn uri(&mut self, param: &str, value: &str) {
        let row = self.row(param, ParamType::Uri, value).map(|row| {
            let folded = casefold(&row.value);
            row.with_normalized(folded)
        });
        self.push(row);
    }

    pub(crate) fn date(&mut self, param: &str, value: &str) {
        match range_of(value) {
            Some(range) => self.dated(param, value, range),
            None => tracing::debug!(param = param, value = value, "Malformed date, skipping"),
        }
    }

    pub(crate) fn period(&mut self, param: &str, period: &Period) {
        let start = period.start.as_deref();
        let end = period.end.as_deref();
        let raw = start
            .filter(|s| parse_bounds(s).is_some())
            .or_else(|| end.filter(|e| parse_bounds(e).is_some()));
        match (raw, range_of_period(start, end)) {
            (Some(raw), Some(range)) => self.dated(param, raw, range),
            _ => {
                if let Some(value) = start.or(end) {
                    tracing::debug!(param = param, value = value, "Malformed period, skipping")
                }
            }
        }
    }

    fn dated(&mut self, param: &str, raw: &str, range: DateRange) {
        let normalized = range
            .start()
            .or(range.end())
            .map(|bound| bound.to_rfc3339());
        let row = self.row(param, ParamType::Date, raw).map(|row| {
            let row = match normalized {
                Some(normalized) => row.with_normalized(normalized),
                None => row,
            };
            row.with_range(range)
        });
        self.push(row);
    }

    pub(crate) fn quantity(&mut self, param: &str, quantity: &Quantity) {
        let Some(value) = quantity.decimal() else {
            tracing::debug!(param = param, "Quantity without a numeric value, skipping");
            return;
        };
        let lexical = value.to_string();
        let system = quantity.system.as_deref().filter(|s| !s.is_empty());
        let row = self.row(param, ParamType::Quantity, &lexical).map(|row| {
            row.with_normalized(quantity_key(system, &value))
                .with_system(system)
                .with_code(quantity.code.as_deref())
                .with_text(quantity.unit.as_deref())
        });
        self.push(row);
    }

    pub(crate) fn reference(&mut self, param: &str, reference: &Reference, rule: &ReferenceRule) {
        let Some(raw) = reference.reference.as_deref().map(str::trim).filter(|r| !r.is_empty())
        else {
            return;
        };

        let parsed = ParsedReference::parse(raw);
        if rule.strict && !rule.targets.is_empty() {
            let kind = parsed
                .kind()
                .map(str::to_string)
                .or_else(|| reference.type_.clone())
                .or_else(|| self.located_kind(raw));
            if !kind.is_some_and(|kind| rule.targets.iter().any(|target| *target == kind)) {
                return;
            }
        }

        let resolved = resolve(raw, &self.ctx.base_url);
        let normalized = parsed.relative().unwrap_or_else(|| resolved.clone());
        let row = self.row(param, ParamType::Reference, &resolved).map(|row| {
            row.with_normalized(normalized)
                .with_text(reference.display.as_deref())
        });
        let Some(row) = row else {
            return;
        };
        self.out.rows.push(row);

        if rule.chain && self.ctx.chaining && !matches!(parsed, ParsedReference::Fragment(_)) {
            self.chain(param, raw, rule.targets);
        }
    }

    /// Queues a chain request spliced right after the last pushed row.
    pub(crate) fn chain(&mut self, param: &str, raw: &str, targets: &'static [&'static str]) {
        let request = ChainRequest {
            owner: self.ctx.owner.clone(),
            param_name: param.to_string(),
            raw_reference: raw.to_string(),
            targets,
            compound: self.ctx.compound.as_ref().map(Arc::clone),
            position: self.out.rows.len(),
        };
        self.out.chains.push(request);
    }

    fn located_kind(&self, raw: &str) -> Option<String> {
        let compound = self.ctx.compound.as_ref()?;
        compound
            .locate(raw)
            .map(|entry| entry.record.kind().to_string())
    }

    /// Emits rows for one choice value as the declared parameter type.
    pub(crate) fn choice(
        &mut self,
        param: &str,
        param_type: ParamType,
        value: &ChoiceValue,
        rule: &ReferenceRule,
    ) {
        match value {
            ChoiceValue::Date(raw) if param_type == ParamType::Date => self.date(param, raw),
            ChoiceValue::Period(period) if param_type == ParamType::Date => {
                self.period(param, period)
            }
            ChoiceValue::Quantity(quantity) if param_type == ParamType::Quantity => {
                self.quantity(param, quantity)
            }
            ChoiceValue::Range(range) if param_type == ParamType::Quantity => {
                for bound in range.low.iter().chain(range.high.iter()) {
                    self.quantity(param, bound);
                }
            }
            ChoiceValue::CodeableConcept(concept) if param_type == ParamType::Token => {
                self.concept(param, concept)
            }
            ChoiceValue::Coding(coding) if param_type == ParamType::Token => {
                self.coding(param, coding, None)
            }
            ChoiceValue::Boolean(value) if param_type == ParamType::Token => {
                self.boolean(param, *value)
            }
            ChoiceValue::String(value) if param_type == ParamType::String => {
                self.string(param, value)
            }
            ChoiceValue::String(value) if param_type == ParamType::Token => {
                self.token(param, value, None, None)
            }
            ChoiceValue::Uri(value) if param_type == ParamType::Uri => self.uri(param, value),
            ChoiceValue::Integer(value) if param_type == ParamType::Token => {
                self.token(param, &value.to_string(), None, None)
            }
            ChoiceValue::Reference(reference) if param_type == ParamType::Reference => {
                self.reference(param, reference, rule)
            }
            ChoiceValue::Date(_)
            | ChoiceValue::Period(_)
            | ChoiceValue::Quantity(_)
            | ChoiceValue::Range(_)
            | ChoiceValue::CodeableConcept(_)
            | ChoiceValue::Coding(_)
            | ChoiceValue::Boolean(_)
            | ChoiceValue::String(_)
            | ChoiceValue::Uri(_)
            | ChoiceValue::Integer(_)
            | ChoiceValue::Reference(_) => {}
            ChoiceValue::Unsupported(suffix) => {
                tracing::debug!(
                    param = param,
                    variant = %suffix,
                    "Unsupported choice variant, skipping"
                )
            }
        }
    }
}

//! The table-driven extractor.

use std::fmt;

use crate::model::{
    Address, CodeableConcept, Coding, ContactPoint, HumanName, Identifier, Period, Quantity,
    Record, Reference,
};
use crate::types::ParamType;

use super::composite::extract_composite;
use super::emit::Emitter;
use super::rule::{ExtractionRule, FieldShape, KindTable};
use super::{Extraction, ExtractionContext, Extractor};

/// Extracts rows by walking a [`KindTable`].
pub struct RuleExtractor {
    table: &'static KindTable,
}

impl RuleExtractor {
    /// Creates an extractor over a table.
    pub fn new(table: &'static KindTable) -> Self {
        Self { table }
    }
}

impl fmt::Debug for RuleExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleExtractor")
            .field("kind", &self.table.kind)
            .field("rules", &self.table.rules.len())
            .field("composites", &self.table.composites.len())
            .finish()
    }
}

impl Extractor for RuleExtractor {
    fn kind(&self) -> &str {
        self.table.kind
    }

    fn extract(&self, record: &Record, ctx: &ExtractionContext) -> Extraction {
        let mut out = Extraction::default();
        {
            let mut emitter = Emitter::new(ctx, &mut out);
            emitter.resource_rows(record.meta().last_updated.as_deref());
            for rule in self.table.rules {
                apply_rule(&mut emitter, rule, record);
            }
        }
        for composite in self.table.composites {
            extract_composite(composite, record, ctx, &mut out);
        }
        out
    }

    fn param_types(&self) -> Vec<(&'static str, ParamType)> {
        self.table.param_types()
    }
}

/// Emits the rows of one field rule.
pub(crate) fn apply_rule(emitter: &mut Emitter<'_>, rule: &ExtractionRule, record: &Record) {
    let param = rule.param;
    let path = rule.path;
    match rule.shape {
        FieldShape::Code => {
            for value in record.strings(path) {
                emitter.token(param, value, None, None);
            }
        }
        FieldShape::Boolean => {
            for value in record.nodes(path).into_iter().filter_map(|v| v.as_bool()) {
                emitter.boolean(param, value);
            }
        }
        FieldShape::Coding => {
            for coding in record.values::<Coding>(path) {
                emitter.coding(param, &coding, None);
            }
        }
        FieldShape::CodeableConcept => {
            for concept in record.values::<CodeableConcept>(path) {
                emitter.concept(param, &concept);
            }
        }
        FieldShape::Identifier => {
            for identifier in record.values::<Identifier>(path) {
                emitter.identifier(param, &identifier);
            }
        }
        FieldShape::ContactPoint(only) => {
            for contact in record.values::<ContactPoint>(path) {
                emitter.contact_point(param, &contact, only);
            }
        }
        FieldShape::String => {
            for value in record.strings(path) {
                emitter.string(param, value);
            }
        }
        FieldShape::HumanName => {
            for name in record.values::<HumanName>(path) {
                emitter.human_name(param, &name);
            }
        }
        FieldShape::Address => {
            for address in record.values::<Address>(path) {
                emitter.address(param, &address);
            }
        }
        FieldShape::Uri => {
            for value in record.strings(path) {
                emitter.uri(param, value);
            }
        }
        FieldShape::Date => {
            for value in record.strings(path) {
                emitter.date(param, value);
            }
        }
        FieldShape::Period => {
            for period in record.values::<Period>(path) {
                emitter.period(param, &period);
            }
        }
        FieldShape::Quantity => {
            for quantity in record.values::<Quantity>(path) {
                emitter.quantity(param, &quantity);
            }
        }
        FieldShape::Reference(reference_rule) => {
            for reference in record.values::<Reference>(path) {
                emitter.reference(param, &reference, &reference_rule);
            }
        }
        FieldShape::Choice(param_type, reference_rule) => {
            let Some((name, parent)) = path.split_last() else {
                return;
            };
            for value in record.choices(parent, name) {
                emitter.choice(param, param_type, &value, &reference_rule);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::rule::{chained, choice, reference, rule};
    use crate::types::RecordIdentity;
    use serde_json::json;

    static RULES: &[ExtractionRule] = &[
        rule("status", &["status"], FieldShape::Code),
        rule("code", &["code"], FieldShape::CodeableConcept),
        chained("subject", &["subject"], &["Patient", "Group"]),
        reference("performer", &["performer"], &[]),
        choice("date", &["effective"], ParamType::Date),
        choice("value-quantity", &["value"], ParamType::Quantity),
    ];

    static TABLE: KindTable = KindTable {
        kind: "Observation",
        rules: RULES,
        composites: &[],
    };

    fn extract(body: serde_json::Value) -> Extraction {
        let record = Record::from_value(body).unwrap();
        let ctx = ExtractionContext::new(RecordIdentity::new("Observation", "o1"), "http://x/fhir");
        RuleExtractor::new(&TABLE).extract(&record, &ctx)
    }

    #[test]
    fn test_rows_follow_rule_order() {
        let out = extract(json!({
            "resourceType": "Observation",
            "id": "o1",
            "valueQuantity": {"value": 5.4, "system": "http://unitsofmeasure.org", "code": "mmol/L"},
            "effectiveDateTime": "2024-01-15",
            "subject": {"reference": "Patient/p1"},
            "code": {"coding": [{"system": "http://loinc.org", "code": "15074-8"}]},
            "status": "final"
        }));

        let names: Vec<&str> = out.rows.iter().map(|r| r.param_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["_id", "status", "code", "subject", "date", "value-quantity"]
        );
        assert_eq!(out.chains.len(), 1);
        assert_eq!(out.chains[0].position, 4);
    }

    #[test]
    fn test_absent_fields_yield_no_rows() {
        let out = extract(json!({"resourceType": "Observation", "id": "o1"}));
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].param_name, "_id");
        assert!(out.chains.is_empty());
    }

    #[test]
    fn test_malformed_elements_are_skipped() {
        let out = extract(json!({
            "resourceType": "Observation",
            "id": "o1",
            "status": 12,
            "code": {"coding": [{"code": ["not", "a", "string"]}]},
            "effectiveDateTime": "not-a-date",
            "performer": [{"reference": "Practitioner/pr1"}, {"reference": 7}]
        }));

        let names: Vec<&str> = out.rows.iter().map(|r| r.param_name.as_str()).collect();
        assert_eq!(names, vec!["_id", "performer"]);
    }

    #[test]
    fn test_last_updated_row() {
        let out = extract(json!({
            "resourceType": "Observation",
            "id": "o1",
            "meta": {"lastUpdated": "2024-02-01T12:00:00Z"}
        }));
        assert_eq!(out.rows[1].param_name, "_lastUpdated");
        assert_eq!(out.rows[1].param_type, ParamType::Date);
    }
}

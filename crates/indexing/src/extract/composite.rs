//! Composite parameter extraction.
//!
//! Each element of a composite's group is read on its own: components are
//! encoded from that element only, so values of different group elements are
//! never mixed into one key.

use serde_json::Value;

use crate::encoding::{combine, quantity_key, token_key};
use crate::model::{ChoiceValue, CodeableConcept, Coding, Quantity, Record, select};
use crate::types::{ParamType, ParameterRecord};

use super::rule::{ComponentKind, CompositeComponent, CompositeRule};
use super::{Extraction, ExtractionContext};

/// Emits the rows of one composite rule.
pub(crate) fn extract_composite(
    rule: &CompositeRule,
    record: &Record,
    ctx: &ExtractionContext,
    out: &mut Extraction,
) {
    let root;
    let groups: Vec<&Value> = if rule.group.is_empty() {
        root = Value::Object(record.body().clone());
        vec![&root]
    } else {
        record.nodes(rule.group)
    };

    for group in groups {
        let candidates: Vec<Vec<String>> = rule
            .components
            .iter()
            .map(|component| component_candidates(group, component))
            .collect();

        for key in combine(&candidates, ctx.max_composite_combinations) {
            if let Some(row) =
                ParameterRecord::new(ctx.owner.clone(), rule.param, ParamType::Composite, key)
            {
                out.rows.push(row);
            }
        }
    }
}

/// Encoded values of one component within one group element.
fn component_candidates(group: &Value, component: &CompositeComponent) -> Vec<String> {
    let nodes = select(group, component.path);
    if !nodes.is_empty() {
        return nodes
            .into_iter()
            .flat_map(|node| encode_node(node, component.kind))
            .collect();
    }

    let Some((name, parent)) = component.path.split_last() else {
        return Vec::new();
    };
    select(group, parent)
        .into_iter()
        .filter_map(Value::as_object)
        .filter_map(|object| ChoiceValue::read(object, name))
        .flat_map(|choice| encode_choice(&choice, component.kind))
        .collect()
}

fn encode_node(node: &Value, kind: ComponentKind) -> Vec<String> {
    match kind {
        ComponentKind::Token => match node {
            Value::String(code) => vec![token_key(None, code)],
            Value::Bool(flag) => vec![token_key(None, &flag.to_string())],
            Value::Object(object)
                if object.contains_key("coding") || object.contains_key("text") =>
            {
                serde_json::from_value::<CodeableConcept>(node.clone())
                    .map(|concept| concept_keys(&concept))
                    .unwrap_or_default()
            }
            Value::Object(_) => serde_json::from_value::<Coding>(node.clone())
                .ok()
                .and_then(|coding| coding_key(&coding))
                .into_iter()
                .collect(),
            _ => Vec::new(),
        },
        ComponentKind::Quantity => serde_json::from_value::<Quantity>(node.clone())
            .ok()
            .and_then(|quantity| quantity_component(&quantity))
            .into_iter()
            .collect(),
    }
}

fn encode_choice(choice: &ChoiceValue, kind: ComponentKind) -> Vec<String> {
    match (kind, choice) {
        (ComponentKind::Token, ChoiceValue::CodeableConcept(concept)) => concept_keys(concept),
        (ComponentKind::Token, ChoiceValue::Coding(coding)) => {
            coding_key(coding).into_iter().collect()
        }
        (ComponentKind::Token, ChoiceValue::Boolean(flag)) => {
            vec![token_key(None, &flag.to_string())]
        }
        (ComponentKind::Quantity, ChoiceValue::Quantity(quantity)) => {
            quantity_component(quantity).into_iter().collect()
        }
        (ComponentKind::Quantity, ChoiceValue::Range(range)) => range
            .low
            .iter()
            .chain(range.high.iter())
            .filter_map(quantity_component)
            .collect(),
        _ => Vec::new(),
    }
}

fn coding_key(coding: &Coding) -> Option<String> {
    let code = coding.code.as_deref().filter(|c| !c.is_empty())?;
    Some(token_key(coding.system.as_deref(), code))
}

fn concept_keys(concept: &CodeableConcept) -> Vec<String> {
    concept.coding.iter().filter_map(coding_key).collect()
}

fn quantity_component(quantity: &Quantity) -> Option<String> {
    let value = quantity.decimal()?;
    Some(quantity_key(quantity.system.as_deref(), &value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::rule::component;
    use crate::types::RecordIdentity;
    use serde_json::json;

    static COMPONENT_CODE_VALUE: CompositeRule = CompositeRule {
        param: "component-code-value-quantity",
        group: &["component"],
        components: &[
            component(&["code"], ComponentKind::Token),
            component(&["value"], ComponentKind::Quantity),
        ],
    };

    static CODE_VALUE: CompositeRule = CompositeRule {
        param: "code-value-quantity",
        group: &[],
        components: &[
            component(&["code"], ComponentKind::Token),
            component(&["value"], ComponentKind::Quantity),
        ],
    };

    fn ctx() -> ExtractionContext {
        ExtractionContext::new(RecordIdentity::new("Observation", "bp"), "")
    }

    fn blood_pressure() -> Record {
        Record::from_value(json!({
            "resourceType": "Observation",
            "id": "bp",
            "code": {"coding": [{"system": "http://loinc.org", "code": "85354-9"}]},
            "component": [
                {
                    "code": {"coding": [{"system": "http://loinc.org", "code": "8480-6"}]},
                    "valueQuantity": {"value": 120, "system": "http://unitsofmeasure.org", "code": "mm[Hg]"}
                },
                {
                    "code": {"coding": [{"system": "http://loinc.org", "code": "8462-4"}]},
                    "valueQuantity": {"value": 80, "system": "http://unitsofmeasure.org", "code": "mm[Hg]"}
                },
                {
                    "code": {"coding": [{"system": "http://loinc.org", "code": "9999-9"}]}
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_components_stay_within_their_group_element() {
        let mut out = Extraction::default();
        extract_composite(&COMPONENT_CODE_VALUE, &blood_pressure(), &ctx(), &mut out);

        let values: Vec<&str> = out.rows.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(
            values,
            vec![
                "http://loinc.org|8480-6$http://unitsofmeasure.org|120",
                "http://loinc.org|8462-4$http://unitsofmeasure.org|80",
            ]
        );
        assert!(out.rows.iter().all(|r| r.param_type == ParamType::Composite));
    }

    #[test]
    fn test_root_group_without_value_yields_nothing() {
        let mut out = Extraction::default();
        extract_composite(&CODE_VALUE, &blood_pressure(), &ctx(), &mut out);
        assert!(out.rows.is_empty());
    }

    #[test]
    fn test_range_component() {
        let group = json!({
            "code": {"system": "http://terminology.hl7.org/CodeSystem/usage-context-type", "code": "age"},
            "valueRange": {"low": {"value": 18}, "high": {"value": 65}}
        });
        let code = component_candidates(&group, &component(&["code"], ComponentKind::Token));
        assert_eq!(
            code,
            vec!["http://terminology.hl7.org/CodeSystem/usage-context-type|age".to_string()]
        );
        let value = component_candidates(&group, &component(&["value"], ComponentKind::Quantity));
        assert_eq!(value, vec!["|18".to_string(), "|65".to_string()]);
    }
}

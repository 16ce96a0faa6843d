//! Shared fixtures and assertions for indexing integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{Value, json};

use helios_indexing::model::Record;
use helios_indexing::{
    CompoundDocument, InMemoryRecordStore, IndexingConfig, IndexingResult, IndexingService,
    ParamType, ParameterRecord, StoredRecord,
};

/// Server base used by every test.
pub const BASE: &str = "http://x/fhir";

/// Indexes a JSON body under its own kind and id.
pub async fn index_json(
    service: &IndexingService,
    body: &Value,
    compound: Option<Arc<CompoundDocument>>,
) -> IndexingResult<Vec<ParameterRecord>> {
    let kind = body["resourceType"].as_str().unwrap_or_default();
    let id = body["id"].as_str().unwrap_or_default();
    let raw = serde_json::to_vec(body).expect("fixture serializes");
    service
        .index(&StoredRecord::new(kind, id), &raw, BASE, compound)
        .await
}

/// A service backed by an in-memory store holding `records`.
pub fn service_with_store(records: &[Value], config: IndexingConfig) -> IndexingService {
    let store = Arc::new(InMemoryRecordStore::new());
    for record in records {
        store.insert_json(record);
    }
    IndexingService::new().with_store(store).with_config(config)
}

/// A compound document with one entry per `(full_url, body)` pair.
pub fn compound(entries: &[(&str, Value)]) -> Arc<CompoundDocument> {
    let bundle = json!({
        "resourceType": "Bundle",
        "type": "collection",
        "entry": entries
            .iter()
            .map(|(full_url, body)| json!({"fullUrl": full_url, "resource": body}))
            .collect::<Vec<_>>()
    });
    let record = Record::from_value(bundle).expect("fixture bundle parses");
    Arc::new(CompoundDocument::from_bundle(&record))
}

/// Rows with the given parameter name, in order.
pub fn rows_named<'a>(rows: &'a [ParameterRecord], param: &str) -> Vec<&'a ParameterRecord> {
    rows.iter().filter(|r| r.param_name == param).collect()
}

/// Parameter names in emission order.
pub fn names(rows: &[ParameterRecord]) -> Vec<&str> {
    rows.iter().map(|r| r.param_name.as_str()).collect()
}

/// Asserts exactly one row exists for `param` and returns it.
pub fn single_row<'a>(rows: &'a [ParameterRecord], param: &str) -> &'a ParameterRecord {
    let found = rows_named(rows, param);
    assert_eq!(
        found.len(),
        1,
        "Expected one {} row, got {}: {:?}",
        param,
        found.len(),
        names(rows)
    );
    found[0]
}

/// Asserts a row with `param` and `value` exists.
pub fn assert_has_row(rows: &[ParameterRecord], param: &str, value: &str) {
    assert!(
        rows.iter().any(|r| r.param_name == param && r.value == value),
        "Expected {}={} in {:?}",
        param,
        value,
        rows.iter()
            .map(|r| format!("{}={}", r.param_name, r.value))
            .collect::<Vec<_>>()
    );
}

/// Asserts no row carries `param`.
pub fn assert_no_row(rows: &[ParameterRecord], param: &str) {
    assert!(
        rows.iter().all(|r| r.param_name != param),
        "Expected no {} row in {:?}",
        param,
        names(rows)
    );
}

/// Asserts every row's value is non-empty and owned by `kind/id`.
pub fn assert_well_formed(rows: &[ParameterRecord], kind: &str, id: &str) {
    for row in rows {
        assert!(!row.value.trim().is_empty(), "Empty value in {:?}", row);
        assert_eq!(row.owner.kind, kind, "Wrong owner kind in {:?}", row);
        assert_eq!(row.owner.id, id, "Wrong owner id in {:?}", row);
        if row.param_type == ParamType::Date {
            assert!(row.range.is_some(), "Date row without range: {:?}", row);
        }
    }
}

pub fn care_plan(id: &str, based_on: &str) -> Value {
    json!({
        "resourceType": "CarePlan",
        "id": id,
        "status": "active",
        "intent": "plan",
        "basedOn": [{"reference": based_on}]
    })
}

pub fn service_request(id: &str) -> Value {
    json!({
        "resourceType": "ServiceRequest",
        "id": id,
        "status": "active",
        "intent": "order",
        "code": {"coding": [{"system": "http://snomed.info/sct", "code": "73761001"}]}
    })
}

pub fn organization(id: &str, name: &str, part_of: Option<&str>) -> Value {
    let mut org = json!({
        "resourceType": "Organization",
        "id": id,
        "name": name
    });
    if let Some(parent) = part_of {
        org["partOf"] = json!({"reference": parent});
    }
    org
}

pub fn blood_pressure(id: &str) -> Value {
    json!({
        "resourceType": "Observation",
        "id": id,
        "status": "final",
        "code": {"coding": [{"system": "http://loinc.org", "code": "85354-9"}]},
        "effectiveDateTime": "2024-03-01T10:30:00+02:00",
        "component": [
            {
                "code": {"coding": [{"system": "http://loinc.org", "code": "8480-6"}]},
                "valueQuantity": {"value": 120, "unit": "mmHg", "system": "http://unitsofmeasure.org", "code": "mm[Hg]"}
            },
            {
                "code": {"coding": [{"system": "http://loinc.org", "code": "8462-4"}]},
                "valueQuantity": {"value": 80, "unit": "mmHg", "system": "http://unitsofmeasure.org", "code": "mm[Hg]"}
            }
        ]
    })
}

//! Indexing of document and message bundles.

mod common;

use common::*;
use serde_json::{Value, json};

use helios_indexing::{IndexingConfig, IndexingService};

fn document_bundle(first: Value) -> Value {
    json!({
        "resourceType": "Bundle",
        "id": "doc1",
        "type": "document",
        "identifier": {"system": "urn:ietf:rfc:3986", "value": "urn:uuid:0c3151bd-1cbf-4d64-b04d-cd9187a4c6e0"},
        "timestamp": "2024-02-10T09:00:00Z",
        "entry": [
            {"fullUrl": "urn:uuid:c1", "resource": first},
            {
                "fullUrl": "urn:uuid:p1",
                "resource": {
                    "resourceType": "Patient",
                    "id": "p1",
                    "name": [{"family": "Nakamura"}],
                    "managingOrganization": {"reference": "urn:uuid:o1"}
                }
            },
            {
                "fullUrl": "urn:uuid:o1",
                "resource": {"resourceType": "Organization", "id": "o1", "name": "Clinic"}
            }
        ]
    })
}

fn composition() -> Value {
    json!({
        "resourceType": "Composition",
        "id": "c1",
        "status": "final",
        "type": {"coding": [{"system": "http://loinc.org", "code": "11488-4"}]},
        "subject": {"reference": "urn:uuid:p1"},
        "date": "2024-02-10",
        "title": "Consult note"
    })
}

#[tokio::test]
async fn test_document_bundle_indexes_its_composition() {
    let rows = index_json(&IndexingService::new(), &document_bundle(composition()), None)
        .await
        .unwrap();

    assert_has_row(&rows, "type", "document");
    assert_has_row(&rows, "identifier", "urn:uuid:0c3151bd-1cbf-4d64-b04d-cd9187a4c6e0");
    assert!(single_row(&rows, "timestamp").range.is_some());

    assert_has_row(&rows, "composition", "urn:uuid:c1");
    assert_has_row(&rows, "composition.title", "Consult note");
    assert_has_row(&rows, "composition:Composition.title", "Consult note");
    assert_has_row(&rows, "composition.type", "11488-4");
    assert_well_formed(&rows, "Bundle", "doc1");
}

#[tokio::test]
async fn test_entries_resolve_against_each_other() {
    let rows = index_json(&IndexingService::new(), &document_bundle(composition()), None)
        .await
        .unwrap();

    assert_has_row(&rows, "composition.subject", "urn:uuid:p1");
    assert_has_row(&rows, "composition.subject:Patient.family", "Nakamura");
    assert_has_row(&rows, "composition.patient.family", "Nakamura");
    assert_has_row(
        &rows,
        "composition.patient.organization.name",
        "Clinic",
    );
}

#[tokio::test]
async fn test_bundle_entries_never_reach_the_store() {
    let mut bundle = document_bundle(composition());
    bundle["entry"][0]["resource"]["encounter"] = json!({"reference": "Encounter/e1"});
    let encounter = json!({"resourceType": "Encounter", "id": "e1", "status": "finished"});
    let service = service_with_store(&[encounter], IndexingConfig::default());

    let rows = index_json(&service, &bundle, None).await.unwrap();

    assert_has_row(&rows, "composition.encounter", "http://x/fhir/Encounter/e1");
    assert_no_row(&rows, "composition.encounter.status");
}

#[tokio::test]
async fn test_document_with_wrong_first_entry() {
    let first = json!({"resourceType": "Patient", "id": "x1", "gender": "other"});

    let rows = index_json(&IndexingService::new(), &document_bundle(first), None)
        .await
        .unwrap();

    assert_has_row(&rows, "type", "document");
    assert_no_row(&rows, "composition");
    assert!(rows.iter().all(|r| !r.param_name.starts_with("composition")));
}

#[tokio::test]
async fn test_message_bundle_indexes_its_header() {
    let bundle = json!({
        "resourceType": "Bundle",
        "id": "msg1",
        "type": "message",
        "entry": [
            {
                "fullUrl": "urn:uuid:h1",
                "resource": {
                    "resourceType": "MessageHeader",
                    "id": "h1",
                    "eventCoding": {"system": "http://example.org/events", "code": "admit"},
                    "source": {"name": "ADT", "endpoint": "http://adt.example.org"},
                    "focus": [{"reference": "urn:uuid:e1"}]
                }
            },
            {
                "fullUrl": "urn:uuid:e1",
                "resource": {"resourceType": "Encounter", "id": "e1", "status": "in-progress"}
            }
        ]
    });

    let rows = index_json(&IndexingService::new(), &bundle, None)
        .await
        .unwrap();

    assert_has_row(&rows, "message", "urn:uuid:h1");
    assert_has_row(&rows, "message.event", "admit");
    assert_has_row(&rows, "message.source", "ADT");
    assert_has_row(&rows, "message.focus:Encounter.status", "in-progress");
    assert_no_row(&rows, "composition");
}

#[tokio::test]
async fn test_collection_bundle_has_only_envelope_rows() {
    let bundle = json!({
        "resourceType": "Bundle",
        "id": "col1",
        "type": "collection",
        "entry": [{"fullUrl": "urn:uuid:c1", "resource": composition()}]
    });

    let rows = index_json(&IndexingService::new(), &bundle, None)
        .await
        .unwrap();

    assert_eq!(names(&rows), vec!["_id", "type"]);
}

//! Chained reference indexing through the record store and compound documents.

mod common;

use common::*;
use serde_json::json;

use helios_indexing::{IndexingConfig, IndexingService, ParamType};

#[tokio::test]
async fn test_care_plan_based_on_service_request() {
    let service = service_with_store(&[service_request("42")], IndexingConfig::default());

    let rows = index_json(&service, &care_plan("cp1", "ServiceRequest/42"), None)
        .await
        .unwrap();

    let based_on = single_row(&rows, "based-on");
    assert_eq!(based_on.param_type, ParamType::Reference);
    assert_eq!(based_on.value, "http://x/fhir/ServiceRequest/42");
    assert_eq!(based_on.value_normalized, "ServiceRequest/42");

    assert_has_row(&rows, "based-on.status", "active");
    assert_has_row(&rows, "based-on:ServiceRequest.status", "active");
    assert_has_row(&rows, "based-on.code", "73761001");
    assert_has_row(&rows, "based-on._id", "42");
    assert_well_formed(&rows, "CarePlan", "cp1");
}

#[tokio::test]
async fn test_chained_rows_follow_their_reference_row() {
    let service = service_with_store(&[service_request("42")], IndexingConfig::default());

    let rows = index_json(&service, &care_plan("cp1", "ServiceRequest/42"), None)
        .await
        .unwrap();

    let order = names(&rows);
    let parent = order.iter().position(|n| *n == "based-on").unwrap();
    let chained: Vec<usize> = order
        .iter()
        .enumerate()
        .filter(|(_, n)| n.starts_with("based-on.") || n.starts_with("based-on:"))
        .map(|(i, _)| i)
        .collect();
    assert!(!chained.is_empty());
    assert_eq!(chained[0], parent + 1);
    assert!(chained.windows(2).all(|w| w[1] == w[0] + 1));
    assert!(order[..parent].contains(&"status"));
}

#[tokio::test]
async fn test_disallowed_target_is_not_chained() {
    let patient = json!({"resourceType": "Patient", "id": "p1", "gender": "female"});
    let service = service_with_store(&[patient], IndexingConfig::default());

    let rows = index_json(&service, &care_plan("cp1", "Patient/p1"), None)
        .await
        .unwrap();

    assert_has_row(&rows, "based-on", "http://x/fhir/Patient/p1");
    assert!(rows.iter().all(|r| !r.param_name.starts_with("based-on.")));
}

#[tokio::test]
async fn test_missing_target_keeps_reference_row() {
    let service = service_with_store(&[], IndexingConfig::default());

    let rows = index_json(&service, &care_plan("cp1", "ServiceRequest/404"), None)
        .await
        .unwrap();

    assert_has_row(&rows, "based-on", "http://x/fhir/ServiceRequest/404");
    assert!(rows.iter().all(|r| !r.param_name.starts_with("based-on.")));
}

#[tokio::test]
async fn test_remote_absolute_reference_is_not_read() {
    let service = service_with_store(&[service_request("42")], IndexingConfig::default());

    let rows = index_json(
        &service,
        &care_plan("cp1", "http://elsewhere.org/fhir/ServiceRequest/42"),
        None,
    )
    .await
    .unwrap();

    let based_on = single_row(&rows, "based-on");
    assert_eq!(based_on.value, "http://elsewhere.org/fhir/ServiceRequest/42");
    assert!(rows.iter().all(|r| !r.param_name.starts_with("based-on.")));

    let rows = index_json(
        &service,
        &care_plan("cp1", "http://x/fhir/ServiceRequest/42"),
        None,
    )
    .await
    .unwrap();
    assert_has_row(&rows, "based-on.status", "active");
}

#[tokio::test]
async fn test_multi_target_chain_is_kind_qualified_only() {
    let patient = json!({"resourceType": "Patient", "id": "p1", "gender": "female"});
    let service = service_with_store(&[patient], IndexingConfig::default());
    let mut observation = blood_pressure("bp1");
    observation["subject"] = json!({"reference": "Patient/p1"});

    let rows = index_json(&service, &observation, None).await.unwrap();

    assert_has_row(&rows, "subject:Patient.gender", "female");
    assert_no_row(&rows, "subject.gender");
    assert_has_row(&rows, "patient.gender", "female");
    assert_has_row(&rows, "patient:Patient.gender", "female");
}

#[tokio::test]
async fn test_compound_document_matches_store() {
    let plan = care_plan("cp1", "ServiceRequest/42");

    let from_store = service_with_store(&[service_request("42")], IndexingConfig::default());
    let store_rows = index_json(&from_store, &plan, None).await.unwrap();

    let document = compound(&[
        ("http://x/fhir/CarePlan/cp1", plan.clone()),
        ("http://x/fhir/ServiceRequest/42", service_request("42")),
    ]);
    let compound_rows = index_json(&IndexingService::new(), &plan, Some(document))
        .await
        .unwrap();

    assert_eq!(store_rows, compound_rows);
}

#[tokio::test]
async fn test_compound_miss_skips_store_unless_enabled() {
    let plan = care_plan("cp1", "ServiceRequest/42");
    let document = compound(&[("http://x/fhir/CarePlan/cp1", plan.clone())]);

    let service = service_with_store(&[service_request("42")], IndexingConfig::default());
    let rows = index_json(&service, &plan, Some(document.clone()))
        .await
        .unwrap();
    assert!(rows.iter().all(|r| !r.param_name.starts_with("based-on.")));

    let service = service_with_store(
        &[service_request("42")],
        IndexingConfig::default().with_chain_store_fallback(true),
    );
    let rows = index_json(&service, &plan, Some(document)).await.unwrap();
    assert_has_row(&rows, "based-on.status", "active");
}

#[tokio::test]
async fn test_urn_reference_resolves_in_compound_document() {
    let patient_urn = "urn:uuid:0b7c5f6e-1f0a-4c5e-9d8e-7a6b5c4d3e2f";
    let mut observation = blood_pressure("bp1");
    observation["subject"] = json!({"reference": patient_urn});
    let patient = json!({
        "resourceType": "Patient",
        "id": "p1",
        "name": [{"family": "Okafor"}]
    });
    let document = compound(&[(patient_urn, patient)]);

    let rows = index_json(&IndexingService::new(), &observation, Some(document))
        .await
        .unwrap();

    assert_has_row(&rows, "subject", patient_urn);
    assert_has_row(&rows, "patient", patient_urn);
    assert_has_row(&rows, "subject:Patient.family", "Okafor");
    assert_has_row(&rows, "patient.family", "Okafor");
}

#[tokio::test]
async fn test_reference_cycle_terminates() {
    let a = organization("A", "Alpha", Some("Organization/B"));
    let b = organization("B", "Beta", Some("Organization/A"));
    let document = compound(&[
        ("http://x/fhir/Organization/A", a.clone()),
        ("http://x/fhir/Organization/B", b),
    ]);

    let rows = index_json(&IndexingService::new(), &a, Some(document))
        .await
        .unwrap();

    assert_has_row(&rows, "partof", "http://x/fhir/Organization/B");
    assert_has_row(&rows, "partof.name", "Beta");
    assert_has_row(&rows, "partof.partof", "http://x/fhir/Organization/A");
    assert_no_row(&rows, "partof.partof.name");
    assert_well_formed(&rows, "Organization", "A");
}

#[tokio::test]
async fn test_chain_depth_is_bounded() {
    let chain: Vec<_> = ["A", "B", "C", "D", "E"]
        .windows(2)
        .map(|pair| {
            let parent = format!("Organization/{}", pair[1]);
            organization(pair[0], pair[0], Some(parent.as_str()))
        })
        .chain(std::iter::once(organization("E", "E", None)))
        .collect();
    let entries: Vec<(String, serde_json::Value)> = chain
        .iter()
        .map(|org| {
            (
                format!("http://x/fhir/Organization/{}", org["id"].as_str().unwrap()),
                org.clone(),
            )
        })
        .collect();
    let borrowed: Vec<(&str, serde_json::Value)> = entries
        .iter()
        .map(|(url, org)| (url.as_str(), org.clone()))
        .collect();
    let document = compound(&borrowed);

    let service = IndexingService::new()
        .with_config(IndexingConfig::default().with_max_chain_depth(2));
    let rows = index_json(&service, &chain[0], Some(document.clone()))
        .await
        .unwrap();
    assert_has_row(&rows, "partof.name", "B");
    assert_has_row(&rows, "partof.partof.name", "C");
    assert_no_row(&rows, "partof.partof.partof.name");

    let service = IndexingService::new()
        .with_config(IndexingConfig::default().with_max_chain_depth(0));
    let rows = index_json(&service, &chain[0], Some(document)).await.unwrap();
    assert_has_row(&rows, "partof", "http://x/fhir/Organization/B");
    assert_no_row(&rows, "partof.name");
}

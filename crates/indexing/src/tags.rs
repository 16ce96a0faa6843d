//! Metadata tag rows.
//!
//! Every record carries `meta.tag`, `meta.profile`, and `meta.security`
//! regardless of kind. They are indexed after all field and chained rows as
//! [`ParamType::Tag`] rows named `_tag`, `_profile`, and `_security`.

use crate::encoding::token_key;
use crate::model::{Coding, Meta};
use crate::types::{ParamType, ParameterRecord, RecordIdentity};

/// Builds the tag rows of a record's metadata.
pub fn tag_rows(owner: &RecordIdentity, meta: &Meta) -> Vec<ParameterRecord> {
    let mut rows = Vec::new();
    rows.extend(meta.tag.iter().filter_map(|c| coding_row(owner, "_tag", c)));
    rows.extend(meta.profile.iter().filter_map(|profile| {
        ParameterRecord::new(owner.clone(), "_profile", ParamType::Tag, profile.trim())
            .map(|row| {
                let key = token_key(None, &row.value);
                row.with_normalized(key)
            })
    }));
    rows.extend(
        meta.security
            .iter()
            .filter_map(|c| coding_row(owner, "_security", c)),
    );
    rows
}

fn coding_row(owner: &RecordIdentity, param: &str, coding: &Coding) -> Option<ParameterRecord> {
    let code = coding.code.as_deref()?.trim();
    let system = coding.system.as_deref().filter(|s| !s.is_empty());
    ParameterRecord::new(owner.clone(), param, ParamType::Tag, code).map(|row| {
        row.with_normalized(token_key(system, code))
            .with_system(system)
            .with_text(coding.display.as_deref())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tag_rows_in_order() {
        let meta: Meta = serde_json::from_value(json!({
            "tag": [{"system": "http://example.org/tags", "code": "needs-review", "display": "Needs review"}],
            "profile": ["http://hl7.org/fhir/us/core/StructureDefinition/us-core-patient"],
            "security": [{"system": "http://terminology.hl7.org/CodeSystem/v3-Confidentiality", "code": "R"}]
        }))
        .unwrap();
        let rows = tag_rows(&RecordIdentity::new("Patient", "p1"), &meta);

        let names: Vec<&str> = rows.iter().map(|r| r.param_name.as_str()).collect();
        assert_eq!(names, vec!["_tag", "_profile", "_security"]);
        assert!(rows.iter().all(|r| r.param_type == ParamType::Tag));

        assert_eq!(rows[0].value_normalized, "http://example.org/tags|needs-review");
        assert_eq!(rows[0].text.as_deref(), Some("Needs review"));
        assert_eq!(rows[1].system, None);
        assert_eq!(rows[2].system.as_deref(), Some("http://terminology.hl7.org/CodeSystem/v3-Confidentiality"));
    }

    #[test]
    fn test_codings_without_code_are_skipped() {
        let meta: Meta = serde_json::from_value(json!({
            "tag": [{"system": "http://example.org/tags"}, {"code": ""}]
        }))
        .unwrap();
        assert!(tag_rows(&RecordIdentity::new("Patient", "p1"), &meta).is_empty());
    }
}

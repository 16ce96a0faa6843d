//! People, organizations, places, and groups.

use crate::extract::rule::{
    ComponentKind, CompositeRule, ExtractionRule, FieldShape, KindTable, chained, choice,
    component, reference, rule,
};
use crate::types::ParamType;

pub static PATIENT: KindTable = KindTable {
    kind: "Patient",
    rules: &[
        rule("identifier", &["identifier"], FieldShape::Identifier),
        rule("active", &["active"], FieldShape::Boolean),
        rule("name", &["name"], FieldShape::HumanName),
        rule("family", &["name", "family"], FieldShape::String),
        rule("given", &["name", "given"], FieldShape::String),
        rule("telecom", &["telecom"], FieldShape::ContactPoint(None)),
        rule("phone", &["telecom"], FieldShape::ContactPoint(Some("phone"))),
        rule("email", &["telecom"], FieldShape::ContactPoint(Some("email"))),
        rule("gender", &["gender"], FieldShape::Code),
        rule("birthdate", &["birthDate"], FieldShape::Date),
        choice("deceased", &["deceased"], ParamType::Token),
        rule("address", &["address"], FieldShape::Address),
        rule("address-city", &["address", "city"], FieldShape::String),
        rule("address-state", &["address", "state"], FieldShape::String),
        rule("address-postalcode", &["address", "postalCode"], FieldShape::String),
        rule("address-country", &["address", "country"], FieldShape::String),
        rule("language", &["communication", "language"], FieldShape::CodeableConcept),
        chained(
            "general-practitioner",
            &["generalPractitioner"],
            &["Organization", "Practitioner", "PractitionerRole"],
        ),
        chained("organization", &["managingOrganization"], &["Organization"]),
        reference("link", &["link", "other"], &["Patient", "RelatedPerson"]),
    ],
    composites: &[],
};

/// Reduced Patient variant used by the patient-matching operation.
pub static PATIENT_MATCH: KindTable = KindTable {
    kind: "PatientMatch",
    rules: &[
        rule("identifier", &["identifier"], FieldShape::Identifier),
        rule("name", &["name"], FieldShape::HumanName),
        rule("family", &["name", "family"], FieldShape::String),
        rule("given", &["name", "given"], FieldShape::String),
        rule("gender", &["gender"], FieldShape::Code),
        rule("birthdate", &["birthDate"], FieldShape::Date),
        rule("telecom", &["telecom"], FieldShape::ContactPoint(None)),
        rule("address-postalcode", &["address", "postalCode"], FieldShape::String),
    ],
    composites: &[],
};

pub static PRACTITIONER: KindTable = KindTable {
    kind: "Practitioner",
    rules: &[
        rule("identifier", &["identifier"], FieldShape::Identifier),
        rule("active", &["active"], FieldShape::Boolean),
        rule("name", &["name"], FieldShape::HumanName),
        rule("family", &["name", "family"], FieldShape::String),
        rule("given", &["name", "given"], FieldShape::String),
        rule("telecom", &["telecom"], FieldShape::ContactPoint(None)),
        rule("phone", &["telecom"], FieldShape::ContactPoint(Some("phone"))),
        rule("email", &["telecom"], FieldShape::ContactPoint(Some("email"))),
        rule("address", &["address"], FieldShape::Address),
        rule("gender", &["gender"], FieldShape::Code),
        rule("communication", &["communication"], FieldShape::CodeableConcept),
    ],
    composites: &[],
};

pub static ORGANIZATION: KindTable = KindTable {
    kind: "Organization",
    rules: &[
        rule("identifier", &["identifier"], FieldShape::Identifier),
        rule("active", &["active"], FieldShape::Boolean),
        rule("type", &["type"], FieldShape::CodeableConcept),
        rule("name", &["name"], FieldShape::String),
        rule("name", &["alias"], FieldShape::String),
        rule("address", &["address"], FieldShape::Address),
        rule("address-city", &["address", "city"], FieldShape::String),
        chained("partof", &["partOf"], &["Organization"]),
        reference("endpoint", &["endpoint"], &["Endpoint"]),
    ],
    composites: &[],
};

pub static LOCATION: KindTable = KindTable {
    kind: "Location",
    rules: &[
        rule("identifier", &["identifier"], FieldShape::Identifier),
        rule("status", &["status"], FieldShape::Code),
        rule("name", &["name"], FieldShape::String),
        rule("name", &["alias"], FieldShape::String),
        rule("type", &["type"], FieldShape::CodeableConcept),
        rule("address", &["address"], FieldShape::Address),
        rule("address-city", &["address", "city"], FieldShape::String),
        chained("organization", &["managingOrganization"], &["Organization"]),
        reference("partof", &["partOf"], &["Location"]),
    ],
    composites: &[],
};

static GROUP_COMPOSITES: &[CompositeRule] = &[CompositeRule {
    param: "characteristic-value",
    group: &["characteristic"],
    components: &[
        component(&["code"], ComponentKind::Token),
        component(&["value"], ComponentKind::Token),
    ],
}];

static GROUP_RULES: &[ExtractionRule] = &[
    rule("identifier", &["identifier"], FieldShape::Identifier),
    rule("actual", &["actual"], FieldShape::Boolean),
    rule("type", &["type"], FieldShape::Code),
    rule("code", &["code"], FieldShape::CodeableConcept),
    reference(
        "member",
        &["member", "entity"],
        &[
            "Patient",
            "Practitioner",
            "PractitionerRole",
            "Device",
            "Medication",
            "Substance",
            "Group",
        ],
    ),
    reference(
        "managing-entity",
        &["managingEntity"],
        &["Organization", "RelatedPerson", "Practitioner", "PractitionerRole"],
    ),
    rule("characteristic", &["characteristic", "code"], FieldShape::CodeableConcept),
    rule("exclude", &["characteristic", "exclude"], FieldShape::Boolean),
    choice("value", &["characteristic", "value"], ParamType::Token),
];

pub static GROUP: KindTable = KindTable {
    kind: "Group",
    rules: GROUP_RULES,
    composites: GROUP_COMPOSITES,
};

//! Documents, messages, and terminology.

use crate::extract::rule::{
    ComponentKind, CompositeRule, FieldShape, KindTable, chained, chained_strict, choice,
    component, reference, rule,
};
use crate::types::ParamType;

pub static DOCUMENT_REFERENCE: KindTable = KindTable {
    kind: "DocumentReference",
    rules: &[
        rule("identifier", &["masterIdentifier"], FieldShape::Identifier),
        rule("identifier", &["identifier"], FieldShape::Identifier),
        rule("status", &["status"], FieldShape::Code),
        rule("type", &["type"], FieldShape::CodeableConcept),
        rule("category", &["category"], FieldShape::CodeableConcept),
        chained("subject", &["subject"], &["Patient", "Practitioner", "Group", "Device"]),
        chained_strict("patient", &["subject"], &["Patient"]),
        rule("date", &["date"], FieldShape::Date),
        reference("author", &["author"], &[]),
        reference("custodian", &["custodian"], &["Organization"]),
        rule("description", &["description"], FieldShape::String),
        rule("contenttype", &["content", "attachment", "contentType"], FieldShape::Code),
        rule("location", &["content", "attachment", "url"], FieldShape::Uri),
        rule("period", &["context", "period"], FieldShape::Period),
        chained("encounter", &["context", "encounter"], &["Encounter", "EpisodeOfCare"]),
        reference("relatesto", &["relatesTo", "target"], &["DocumentReference"]),
    ],
    composites: &[],
};

pub static COMPOSITION: KindTable = KindTable {
    kind: "Composition",
    rules: &[
        rule("identifier", &["identifier"], FieldShape::Identifier),
        rule("status", &["status"], FieldShape::Code),
        rule("type", &["type"], FieldShape::CodeableConcept),
        rule("category", &["category"], FieldShape::CodeableConcept),
        chained("subject", &["subject"], &[]),
        chained_strict("patient", &["subject"], &["Patient"]),
        chained("encounter", &["encounter"], &["Encounter"]),
        rule("date", &["date"], FieldShape::Date),
        chained(
            "author",
            &["author"],
            &[
                "Practitioner",
                "PractitionerRole",
                "Device",
                "Patient",
                "RelatedPerson",
                "Organization",
            ],
        ),
        rule("title", &["title"], FieldShape::String),
        rule("confidentiality", &["confidentiality"], FieldShape::Code),
        rule("section", &["section", "code"], FieldShape::CodeableConcept),
        reference("entry", &["section", "entry"], &[]),
        reference("attester", &["attester", "party"], &[]),
    ],
    composites: &[],
};

pub static MESSAGE_HEADER: KindTable = KindTable {
    kind: "MessageHeader",
    rules: &[
        choice("event", &["event"], ParamType::Token),
        rule("source", &["source", "name"], FieldShape::String),
        rule("source-uri", &["source", "endpoint"], FieldShape::Uri),
        rule("destination", &["destination", "name"], FieldShape::String),
        rule("destination-uri", &["destination", "endpoint"], FieldShape::Uri),
        chained("focus", &["focus"], &[]),
        reference("sender", &["sender"], &["Practitioner", "PractitionerRole", "Organization"]),
        reference("author", &["author"], &["Practitioner", "PractitionerRole"]),
        rule("response-id", &["response", "identifier"], FieldShape::Code),
        rule("code", &["response", "code"], FieldShape::Code),
    ],
    composites: &[],
};

static VALUE_SET_COMPOSITES: &[CompositeRule] = &[
    CompositeRule {
        param: "context-type-value",
        group: &["useContext"],
        components: &[
            component(&["code"], ComponentKind::Token),
            component(&["value"], ComponentKind::Token),
        ],
    },
    CompositeRule {
        param: "context-type-quantity",
        group: &["useContext"],
        components: &[
            component(&["code"], ComponentKind::Token),
            component(&["value"], ComponentKind::Quantity),
        ],
    },
];

pub static VALUE_SET: KindTable = KindTable {
    kind: "ValueSet",
    rules: &[
        rule("url", &["url"], FieldShape::Uri),
        rule("identifier", &["identifier"], FieldShape::Identifier),
        rule("version", &["version"], FieldShape::Code),
        rule("name", &["name"], FieldShape::String),
        rule("title", &["title"], FieldShape::String),
        rule("status", &["status"], FieldShape::Code),
        rule("publisher", &["publisher"], FieldShape::String),
        rule("description", &["description"], FieldShape::String),
        rule("date", &["date"], FieldShape::Date),
        rule("jurisdiction", &["jurisdiction"], FieldShape::CodeableConcept),
        rule("context-type", &["useContext", "code"], FieldShape::Coding),
        choice("context", &["useContext", "value"], ParamType::Token),
        choice("context-quantity", &["useContext", "value"], ParamType::Quantity),
        rule("reference", &["compose", "include", "system"], FieldShape::Uri),
        rule("code", &["expansion", "contains", "code"], FieldShape::Code),
    ],
    composites: VALUE_SET_COMPOSITES,
};

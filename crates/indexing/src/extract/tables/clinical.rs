//! Encounters, observations, conditions, procedures, plans, and orders.

use crate::extract::rule::{
    ComponentKind, CompositeRule, FieldShape, KindTable, ReferenceRule, chained, chained_strict,
    choice, component, reference, rule,
};
use crate::types::ParamType;

const SUBJECT_TARGETS: &[&str] = &["Patient", "Group"];
const PATIENT_TARGET: &[&str] = &["Patient"];
const ENCOUNTER_TARGET: &[&str] = &["Encounter"];

pub static ENCOUNTER: KindTable = KindTable {
    kind: "Encounter",
    rules: &[
        rule("identifier", &["identifier"], FieldShape::Identifier),
        rule("status", &["status"], FieldShape::Code),
        rule("class", &["class"], FieldShape::Coding),
        rule("type", &["type"], FieldShape::CodeableConcept),
        chained("subject", &["subject"], SUBJECT_TARGETS),
        chained_strict("patient", &["subject"], PATIENT_TARGET),
        chained(
            "participant",
            &["participant", "individual"],
            &["Practitioner", "PractitionerRole", "RelatedPerson"],
        ),
        chained_strict("practitioner", &["participant", "individual"], &["Practitioner"]),
        rule("date", &["period"], FieldShape::Period),
        rule("reason-code", &["reasonCode"], FieldShape::CodeableConcept),
        chained("service-provider", &["serviceProvider"], &["Organization"]),
        reference("location", &["location", "location"], &["Location"]),
        reference("part-of", &["partOf"], ENCOUNTER_TARGET),
    ],
    composites: &[],
};

static OBSERVATION_COMPOSITES: &[CompositeRule] = &[
    CompositeRule {
        param: "code-value-quantity",
        group: &[],
        components: &[
            component(&["code"], ComponentKind::Token),
            component(&["value"], ComponentKind::Quantity),
        ],
    },
    CompositeRule {
        param: "code-value-concept",
        group: &[],
        components: &[
            component(&["code"], ComponentKind::Token),
            component(&["value"], ComponentKind::Token),
        ],
    },
    CompositeRule {
        param: "component-code-value-quantity",
        group: &["component"],
        components: &[
            component(&["code"], ComponentKind::Token),
            component(&["value"], ComponentKind::Quantity),
        ],
    },
    CompositeRule {
        param: "component-code-value-concept",
        group: &["component"],
        components: &[
            component(&["code"], ComponentKind::Token),
            component(&["value"], ComponentKind::Token),
        ],
    },
];

pub static OBSERVATION: KindTable = KindTable {
    kind: "Observation",
    rules: &[
        rule("identifier", &["identifier"], FieldShape::Identifier),
        rule("status", &["status"], FieldShape::Code),
        rule("category", &["category"], FieldShape::CodeableConcept),
        rule("code", &["code"], FieldShape::CodeableConcept),
        chained("subject", &["subject"], &["Patient", "Group", "Device", "Location"]),
        chained_strict("patient", &["subject"], PATIENT_TARGET),
        chained("encounter", &["encounter"], ENCOUNTER_TARGET),
        reference(
            "based-on",
            &["basedOn"],
            &["CarePlan", "DeviceRequest", "MedicationRequest", "ServiceRequest"],
        ),
        reference(
            "performer",
            &["performer"],
            &[
                "Practitioner",
                "PractitionerRole",
                "Organization",
                "CareTeam",
                "Patient",
                "RelatedPerson",
            ],
        ),
        choice("date", &["effective"], ParamType::Date),
        choice("value-quantity", &["value"], ParamType::Quantity),
        choice("value-concept", &["value"], ParamType::Token),
        choice("value-string", &["value"], ParamType::String),
        choice("value-date", &["value"], ParamType::Date),
        rule("data-absent-reason", &["dataAbsentReason"], FieldShape::CodeableConcept),
        rule("component-code", &["component", "code"], FieldShape::CodeableConcept),
        choice("component-value-quantity", &["component", "value"], ParamType::Quantity),
        choice("component-value-concept", &["component", "value"], ParamType::Token),
        reference("has-member", &["hasMember"], &["Observation", "QuestionnaireResponse"]),
        reference("derived-from", &["derivedFrom"], &[]),
    ],
    composites: OBSERVATION_COMPOSITES,
};

pub static CONDITION: KindTable = KindTable {
    kind: "Condition",
    rules: &[
        rule("identifier", &["identifier"], FieldShape::Identifier),
        rule("clinical-status", &["clinicalStatus"], FieldShape::CodeableConcept),
        rule("verification-status", &["verificationStatus"], FieldShape::CodeableConcept),
        rule("category", &["category"], FieldShape::CodeableConcept),
        rule("severity", &["severity"], FieldShape::CodeableConcept),
        rule("code", &["code"], FieldShape::CodeableConcept),
        rule("body-site", &["bodySite"], FieldShape::CodeableConcept),
        chained("subject", &["subject"], SUBJECT_TARGETS),
        chained_strict("patient", &["subject"], PATIENT_TARGET),
        chained("encounter", &["encounter"], ENCOUNTER_TARGET),
        choice("onset-date", &["onset"], ParamType::Date),
        choice("abatement-date", &["abatement"], ParamType::Date),
        rule("recorded-date", &["recordedDate"], FieldShape::Date),
        reference(
            "asserter",
            &["asserter"],
            &["Practitioner", "PractitionerRole", "Patient", "RelatedPerson"],
        ),
    ],
    composites: &[],
};

pub static PROCEDURE: KindTable = KindTable {
    kind: "Procedure",
    rules: &[
        rule("identifier", &["identifier"], FieldShape::Identifier),
        rule("status", &["status"], FieldShape::Code),
        rule("category", &["category"], FieldShape::CodeableConcept),
        rule("code", &["code"], FieldShape::CodeableConcept),
        chained("subject", &["subject"], SUBJECT_TARGETS),
        chained_strict("patient", &["subject"], PATIENT_TARGET),
        chained("encounter", &["encounter"], ENCOUNTER_TARGET),
        choice("date", &["performed"], ParamType::Date),
        reference(
            "performer",
            &["performer", "actor"],
            &[
                "Practitioner",
                "PractitionerRole",
                "Organization",
                "Patient",
                "RelatedPerson",
                "Device",
            ],
        ),
        rule("reason-code", &["reasonCode"], FieldShape::CodeableConcept),
        reference("based-on", &["basedOn"], &["CarePlan", "ServiceRequest"]),
        reference("location", &["location"], &["Location"]),
    ],
    composites: &[],
};

pub static CARE_PLAN: KindTable = KindTable {
    kind: "CarePlan",
    rules: &[
        rule("identifier", &["identifier"], FieldShape::Identifier),
        rule("status", &["status"], FieldShape::Code),
        rule("intent", &["intent"], FieldShape::Code),
        rule("category", &["category"], FieldShape::CodeableConcept),
        chained("subject", &["subject"], SUBJECT_TARGETS),
        chained_strict("patient", &["subject"], PATIENT_TARGET),
        chained("encounter", &["encounter"], ENCOUNTER_TARGET),
        rule("date", &["period"], FieldShape::Period),
        chained("based-on", &["basedOn"], &["ServiceRequest"]),
        reference("care-team", &["careTeam"], &["CareTeam"]),
        reference("goal", &["goal"], &["Goal"]),
        rule("activity-code", &["activity", "detail", "code"], FieldShape::CodeableConcept),
        choice("activity-date", &["activity", "detail", "scheduled"], ParamType::Date),
        rule("instantiates-canonical", &["instantiatesCanonical"], FieldShape::Uri),
    ],
    composites: &[],
};

pub static SERVICE_REQUEST: KindTable = KindTable {
    kind: "ServiceRequest",
    rules: &[
        rule("identifier", &["identifier"], FieldShape::Identifier),
        rule("status", &["status"], FieldShape::Code),
        rule("intent", &["intent"], FieldShape::Code),
        rule("priority", &["priority"], FieldShape::Code),
        rule("category", &["category"], FieldShape::CodeableConcept),
        rule("code", &["code"], FieldShape::CodeableConcept),
        chained("subject", &["subject"], &["Patient", "Group", "Location", "Device"]),
        chained_strict("patient", &["subject"], PATIENT_TARGET),
        chained("encounter", &["encounter"], ENCOUNTER_TARGET),
        rule("authored", &["authoredOn"], FieldShape::Date),
        choice("occurrence", &["occurrence"], ParamType::Date),
        reference(
            "requester",
            &["requester"],
            &[
                "Practitioner",
                "PractitionerRole",
                "Organization",
                "Patient",
                "RelatedPerson",
                "Device",
            ],
        ),
        reference("performer", &["performer"], &[]),
        reference(
            "based-on",
            &["basedOn"],
            &["CarePlan", "ServiceRequest", "MedicationRequest"],
        ),
        rule("requisition", &["requisition"], FieldShape::Identifier),
    ],
    composites: &[],
};

pub static MEDICATION_REQUEST: KindTable = KindTable {
    kind: "MedicationRequest",
    rules: &[
        rule("identifier", &["identifier"], FieldShape::Identifier),
        rule("status", &["status"], FieldShape::Code),
        rule("intent", &["intent"], FieldShape::Code),
        rule("category", &["category"], FieldShape::CodeableConcept),
        choice("code", &["medication"], ParamType::Token),
        rule(
            "medication",
            &["medication"],
            FieldShape::Choice(
                ParamType::Reference,
                ReferenceRule {
                    targets: &["Medication"],
                    chain: true,
                    strict: false,
                },
            ),
        ),
        chained("subject", &["subject"], SUBJECT_TARGETS),
        chained_strict("patient", &["subject"], PATIENT_TARGET),
        chained("encounter", &["encounter"], ENCOUNTER_TARGET),
        rule("authoredon", &["authoredOn"], FieldShape::Date),
        reference(
            "requester",
            &["requester"],
            &[
                "Practitioner",
                "PractitionerRole",
                "Organization",
                "Patient",
                "RelatedPerson",
                "Device",
            ],
        ),
        reference("intended-performer", &["performer"], &[]),
    ],
    composites: &[],
};

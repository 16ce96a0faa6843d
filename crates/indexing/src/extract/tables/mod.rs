//! Built-in extraction rule tables.
//!
//! Each table lists the searchable fields of one kind. `Bundle` is not a
//! table; it is handled by [`BundleExtractor`](super::BundleExtractor).

mod administrative;
mod clinical;
mod documents;

use super::rule::KindTable;

static TABLES: &[&KindTable] = &[
    &administrative::PATIENT,
    &administrative::PATIENT_MATCH,
    &administrative::PRACTITIONER,
    &administrative::ORGANIZATION,
    &administrative::LOCATION,
    &administrative::GROUP,
    &clinical::ENCOUNTER,
    &clinical::OBSERVATION,
    &clinical::CONDITION,
    &clinical::PROCEDURE,
    &clinical::CARE_PLAN,
    &clinical::SERVICE_REQUEST,
    &clinical::MEDICATION_REQUEST,
    &documents::DOCUMENT_REFERENCE,
    &documents::COMPOSITION,
    &documents::MESSAGE_HEADER,
    &documents::VALUE_SET,
];

/// Every built-in table.
pub fn all() -> &'static [&'static KindTable] {
    TABLES
}

//! Typed FHIR datatypes read by extractors.
//!
//! Only the elements that carry searchable values are modeled; unknown
//! properties are ignored on deserialization.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A code defined by a terminology system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coding {
    /// Identity of the terminology system.
    pub system: Option<String>,
    /// Version of the system.
    pub version: Option<String>,
    /// Symbol in syntax defined by the system.
    pub code: Option<String>,
    /// Representation defined by the system.
    pub display: Option<String>,
}

/// A concept that may be defined by codings and/or free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeableConcept {
    /// Codes defined by terminology systems.
    #[serde(default)]
    pub coding: Vec<Coding>,
    /// Plain text representation.
    pub text: Option<String>,
}

/// A business identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    /// The namespace for the identifier value.
    pub system: Option<String>,
    /// The value that is unique.
    pub value: Option<String>,
    /// Description of the identifier.
    #[serde(rename = "type")]
    pub type_: Option<CodeableConcept>,
}

/// A reference from one record to another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Literal reference, relative, internal, or absolute URL.
    pub reference: Option<String>,
    /// Type the reference refers to.
    #[serde(rename = "type")]
    pub type_: Option<String>,
    /// Logical reference, when the literal reference is not known.
    pub identifier: Option<Identifier>,
    /// Text alternative for the record.
    pub display: Option<String>,
}

/// Time range defined by start and end date/time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    /// Starting time with inclusive boundary.
    pub start: Option<String>,
    /// End time with inclusive boundary, if not ongoing.
    pub end: Option<String>,
}

/// A measured amount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quantity {
    /// Numerical value, with the precision it was written in.
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub value: Option<Decimal>,
    /// `<`, `<=`, `>=`, `>`, or `ad`.
    pub comparator: Option<String>,
    /// Unit representation.
    pub unit: Option<String>,
    /// System that defines coded unit form.
    pub system: Option<String>,
    /// Coded form of the unit.
    pub code: Option<String>,
}

impl Quantity {
    /// Returns the value as an exact decimal.
    pub fn decimal(&self) -> Option<Decimal> {
        self.value
    }
}

/// Set of values bounded by low and high.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    /// Low limit.
    pub low: Option<Quantity>,
    /// High limit.
    pub high: Option<Quantity>,
}

/// Name of a human.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanName {
    /// Text representation of the full name.
    pub text: Option<String>,
    /// Family name.
    pub family: Option<String>,
    /// Given names.
    #[serde(default)]
    pub given: Vec<String>,
    /// Parts that come before the name.
    #[serde(default)]
    pub prefix: Vec<String>,
    /// Parts that come after the name.
    #[serde(default)]
    pub suffix: Vec<String>,
}

/// A postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Text representation of the address.
    pub text: Option<String>,
    /// Street name, number, direction and P.O. Box.
    #[serde(default)]
    pub line: Vec<String>,
    /// Name of city, town etc.
    pub city: Option<String>,
    /// District name.
    pub district: Option<String>,
    /// Sub-unit of country.
    pub state: Option<String>,
    /// Postal code for area.
    pub postal_code: Option<String>,
    /// Country.
    pub country: Option<String>,
}

impl Address {
    /// Returns every populated string part, in element order.
    pub fn parts(&self) -> Vec<&str> {
        let mut parts: Vec<&str> = Vec::new();
        parts.extend(self.text.as_deref());
        parts.extend(self.line.iter().map(String::as_str));
        parts.extend(self.city.as_deref());
        parts.extend(self.district.as_deref());
        parts.extend(self.state.as_deref());
        parts.extend(self.postal_code.as_deref());
        parts.extend(self.country.as_deref());
        parts
    }
}

/// Details of a technology-mediated contact point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPoint {
    /// phone | fax | email | pager | url | sms | other
    pub system: Option<String>,
    /// The actual contact point details.
    pub value: Option<String>,
    /// home | work | temp | old | mobile
    #[serde(rename = "use")]
    pub use_: Option<String>,
}

/// Metadata about a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Version specific identifier.
    pub version_id: Option<String>,
    /// When the record version last changed.
    pub last_updated: Option<String>,
    /// Profiles this record claims to conform to.
    #[serde(default)]
    pub profile: Vec<String>,
    /// Security labels applied to this record.
    #[serde(default)]
    pub security: Vec<Coding>,
    /// Tags applied to this record.
    #[serde(default)]
    pub tag: Vec<Coding>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::str::FromStr;

    #[test]
    fn test_identifier_with_type() {
        let identifier: Identifier = serde_json::from_value(json!({
            "system": "http://hospital.org/mrn",
            "value": "12345",
            "type": {"coding": [{"system": "http://terminology.hl7.org/CodeSystem/v2-0203", "code": "MR"}]}
        }))
        .unwrap();

        assert_eq!(identifier.value.as_deref(), Some("12345"));
        assert_eq!(
            identifier.type_.unwrap().coding[0].code.as_deref(),
            Some("MR")
        );
    }

    #[test]
    fn test_quantity_decimal() {
        let quantity: Quantity = serde_json::from_value(json!({
            "value": 120.5,
            "unit": "mmHg",
            "system": "http://unitsofmeasure.org",
            "code": "mm[Hg]"
        }))
        .unwrap();
        assert_eq!(quantity.decimal(), Decimal::from_str("120.5").ok());

        let integer: Quantity = serde_json::from_value(json!({"value": 3})).unwrap();
        assert_eq!(integer.decimal(), Some(Decimal::from(3)));

        let empty = Quantity::default();
        assert_eq!(empty.decimal(), None);
    }

    #[test]
    fn test_quantity_keeps_written_precision() {
        let quantity: Quantity =
            serde_json::from_str(r#"{"value": 1234567890.123456789, "unit": "g"}"#).unwrap();
        assert_eq!(
            quantity.decimal().map(|d| d.to_string()).as_deref(),
            Some("1234567890.123456789")
        );

        let trailing: Quantity = serde_json::from_str(r#"{"value": 120.50}"#).unwrap();
        assert_eq!(
            trailing.decimal().map(|d| d.to_string()).as_deref(),
            Some("120.50")
        );

        let body: Value = serde_json::from_str(r#"{"value": 0.30000000000000004441}"#).unwrap();
        let from_value: Quantity = serde_json::from_value(body).unwrap();
        assert_eq!(
            from_value.decimal().map(|d| d.to_string()).as_deref(),
            Some("0.30000000000000004441")
        );
    }

    #[test]
    fn test_malformed_element_is_an_error() {
        let result = serde_json::from_value::<Coding>(json!({"code": 42}));
        assert!(result.is_err());
    }

    #[test]
    fn test_address_parts() {
        let address: Address = serde_json::from_value(json!({
            "line": ["1 Main St", "Apt 2"],
            "city": "Springfield",
            "postalCode": "12345"
        }))
        .unwrap();
        assert_eq!(address.parts(), vec!["1 Main St", "Apt 2", "Springfield", "12345"]);
    }

    #[test]
    fn test_meta_defaults() {
        let meta: Meta =
            serde_json::from_value(json!({"lastUpdated": "2024-01-01T00:00:00Z"})).unwrap();
        assert!(meta.tag.is_empty());
        assert!(meta.profile.is_empty());
        assert_eq!(meta.last_updated.as_deref(), Some("2024-01-01T00:00:00Z"));
    }
}

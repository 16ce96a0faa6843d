//! Polymorphic `[x]` elements.
//!
//! A choice element such as `value[x]` is serialized with its type as a
//! suffix (`valueQuantity`, `valueCodeableConcept`, ...). At most one variant
//! may be populated; [`ChoiceValue::read`] returns that variant or nothing.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::datatypes::{CodeableConcept, Coding, Period, Quantity, Range, Reference};

/// The populated variant of a choice element.
#[derive(Debug, Clone, PartialEq)]
pub enum ChoiceValue {
    /// `date`, `dateTime`, or `instant`.
    Date(String),
    /// `Period`.
    Period(Period),
    /// `Quantity` and its profiles (`Age`, `Duration`, `Distance`, `Count`).
    Quantity(Quantity),
    /// `Range`.
    Range(Range),
    /// `CodeableConcept`.
    CodeableConcept(CodeableConcept),
    /// `Coding`.
    Coding(Coding),
    /// `string` or `markdown`.
    String(String),
    /// `uri`, `url`, or `canonical`.
    Uri(String),
    /// `boolean`.
    Boolean(bool),
    /// `integer`, `positiveInt`, or `unsignedInt`.
    Integer(i64),
    /// `Reference`.
    Reference(Reference),
    /// Any other type; carries the type suffix.
    Unsupported(String),
}

impl ChoiceValue {
    /// Reads the choice element `name` from an object.
    ///
    /// Returns `None` when no variant is present, when more than one is
    /// present, or when the populated variant is malformed.
    pub fn read(object: &Map<String, Value>, name: &str) -> Option<Self> {
        let mut populated = object.iter().filter(|(key, _)| {
            key.strip_prefix(name)
                .and_then(|suffix| suffix.chars().next())
                .is_some_and(|c| c.is_ascii_uppercase())
        });

        let (key, value) = populated.next()?;
        if let Some((other, _)) = populated.next() {
            tracing::debug!(
                element = name,
                first = %key,
                second = %other,
                "Choice element has more than one variant populated, skipping"
            );
            return None;
        }

        let suffix = &key[name.len()..];
        let choice = Self::from_suffix(suffix, value);
        if choice.is_none() {
            tracing::debug!(element = %key, "Malformed choice element, skipping");
        }
        choice
    }

    /// Builds the variant named by a type suffix from its JSON value.
    pub fn from_suffix(suffix: &str, value: &Value) -> Option<Self> {
        match suffix {
            "Date" | "DateTime" | "Instant" => {
                value.as_str().map(|s| ChoiceValue::Date(s.to_string()))
            }
            "Period" => typed(value).map(ChoiceValue::Period),
            "Quantity" | "Age" | "Duration" | "Distance" | "Count" => {
                typed(value).map(ChoiceValue::Quantity)
            }
            "Range" => typed(value).map(ChoiceValue::Range),
            "CodeableConcept" => typed(value).map(ChoiceValue::CodeableConcept),
            "Coding" => typed(value).map(ChoiceValue::Coding),
            "String" | "Markdown" => value.as_str().map(|s| ChoiceValue::String(s.to_string())),
            "Uri" | "Url" | "Canonical" => value.as_str().map(|s| ChoiceValue::Uri(s.to_string())),
            "Boolean" => value.as_bool().map(ChoiceValue::Boolean),
            "Integer" | "PositiveInt" | "UnsignedInt" => value.as_i64().map(ChoiceValue::Integer),
            "Reference" => typed(value).map(ChoiceValue::Reference),
            other => Some(ChoiceValue::Unsupported(other.to_string())),
        }
    }
}

fn typed<T: DeserializeOwned>(value: &Value) -> Option<T> {
    serde_json::from_value(value.clone()).ok()
}

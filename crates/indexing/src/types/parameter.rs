//! The index row data model.

use serde::{Deserialize, Serialize};

use crate::encoding::normalize::normalize_string;

use super::date_range::DateRange;
use super::identity::RecordIdentity;
use super::param_type::ParamType;

/// One searchable fact about one record.
///
/// Rows are keyed for persistence by [`row_key`](Self::row_key). The value of a
/// row is never empty: [`ParameterRecord::new`] refuses empty values, so an
/// absent field produces no row at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterRecord {
    /// The top-level record this row belongs to, even for chained values.
    pub owner: RecordIdentity,

    /// The parameter name, possibly chain-prefixed.
    pub param_name: String,

    /// The parameter type.
    pub param_type: ParamType,

    /// Raw value.
    pub value: String,

    /// Normalized value used for matching.
    pub value_normalized: String,

    /// Namespace of a coded value, or unit system of a quantity.
    pub system: Option<String>,

    /// Unit code of a quantity.
    pub code: Option<String>,

    /// Display text associated with the value.
    pub text: Option<String>,

    /// Normalized display text.
    pub text_normalized: Option<String>,

    /// Covered time range (date rows only).
    pub range: Option<DateRange>,
}

/// Persisted key of a row: `(owner, param_name, param_type, value, system, code, text)`.
pub type RowKey<'a> = (
    &'a RecordIdentity,
    &'a str,
    ParamType,
    &'a str,
    Option<&'a str>,
    Option<&'a str>,
    Option<&'a str>,
);

impl ParameterRecord {
    /// Creates a row, or `None` when the value is empty.
    ///
    /// The normalized value defaults to the raw value.
    pub fn new(
        owner: RecordIdentity,
        param_name: impl Into<String>,
        param_type: ParamType,
        value: impl Into<String>,
    ) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return None;
        }
        Some(Self {
            owner,
            param_name: param_name.into(),
            param_type,
            value_normalized: value.clone(),
            value,
            system: None,
            code: None,
            text: None,
            text_normalized: None,
            range: None,
        })
    }

    /// Sets the normalized value.
    pub fn with_normalized(mut self, normalized: impl Into<String>) -> Self {
        self.value_normalized = normalized.into();
        self
    }

    /// Sets the namespace, ignoring empty strings.
    pub fn with_system(mut self, system: Option<&str>) -> Self {
        self.system = system.filter(|s| !s.is_empty()).map(String::from);
        self
    }

    /// Sets the code slot, ignoring empty strings.
    pub fn with_code(mut self, code: Option<&str>) -> Self {
        self.code = code.filter(|s| !s.is_empty()).map(String::from);
        self
    }

    /// Sets display text and its normalized form, ignoring empty strings.
    pub fn with_text(mut self, text: Option<&str>) -> Self {
        match text.filter(|s| !s.trim().is_empty()) {
            Some(text) => {
                self.text_normalized = Some(normalize_string(text));
                self.text = Some(text.to_string());
            }
            None => {
                self.text = None;
                self.text_normalized = None;
            }
        }
        self
    }

    /// Sets the covered range.
    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Returns a copy of this row relabeled under a new name and owner.
    pub fn relabeled(&self, param_name: String, owner: &RecordIdentity) -> Self {
        Self {
            owner: owner.clone(),
            param_name,
            ..self.clone()
        }
    }

    /// Returns the persisted key of this row.
    pub fn row_key(&self) -> RowKey<'_> {
        (
            &self.owner,
            &self.param_name,
            self.param_type,
            &self.value,
            self.system.as_deref(),
            self.code.as_deref(),
            self.text.as_deref(),
        )
    }
}

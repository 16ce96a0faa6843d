//! Index parameter types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type of an index row.
///
/// See: https://build.fhir.org/search.html#ptypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// A code, identifier, or boolean with an optional namespace.
    Token,
    /// A simple string, like a name or description.
    String,
    /// A date, dateTime, instant, or period.
    Date,
    /// A reference to another record.
    Reference,
    /// A quantity, with a number and units.
    Quantity,
    /// A URI or canonical URL.
    Uri,
    /// A delimited combination of several component values.
    Composite,
    /// A meta tag, profile declaration, or security label.
    Tag,
}

impl ParamType {
    /// Returns the lowercase name used in persisted rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::Token => "token",
            ParamType::String => "string",
            ParamType::Date => "date",
            ParamType::Reference => "reference",
            ParamType::Quantity => "quantity",
            ParamType::Uri => "uri",
            ParamType::Composite => "composite",
            ParamType::Tag => "tag",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "token" => Ok(ParamType::Token),
            "string" => Ok(ParamType::String),
            "date" => Ok(ParamType::Date),
            "reference" => Ok(ParamType::Reference),
            "quantity" => Ok(ParamType::Quantity),
            "uri" => Ok(ParamType::Uri),
            "composite" => Ok(ParamType::Composite),
            "tag" => Ok(ParamType::Tag),
            _ => Err(format!("unknown parameter type: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_type_display_and_parse() {
        for ty in [
            ParamType::Token,
            ParamType::String,
            ParamType::Date,
            ParamType::Reference,
            ParamType::Quantity,
            ParamType::Uri,
            ParamType::Composite,
            ParamType::Tag,
        ] {
            assert_eq!(ty.to_string().parse::<ParamType>().unwrap(), ty);
        }
        assert_eq!("TOKEN".parse::<ParamType>().unwrap(), ParamType::Token);
        assert!("number".parse::<ParamType>().is_err());
    }

    #[test]
    fn test_param_type_serde() {
        let json = serde_json::to_string(&ParamType::Composite).unwrap();
        assert_eq!(json, "\"composite\"");
    }
}

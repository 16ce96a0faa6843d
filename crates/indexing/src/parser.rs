//! Record body parsing.

use crate::error::ParseError;
use crate::model::Record;

/// Parses a serialized record body into a [`Record`].
///
/// Implementations must be safe to share across tasks.
pub trait RecordParser: Send + Sync {
    /// Parses a record body.
    fn parse(&self, body: &[u8]) -> Result<Record, ParseError>;
}

/// Parser for the JSON representation.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRecordParser;

impl JsonRecordParser {
    /// Creates a new JSON parser.
    pub fn new() -> Self {
        Self
    }
}

impl RecordParser for JsonRecordParser {
    fn parse(&self, body: &[u8]) -> Result<Record, ParseError> {
        let value: serde_json::Value = serde_json::from_slice(body)?;
        Record::from_value(value)
    }
}

//! Date range values carried by `date` rows.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Precision of a FHIR date, dateTime, or instant lexical value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePrecision {
    /// Year only (e.g., "2024")
    Year,
    /// Year and month (e.g., "2024-01")
    Month,
    /// Full date (e.g., "2024-01-15")
    Day,
    /// Date and time to minutes (e.g., "2024-01-15T10:30Z")
    Minute,
    /// Date and time to seconds (e.g., "2024-01-15T10:30:00Z")
    Second,
    /// Fractional seconds
    Millisecond,
}

impl DatePrecision {
    /// Parse precision from an ISO date string.
    pub fn from_date_string(s: &str) -> Self {
        let Some((_, time)) = s.split_once('T') else {
            return match s.len() {
                4 => DatePrecision::Year,
                7 => DatePrecision::Month,
                _ => DatePrecision::Day,
            };
        };
        let time = time.split(['Z', '+', '-']).next().unwrap_or(time);
        if time.contains('.') {
            DatePrecision::Millisecond
        } else if time.len() > 5 {
            DatePrecision::Second
        } else {
            DatePrecision::Minute
        }
    }
}

impl std::fmt::Display for DatePrecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatePrecision::Year => write!(f, "year"),
            DatePrecision::Month => write!(f, "month"),
            DatePrecision::Day => write!(f, "day"),
            DatePrecision::Minute => write!(f, "minute"),
            DatePrecision::Second => write!(f, "second"),
            DatePrecision::Millisecond => write!(f, "millisecond"),
        }
    }
}

/// Inclusive time range covered by a `date` row.
///
/// Both a UTC-normalized pair and an offset-preserving pair are stored. They
/// are always derived from the same bounds, so a range never carries one pair
/// without the other. A missing bound means the range is open on that side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    local_start: Option<DateTime<FixedOffset>>,
    local_end: Option<DateTime<FixedOffset>>,
}

impl DateRange {
    /// Builds a range from offset-preserving bounds.
    ///
    /// Returns `None` when both bounds are absent.
    pub fn new(
        start: Option<DateTime<FixedOffset>>,
        end: Option<DateTime<FixedOffset>>,
    ) -> Option<Self> {
        if start.is_none() && end.is_none() {
            return None;
        }
        Some(Self {
            start: start.map(|d| d.with_timezone(&Utc)),
            end: end.map(|d| d.with_timezone(&Utc)),
            local_start: start,
            local_end: end,
        })
    }

    /// Lower bound in UTC.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    /// Upper bound in UTC.
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Lower bound with its original offset.
    pub fn local_start(&self) -> Option<DateTime<FixedOffset>> {
        self.local_start
    }

    /// Upper bound with its original offset.
    pub fn local_end(&self) -> Option<DateTime<FixedOffset>> {
        self.local_end
    }

    /// Returns true if either side of the range is open.
    pub fn is_open(&self) -> bool {
        self.start.is_none() || self.end.is_none()
    }
}

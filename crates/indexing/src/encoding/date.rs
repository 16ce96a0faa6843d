//! FHIR date parsing into covered ranges.
//!
//! A partial date covers the whole period it names: `2020` covers the entire
//! year, `2020-03-04` the entire day. Values without an offset are read as UTC.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};

use crate::types::{DatePrecision, DateRange};

/// Returns the inclusive `(lower, upper)` bounds covered by a date, dateTime,
/// or instant lexical value, or `None` if it is malformed.
pub fn parse_bounds(value: &str) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let precision = DatePrecision::from_date_string(value);
    match precision {
        DatePrecision::Year | DatePrecision::Month | DatePrecision::Day => {
            let (first, last) = calendar_bounds(value, precision)?;
            let utc = FixedOffset::east_opt(0)?;
            let lower = utc.from_utc_datetime(&first.and_hms_opt(0, 0, 0)?);
            let upper = utc.from_utc_datetime(&last.and_hms_milli_opt(23, 59, 59, 999)?);
            Some((lower, upper))
        }
        DatePrecision::Minute | DatePrecision::Second | DatePrecision::Millisecond => {
            let instant = parse_instant(value, precision)?;
            let width = match precision {
                DatePrecision::Minute => Duration::milliseconds(59_999),
                DatePrecision::Second => Duration::milliseconds(999),
                _ => Duration::zero(),
            };
            Some((instant, instant + width))
        }
    }
}

/// Range covered by a single date value.
pub fn range_of(value: &str) -> Option<DateRange> {
    let (lower, upper) = parse_bounds(value)?;
    DateRange::new(Some(lower), Some(upper))
}

/// Range covered by a period.
///
/// The lower bound comes from the start and the upper bound from the end.
/// A missing or malformed side leaves that side open.
pub fn range_of_period(start: Option<&str>, end: Option<&str>) -> Option<DateRange> {
    let lower = start.and_then(parse_bounds).map(|(lower, _)| lower);
    let upper = end.and_then(parse_bounds).map(|(_, upper)| upper);
    DateRange::new(lower, upper)
}

fn calendar_bounds(value: &str, precision: DatePrecision) -> Option<(NaiveDate, NaiveDate)> {
    match precision {
        DatePrecision::Year => {
            let year: i32 = value.parse().ok()?;
            Some((
                NaiveDate::from_ymd_opt(year, 1, 1)?,
                NaiveDate::from_ymd_opt(year, 12, 31)?,
            ))
        }
        DatePrecision::Month => {
            let (year, month) = value.split_once('-')?;
            let year: i32 = year.parse().ok()?;
            let month: u32 = month.parse().ok()?;
            let first = NaiveDate::from_ymd_opt(year, month, 1)?;
            let next = if month == 12 {
                NaiveDate::from_ymd_opt(year + 1, 1, 1)?
            } else {
                NaiveDate::from_ymd_opt(year, month + 1, 1)?
            };
            Some((first, next.pred_opt()?))
        }
        _ => {
            let day = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
            Some((day, day))
        }
    }
}

fn parse_instant(value: &str, precision: DatePrecision) -> Option<DateTime<FixedOffset>> {
    let (date, time) = value.split_once('T')?;
    let (clock, offset) = match time.find(['Z', 'z', '+', '-']) {
        Some(idx) => time.split_at(idx),
        None => (time, ""),
    };

    if offset.is_empty() {
        let format = match precision {
            DatePrecision::Minute => "%Y-%m-%dT%H:%M",
            DatePrecision::Second => "%Y-%m-%dT%H:%M:%S",
            _ => "%Y-%m-%dT%H:%M:%S%.f",
        };
        let naive = NaiveDateTime::parse_from_str(value, format).ok()?;
        return Some(FixedOffset::east_opt(0)?.from_utc_datetime(&naive));
    }

    let clock = if precision == DatePrecision::Minute {
        format!("{}:00", clock)
    } else {
        clock.to_string()
    };
    DateTime::parse_from_rfc3339(&format!("{}T{}{}", date, clock, offset)).ok()
}

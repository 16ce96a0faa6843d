//! Value encoding for index rows.
//!
//! - [`composite`] - `system|code`, `system|value`, and `$`-joined composite keys
//! - [`date`] - FHIR date precision expansion into ranges
//! - [`normalize`] - string folding for matching

pub mod composite;
pub mod date;
pub mod normalize;

pub use composite::{CompositeKey, combine, decode_quantity_key, quantity_key, token_key};
pub use normalize::{casefold, normalize_string};

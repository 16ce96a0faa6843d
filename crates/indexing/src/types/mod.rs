//! Core types for the indexing engine.
//!
//! - [`ParameterRecord`] - one index row
//! - [`ParamType`] - the row type
//! - [`DateRange`], [`DatePrecision`] - date row ranges
//! - [`RecordIdentity`], [`StoredRecord`] - record identity
//!
//! # Examples
//!
//! ```
//! use helios_indexing::types::{ParamType, ParameterRecord, RecordIdentity};
//!
//! let row = ParameterRecord::new(
//!     RecordIdentity::new("Observation", "obs1"),
//!     "status",
//!     ParamType::Token,
//!     "final",
//! )
//! .unwrap()
//! .with_normalized("|final");
//!
//! assert_eq!(row.value, "final");
//! let owner = RecordIdentity::new("Observation", "obs1");
//! assert!(ParameterRecord::new(owner, "status", ParamType::Token, "").is_none());
//! ```

mod date_range;
mod identity;
mod param_type;
mod parameter;

pub use date_range::{DatePrecision, DateRange};
pub use identity::{RecordIdentity, StoredRecord};
pub use param_type::ParamType;
pub use parameter::{ParameterRecord, RowKey};

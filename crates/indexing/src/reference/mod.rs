//! Reference handling.
//!
//! - [`resolver`] - resolution against the server base and classification
//! - [`bundle`] - compound documents and sibling lookup

pub mod bundle;
pub mod resolver;

pub use bundle::{BundleEntry, CompoundDocument};
pub use resolver::{ParsedReference, resolve};

//! Record object model.
//!
//! [`Record`] wraps a parsed JSON body and gives extractors typed access to
//! its elements. The datatypes in [`datatypes`] cover the elements that carry
//! searchable values; polymorphic `[x]` elements are read as [`ChoiceValue`].

pub mod choice;
pub mod datatypes;
pub mod record;

pub use choice::ChoiceValue;
pub use datatypes::{
    Address, CodeableConcept, Coding, ContactPoint, HumanName, Identifier, Meta, Period, Quantity,
    Range, Reference,
};
pub use record::{Record, select, typed_values};

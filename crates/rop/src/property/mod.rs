//! MAPI property tags and typed property values.
//!
//! A [`PropertyValue`] carries no type information of its own on the wire;
//! its layout is selected by the [`PropertyType`] half of the preceding
//! [`PropertyTag`]. [`TaggedPropertyValue`] bundles the two.

mod property_type;
mod value;

pub use property_type::{PropertyTag, PropertyType};
pub use value::{PropertyValue, TaggedPropertyValue};

//! Payload records and unions of the change-data-capture field-value
//! schema, built on [`avro_union`].
//!
//! Every column value of a captured row is a [`FieldValue`] union: absent,
//! or one of twelve typed records. [`render_field_value`] turns such a
//! value into the text (or raw bytes) a downstream consumer prints.

mod records;
mod unions;

pub mod render;

pub use records::{
    BinaryGeometry, BinaryObject, Character, DateTime, Decimal, EmptyObject, Float, Integer,
    TextGeometry, TextObject, Timestamp, TimestampWithTimeZone,
};
pub use render::{render_field_value, RenderedValue};
pub use unions::{FieldValue, FieldValues, NullableInt, NullableLongArray};

use std::collections::BTreeMap;

use avro_union::tagged_union;

use crate::records::{
    BinaryGeometry, BinaryObject, Character, DateTime, Decimal, EmptyObject, Float, Integer,
    TextGeometry, TextObject, Timestamp, TimestampWithTimeZone,
};

tagged_union! {
    /// `union {null, array<long>}`.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub enum NullableLongArray {
        ArrayLong(Vec<i64>) as "array" = 1,
    }
}

tagged_union! {
    /// `union {null, int}`, used for every date-time component.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum NullableInt {
        Int(i32) as "int" = 1,
    }
}

tagged_union! {
    /// The value of one captured column.
    #[derive(Debug, Clone, PartialEq)]
    pub enum FieldValue {
        Integer(Integer) = 1,
        Character(Character) = 2,
        Decimal(Decimal) = 3,
        Float(Float) = 4,
        Timestamp(Timestamp) = 5,
        DateTime(DateTime) = 6,
        TimestampWithTimeZone(TimestampWithTimeZone) = 7,
        BinaryGeometry(BinaryGeometry) = 8,
        TextGeometry(TextGeometry) = 9,
        BinaryObject(BinaryObject) = 10,
        TextObject(TextObject) = 11,
        EmptyObject(EmptyObject) = 12,
    }
}

impl NullableInt {
    pub fn value(&self) -> i32 {
        match self {
            NullableInt::Int(v) => *v,
        }
    }
}

impl NullableLongArray {
    pub fn as_slice(&self) -> &[i64] {
        match self {
            NullableLongArray::ArrayLong(items) => items,
        }
    }
}

/// Columns of one row image keyed by column name.
pub type FieldValues = BTreeMap<String, avro_union::TaggedUnion<FieldValue>>;

//! Record payloads of [`FieldValue`](crate::FieldValue).
//!
//! Binary form: the fields in declaration order, each in its own Avro
//! encoding, with no framing. JSON form: an object keyed by schema field
//! name, derived with serde.

use avro_union::{AvroDatum, AvroDecoder, AvroEncoder, Bytes, CodecError, Result, TaggedUnion};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::unions::NullableInt;

/// Implements [`AvroDatum`] for a record whose fields are all
/// [`AvroDatum`]s, listed in schema order.
macro_rules! record_datum {
    ($ty:ident { $($field:ident),+ $(,)? }) => {
        impl AvroDatum for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            fn write_avro(&self, encoder: &mut AvroEncoder) -> Result<()> {
                $( self.$field.write_avro(encoder)?; )+
                Ok(())
            }

            fn read_avro(decoder: &mut AvroDecoder<'_>) -> Result<Self> {
                Ok(Self {
                    $( $field: AvroDatum::read_avro(decoder)?, )+
                })
            }

            fn to_json(&self) -> Result<Value> {
                serde_json::to_value(self).map_err(|e| CodecError::MalformedJson {
                    target: Self::TYPE_NAME,
                    reason: e.to_string(),
                })
            }

            fn from_json(value: &Value) -> Result<Self> {
                // The derived visitor also takes a sequence in field order.
                if !value.is_object() {
                    return Err(CodecError::MalformedJson {
                        target: Self::TYPE_NAME,
                        reason: "expected an object".to_owned(),
                    });
                }
                Self::deserialize(value).map_err(|e| CodecError::MalformedJson {
                    target: Self::TYPE_NAME,
                    reason: e.to_string(),
                })
            }
        }
    };
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Integer {
    pub precision: i32,
    /// Decimal digits, possibly signed.
    pub value: String,
}

record_datum!(Integer { precision, value });

/// Character data in the column's own charset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Character {
    pub charset: String,
    pub value: Bytes,
}

record_datum!(Character { charset, value });

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decimal {
    pub value: String,
    pub precision: i32,
    pub scale: i32,
}

record_datum!(Decimal { value, precision, scale });

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Float {
    #[serde(serialize_with = "serialize_finite")]
    pub value: f64,
    pub precision: i32,
    pub scale: i32,
}

record_datum!(Float { value, precision, scale });

/// NaN and the infinities have no JSON number form.
fn serialize_finite<S: Serializer>(
    value: &f64,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    if !value.is_finite() {
        return Err(serde::ser::Error::custom(format!("{value} has no JSON form")));
    }
    serializer.serialize_f64(*value)
}

/// Seconds since the epoch plus a sub-second part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    pub timestamp: i64,
    pub millis: i32,
}

record_datum!(Timestamp { timestamp, millis });

/// Calendar date and wall-clock time; any component may be absent, so a
/// pure date or a pure time fits too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateTime {
    pub year: TaggedUnion<NullableInt>,
    pub month: TaggedUnion<NullableInt>,
    pub day: TaggedUnion<NullableInt>,
    pub hour: TaggedUnion<NullableInt>,
    pub minute: TaggedUnion<NullableInt>,
    pub second: TaggedUnion<NullableInt>,
    pub millis: TaggedUnion<NullableInt>,
}

record_datum!(DateTime { year, month, day, hour, minute, second, millis });

fn component(value: i32) -> TaggedUnion<NullableInt> {
    TaggedUnion::of(NullableInt::Int(value))
}

fn read_component(value: &TaggedUnion<NullableInt>) -> Option<i32> {
    value.payload().map(NullableInt::value)
}

impl DateTime {
    pub fn date(year: i32, month: i32, day: i32) -> Self {
        Self {
            year: component(year),
            month: component(month),
            day: component(day),
            ..Self::default()
        }
    }

    pub fn time(hour: i32, minute: i32, second: i32) -> Self {
        Self {
            hour: component(hour),
            minute: component(minute),
            second: component(second),
            ..Self::default()
        }
    }

    pub fn with_date(mut self, year: i32, month: i32, day: i32) -> Self {
        self.year = component(year);
        self.month = component(month);
        self.day = component(day);
        self
    }

    pub fn with_time(mut self, hour: i32, minute: i32, second: i32) -> Self {
        self.hour = component(hour);
        self.minute = component(minute);
        self.second = component(second);
        self
    }

    pub fn with_millis(mut self, millis: i32) -> Self {
        self.millis = component(millis);
        self
    }

    /// `(year, month, day)` when all three are present.
    pub fn date_parts(&self) -> Option<(i32, i32, i32)> {
        Some((
            read_component(&self.year)?,
            read_component(&self.month)?,
            read_component(&self.day)?,
        ))
    }

    /// `(hour, minute, second)` when all three are present.
    pub fn time_parts(&self) -> Option<(i32, i32, i32)> {
        Some((
            read_component(&self.hour)?,
            read_component(&self.minute)?,
            read_component(&self.second)?,
        ))
    }

    pub fn millis(&self) -> Option<i32> {
        read_component(&self.millis)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimestampWithTimeZone {
    pub value: DateTime,
    pub timezone: String,
}

record_datum!(TimestampWithTimeZone { value, timezone });

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BinaryGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Bytes,
}

record_datum!(BinaryGeometry { kind, value });

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

record_datum!(TextGeometry { kind, value });

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BinaryObject {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Bytes,
}

record_datum!(BinaryObject { kind, value });

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextObject {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

record_datum!(TextObject { kind, value });

/// Marker for a column that carries no value. Binary form is the symbol
/// index as an int; JSON form is the symbol name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmptyObject {
    #[serde(rename = "NULL")]
    Null,
    #[serde(rename = "NONE")]
    None,
}

impl EmptyObject {
    pub const SYMBOLS: [&'static str; 2] = ["NULL", "NONE"];

    pub fn index(self) -> i32 {
        match self {
            EmptyObject::Null => 0,
            EmptyObject::None => 1,
        }
    }

    pub fn symbol(self) -> &'static str {
        Self::SYMBOLS[self.index() as usize]
    }

    pub fn from_index(index: i32) -> Result<Self> {
        match index {
            0 => Ok(EmptyObject::Null),
            1 => Ok(EmptyObject::None),
            _ => Err(CodecError::InvalidEnumIndex {
                target: <Self as AvroDatum>::TYPE_NAME,
                index,
            }),
        }
    }

    pub fn from_symbol(symbol: &str) -> Result<Self> {
        match symbol {
            "NULL" => Ok(EmptyObject::Null),
            "NONE" => Ok(EmptyObject::None),
            _ => Err(CodecError::InvalidEnumSymbol {
                target: <Self as AvroDatum>::TYPE_NAME,
                symbol: symbol.to_owned(),
            }),
        }
    }
}

impl AvroDatum for EmptyObject {
    const TYPE_NAME: &'static str = "EmptyObject";

    fn write_avro(&self, encoder: &mut AvroEncoder) -> Result<()> {
        encoder.write_int(self.index());
        Ok(())
    }

    fn read_avro(decoder: &mut AvroDecoder<'_>) -> Result<Self> {
        Self::from_index(decoder.read_int()?)
    }

    fn to_json(&self) -> Result<Value> {
        Ok(Value::String(self.symbol().to_owned()))
    }

    fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::String(symbol) => Self::from_symbol(symbol),
            other => Err(CodecError::MalformedJson {
                target: Self::TYPE_NAME,
                reason: format!("expected an enum symbol, found {other}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode<T: AvroDatum>(value: &T) -> Vec<u8> {
        let mut encoder = AvroEncoder::new();
        value.write_avro(&mut encoder).unwrap();
        encoder.into_inner()
    }

    fn decode<T: AvroDatum>(bytes: &[u8]) -> T {
        let mut decoder = AvroDecoder::new(bytes);
        let value = T::read_avro(&mut decoder).unwrap();
        assert_eq!(decoder.remaining(), 0);
        value
    }

    #[test]
    fn integer_fields_in_schema_order() {
        let value = Integer {
            precision: 10,
            value: "42".into(),
        };
        assert_eq!(encode(&value), [0x14, 0x04, b'4', b'2']);
        assert_eq!(decode::<Integer>(&encode(&value)), value);
        assert_eq!(value.to_json().unwrap(), json!({"precision": 10, "value": "42"}));
    }

    #[test]
    fn character_bytes_are_base64_in_json() {
        let value = Character {
            charset: "utf8".into(),
            value: Bytes(b"hi".to_vec()),
        };
        let json = value.to_json().unwrap();
        assert_eq!(json, json!({"charset": "utf8", "value": "aGk="}));
        assert_eq!(Character::from_json(&json).unwrap(), value);
    }

    #[test]
    fn type_field_keeps_schema_name() {
        let value = TextGeometry {
            kind: "POINT".into(),
            value: "POINT(1 2)".into(),
        };
        assert_eq!(value.to_json().unwrap(), json!({"type": "POINT", "value": "POINT(1 2)"}));
        assert_eq!(encode(&value)[0], 0x0a, "type written first");
    }

    #[test]
    fn date_time_components_are_nullable_unions() {
        let value = DateTime::date(2024, 2, 29).with_millis(5);
        let bytes = encode(&value);
        // year, month, day present; hour, minute, second absent; millis present
        assert_eq!(
            bytes,
            [0x02, 0xd0, 0x1f, 0x02, 0x04, 0x02, 0x3a, 0x00, 0x00, 0x00, 0x02, 0x0a]
        );
        assert_eq!(decode::<DateTime>(&bytes), value);
        assert_eq!(
            value.to_json().unwrap(),
            json!({
                "year": {"int": 2024}, "month": {"int": 2}, "day": {"int": 29},
                "hour": null, "minute": null, "second": null, "millis": {"int": 5}
            })
        );
        assert_eq!(value.date_parts(), Some((2024, 2, 29)));
        assert_eq!(value.time_parts(), None);
        assert_eq!(value.millis(), Some(5));
    }

    #[test]
    fn record_json_errors_are_malformed_json() {
        let err = Decimal::from_json(&json!({"value": "1.5", "precision": "x", "scale": 1}))
            .unwrap_err();
        assert!(matches!(err, CodecError::MalformedJson { target: "Decimal", .. }));
        for value in [json!([1, 2]), json!(null), json!("1.2")] {
            let err = Timestamp::from_json(&value).unwrap_err();
            assert!(matches!(err, CodecError::MalformedJson { target: "Timestamp", .. }));
        }
    }

    #[test]
    fn non_finite_float_has_no_json_form() {
        for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let value = Float {
                value: f,
                precision: 0,
                scale: 0,
            };
            assert!(matches!(
                value.to_json(),
                Err(CodecError::MalformedJson { target: "Float", .. })
            ));
            // the binary form still carries it
            let back = decode::<Float>(&encode(&value));
            assert_eq!(back.value.to_bits(), f.to_bits());
        }
        let finite = Float {
            value: 1.5,
            precision: 2,
            scale: 1,
        };
        assert_eq!(Float::from_json(&finite.to_json().unwrap()).unwrap(), finite);
    }

    #[test]
    fn empty_object_symbols() {
        assert_eq!(encode(&EmptyObject::Null), [0x00]);
        assert_eq!(encode(&EmptyObject::None), [0x02]);
        assert_eq!(decode::<EmptyObject>(&[0x02]), EmptyObject::None);
        assert_eq!(EmptyObject::None.to_json().unwrap(), json!("NONE"));
        assert_eq!(EmptyObject::from_json(&json!("NULL")).unwrap(), EmptyObject::Null);
        assert_eq!(serde_json::to_value(EmptyObject::None).unwrap(), json!("NONE"));
    }

    #[test]
    fn empty_object_rejects_unknown_index_and_symbol() {
        let mut decoder = AvroDecoder::new(&[0x04]);
        assert!(matches!(
            EmptyObject::read_avro(&mut decoder),
            Err(CodecError::InvalidEnumIndex { target: "EmptyObject", index: 2 })
        ));
        assert!(matches!(
            EmptyObject::from_json(&json!("EMPTY")),
            Err(CodecError::InvalidEnumSymbol { .. })
        ));
        assert!(matches!(
            EmptyObject::from_json(&json!(0)),
            Err(CodecError::MalformedJson { .. })
        ));
    }
}

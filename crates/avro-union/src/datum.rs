//! The payload codec contract and its built-in implementations.
//!
//! A union never looks inside its payloads. It only calls the four
//! functions of [`AvroDatum`] on them, so anything implementing the trait
//! can be a variant.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::error::{CodecError, Result};
use crate::wire::{AvroDecoder, AvroEncoder};

/// Binary and JSON codec of one schema type.
///
/// `read_avro` must consume exactly the bytes `write_avro` produced: the
/// binary format has no delimiters, so the next field starts wherever the
/// reader stops.
pub trait AvroDatum: Sized {
    /// Schema name of the type, used in error messages.
    const TYPE_NAME: &'static str;

    fn write_avro(&self, encoder: &mut AvroEncoder) -> Result<()>;

    fn read_avro(decoder: &mut AvroDecoder<'_>) -> Result<Self>;

    fn to_json(&self) -> Result<Value>;

    fn from_json(value: &Value) -> Result<Self>;
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn unexpected(target: &'static str, value: &Value) -> CodecError {
    CodecError::malformed_json(target, format!("unexpected JSON {}", json_kind(value)))
}

fn float_to_json(target: &'static str, f: f64) -> Result<Value> {
    Number::from_f64(f)
        .map(Value::Number)
        .ok_or_else(|| CodecError::malformed_json(target, format!("{f} has no JSON form")))
}

impl AvroDatum for bool {
    const TYPE_NAME: &'static str = "boolean";

    fn write_avro(&self, encoder: &mut AvroEncoder) -> Result<()> {
        encoder.write_boolean(*self);
        Ok(())
    }

    fn read_avro(decoder: &mut AvroDecoder<'_>) -> Result<Self> {
        decoder.read_boolean()
    }

    fn to_json(&self) -> Result<Value> {
        Ok(Value::Bool(*self))
    }

    fn from_json(value: &Value) -> Result<Self> {
        value
            .as_bool()
            .ok_or_else(|| unexpected(Self::TYPE_NAME, value))
    }
}

impl AvroDatum for i32 {
    const TYPE_NAME: &'static str = "int";

    fn write_avro(&self, encoder: &mut AvroEncoder) -> Result<()> {
        encoder.write_int(*self);
        Ok(())
    }

    fn read_avro(decoder: &mut AvroDecoder<'_>) -> Result<Self> {
        decoder.read_int()
    }

    fn to_json(&self) -> Result<Value> {
        Ok(Value::from(*self))
    }

    fn from_json(value: &Value) -> Result<Self> {
        let n = value
            .as_i64()
            .ok_or_else(|| unexpected(Self::TYPE_NAME, value))?;
        i32::try_from(n).map_err(|_| CodecError::IntOutOfRange(n))
    }
}

impl AvroDatum for i64 {
    const TYPE_NAME: &'static str = "long";

    fn write_avro(&self, encoder: &mut AvroEncoder) -> Result<()> {
        encoder.write_long(*self);
        Ok(())
    }

    fn read_avro(decoder: &mut AvroDecoder<'_>) -> Result<Self> {
        decoder.read_long()
    }

    fn to_json(&self) -> Result<Value> {
        Ok(Value::from(*self))
    }

    fn from_json(value: &Value) -> Result<Self> {
        value
            .as_i64()
            .ok_or_else(|| unexpected(Self::TYPE_NAME, value))
    }
}

impl AvroDatum for f32 {
    const TYPE_NAME: &'static str = "float";

    fn write_avro(&self, encoder: &mut AvroEncoder) -> Result<()> {
        encoder.write_float(*self);
        Ok(())
    }

    fn read_avro(decoder: &mut AvroDecoder<'_>) -> Result<Self> {
        decoder.read_float()
    }

    fn to_json(&self) -> Result<Value> {
        float_to_json(Self::TYPE_NAME, *self as f64)
    }

    fn from_json(value: &Value) -> Result<Self> {
        let f = value
            .as_f64()
            .ok_or_else(|| unexpected(Self::TYPE_NAME, value))?;
        let narrowed = f as f32;
        if narrowed.is_infinite() {
            return Err(CodecError::malformed_json(
                Self::TYPE_NAME,
                format!("{f} is out of range"),
            ));
        }
        Ok(narrowed)
    }
}

impl AvroDatum for f64 {
    const TYPE_NAME: &'static str = "double";

    fn write_avro(&self, encoder: &mut AvroEncoder) -> Result<()> {
        encoder.write_double(*self);
        Ok(())
    }

    fn read_avro(decoder: &mut AvroDecoder<'_>) -> Result<Self> {
        decoder.read_double()
    }

    fn to_json(&self) -> Result<Value> {
        float_to_json(Self::TYPE_NAME, *self)
    }

    fn from_json(value: &Value) -> Result<Self> {
        value
            .as_f64()
            .ok_or_else(|| unexpected(Self::TYPE_NAME, value))
    }
}

impl AvroDatum for String {
    const TYPE_NAME: &'static str = "string";

    fn write_avro(&self, encoder: &mut AvroEncoder) -> Result<()> {
        encoder.write_str(self);
        Ok(())
    }

    fn read_avro(decoder: &mut AvroDecoder<'_>) -> Result<Self> {
        decoder.read_string()
    }

    fn to_json(&self) -> Result<Value> {
        Ok(Value::String(self.clone()))
    }

    fn from_json(value: &Value) -> Result<Self> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| unexpected(Self::TYPE_NAME, value))
    }
}

/// Avro `bytes`. JSON form is a standard base64 string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(v: Vec<u8>) -> Self {
        Bytes(v)
    }
}

impl From<&[u8]> for Bytes {
    fn from(v: &[u8]) -> Self {
        Bytes(v.to_vec())
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Bytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD
            .decode(text.as_bytes())
            .map(Bytes)
            .map_err(serde::de::Error::custom)
    }
}

impl AvroDatum for Bytes {
    const TYPE_NAME: &'static str = "bytes";

    fn write_avro(&self, encoder: &mut AvroEncoder) -> Result<()> {
        encoder.write_bytes(&self.0);
        Ok(())
    }

    fn read_avro(decoder: &mut AvroDecoder<'_>) -> Result<Self> {
        decoder.read_bytes().map(Bytes)
    }

    fn to_json(&self) -> Result<Value> {
        Ok(Value::String(STANDARD.encode(&self.0)))
    }

    fn from_json(value: &Value) -> Result<Self> {
        let text = value
            .as_str()
            .ok_or_else(|| unexpected(Self::TYPE_NAME, value))?;
        Ok(Bytes(STANDARD.decode(text.as_bytes())?))
    }
}

impl<T: AvroDatum> AvroDatum for Vec<T> {
    const TYPE_NAME: &'static str = "array";

    fn write_avro(&self, encoder: &mut AvroEncoder) -> Result<()> {
        encoder.write_block_start(self.len());
        for item in self {
            item.write_avro(encoder)?;
        }
        encoder.write_block_end();
        Ok(())
    }

    fn read_avro(decoder: &mut AvroDecoder<'_>) -> Result<Self> {
        decoder.read_array(T::read_avro)
    }

    fn to_json(&self) -> Result<Value> {
        self.iter()
            .map(AvroDatum::to_json)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }

    fn from_json(value: &Value) -> Result<Self> {
        value
            .as_array()
            .ok_or_else(|| unexpected(Self::TYPE_NAME, value))?
            .iter()
            .map(T::from_json)
            .collect()
    }
}

impl<T: AvroDatum> AvroDatum for BTreeMap<String, T> {
    const TYPE_NAME: &'static str = "map";

    fn write_avro(&self, encoder: &mut AvroEncoder) -> Result<()> {
        encoder.write_block_start(self.len());
        for (key, value) in self {
            encoder.write_str(key);
            value.write_avro(encoder)?;
        }
        encoder.write_block_end();
        Ok(())
    }

    fn read_avro(decoder: &mut AvroDecoder<'_>) -> Result<Self> {
        Ok(decoder.read_map(T::read_avro)?.into_iter().collect())
    }

    fn to_json(&self) -> Result<Value> {
        let mut map = Map::with_capacity(self.len());
        for (key, value) in self {
            map.insert(key.clone(), value.to_json()?);
        }
        Ok(Value::Object(map))
    }

    fn from_json(value: &Value) -> Result<Self> {
        value
            .as_object()
            .ok_or_else(|| unexpected(Self::TYPE_NAME, value))?
            .iter()
            .map(|(key, value)| T::from_json(value).map(|v| (key.clone(), v)))
            .collect()
    }
}

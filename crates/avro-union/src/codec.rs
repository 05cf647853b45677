//! Binary and JSON codec for [`TaggedUnion`] values.
//!
//! Binary: the selected ordinal as a zig-zag varint long, then, unless the
//! ordinal is 0, the payload's own encoding. Nothing delimits the payload.
//!
//! JSON: `null` when absent, otherwise `{"<json_key>": <payload JSON>}`.

use std::fmt;
use std::marker::PhantomData;

use serde_json::{Map, Value};

use crate::error::{CodecError, Result};
use crate::union::TaggedUnion;
use crate::variant::VariantSet;
use crate::wire::{AvroDecoder, AvroEncoder};

/// Stateless codec for unions over the variant set `S`.
///
/// Holds nothing but a type marker, so one instance can be shared freely
/// across threads.
pub struct TaggedUnionCodec<S> {
    _set: PhantomData<fn() -> S>,
}

impl<S> Clone for TaggedUnionCodec<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for TaggedUnionCodec<S> {}

impl<S> Default for TaggedUnionCodec<S> {
    fn default() -> Self {
        Self { _set: PhantomData }
    }
}

impl<S: VariantSet> fmt::Debug for TaggedUnionCodec<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaggedUnionCodec")
            .field("union", &S::NAME)
            .field("variants", &S::DESCRIPTORS.len())
            .finish()
    }
}

impl<S: VariantSet> TaggedUnionCodec<S> {
    pub const fn new() -> Self {
        Self { _set: PhantomData }
    }

    // ---------------------------------------------------------------- binary

    /// Writes `value`; `None` and the empty union both encode as ordinal 0.
    ///
    /// A payload whose ordinal has no descriptor is rejected before any
    /// byte is written. Errors from the payload writer are returned as is.
    pub fn encode(&self, value: Option<&TaggedUnion<S>>, encoder: &mut AvroEncoder) -> Result<()> {
        let Some(payload) = value.and_then(TaggedUnion::payload) else {
            encoder.write_long(0);
            return Ok(());
        };
        let ordinal = payload.ordinal();
        if S::variants().get(ordinal as i64).is_none() {
            return Err(CodecError::invalid_state(
                S::NAME,
                format!("payload reports unknown ordinal {ordinal}"),
            ));
        }
        encoder.write_long(ordinal as i64);
        payload.write_payload(encoder)
    }

    /// Reads one union value. An ordinal outside `[0, N]` fails without
    /// reading past the ordinal.
    pub fn decode(&self, decoder: &mut AvroDecoder<'_>) -> Result<TaggedUnion<S>> {
        let ordinal = decoder.read_long()?;
        if ordinal == 0 {
            return Ok(TaggedUnion::empty());
        }
        let Some(descriptor) = S::variants().get(ordinal) else {
            tracing::debug!(union = S::NAME, ordinal, "unknown union discriminator");
            return Err(CodecError::UnknownDiscriminator {
                union: S::NAME,
                ordinal,
            });
        };
        let payload = S::read_payload(descriptor.ordinal, decoder)?;
        tracing::trace!(union = S::NAME, ordinal, variant = descriptor.name, "decoded union");
        Ok(TaggedUnion::of(payload))
    }

    pub fn encode_to_vec(&self, value: Option<&TaggedUnion<S>>) -> Result<Vec<u8>> {
        let mut encoder = AvroEncoder::new();
        self.encode(value, &mut encoder)?;
        Ok(encoder.into_inner())
    }

    /// Decodes one union from the front of `data`, returning it with the
    /// number of bytes it occupied.
    pub fn decode_slice(&self, data: &[u8]) -> Result<(TaggedUnion<S>, usize)> {
        let mut decoder = AvroDecoder::new(data);
        let value = self.decode(&mut decoder)?;
        Ok((value, decoder.position()))
    }

    // ---------------------------------------------------------------- JSON

    pub fn to_json_value(&self, value: Option<&TaggedUnion<S>>) -> Result<Value> {
        let Some(payload) = value.and_then(TaggedUnion::payload) else {
            return Ok(Value::Null);
        };
        let ordinal = payload.ordinal();
        let descriptor = S::variants().get(ordinal as i64).ok_or_else(|| {
            CodecError::invalid_state(S::NAME, format!("payload reports unknown ordinal {ordinal}"))
        })?;
        let mut map = Map::with_capacity(1);
        map.insert(descriptor.json_key.to_owned(), payload.payload_to_json()?);
        Ok(Value::Object(map))
    }

    pub fn encode_json(&self, value: Option<&TaggedUnion<S>>) -> Result<String> {
        Ok(serde_json::to_string(&self.to_json_value(value)?)?)
    }

    /// Decodes a JSON value. Descriptors are scanned in ordinal order and
    /// the first whose key is present wins; other keys are ignored.
    pub fn from_json_value(&self, value: &Value) -> Result<TaggedUnion<S>> {
        let fields = match value {
            Value::Null => return Ok(TaggedUnion::empty()),
            Value::Object(fields) => fields,
            _ => {
                return Err(CodecError::malformed_json(
                    S::NAME,
                    "expected an object or null",
                ))
            }
        };
        for descriptor in S::variants().iter() {
            if let Some(payload) = fields.get(descriptor.json_key) {
                return S::payload_from_json(descriptor.ordinal, payload).map(TaggedUnion::of);
            }
        }
        tracing::debug!(union = S::NAME, keys = fields.len(), "no recognized discriminator key");
        Err(CodecError::malformed_json(
            S::NAME,
            "invalid union state: no recognized discriminator key",
        ))
    }

    pub fn decode_json(&self, text: &str) -> Result<TaggedUnion<S>> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| CodecError::malformed_json(S::NAME, e.to_string()))?;
        self.from_json_value(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagged_union;
    use crate::variant::VariantDescriptor;
    use serde_json::json;

    tagged_union! {
        #[derive(Debug, Clone, PartialEq)]
        enum NullableLongArray {
            ArrayLong(Vec<i64>) as "array" = 1,
        }
    }

    tagged_union! {
        #[derive(Debug, Clone, PartialEq)]
        enum Scalar {
            Long(i64) as "long" = 1,
            Text(String) as "string" = 2,
            Flag(bool) as "boolean" = 3,
        }
    }

    /// A hand-written set whose payload claims an ordinal it has no
    /// descriptor for.
    #[derive(Debug)]
    struct Rogue;

    impl VariantSet for Rogue {
        const NAME: &'static str = "Rogue";
        const DESCRIPTORS: &'static [VariantDescriptor] = &[VariantDescriptor::new(1, "Only")];

        fn ordinal(&self) -> u32 {
            5
        }

        fn write_payload(&self, _encoder: &mut AvroEncoder) -> Result<()> {
            Ok(())
        }

        fn read_payload(_ordinal: u32, _decoder: &mut AvroDecoder<'_>) -> Result<Self> {
            Ok(Rogue)
        }

        fn payload_to_json(&self) -> Result<Value> {
            Ok(Value::Null)
        }

        fn payload_from_json(_ordinal: u32, _value: &Value) -> Result<Self> {
            Ok(Rogue)
        }
    }

    #[test]
    fn generated_tables_validate() {
        assert!(NullableLongArray::variants().validate(NullableLongArray::NAME).is_ok());
        assert!(Scalar::variants().validate(Scalar::NAME).is_ok());
        assert_eq!(Scalar::DESCRIPTORS[1].json_key, "string");
        assert_eq!(Scalar::DESCRIPTORS[1].name, "Text");
    }

    #[test]
    fn sequence_union_wire_and_json() {
        let codec = TaggedUnionCodec::<NullableLongArray>::new();
        let value = TaggedUnion::of(NullableLongArray::ArrayLong(vec![1, 2, 3]));
        assert_eq!(codec.encode_to_vec(Some(&value)).unwrap(), [0x02, 0x06, 0x02, 0x04, 0x06, 0x00]);
        assert_eq!(codec.encode_json(Some(&value)).unwrap(), r#"{"array":[1,2,3]}"#);
    }

    #[test]
    fn absent_wire_and_json() {
        let codec = TaggedUnionCodec::<NullableLongArray>::new();
        assert_eq!(codec.encode_to_vec(None).unwrap(), [0x00]);
        assert_eq!(codec.encode_to_vec(Some(&TaggedUnion::empty())).unwrap(), [0x00]);
        assert_eq!(codec.encode_json(None).unwrap(), "null");
        assert_eq!(codec.to_json_value(Some(&TaggedUnion::empty())).unwrap(), Value::Null);
    }

    #[test]
    fn absent_decode_consumes_one_byte() {
        let codec = TaggedUnionCodec::<Scalar>::new();
        let (value, consumed) = codec.decode_slice(&[0x00, 0x02]).unwrap();
        assert!(value.is_absent());
        assert_eq!(consumed, 1);
    }

    #[test]
    fn unknown_discriminator_stops_after_ordinal() {
        let codec = TaggedUnionCodec::<Scalar>::new();
        // ordinal 4, then bytes that must stay unread
        let data = [0x08, 0x02, 0x02];
        let mut decoder = AvroDecoder::new(&data);
        assert!(matches!(
            codec.decode(&mut decoder),
            Err(CodecError::UnknownDiscriminator { union: "Scalar", ordinal: 4 })
        ));
        assert_eq!(decoder.position(), 1);

        // ordinal -1
        let mut decoder = AvroDecoder::new(&[0x01, 0x00]);
        assert!(matches!(
            codec.decode(&mut decoder),
            Err(CodecError::UnknownDiscriminator { ordinal: -1, .. })
        ));
        assert_eq!(decoder.position(), 1);
    }

    #[test]
    fn payload_errors_propagate_unchanged() {
        let codec = TaggedUnionCodec::<Scalar>::new();
        // ordinal 3 (boolean) followed by an invalid boolean byte
        assert!(matches!(
            codec.decode_slice(&[0x06, 0x05]),
            Err(CodecError::InvalidBoolean(5))
        ));
        // ordinal 2 (string) truncated
        assert!(matches!(
            codec.decode_slice(&[0x04, 0x0a, b'h']),
            Err(CodecError::Buffer(_))
        ));
        assert!(matches!(
            codec.decode_json(r#"{"long": "seven"}"#),
            Err(CodecError::MalformedJson { target: "long", .. })
        ));
    }

    #[test]
    fn first_descriptor_wins_regardless_of_key_order() {
        let codec = TaggedUnionCodec::<Scalar>::new();
        for text in [
            r#"{"string": "s", "long": 1}"#,
            r#"{"long": 1, "string": "s"}"#,
            r#"{"boolean": true, "long": 1}"#,
        ] {
            let value = codec.decode_json(text).unwrap();
            assert_eq!(value.payload(), Some(&Scalar::Long(1)), "{text}");
        }
        let value = codec.decode_json(r#"{"boolean": true, "string": "s"}"#).unwrap();
        assert_eq!(value.payload(), Some(&Scalar::Text("s".into())));
    }

    #[test]
    fn unknown_keys_are_ignored_beside_a_known_one() {
        let codec = TaggedUnionCodec::<Scalar>::new();
        let value = codec.from_json_value(&json!({"extra": 1, "boolean": false})).unwrap();
        assert_eq!(value.payload(), Some(&Scalar::Flag(false)));
    }

    #[test]
    fn json_without_known_key_is_malformed() {
        let codec = TaggedUnionCodec::<Scalar>::new();
        for value in [json!({}), json!({"int": 1}), json!([1]), json!(3)] {
            assert!(
                matches!(
                    codec.from_json_value(&value),
                    Err(CodecError::MalformedJson { target: "Scalar", .. })
                ),
                "{value}"
            );
        }
        assert!(matches!(
            codec.decode_json("{not json"),
            Err(CodecError::MalformedJson { target: "Scalar", .. })
        ));
        assert!(codec.decode_json("null").unwrap().is_absent());
    }

    #[test]
    fn rogue_ordinal_is_invalid_state_and_writes_nothing() {
        let codec = TaggedUnionCodec::<Rogue>::new();
        let value = TaggedUnion::of(Rogue);
        let mut encoder = AvroEncoder::new();
        assert!(matches!(
            codec.encode(Some(&value), &mut encoder),
            Err(CodecError::InvalidUnionState { union: "Rogue", .. })
        ));
        assert!(encoder.writer.is_empty());
        assert!(matches!(
            codec.to_json_value(Some(&value)),
            Err(CodecError::InvalidUnionState { union: "Rogue", .. })
        ));
    }

    #[test]
    fn codec_is_shareable() {
        fn assert_send_sync<T: Send + Sync + Copy>() {}
        assert_send_sync::<TaggedUnionCodec<Scalar>>();
        assert_eq!(
            format!("{:?}", TaggedUnionCodec::<Scalar>::new()),
            r#"TaggedUnionCodec { union: "Scalar", variants: 3 }"#
        );
    }
}

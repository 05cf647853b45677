//! The union value, its two-step builder, and the primitive-setter surface
//! a schema-driven reader drives.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::codec::TaggedUnionCodec;
use crate::datum::AvroDatum;
use crate::error::{CodecError, Result};
use crate::variant::{VariantDescriptor, VariantSet};
use crate::wire::{AvroDecoder, AvroEncoder};

/// A value of a tagged union: either absent (ordinal 0) or exactly one
/// payload of the set `S`.
///
/// ```
/// use avro_union::{tagged_union, TaggedUnion};
///
/// tagged_union! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub enum NullableLong {
///         Long(i64) as "long" = 1,
///     }
/// }
///
/// let mut value = TaggedUnion::<NullableLong>::empty();
/// assert_eq!(value.ordinal(), 0);
/// value.select(NullableLong::Long(7));
/// assert_eq!(value.ordinal(), 1);
/// assert_eq!(value.payload(), Some(&NullableLong::Long(7)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaggedUnion<S> {
    payload: Option<S>,
}

impl<S> Default for TaggedUnion<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S> TaggedUnion<S> {
    /// The absent value.
    pub const fn empty() -> Self {
        Self { payload: None }
    }

    pub fn of(payload: S) -> Self {
        Self {
            payload: Some(payload),
        }
    }

    /// Selects the payload's alternative and attaches the payload,
    /// replacing whatever was held before.
    pub fn select(&mut self, payload: S) {
        self.payload = Some(payload);
    }

    pub fn clear(&mut self) {
        self.payload = None;
    }

    pub fn is_absent(&self) -> bool {
        self.payload.is_none()
    }

    pub fn payload(&self) -> Option<&S> {
        self.payload.as_ref()
    }

    pub fn into_payload(self) -> Option<S> {
        self.payload
    }
}

impl<S: VariantSet> TaggedUnion<S> {
    /// Selected ordinal; 0 when absent.
    pub fn ordinal(&self) -> u32 {
        self.payload.as_ref().map_or(0, S::ordinal)
    }

    /// Descriptor of the selected alternative; `None` when absent.
    pub fn descriptor(&self) -> Option<&'static VariantDescriptor> {
        S::variants().get(self.ordinal() as i64)
    }

    pub fn to_avro_bytes(&self) -> Result<Vec<u8>> {
        TaggedUnionCodec::<S>::new().encode_to_vec(Some(self))
    }

    pub fn to_json_string(&self) -> Result<String> {
        TaggedUnionCodec::<S>::new().encode_json(Some(self))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        TaggedUnionCodec::<S>::new().decode_json(text)
    }
}

impl<S> From<S> for TaggedUnion<S> {
    fn from(payload: S) -> Self {
        Self::of(payload)
    }
}

impl<S> From<Option<S>> for TaggedUnion<S> {
    fn from(payload: Option<S>) -> Self {
        Self { payload }
    }
}

impl<S: VariantSet> AvroDatum for TaggedUnion<S> {
    const TYPE_NAME: &'static str = S::NAME;

    fn write_avro(&self, encoder: &mut AvroEncoder) -> Result<()> {
        TaggedUnionCodec::<S>::new().encode(Some(self), encoder)
    }

    fn read_avro(decoder: &mut AvroDecoder<'_>) -> Result<Self> {
        TaggedUnionCodec::<S>::new().decode(decoder)
    }

    fn to_json(&self) -> Result<Value> {
        TaggedUnionCodec::<S>::new().to_json_value(Some(self))
    }

    fn from_json(value: &Value) -> Result<Self> {
        TaggedUnionCodec::<S>::new().from_json_value(value)
    }
}

impl<S: VariantSet> Serialize for TaggedUnion<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> std::result::Result<Ser::Ok, Ser::Error> {
        self.to_json()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de, S: VariantSet> Deserialize<'de> for TaggedUnion<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}

/// Two-step construction: select an ordinal, then attach that ordinal's
/// payload.
///
/// ```
/// use avro_union::{tagged_union, UnionBuilder};
///
/// tagged_union! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub enum NullableInt {
///         Int(i32) as "int" = 1,
///     }
/// }
///
/// let mut builder = UnionBuilder::<NullableInt>::new();
/// builder.select_ordinal(1).unwrap().attach(NullableInt::Int(5)).unwrap();
/// let value = builder.build().unwrap();
/// assert_eq!(value.ordinal(), 1);
/// ```
#[derive(Debug)]
pub struct UnionBuilder<S> {
    selected: u32,
    payload: Option<S>,
}

impl<S> Default for UnionBuilder<S> {
    fn default() -> Self {
        Self {
            selected: 0,
            payload: None,
        }
    }
}

impl<S: VariantSet> UnionBuilder<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> u32 {
        self.selected
    }

    /// Selects an ordinal in `[0, N]` and drops any attached payload.
    pub fn select_ordinal(&mut self, ordinal: i64) -> Result<&mut Self> {
        if ordinal != 0 && S::variants().get(ordinal).is_none() {
            return Err(CodecError::UnknownDiscriminator {
                union: S::NAME,
                ordinal,
            });
        }
        self.selected = ordinal as u32;
        self.payload = None;
        Ok(self)
    }

    /// Attaches the payload of the selected ordinal.
    pub fn attach(&mut self, payload: S) -> Result<&mut Self> {
        let ordinal = payload.ordinal();
        if self.selected == 0 {
            return Err(CodecError::invalid_state(
                S::NAME,
                format!("payload for ordinal {ordinal} attached with no ordinal selected"),
            ));
        }
        if ordinal != self.selected {
            return Err(CodecError::invalid_state(
                S::NAME,
                format!(
                    "payload for ordinal {ordinal} attached while ordinal {} is selected",
                    self.selected
                ),
            ));
        }
        self.payload = Some(payload);
        Ok(self)
    }

    pub fn build(self) -> Result<TaggedUnion<S>> {
        match (self.selected, self.payload) {
            (0, _) => Ok(TaggedUnion::empty()),
            (_, Some(payload)) => Ok(TaggedUnion::of(payload)),
            (selected, None) => Err(CodecError::invalid_state(
                S::NAME,
                format!("ordinal {selected} selected but no payload attached"),
            )),
        }
    }
}

fn unsupported(target: &'static str, operation: &'static str) -> CodecError {
    CodecError::UnsupportedMutation { target, operation }
}

/// Primitive setters a schema-driven reader calls on whatever it is
/// filling in. Every setter is unsupported unless the implementor
/// overrides it.
pub trait DatumSink {
    /// Name reported in [`CodecError::UnsupportedMutation`].
    fn sink_name(&self) -> &'static str;

    fn set_boolean(&mut self, _value: bool) -> Result<()> {
        Err(unsupported(self.sink_name(), "set_boolean"))
    }

    fn set_int(&mut self, _value: i32) -> Result<()> {
        Err(unsupported(self.sink_name(), "set_int"))
    }

    fn set_long(&mut self, _value: i64) -> Result<()> {
        Err(unsupported(self.sink_name(), "set_long"))
    }

    fn set_float(&mut self, _value: f32) -> Result<()> {
        Err(unsupported(self.sink_name(), "set_float"))
    }

    fn set_double(&mut self, _value: f64) -> Result<()> {
        Err(unsupported(self.sink_name(), "set_double"))
    }

    fn set_bytes(&mut self, _value: &[u8]) -> Result<()> {
        Err(unsupported(self.sink_name(), "set_bytes"))
    }

    fn set_string(&mut self, _value: &str) -> Result<()> {
        Err(unsupported(self.sink_name(), "set_string"))
    }

    fn null_field(&mut self, _field: usize) -> Result<()> {
        Err(unsupported(self.sink_name(), "null_field"))
    }

    fn set_default(&mut self, _field: usize) -> Result<()> {
        Err(unsupported(self.sink_name(), "set_default"))
    }

    fn append_map(&mut self, _key: &str) -> Result<&mut dyn DatumSink> {
        Err(unsupported(self.sink_name(), "append_map"))
    }

    fn append_array(&mut self) -> Result<&mut dyn DatumSink> {
        Err(unsupported(self.sink_name(), "append_array"))
    }
}

/// A union accepts only ordinal selection, which arrives as a long.
impl<S: VariantSet> DatumSink for UnionBuilder<S> {
    fn sink_name(&self) -> &'static str {
        S::NAME
    }

    fn set_long(&mut self, value: i64) -> Result<()> {
        self.select_ordinal(value).map(|_| ())
    }
}

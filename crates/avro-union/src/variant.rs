//! Variant descriptors, the descriptor registry, and the [`VariantSet`]
//! trait that a closed payload enum implements.

use serde_json::Value;

use crate::error::{CodecError, Result};
use crate::wire::{AvroDecoder, AvroEncoder};

/// One alternative of a union: its ordinal on the wire, its type name, and
/// the key used for it in the JSON encoding.
///
/// Ordinal 0 is reserved for "absent" and never appears in a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariantDescriptor {
    pub ordinal: u32,
    pub name: &'static str,
    pub json_key: &'static str,
}

impl VariantDescriptor {
    /// A descriptor whose JSON key is its type name.
    pub const fn new(ordinal: u32, name: &'static str) -> Self {
        Self {
            ordinal,
            name,
            json_key: name,
        }
    }

    /// Overrides the JSON key, e.g. `array` or `map` for collection-shaped
    /// alternatives.
    pub const fn with_json_key(self, json_key: &'static str) -> Self {
        Self {
            ordinal: self.ordinal,
            name: self.name,
            json_key,
        }
    }
}

/// Immutable registry of the descriptors of one union type, in ordinal
/// order. Cheap to copy and safe to share across threads.
#[derive(Debug, Clone, Copy)]
pub struct VariantTable {
    descriptors: &'static [VariantDescriptor],
}

impl VariantTable {
    pub const fn new(descriptors: &'static [VariantDescriptor]) -> Self {
        Self { descriptors }
    }

    /// Number of non-null alternatives (`N`).
    pub const fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Looks up a descriptor by wire ordinal. Returns `None` for 0, for
    /// negative ordinals and for anything above `N`.
    pub fn get(&self, ordinal: i64) -> Option<&'static VariantDescriptor> {
        if ordinal < 1 {
            return None;
        }
        let descriptors: &'static [VariantDescriptor] = self.descriptors;
        match descriptors.get((ordinal - 1) as usize) {
            Some(d) if d.ordinal as i64 == ordinal => Some(d),
            _ => descriptors.iter().find(|d| d.ordinal as i64 == ordinal),
        }
    }

    /// Descriptors in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = &'static VariantDescriptor> {
        let descriptors: &'static [VariantDescriptor] = self.descriptors;
        descriptors.iter()
    }

    /// Checks that ordinals run `1..=N` in order and that JSON keys are
    /// unique.
    pub fn validate(&self, union: &'static str) -> Result<()> {
        for (i, d) in self.descriptors.iter().enumerate() {
            let expected = i as u32 + 1;
            if d.ordinal != expected {
                return Err(CodecError::invalid_state(
                    union,
                    format!(
                        "variant {} has ordinal {}, expected {expected}",
                        d.name, d.ordinal
                    ),
                ));
            }
            if self.descriptors[..i]
                .iter()
                .any(|other| other.json_key == d.json_key)
            {
                return Err(CodecError::invalid_state(
                    union,
                    format!("duplicate JSON key {:?}", d.json_key),
                ));
            }
        }
        Ok(())
    }
}

/// A closed set of union payloads, one enum variant per alternative.
///
/// Usually generated with [`tagged_union!`](crate::tagged_union). Holding
/// the payload in an enum makes "two payloads set" and "payload of the
/// wrong ordinal" unrepresentable.
pub trait VariantSet: Sized {
    /// Union type name, used in error messages.
    const NAME: &'static str;

    /// Descriptors in ordinal order.
    const DESCRIPTORS: &'static [VariantDescriptor];

    fn variants() -> VariantTable {
        VariantTable::new(Self::DESCRIPTORS)
    }

    /// Wire ordinal of the held payload, in `1..=N`.
    fn ordinal(&self) -> u32;

    fn write_payload(&self, encoder: &mut AvroEncoder) -> Result<()>;

    /// Reads the payload of alternative `ordinal`.
    fn read_payload(ordinal: u32, decoder: &mut AvroDecoder<'_>) -> Result<Self>;

    fn payload_to_json(&self) -> Result<Value>;

    /// Decodes the JSON value found under alternative `ordinal`'s key.
    fn payload_from_json(ordinal: u32, value: &Value) -> Result<Self>;
}

/// Declares a payload enum and its [`VariantSet`] implementation.
///
/// Each line is `Variant(PayloadType) = ordinal`, optionally with
/// `as "json_key"` before the `=` to override the JSON key (which
/// otherwise is the variant name). Payload types implement
/// [`AvroDatum`](crate::AvroDatum).
///
/// ```
/// use avro_union::{tagged_union, TaggedUnion, TaggedUnionCodec};
///
/// tagged_union! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub enum LongArrayOrString {
///         ArrayLong(Vec<i64>) as "array" = 1,
///         Text(String) as "string" = 2,
///     }
/// }
///
/// let codec = TaggedUnionCodec::<LongArrayOrString>::new();
/// let value = TaggedUnion::of(LongArrayOrString::ArrayLong(vec![1, 2, 3]));
/// assert_eq!(codec.encode_json(Some(&value)).unwrap(), r#"{"array":[1,2,3]}"#);
/// assert_eq!(codec.encode_to_vec(Some(&value)).unwrap(), [2, 6, 2, 4, 6, 0]);
/// ```
#[macro_export]
macro_rules! tagged_union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident($ty:ty) $(as $key:literal)? = $ordinal:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant($ty),
            )+
        }

        impl $crate::VariantSet for $name {
            const NAME: &'static str = stringify!($name);

            const DESCRIPTORS: &'static [$crate::VariantDescriptor] = &[
                $(
                    $crate::VariantDescriptor::new($ordinal, stringify!($variant))
                        $(.with_json_key($key))?,
                )+
            ];

            fn ordinal(&self) -> u32 {
                match self {
                    $( $name::$variant(_) => $ordinal, )+
                }
            }

            fn write_payload(&self, encoder: &mut $crate::AvroEncoder) -> $crate::Result<()> {
                match self {
                    $( $name::$variant(payload) => $crate::AvroDatum::write_avro(payload, encoder), )+
                }
            }

            fn read_payload(
                ordinal: u32,
                decoder: &mut $crate::AvroDecoder<'_>,
            ) -> $crate::Result<Self> {
                match ordinal {
                    $( $ordinal => Ok($name::$variant(<$ty as $crate::AvroDatum>::read_avro(decoder)?)), )+
                    _ => Err($crate::CodecError::UnknownDiscriminator {
                        union: stringify!($name),
                        ordinal: ordinal as i64,
                    }),
                }
            }

            fn payload_to_json(&self) -> $crate::Result<$crate::serde_json::Value> {
                match self {
                    $( $name::$variant(payload) => $crate::AvroDatum::to_json(payload), )+
                }
            }

            fn payload_from_json(
                ordinal: u32,
                value: &$crate::serde_json::Value,
            ) -> $crate::Result<Self> {
                match ordinal {
                    $( $ordinal => Ok($name::$variant(<$ty as $crate::AvroDatum>::from_json(value)?)), )+
                    _ => Err($crate::CodecError::UnknownDiscriminator {
                        union: stringify!($name),
                        ordinal: ordinal as i64,
                    }),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRAMBLED: &[VariantDescriptor] = &[
        VariantDescriptor::new(2, "B"),
        VariantDescriptor::new(1, "A"),
    ];

    const DUPLICATE_KEYS: &[VariantDescriptor] = &[
        VariantDescriptor::new(1, "ArrayLong").with_json_key("array"),
        VariantDescriptor::new(2, "ArrayString").with_json_key("array"),
    ];

    #[test]
    fn json_key_defaults_to_name() {
        let d = VariantDescriptor::new(3, "Decimal");
        assert_eq!(d.json_key, "Decimal");
        assert_eq!(d.with_json_key("map").json_key, "map");
        assert_eq!(d.with_json_key("map").name, "Decimal");
    }

    #[test]
    fn lookup_rejects_reserved_and_out_of_range() {
        let table = VariantTable::new(DUPLICATE_KEYS);
        assert!(table.get(0).is_none());
        assert!(table.get(-1).is_none());
        assert!(table.get(3).is_none());
        assert_eq!(table.get(2).map(|d| d.name), Some("ArrayString"));
    }

    #[test]
    fn lookup_survives_unordered_tables() {
        let table = VariantTable::new(SCRAMBLED);
        assert_eq!(table.get(1).map(|d| d.name), Some("A"));
        assert_eq!(table.get(2).map(|d| d.name), Some("B"));
    }

    #[test]
    fn validate_catches_order_and_duplicates() {
        assert!(matches!(
            VariantTable::new(SCRAMBLED).validate("Scrambled"),
            Err(CodecError::InvalidUnionState { union: "Scrambled", .. })
        ));
        assert!(matches!(
            VariantTable::new(DUPLICATE_KEYS).validate("Dup"),
            Err(CodecError::InvalidUnionState { union: "Dup", .. })
        ));
        assert!(VariantTable::new(&[]).validate("Null").is_ok());
    }
}

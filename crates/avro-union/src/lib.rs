//! Tagged unions over a fixed, schema-defined set of alternatives, with
//! "absent" as a first-class alternative.
//!
//! A union type is a closed payload enum implementing [`VariantSet`],
//! normally declared with [`tagged_union!`]. One generic
//! [`TaggedUnionCodec`] then encodes every such union:
//!
//! - binary: zig-zag varint ordinal (0 = absent), then the payload's own
//!   Avro encoding;
//! - JSON: `null`, or a single-key object keyed by the alternative's JSON
//!   key.
//!
//! Payloads only need to implement [`AvroDatum`]; the codec never looks
//! inside them.

mod codec;
mod config;
mod datum;
mod error;
mod union;
mod variant;

pub mod wire;

pub use codec::TaggedUnionCodec;
pub use config::DecodeLimits;
pub use datum::{AvroDatum, Bytes};
pub use error::{CodecError, Result};
pub use union::{DatumSink, TaggedUnion, UnionBuilder};
pub use variant::{VariantDescriptor, VariantSet, VariantTable};
pub use wire::{AvroDecoder, AvroEncoder};

#[doc(hidden)]
pub use serde_json;

//! Avro binary primitives.
//!
//! Encoding rules:
//! - boolean: 1 byte (0 or 1)
//! - int/long: zig-zag + base-128 varint, least significant group first
//! - float: 4 bytes IEEE 754 little-endian
//! - double: 8 bytes IEEE 754 little-endian
//! - bytes/string: long(length) + raw bytes
//! - array/map: blocks of long(count) + items, terminated by long(0)

mod decoder;
mod encoder;

pub use decoder::AvroDecoder;
pub use encoder::AvroEncoder;

/// Maps a signed long onto the unsigned zig-zag space.
#[inline]
pub fn zigzag_encode(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

/// Inverse of [`zigzag_encode`].
#[inline]
pub fn zigzag_decode(n: u64) -> i64 {
    ((n >> 1) as i64) ^ -((n & 1) as i64)
}

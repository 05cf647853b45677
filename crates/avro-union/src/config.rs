//! Decode limits.
//!
//! The wire format carries attacker-controlled lengths and block counts;
//! the limits bound what a single decode may allocate.

use serde::Deserialize;

use crate::error::Result;

/// Upper bounds enforced by [`AvroDecoder`](crate::AvroDecoder).
///
/// ```
/// use avro_union::DecodeLimits;
///
/// let limits = DecodeLimits::from_toml_str("max_bytes_len = 1024").unwrap();
/// assert_eq!(limits.max_bytes_len, 1024);
/// assert_eq!(limits.max_collection_items, DecodeLimits::default().max_collection_items);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeLimits {
    /// Longest `bytes` or `string` value accepted.
    pub max_bytes_len: usize,
    /// Most items accepted in one array or map, across all of its blocks.
    pub max_collection_items: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_bytes_len: 64 * 1024 * 1024,
            max_collection_items: 1 << 20,
        }
    }
}

impl DecodeLimits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses limits from a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

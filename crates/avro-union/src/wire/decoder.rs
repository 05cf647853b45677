//! Avro binary decoder.

use avro_union_buffers::Reader;

use super::zigzag_decode;
use crate::config::DecodeLimits;
use crate::error::{CodecError, Result};

/// Reads Avro primitives from a borrowed byte slice.
///
/// Every read consumes exactly the bytes of the value it returns, so
/// consecutive values can be read back without delimiters.
#[derive(Debug, Clone)]
pub struct AvroDecoder<'a> {
    reader: Reader<'a>,
    limits: DecodeLimits,
}

impl<'a> AvroDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_limits(data, DecodeLimits::default())
    }

    pub fn with_limits(data: &'a [u8], limits: DecodeLimits) -> Self {
        Self {
            reader: Reader::new(data),
            limits,
        }
    }

    pub fn reset(&mut self, data: &'a [u8]) {
        self.reader.reset(data);
    }

    pub fn limits(&self) -> &DecodeLimits {
        &self.limits
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.reader.position()
    }

    pub fn remaining(&self) -> usize {
        self.reader.remaining()
    }

    // ---------------------------------------------------------------- varint

    /// Reads a variable-length unsigned integer (at most 10 bytes; the
    /// tenth may only carry the top bit of the value).
    fn read_varint_u64(&mut self) -> Result<u64> {
        let mut result: u64 = 0;
        let mut shift = 0u32;
        for _ in 0..10 {
            let b = self.reader.u8()? as u64;
            if shift == 63 && b > 1 {
                return Err(CodecError::VarLongTooLong);
            }
            result |= (b & 0x7f) << shift;
            if b & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
        }
        Err(CodecError::VarLongTooLong)
    }

    pub fn read_long(&mut self) -> Result<i64> {
        Ok(zigzag_decode(self.read_varint_u64()?))
    }

    pub fn read_int(&mut self) -> Result<i32> {
        let n = self.read_long()?;
        i32::try_from(n).map_err(|_| CodecError::IntOutOfRange(n))
    }

    // ---------------------------------------------------------------- primitives

    pub fn read_boolean(&mut self) -> Result<bool> {
        match self.reader.u8()? {
            0 => Ok(false),
            1 => Ok(true),
            b => Err(CodecError::InvalidBoolean(b)),
        }
    }

    pub fn read_float(&mut self) -> Result<f32> {
        let bytes = self.reader.buf(4)?;
        Ok(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_double(&mut self) -> Result<f64> {
        let b = self.reader.buf(8)?;
        Ok(f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
    }

    fn read_len(&mut self) -> Result<usize> {
        let len = self.read_long()?;
        if len < 0 {
            return Err(CodecError::NegativeLength(len));
        }
        if len as u64 > self.limits.max_bytes_len as u64 {
            tracing::warn!(len, limit = self.limits.max_bytes_len, "bytes length over limit");
            return Err(CodecError::LimitExceeded {
                what: "bytes length",
                limit: self.limits.max_bytes_len,
                actual: len as u64,
            });
        }
        Ok(len as usize)
    }

    /// Borrows a length-prefixed byte run without copying.
    pub fn read_bytes_ref(&mut self) -> Result<&'a [u8]> {
        let len = self.read_len()?;
        Ok(self.reader.buf(len)?)
    }

    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        Ok(self.read_bytes_ref()?.to_vec())
    }

    pub fn read_string(&mut self) -> Result<String> {
        let bytes = self.read_bytes_ref()?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| CodecError::InvalidUtf8)
    }

    // ---------------------------------------------------------------- blocks

    /// Reads one block header, returning the item count (0 ends the
    /// collection). A negative count is followed by the block's byte size,
    /// which is skipped over.
    fn read_block_count(&mut self, total: &mut usize) -> Result<usize> {
        let mut count = self.read_long()?;
        if count < 0 {
            count = count
                .checked_neg()
                .ok_or(CodecError::NegativeLength(count))?;
            let _block_size = self.read_long()?;
        }
        let count = count as u64;
        let max = self.limits.max_collection_items as u64;
        if count > max || *total as u64 + count > max {
            tracing::warn!(count, limit = max, "collection size over limit");
            return Err(CodecError::LimitExceeded {
                what: "collection items",
                limit: self.limits.max_collection_items,
                actual: *total as u64 + count,
            });
        }
        *total += count as usize;
        Ok(count as usize)
    }

    /// Reads array blocks until the zero-count terminator.
    pub fn read_array<T, F>(&mut self, mut item_reader: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        let mut result = Vec::new();
        let mut total = 0usize;
        loop {
            let count = self.read_block_count(&mut total)?;
            if count == 0 {
                break;
            }
            result.reserve(count.min(self.remaining()));
            for _ in 0..count {
                result.push(item_reader(self)?);
            }
        }
        Ok(result)
    }

    /// Reads map blocks until the zero-count terminator. Keys are strings.
    pub fn read_map<T, F>(&mut self, mut value_reader: F) -> Result<Vec<(String, T)>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        let mut result = Vec::new();
        let mut total = 0usize;
        loop {
            let count = self.read_block_count(&mut total)?;
            if count == 0 {
                break;
            }
            result.reserve(count.min(self.remaining()));
            for _ in 0..count {
                let key = self.read_string()?;
                let val = value_reader(self)?;
                result.push((key, val));
            }
        }
        Ok(result)
    }
}

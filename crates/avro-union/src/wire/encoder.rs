//! Avro binary encoder.

use avro_union_buffers::Writer;

use super::zigzag_encode;

/// Writes Avro primitives into a [`Writer`].
#[derive(Debug, Default)]
pub struct AvroEncoder {
    pub writer: Writer,
}

impl AvroEncoder {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    pub fn with_writer(writer: Writer) -> Self {
        Self { writer }
    }

    // ---------------------------------------------------------------- varint

    fn write_varint_u64(&mut self, mut n: u64) {
        loop {
            let low7 = (n & 0x7f) as u8;
            n >>= 7;
            if n == 0 {
                self.writer.u8(low7);
                return;
            }
            self.writer.u8(low7 | 0x80);
        }
    }

    /// Writes a zig-zag encoded long.
    pub fn write_long(&mut self, n: i64) {
        self.write_varint_u64(zigzag_encode(n));
    }

    /// Writes a zig-zag encoded int. Same bytes as the equal long.
    pub fn write_int(&mut self, n: i32) {
        self.write_long(n as i64);
    }

    // ---------------------------------------------------------------- primitives

    pub fn write_boolean(&mut self, b: bool) {
        self.writer.u8(u8::from(b));
    }

    pub fn write_float(&mut self, f: f32) {
        self.writer.buf(&f.to_le_bytes());
    }

    pub fn write_double(&mut self, f: f64) {
        self.writer.buf(&f.to_le_bytes());
    }

    pub fn write_bytes(&mut self, data: &[u8]) {
        self.write_long(data.len() as i64);
        self.writer.buf(data);
    }

    pub fn write_str(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
    }

    /// Opens a single array or map block of `count` items.
    ///
    /// Empty collections are written as the terminator alone.
    pub fn write_block_start(&mut self, count: usize) {
        if count > 0 {
            self.write_long(count as i64);
        }
    }

    pub fn write_block_end(&mut self) {
        self.write_long(0);
    }

    // ---------------------------------------------------------------- output

    pub fn flush(&mut self) -> Vec<u8> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

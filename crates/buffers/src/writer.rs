//! Append-only byte writer.

/// A byte writer that grows as needed.
///
/// Bytes written since the last [`Writer::flush`] are returned by the next
/// flush; earlier bytes are released.
///
/// # Example
///
/// ```
/// use avro_union_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(0x01);
/// writer.buf(&[0x02, 0x03]);
/// assert_eq!(writer.flush(), [0x01, 0x02, 0x03]);
/// assert!(writer.is_empty());
/// ```
#[derive(Debug, Default, Clone)]
pub struct Writer {
    uint8: Vec<u8>,
}

impl Writer {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self { uint8: Vec::new() }
    }

    /// Creates an empty writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            uint8: Vec::with_capacity(capacity),
        }
    }

    /// Writes a single byte.
    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.uint8.push(val);
    }

    /// Writes a run of bytes.
    #[inline]
    pub fn buf(&mut self, data: &[u8]) {
        self.uint8.extend_from_slice(data);
    }

    /// Number of unflushed bytes.
    pub fn len(&self) -> usize {
        self.uint8.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uint8.is_empty()
    }

    /// Unflushed bytes, without consuming them.
    pub fn as_slice(&self) -> &[u8] {
        &self.uint8
    }

    /// Returns the bytes written since the previous flush.
    pub fn flush(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.uint8)
    }

    /// Drops unflushed bytes.
    pub fn reset(&mut self) {
        self.uint8.clear();
    }

    /// Consumes the writer, returning all unflushed bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.uint8
    }
}

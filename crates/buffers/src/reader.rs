//! Cursor reader over a borrowed byte slice.

use crate::BufferError;

/// A bounds-checked reader over a byte slice.
///
/// A failed read leaves the cursor where it was.
///
/// # Example
///
/// ```
/// use avro_union_buffers::Reader;
///
/// let data = [0x01, 0x02, 0x03];
/// let mut reader = Reader::new(&data);
/// assert_eq!(reader.u8().unwrap(), 0x01);
/// assert_eq!(reader.buf(2).unwrap(), [0x02, 0x03]);
/// assert!(reader.u8().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    uint8: &'a [u8],
    x: usize,
}

impl<'a> Reader<'a> {
    pub fn new(uint8: &'a [u8]) -> Self {
        Self { uint8, x: 0 }
    }

    /// Points the reader at a new slice and rewinds the cursor.
    pub fn reset(&mut self, uint8: &'a [u8]) {
        self.uint8 = uint8;
        self.x = 0;
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.x
    }

    /// Number of bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.uint8.len() - self.x
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn check(&self, needed: usize) -> Result<(), BufferError> {
        let available = self.remaining();
        if needed > available {
            return Err(BufferError::EndOfInput { needed, available });
        }
        Ok(())
    }

    /// Returns the next byte without advancing.
    pub fn peek(&self) -> Result<u8, BufferError> {
        self.check(1)?;
        Ok(self.uint8[self.x])
    }

    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        self.check(1)?;
        let val = self.uint8[self.x];
        self.x += 1;
        Ok(val)
    }

    /// Returns the next `size` bytes and advances past them.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.check(size)?;
        let start = self.x;
        self.x += size;
        Ok(&self.uint8[start..self.x])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8_sequence() {
        let data = [0x0a, 0x0b];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.u8(), Ok(0x0a));
        assert_eq!(reader.position(), 1);
        assert_eq!(reader.u8(), Ok(0x0b));
        assert!(reader.is_empty());
    }

    #[test]
    fn test_end_of_input_keeps_cursor() {
        let data = [0x01, 0x02];
        let mut reader = Reader::new(&data);
        reader.u8().unwrap();
        assert_eq!(
            reader.buf(3),
            Err(BufferError::EndOfInput {
                needed: 3,
                available: 1
            })
        );
        assert_eq!(reader.position(), 1);
        assert_eq!(reader.buf(1), Ok(&data[1..]));
    }

    #[test]
    fn test_peek_does_not_advance() {
        let data = [0x42];
        let reader = Reader::new(&data);
        assert_eq!(reader.peek(), Ok(0x42));
        assert_eq!(reader.remaining(), 1);
    }

    #[test]
    fn test_empty_reader() {
        let mut reader = Reader::new(&[]);
        assert_eq!(
            reader.u8(),
            Err(BufferError::EndOfInput {
                needed: 1,
                available: 0
            })
        );
        assert!(reader.peek().is_err());
    }

    #[test]
    fn test_reset() {
        let first = [1u8, 2];
        let second = [3u8];
        let mut reader = Reader::new(&first);
        reader.buf(2).unwrap();
        reader.reset(&second);
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.u8(), Ok(3));
    }
}

//! Byte buffers used by the avro-union wire codecs.
//!
//! [`Writer`] is an append-only growable buffer with a flush mark;
//! [`Reader`] is a cursor over a borrowed slice whose every read is
//! bounds-checked.

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

/// Errors produced by [`Reader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    #[error("unexpected end of input: needed {needed} byte(s), {available} available")]
    EndOfInput { needed: usize, available: usize },
}

//! Error type shared by the wire primitives, the payload codecs and the
//! union codec.
//!
//! Payload codecs return [`CodecError`] directly, so a failure inside a
//! variant reaches the caller of the union codec unchanged.

use avro_union_buffers::BufferError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CodecError>;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The selected ordinal has no matching variant, or a payload is missing
    /// where one is required.
    #[error("invalid union state for {union}: {reason}")]
    InvalidUnionState {
        union: &'static str,
        reason: String,
    },
    /// A decoded discriminator lies outside `[0, N]`.
    #[error("unknown union discriminator for {union}: {ordinal}")]
    UnknownDiscriminator { union: &'static str, ordinal: i64 },
    #[error("unsupported operation on {target}: {operation}")]
    UnsupportedMutation {
        target: &'static str,
        operation: &'static str,
    },
    #[error("malformed JSON for {target}: {reason}")]
    MalformedJson { target: &'static str, reason: String },

    #[error(transparent)]
    Buffer(#[from] BufferError),
    #[error("variable-length long is too long")]
    VarLongTooLong,
    #[error("int out of range: {0}")]
    IntOutOfRange(i64),
    #[error("invalid boolean byte: {0:#04x}")]
    InvalidBoolean(u8),
    #[error("invalid UTF-8")]
    InvalidUtf8,
    #[error("negative length: {0}")]
    NegativeLength(i64),
    #[error("{what} of {actual} exceeds limit of {limit}")]
    LimitExceeded {
        what: &'static str,
        limit: usize,
        actual: u64,
    },
    #[error("invalid enum index for {target}: {index}")]
    InvalidEnumIndex { target: &'static str, index: i32 },
    #[error("invalid enum symbol for {target}: {symbol}")]
    InvalidEnumSymbol { target: &'static str, symbol: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Base64(#[from] base64::DecodeError),
    #[error("invalid decode limits: {0}")]
    Config(#[from] toml::de::Error),
}

impl CodecError {
    pub(crate) fn invalid_state(union: &'static str, reason: impl Into<String>) -> Self {
        CodecError::InvalidUnionState {
            union,
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_json(target: &'static str, reason: impl Into<String>) -> Self {
        CodecError::MalformedJson {
            target,
            reason: reason.into(),
        }
    }
}

//! Text rendering of field values, the form a downstream consumer prints
//! or writes out as column data.

use avro_union::TaggedUnion;

use crate::records::{DateTime, Timestamp};
use crate::unions::FieldValue;

/// Encoding reported for values rendered as text.
pub const TEXT_ENCODING: &str = "ASCII";

/// A rendered column value. `bytes` is `None` for a missing value;
/// `encoding` is `None` for raw binary data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RenderedValue {
    pub encoding: Option<String>,
    pub bytes: Option<Vec<u8>>,
}

impl RenderedValue {
    pub fn missing() -> Self {
        Self {
            encoding: Some(TEXT_ENCODING.to_owned()),
            bytes: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            encoding: Some(TEXT_ENCODING.to_owned()),
            bytes: Some(text.into().into_bytes()),
        }
    }

    pub fn encoded(encoding: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            encoding: Some(encoding.into()),
            bytes: Some(bytes),
        }
    }

    pub fn binary(bytes: Vec<u8>) -> Self {
        Self {
            encoding: None,
            bytes: Some(bytes),
        }
    }

    pub fn is_missing(&self) -> bool {
        self.bytes.is_none()
    }

    /// The bytes as UTF-8 text, if present and valid.
    pub fn as_text(&self) -> Option<&str> {
        self.bytes
            .as_deref()
            .and_then(|b| std::str::from_utf8(b).ok())
    }
}

pub fn render_field_value(value: &TaggedUnion<FieldValue>) -> RenderedValue {
    let Some(payload) = value.payload() else {
        return RenderedValue::missing();
    };
    match payload {
        FieldValue::Integer(v) => RenderedValue::text(v.value.as_str()),
        FieldValue::Decimal(v) => RenderedValue::text(v.value.as_str()),
        // Debug keeps a trailing ".0" on integral values.
        FieldValue::Float(v) => RenderedValue::text(format!("{:?}", v.value)),
        FieldValue::Character(v) => RenderedValue::encoded(v.charset.as_str(), v.value.0.clone()),
        FieldValue::Timestamp(v) => RenderedValue::text(render_timestamp(v)),
        FieldValue::DateTime(v) => RenderedValue::text(render_date_time(v)),
        FieldValue::TimestampWithTimeZone(v) => {
            RenderedValue::text(format!("{} {}", render_date_time(&v.value), v.timezone))
        }
        FieldValue::TextGeometry(v) => RenderedValue::text(v.value.as_str()),
        FieldValue::TextObject(v) => RenderedValue::text(v.value.as_str()),
        FieldValue::BinaryGeometry(v) => RenderedValue::binary(v.value.0.clone()),
        FieldValue::BinaryObject(v) => RenderedValue::binary(v.value.0.clone()),
        FieldValue::EmptyObject(_) => RenderedValue::missing(),
    }
}

/// `<seconds>.<sub-second part, six digits>`. The sign belongs to the
/// seconds; a negative sub-second part renders by magnitude.
pub fn render_timestamp(value: &Timestamp) -> String {
    format!("{}.{:06}", value.timestamp, value.millis.unsigned_abs())
}

/// `YYYY-MM-DD`, `hh:mm:ss`, or both separated by a space, followed by
/// `.ffffff` when the sub-second part is present (by magnitude, as for
/// [`render_timestamp`]). A date or time is rendered only when all three
/// of its components are present.
pub fn render_date_time(value: &DateTime) -> String {
    let mut out = String::with_capacity(26);
    if let Some((year, month, day)) = value.date_parts() {
        if year < 0 {
            out.push('-');
        }
        out.push_str(&format!("{:04}-{month:02}-{day:02}", year.unsigned_abs()));
    }
    if let Some((hour, minute, second)) = value.time_parts() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&format!("{hour:02}:{minute:02}:{second:02}"));
    }
    if let Some(millis) = value.millis() {
        out.push_str(&format!(".{:06}", millis.unsigned_abs()));
    }
    out
}

//! Typed value codec.
//!
//! Writes one tag byte followed by the tag's canonical big-endian payload.
//! This module is format-level only: it knows nothing about tokens, columns
//! or size policy. Callers that need bounded input must bound the slice they
//! hand to [`ByteReader`].

use crate::value::{Value, ValueEnum, ValueTag};
use chrono::{DateTime, TimeDelta};
use rust_decimal::Decimal;
use thiserror::Error as ThisError;
use uuid::Uuid;

const NANOS_PER_SECOND: u32 = 1_000_000_000;
const DECIMAL_MAX_SCALE: u8 = 28;

///
/// CodecError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CodecError {
    #[error("unknown value tag 0x{tag:02x} at byte {position}")]
    UnknownTag { tag: u8, position: usize },

    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("text payload is not valid UTF-8")]
    InvalidUtf8,

    #[error("invalid boolean byte 0x{0:02x}")]
    InvalidBool(u8),

    #[error("invalid decimal flags {0:02x?}")]
    InvalidDecimal([u8; 4]),

    #[error("invalid char scalar value 0x{0:x}")]
    InvalidChar(u32),

    #[error("timestamp out of range: {seconds}s + {nanos}ns")]
    InvalidTimestamp { seconds: i64, nanos: u32 },

    #[error("duration out of range: {seconds}s + {nanos}ns")]
    InvalidDuration { seconds: i64, nanos: i32 },
}

///
/// ByteReader
///
/// Forward-only cursor over an encoded byte slice.
///

#[derive(Clone, Debug)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Number of bytes consumed so far.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        if len > self.remaining() {
            return Err(CodecError::UnexpectedEof {
                needed: len,
                remaining: self.remaining(),
            });
        }

        let start = self.position;
        self.position += len;

        Ok(&self.bytes[start..self.position])
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_slice(N)?);

        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_array::<1>()?[0])
    }
}

///
/// ValueCodec
///
/// Byte-level "encode typed value / decode typed value" capability consumed
/// by the token binary stage. Implementations must be lossless: decoding the
/// output of `encode_value` yields a value equal to the input.
///

pub trait ValueCodec: Send + Sync {
    /// Append the tag byte and canonical payload for `value`.
    fn encode_value(&self, value: &Value, out: &mut Vec<u8>);

    /// Read exactly one tagged value.
    fn decode_value(&self, reader: &mut ByteReader<'_>) -> Result<Value, CodecError>;
}

///
/// TaggedValueCodec
///
/// Default fixed-width big-endian codec for every [`ValueTag`].
///

#[derive(Clone, Copy, Debug, Default)]
pub struct TaggedValueCodec;

///
/// Canonical Byte Representation
///

#[inline]
fn feed_u8(out: &mut Vec<u8>, x: u8) {
    out.push(x);
}

#[inline]
fn feed_u32(out: &mut Vec<u8>, x: u32) {
    out.extend_from_slice(&x.to_be_bytes());
}

#[inline]
fn feed_i64(out: &mut Vec<u8>, x: i64) {
    out.extend_from_slice(&x.to_be_bytes());
}

#[inline]
fn feed_bytes(out: &mut Vec<u8>, b: &[u8]) {
    out.extend_from_slice(b);
}

// Length-prefixed UTF-8; token payloads never approach u32::MAX.
#[allow(clippy::cast_possible_truncation)]
fn feed_str(out: &mut Vec<u8>, s: &str) {
    feed_u32(out, s.len() as u32);
    feed_bytes(out, s.as_bytes());
}

fn read_str(reader: &mut ByteReader<'_>) -> Result<String, CodecError> {
    let len = u32::from_be_bytes(reader.read_array()?) as usize;
    let raw = reader.read_slice(len)?;

    std::str::from_utf8(raw)
        .map(ToString::to_string)
        .map_err(|_| CodecError::InvalidUtf8)
}

impl ValueCodec for TaggedValueCodec {
    fn encode_value(&self, value: &Value, out: &mut Vec<u8>) {
        feed_u8(out, value.tag().to_u8());

        match value {
            Value::Null => {}
            Value::Bool(b) => feed_u8(out, u8::from(*b)),
            Value::Int8(v) => feed_bytes(out, &v.to_be_bytes()),
            Value::Int16(v) => feed_bytes(out, &v.to_be_bytes()),
            Value::Int32(v) => feed_bytes(out, &v.to_be_bytes()),
            Value::Int64(v) => feed_i64(out, *v),
            Value::Uint8(v) => feed_u8(out, *v),
            Value::Uint16(v) => feed_bytes(out, &v.to_be_bytes()),
            Value::Uint32(v) => feed_u32(out, *v),
            Value::Uint64(v) => feed_bytes(out, &v.to_be_bytes()),
            Value::Float32(v) => feed_u32(out, v.to_bits()),
            Value::Float64(v) => feed_bytes(out, &v.to_bits().to_be_bytes()),
            Value::Decimal(d) => feed_bytes(out, &d.serialize()),
            Value::Text(s) => feed_str(out, s),
            Value::Char(c) => feed_u32(out, u32::from(*c)),
            Value::Enum(e) => {
                feed_str(out, &e.path);
                feed_i64(out, e.discriminant);
            }
            Value::Uuid(u) => feed_bytes(out, u.as_bytes()),
            Value::Timestamp(t) => {
                feed_i64(out, t.timestamp());
                feed_u32(out, t.timestamp_subsec_nanos());
            }
            Value::Duration(d) => {
                // seconds truncate toward zero; nanos carry the same sign
                feed_i64(out, d.num_seconds());
                feed_bytes(out, &d.subsec_nanos().to_be_bytes());
            }
        }
    }

    fn decode_value(&self, reader: &mut ByteReader<'_>) -> Result<Value, CodecError> {
        let position = reader.position();
        let raw = reader.read_u8()?;
        let tag = ValueTag::from_u8(raw).ok_or(CodecError::UnknownTag { tag: raw, position })?;

        let value = match tag {
            ValueTag::Null => Value::Null,
            ValueTag::Bool => match reader.read_u8()? {
                0 => Value::Bool(false),
                1 => Value::Bool(true),
                other => return Err(CodecError::InvalidBool(other)),
            },
            ValueTag::Int8 => Value::Int8(i8::from_be_bytes(reader.read_array()?)),
            ValueTag::Int16 => Value::Int16(i16::from_be_bytes(reader.read_array()?)),
            ValueTag::Int32 => Value::Int32(i32::from_be_bytes(reader.read_array()?)),
            ValueTag::Int64 => Value::Int64(i64::from_be_bytes(reader.read_array()?)),
            ValueTag::Uint8 => Value::Uint8(reader.read_u8()?),
            ValueTag::Uint16 => Value::Uint16(u16::from_be_bytes(reader.read_array()?)),
            ValueTag::Uint32 => Value::Uint32(u32::from_be_bytes(reader.read_array()?)),
            ValueTag::Uint64 => Value::Uint64(u64::from_be_bytes(reader.read_array()?)),
            ValueTag::Float32 => {
                Value::Float32(f32::from_bits(u32::from_be_bytes(reader.read_array()?)))
            }
            ValueTag::Float64 => {
                Value::Float64(f64::from_bits(u64::from_be_bytes(reader.read_array()?)))
            }
            ValueTag::Decimal => Value::Decimal(decode_decimal(reader.read_array()?)?),
            ValueTag::Text => Value::Text(read_str(reader)?),
            ValueTag::Char => {
                let scalar = u32::from_be_bytes(reader.read_array()?);
                Value::Char(char::from_u32(scalar).ok_or(CodecError::InvalidChar(scalar))?)
            }
            ValueTag::Enum => {
                let path = read_str(reader)?;
                let discriminant = i64::from_be_bytes(reader.read_array()?);
                Value::Enum(ValueEnum { path, discriminant })
            }
            ValueTag::Uuid => Value::Uuid(Uuid::from_bytes(reader.read_array()?)),
            ValueTag::Timestamp => {
                let seconds = i64::from_be_bytes(reader.read_array()?);
                let nanos = u32::from_be_bytes(reader.read_array()?);
                let timestamp = DateTime::from_timestamp(seconds, nanos)
                    .ok_or(CodecError::InvalidTimestamp { seconds, nanos })?;
                Value::Timestamp(timestamp)
            }
            ValueTag::Duration => {
                let seconds = i64::from_be_bytes(reader.read_array()?);
                let nanos = i32::from_be_bytes(reader.read_array()?);
                Value::Duration(decode_duration(seconds, nanos)?)
            }
        };

        Ok(value)
    }
}

// Flags word: bytes 0..2 unused, byte 2 scale, high bit of byte 3 sign.
fn decode_decimal(bytes: [u8; 16]) -> Result<Decimal, CodecError> {
    let flags = [bytes[0], bytes[1], bytes[2], bytes[3]];
    if flags[0] != 0 || flags[1] != 0 || flags[2] > DECIMAL_MAX_SCALE || flags[3] & 0x7f != 0 {
        return Err(CodecError::InvalidDecimal(flags));
    }

    Ok(Decimal::deserialize(bytes))
}

fn decode_duration(seconds: i64, nanos: i32) -> Result<TimeDelta, CodecError> {
    let invalid = CodecError::InvalidDuration { seconds, nanos };

    // Sub-second part must be in range and agree in sign with the seconds part.
    let sign_conflict = (seconds > 0 && nanos < 0) || (seconds < 0 && nanos > 0);
    if nanos.unsigned_abs() >= NANOS_PER_SECOND || sign_conflict {
        return Err(invalid);
    }

    TimeDelta::try_seconds(seconds)
        .and_then(|whole| whole.checked_add(&TimeDelta::nanoseconds(i64::from(nanos))))
        .ok_or(invalid)
}

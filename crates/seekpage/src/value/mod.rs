mod codec;
mod compare;
mod tag;

#[cfg(test)]
mod tests;

use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use uuid::Uuid;

// re-exports
pub use codec::{ByteReader, CodecError, TaggedValueCodec, ValueCodec};
pub use compare::{canonical_cmp, strict_order_cmp};
pub use tag::ValueTag;

///
/// Value
///
/// One typed column value captured from a boundary row.
///
/// Every variant maps onto exactly one [`ValueTag`], so a decoded value
/// always reconstructs the same variant it was captured as.
///
/// Equality and ordering follow [`canonical_cmp`]: floats compare by IEEE
/// total order (so a decoded NaN equals its source), and values of different
/// variants never compare equal.
///

#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Float32(f32),
    Float64(f64),
    Decimal(Decimal),
    Text(String),
    Char(char),
    Enum(ValueEnum),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    /// Signed time span.
    Duration(TimeDelta),
}

impl Value {
    /// Wire tag for this value's variant.
    #[must_use]
    pub const fn tag(&self) -> ValueTag {
        tag::canonical_tag(self)
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Stable rank used for cross-variant ordering.
    ///
    /// Tags are 1-based for wire stability; rank is 0-based.
    #[must_use]
    pub const fn canonical_rank(&self) -> u8 {
        self.tag().to_u8() - 1
    }

    /// Construct a text value.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        canonical_cmp(self, other).is_eq()
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        canonical_cmp(self, other)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int8(v) => write!(f, "{v}"),
            Self::Int16(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Uint8(v) => write!(f, "{v}"),
            Self::Uint16(v) => write!(f, "{v}"),
            Self::Uint32(v) => write!(f, "{v}"),
            Self::Uint64(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "'{}'", v.replace('\'', "''")),
            Self::Char(v) => write!(f, "'{v}'"),
            Self::Enum(v) => write!(f, "{}({})", v.path, v.discriminant),
            Self::Uuid(v) => write!(f, "'{v}'"),
            Self::Timestamp(v) => write!(f, "'{}'", v.to_rfc3339()),
            Self::Duration(v) => write!(f, "'{v}'"),
        }
    }
}

///
/// ValueEnum
///
/// Enum value captured by its underlying integer plus the enum's type
/// identity. Two enums with the same discriminant but different paths are
/// different values.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ValueEnum {
    pub path: String,
    pub discriminant: i64,
}

impl ValueEnum {
    #[must_use]
    pub fn new(path: impl Into<String>, discriminant: i64) -> Self {
        Self {
            path: path.into(),
            discriminant,
        }
    }
}

///
/// Conversions
///

macro_rules! impl_value_from {
    ( $( $ty:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_value_from! {
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    f32 => Float32,
    f64 => Float64,
    Decimal => Decimal,
    String => Text,
    char => Char,
    ValueEnum => Enum,
    Uuid => Uuid,
    DateTime<Utc> => Timestamp,
    TimeDelta => Duration,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

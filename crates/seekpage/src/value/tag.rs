use crate::value::Value;

///
/// ValueTag
///
/// Stable one-byte type tag written ahead of every encoded column value.
///
/// IMPORTANT:
/// Tag values are part of the continuation-token wire format. Reassigning a
/// tag invalidates every token issued before the change.
///
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ValueTag {
    Null = 1,
    Bool = 2,
    Int8 = 3,
    Int16 = 4,
    Int32 = 5,
    Int64 = 6,
    Uint8 = 7,
    Uint16 = 8,
    Uint32 = 9,
    Uint64 = 10,
    Float32 = 11,
    Float64 = 12,
    Decimal = 13,
    Text = 14,
    Char = 15,
    Enum = 16,
    Uuid = 17,
    Timestamp = 18,
    Duration = 19,
}

impl ValueTag {
    /// Every assigned tag, in wire order.
    pub const ALL: [Self; 19] = [
        Self::Null,
        Self::Bool,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
        Self::Float32,
        Self::Float64,
        Self::Decimal,
        Self::Text,
        Self::Char,
        Self::Enum,
        Self::Uuid,
        Self::Timestamp,
        Self::Duration,
    ];

    /// Stable wire byte for this variant.
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Resolve one wire byte back to its tag.
    ///
    /// Returns `None` for unassigned bytes (including `0`).
    #[must_use]
    pub const fn from_u8(raw: u8) -> Option<Self> {
        let tag = match raw {
            1 => Self::Null,
            2 => Self::Bool,
            3 => Self::Int8,
            4 => Self::Int16,
            5 => Self::Int32,
            6 => Self::Int64,
            7 => Self::Uint8,
            8 => Self::Uint16,
            9 => Self::Uint32,
            10 => Self::Uint64,
            11 => Self::Float32,
            12 => Self::Float64,
            13 => Self::Decimal,
            14 => Self::Text,
            15 => Self::Char,
            16 => Self::Enum,
            17 => Self::Uuid,
            18 => Self::Timestamp,
            19 => Self::Duration,
            _ => return None,
        };

        Some(tag)
    }

    /// Stable human-readable value kind label for diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Bool => "Bool",
            Self::Int8 => "Int8",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::Uint8 => "Uint8",
            Self::Uint16 => "Uint16",
            Self::Uint32 => "Uint32",
            Self::Uint64 => "Uint64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::Decimal => "Decimal",
            Self::Text => "Text",
            Self::Char => "Char",
            Self::Enum => "Enum",
            Self::Uuid => "Uuid",
            Self::Timestamp => "Timestamp",
            Self::Duration => "Duration",
        }
    }
}

impl std::fmt::Display for ValueTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical tag for one runtime value.
#[must_use]
pub(super) const fn canonical_tag(value: &Value) -> ValueTag {
    match value {
        Value::Null => ValueTag::Null,
        Value::Bool(_) => ValueTag::Bool,
        Value::Int8(_) => ValueTag::Int8,
        Value::Int16(_) => ValueTag::Int16,
        Value::Int32(_) => ValueTag::Int32,
        Value::Int64(_) => ValueTag::Int64,
        Value::Uint8(_) => ValueTag::Uint8,
        Value::Uint16(_) => ValueTag::Uint16,
        Value::Uint32(_) => ValueTag::Uint32,
        Value::Uint64(_) => ValueTag::Uint64,
        Value::Float32(_) => ValueTag::Float32,
        Value::Float64(_) => ValueTag::Float64,
        Value::Decimal(_) => ValueTag::Decimal,
        Value::Text(_) => ValueTag::Text,
        Value::Char(_) => ValueTag::Char,
        Value::Enum(_) => ValueTag::Enum,
        Value::Uuid(_) => ValueTag::Uuid,
        Value::Timestamp(_) => ValueTag::Timestamp,
        Value::Duration(_) => ValueTag::Duration,
    }
}

use crate::value::CodecError;
use thiserror::Error as ThisError;

///
/// TokenError
///
/// Continuation token encode/decode failures. A corrupt token never resolves
/// to the first page; only an explicitly empty string does.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum TokenError {
    /// Not base64, too long, truncated, trailing bytes or an unknown tag.
    #[error("malformed continuation token: {reason}")]
    Malformed { reason: String },

    /// Digest present but does not match the recomputed digest.
    #[error("continuation token digest mismatch")]
    HashMismatch,

    /// Hashed token shorter than digest plus minimum payload.
    #[error("continuation token too short: {len} bytes (min {min})")]
    InsufficientLength { len: usize, min: usize },

    /// Well-formed token whose column arity or types disagree with the
    /// paginator's column model.
    #[error("continuation token does not match column model: {reason}")]
    SchemaMismatch { reason: String },

    /// A serializer stage failed while writing.
    #[error("failed to encode continuation token: {reason}")]
    Encode { reason: String },
}

impl TokenError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    pub(crate) fn schema_mismatch(reason: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            reason: reason.into(),
        }
    }

    pub(crate) fn encode(reason: impl Into<String>) -> Self {
        Self::Encode {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> TokenErrorKind {
        match self {
            Self::Malformed { .. } => TokenErrorKind::Malformed,
            Self::HashMismatch => TokenErrorKind::HashMismatch,
            Self::InsufficientLength { .. } => TokenErrorKind::InsufficientLength,
            Self::SchemaMismatch { .. } => TokenErrorKind::SchemaMismatch,
            Self::Encode { .. } => TokenErrorKind::Encode,
        }
    }
}

impl From<CodecError> for TokenError {
    fn from(err: CodecError) -> Self {
        Self::malformed(err.to_string())
    }
}

///
/// TokenErrorKind
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TokenErrorKind {
    Malformed,
    HashMismatch,
    InsufficientLength,
    SchemaMismatch,
    Encode,
}

impl TokenErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::HashMismatch => "hash_mismatch",
            Self::InsufficientLength => "insufficient_length",
            Self::SchemaMismatch => "schema_mismatch",
            Self::Encode => "encode",
        }
    }

    /// Token was intact but built for a different column model.
    #[must_use]
    pub const fn is_schema(self) -> bool {
        matches!(self, Self::SchemaMismatch)
    }
}

impl std::fmt::Display for TokenErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

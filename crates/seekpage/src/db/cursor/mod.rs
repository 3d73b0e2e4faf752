//! Module: db::cursor
//! Responsibility: continuation token model and its opaque text form.
//! Does not own: predicate construction or page execution.
//! Boundary: tokens are validated against a column schema on both encode
//! and decode.

mod codec;
mod error;
mod schema;
mod stream;

#[cfg(test)]
mod tests;

use crate::{db::ColumnDefinition, value::Value};

// re-exports
pub use codec::TokenCodec;
pub use error::{TokenError, TokenErrorKind};
pub use schema::{ColumnSchema, TokenSchema};
pub use stream::{
    BinaryStreamer, CompressingStreamer, HashingStreamer, MIN_HASHED_LEN, TokenStreamer,
};

///
/// ContinuationToken
///
/// Boundary row values captured in column order. `None` is the explicit
/// "apply no predicate" sentinel, not an absent token.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum ContinuationToken {
    #[default]
    None,
    Boundary(Vec<Value>),
}

impl ContinuationToken {
    /// Read every column accessor against `row`.
    #[must_use]
    pub fn capture<R>(row: &R, columns: &[ColumnDefinition<R>]) -> Self {
        Self::Boundary(columns.iter().map(|column| column.value(row)).collect())
    }

    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Captured values; empty for the `None` sentinel.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        match self {
            Self::None => &[],
            Self::Boundary(values) => values,
        }
    }
}

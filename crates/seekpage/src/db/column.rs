//! Module: db::column
//! Responsibility: ordered sort-column definitions and their row accessors.
//! Does not own: traversal direction resolution or token encoding.
//! Boundary: the column list is the single source of the token schema.

use crate::{
    db::{OrderDirection, cursor::TokenSchema},
    value::{Value, ValueEnum, ValueTag},
};
use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use std::{fmt, sync::Arc};
use uuid::Uuid;

/// Type-erased, thread-safe row accessor.
pub type RowAccessor<R> = Arc<dyn Fn(&R) -> Value + Send + Sync>;

///
/// ColumnValue
///
/// Rust types usable as a sort column. Each maps onto one static wire tag,
/// so a column's token schema is known before any row is read.
///

pub trait ColumnValue: Into<Value> {
    const TAG: ValueTag;

    /// Nullable columns may capture `Value::Null` in place of `TAG`.
    const NULLABLE: bool = false;
}

macro_rules! impl_column_value {
    ( $( $ty:ty => $tag:ident ),* $(,)? ) => {
        $(
            impl ColumnValue for $ty {
                const TAG: ValueTag = ValueTag::$tag;
            }
        )*
    };
}

impl_column_value! {
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

impl<T: ColumnValue> ColumnValue for Option<T> {
    const TAG: ValueTag = T::TAG;
    const NULLABLE: bool = true;
}

///
/// ColumnDefinition
///

pub struct ColumnDefinition<R> {
    name: String,
    ordinal: usize,
    direction: OrderDirection,
    tag: ValueTag,
    nullable: bool,
    accessor: RowAccessor<R>,
}

impl<R> ColumnDefinition<R> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zero-based position in the column list.
    #[must_use]
    pub const fn ordinal(&self) -> usize {
        self.ordinal
    }

    #[must_use]
    pub const fn direction(&self) -> OrderDirection {
        self.direction
    }

    #[must_use]
    pub const fn tag(&self) -> ValueTag {
        self.tag
    }

    #[must_use]
    pub const fn nullable(&self) -> bool {
        self.nullable
    }

    /// Read this column's value from one row.
    #[must_use]
    pub fn value(&self, row: &R) -> Value {
        (self.accessor)(row)
    }
}

impl<R> Clone for ColumnDefinition<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            ordinal: self.ordinal,
            direction: self.direction,
            tag: self.tag,
            nullable: self.nullable,
            accessor: Arc::clone(&self.accessor),
        }
    }
}

impl<R> fmt::Debug for ColumnDefinition<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDefinition")
            .field("name", &self.name)
            .field("ordinal", &self.ordinal)
            .field("direction", &self.direction)
            .field("tag", &self.tag)
            .field("nullable", &self.nullable)
            .finish_non_exhaustive()
    }
}

///
/// ColumnModel
///
/// Ordered sort columns defining a stable row ordering. The last column
/// should be unique per row; without it the ordering is not total and pages
/// can skip or repeat tied rows.
///

pub struct ColumnModel<R> {
    columns: Vec<ColumnDefinition<R>>,
}

impl<R> ColumnModel<R> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Append one column. Its ordinal is the current column count.
    pub fn add_column<T, F>(
        &mut self,
        name: impl Into<String>,
        direction: OrderDirection,
        accessor: F,
    ) -> &mut Self
    where
        T: ColumnValue,
        F: Fn(&R) -> T + Send + Sync + 'static,
    {
        self.columns.push(ColumnDefinition {
            name: name.into(),
            ordinal: self.columns.len(),
            direction,
            tag: T::TAG,
            nullable: T::NULLABLE,
            accessor: Arc::new(move |row: &R| -> Value { accessor(row).into() }),
        });

        self
    }

    #[must_use]
    pub fn asc<T, F>(mut self, name: impl Into<String>, accessor: F) -> Self
    where
        T: ColumnValue,
        F: Fn(&R) -> T + Send + Sync + 'static,
    {
        self.add_column(name, OrderDirection::Asc, accessor);
        self
    }

    #[must_use]
    pub fn desc<T, F>(mut self, name: impl Into<String>, accessor: F) -> Self
    where
        T: ColumnValue,
        F: Fn(&R) -> T + Send + Sync + 'static,
    {
        self.add_column(name, OrderDirection::Desc, accessor);
        self
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnDefinition<R>] {
        &self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Token schema derived from the current column list.
    #[must_use]
    pub fn schema(&self) -> TokenSchema {
        TokenSchema::from_columns(&self.columns)
    }
}

impl<R> Default for ColumnModel<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for ColumnModel<R> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
        }
    }
}

impl<R> fmt::Debug for ColumnModel<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.columns).finish()
    }
}

///
/// TESTS
///

use crate::{
    db::{ColumnDefinition, cursor::TokenError},
    value::{Value, ValueTag},
};
use std::fmt;

///
/// ColumnSchema
///
/// Wire expectation for one column: which tag the binary stage must find,
/// and whether a `Null` may stand in for it.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ColumnSchema {
    pub name: String,
    pub tag: ValueTag,
    pub nullable: bool,
}

impl ColumnSchema {
    #[must_use]
    pub fn new(name: impl Into<String>, tag: ValueTag, nullable: bool) -> Self {
        Self {
            name: name.into(),
            tag,
            nullable,
        }
    }

    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        let tag = value.tag();

        tag == self.tag || (self.nullable && tag == ValueTag::Null)
    }
}

impl fmt::Display for ColumnSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{}: {}?", self.name, self.tag)
        } else {
            write!(f, "{}: {}", self.name, self.tag)
        }
    }
}

///
/// TokenSchema
///
/// Ordered column expectations a token must satisfy, derived once from a
/// column model.
///

#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct TokenSchema {
    columns: Vec<ColumnSchema>,
}

impl TokenSchema {
    #[must_use]
    pub const fn new(columns: Vec<ColumnSchema>) -> Self {
        Self { columns }
    }

    pub(crate) fn from_columns<R>(columns: &[ColumnDefinition<R>]) -> Self {
        Self::new(
            columns
                .iter()
                .map(|column| ColumnSchema::new(column.name(), column.tag(), column.nullable()))
                .collect(),
        )
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Check arity and per-column tags of captured boundary values.
    pub fn validate(&self, values: &[Value]) -> Result<(), TokenError> {
        if values.len() != self.columns.len() {
            return Err(TokenError::schema_mismatch(format!(
                "expected {} columns, found {}",
                self.columns.len(),
                values.len()
            )));
        }

        for (column, value) in self.columns.iter().zip(values) {
            if !column.accepts(value) {
                return Err(TokenError::schema_mismatch(format!(
                    "column '{}' expects {}, found {}",
                    column.name,
                    column.tag,
                    value.tag()
                )));
            }
        }

        Ok(())
    }
}

impl fmt::Display for TokenSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (index, column) in self.columns.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{column}")?;
        }
        f.write_str(")")
    }
}

//! Module: db::predicate
//! Responsibility: keyset tie-break predicate construction and evaluation.
//! Does not own: ordering or row limits (see `db::source`).
//! Boundary: predicates reference columns by ordinal and name only, so a
//! source may evaluate them in memory or translate them to its own dialect.


use crate::{
    db::{ColumnDefinition, OrderDirection, cursor::TokenError},
    value::{Value, canonical_cmp},
};
use std::{
    cmp::Ordering,
    fmt,
    ops::{BitAnd, BitOr},
};

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum CompareOp {
    Eq = 0x01,
    Lt = 0x02,
    Gt = 0x03,
}

impl CompareOp {
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Gt => ">",
        }
    }

    /// Whether `ordering` (row value against the operand) satisfies this op.
    #[must_use]
    pub const fn matches(self, ordering: Ordering) -> bool {
        matches!(
            (self, ordering),
            (Self::Eq, Ordering::Equal) | (Self::Lt, Ordering::Less) | (Self::Gt, Ordering::Greater)
        )
    }
}

///
/// ComparePredicate
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComparePredicate {
    pub ordinal: usize,
    pub field: String,
    pub op: CompareOp,
    pub value: Value,
}

impl ComparePredicate {
    fn for_column<R>(column: &ColumnDefinition<R>, op: CompareOp, value: Value) -> Self {
        Self {
            ordinal: column.ordinal(),
            field: column.name().to_string(),
            op,
            value,
        }
    }

    fn eval<R>(&self, row: &R, columns: &[ColumnDefinition<R>]) -> bool {
        columns.get(self.ordinal).is_some_and(|column| {
            let ordering = canonical_cmp(&column.value(row), &self.value);
            self.op.matches(ordering)
        })
    }
}

impl fmt::Display for ComparePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.op.as_sql(), self.value)
    }
}

///
/// Predicate
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Predicate {
    And(Vec<Self>),
    Or(Vec<Self>),
    Compare(ComparePredicate),
}

impl Predicate {
    /// Evaluate against one row using the canonical comparator.
    ///
    /// A comparison naming an ordinal outside `columns` is false.
    #[must_use]
    pub fn eval<R>(&self, row: &R, columns: &[ColumnDefinition<R>]) -> bool {
        match self {
            Self::And(children) => children.iter().all(|child| child.eval(row, columns)),
            Self::Or(children) => children.iter().any(|child| child.eval(row, columns)),
            Self::Compare(compare) => compare.eval(row, columns),
        }
    }

    /// Number of comparison leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::And(children) | Self::Or(children) => children.iter().map(Self::leaf_count).sum(),
            Self::Compare(_) => 1,
        }
    }
}

impl BitAnd for Predicate {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::And(vec![self, rhs])
    }
}

impl BitOr for Predicate {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::Or(vec![self, rhs])
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (children, joiner) = match self {
            Self::Compare(compare) => return write!(f, "{compare}"),
            Self::And(children) => (children, " AND "),
            Self::Or(children) => (children, " OR "),
        };

        f.write_str("(")?;
        for (index, child) in children.iter().enumerate() {
            if index > 0 {
                f.write_str(joiner)?;
            }
            write!(f, "{child}")?;
        }
        f.write_str(")")
    }
}

/// Build the keyset tie-break chain selecting rows strictly beyond
/// `boundary` in the given physical sense.
///
/// ```text
/// P(n) = cₙ opₙ vₙ
/// P(i) = cᵢ opᵢ vᵢ OR (cᵢ = vᵢ AND P(i+1))
/// ```
///
/// `opᵢ` is `>` when the column's physical direction is ascending and `<`
/// otherwise. An empty boundary yields `None` (no filter).
pub fn keyset_predicate<R>(
    columns: &[ColumnDefinition<R>],
    boundary: &[Value],
    forward: bool,
) -> Result<Option<Predicate>, TokenError> {
    if boundary.is_empty() {
        return Ok(None);
    }
    if boundary.len() != columns.len() {
        return Err(TokenError::schema_mismatch(format!(
            "expected {} boundary values, found {}",
            columns.len(),
            boundary.len()
        )));
    }

    let mut chain: Option<Predicate> = None;
    for (column, value) in columns.iter().zip(boundary).rev() {
        let op = match column.direction().physical(forward) {
            OrderDirection::Asc => CompareOp::Gt,
            OrderDirection::Desc => CompareOp::Lt,
        };
        let strict = Predicate::Compare(ComparePredicate::for_column(column, op, value.clone()));

        chain = Some(match chain {
            None => strict,
            Some(rest) => {
                let tie = Predicate::Compare(ComparePredicate::for_column(
                    column,
                    CompareOp::Eq,
                    value.clone(),
                ));
                strict | (tie & rest)
            }
        });
    }

    Ok(chain)
}

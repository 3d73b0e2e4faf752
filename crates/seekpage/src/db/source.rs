//! Module: db::source
//! Responsibility: the ordered-sequence collaborator contract.
//! Does not own: predicate construction or boundary detection.
//! Boundary: a source returns at most `limit` rows, filtered by the
//! predicate, in the requested physical order.

use crate::db::{ColumnDefinition, OrderDirection, predicate::Predicate};
use std::{cmp::Ordering, convert::Infallible, fmt};

///
/// SortKey
///
/// One column of the physical ordering sent to a source.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SortKey {
    pub ordinal: usize,
    pub field: String,
    pub direction: OrderDirection,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.direction.as_sql())
    }
}

///
/// SourceQuery
///
/// Ordering, predicate and row limit for one fetch.
///

pub struct SourceQuery<'a, R> {
    columns: &'a [ColumnDefinition<R>],
    ordering: Vec<SortKey>,
    predicate: Option<Predicate>,
    limit: usize,
}

impl<'a, R> SourceQuery<'a, R> {
    /// Query over `columns` in the given physical sense.
    pub(crate) fn new(
        columns: &'a [ColumnDefinition<R>],
        forward: bool,
        predicate: Option<Predicate>,
        limit: usize,
    ) -> Self {
        let ordering = columns
            .iter()
            .map(|column| SortKey {
                ordinal: column.ordinal(),
                field: column.name().to_string(),
                direction: column.direction().physical(forward),
            })
            .collect();

        Self {
            columns,
            ordering,
            predicate,
            limit,
        }
    }

    #[must_use]
    pub const fn columns(&self) -> &'a [ColumnDefinition<R>] {
        self.columns
    }

    #[must_use]
    pub fn ordering(&self) -> &[SortKey] {
        &self.ordering
    }

    #[must_use]
    pub const fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Whether `row` passes the predicate. No predicate passes every row.
    #[must_use]
    pub fn matches(&self, row: &R) -> bool {
        self.predicate
            .as_ref()
            .is_none_or(|predicate| predicate.eval(row, self.columns))
    }

    /// Compare two rows under the requested physical ordering.
    #[must_use]
    pub fn compare(&self, left: &R, right: &R) -> Ordering {
        for key in &self.ordering {
            let Some(column) = self.columns.get(key.ordinal) else {
                continue;
            };
            let ordering = key
                .direction
                .apply(column.value(left).cmp(&column.value(right)));
            if ordering != Ordering::Equal {
                return ordering;
            }
        }

        Ordering::Equal
    }

    /// Filter, bound and order owned rows the way a source must.
    pub fn apply(&self, rows: impl IntoIterator<Item = R>) -> Vec<R> {
        let mut rows: Vec<R> = rows.into_iter().filter(|row| self.matches(row)).collect();
        self.sort_and_limit(&mut rows);

        rows
    }

    /// Keep the first `limit` already-filtered rows in physical order.
    ///
    /// Selects the top-k set first, then sorts only that prefix.
    pub fn sort_and_limit(&self, rows: &mut Vec<R>) {
        let keep_count = self.limit;
        if keep_count == 0 {
            rows.clear();
            return;
        }

        if rows.len() > keep_count {
            rows.select_nth_unstable_by(keep_count - 1, |left, right| self.compare(left, right));
            rows.truncate(keep_count);
        }

        rows.sort_by(|left, right| self.compare(left, right));
    }
}

impl<R> fmt::Display for SourceQuery<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(predicate) = &self.predicate {
            write!(f, "WHERE {predicate} ")?;
        }
        f.write_str("ORDER BY ")?;
        for (index, key) in self.ordering.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}")?;
        }
        write!(f, " LIMIT {}", self.limit)
    }
}

///
/// OrderedSource
///
/// External ordered-sequence collaborator. Implementations must honour the
/// query's predicate, ordering and limit; returning more rows than the limit
/// is a contract violation the paginator reports.
///

pub trait OrderedSource<R> {
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch(&self, query: &SourceQuery<'_, R>) -> Result<Vec<R>, Self::Error>;
}

impl<R: Clone> OrderedSource<R> for [R] {
    type Error = Infallible;

    fn fetch(&self, query: &SourceQuery<'_, R>) -> Result<Vec<R>, Self::Error> {
        let mut rows: Vec<R> = self.iter().filter(|row| query.matches(row)).cloned().collect();
        query.sort_and_limit(&mut rows);

        Ok(rows)
    }
}

impl<R: Clone> OrderedSource<R> for Vec<R> {
    type Error = Infallible;

    fn fetch(&self, query: &SourceQuery<'_, R>) -> Result<Vec<R>, Self::Error> {
        self.as_slice().fetch(query)
    }
}

///
/// TESTS
///

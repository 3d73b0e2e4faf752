use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

///
/// OrderDirection
///
/// Per-column sort direction in the configured (natural) order.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Resolve the direction actually sent to the source for one request.
    ///
    /// A backward physical sense inverts every column.
    #[must_use]
    pub const fn physical(self, forward: bool) -> Self {
        if forward { self } else { self.reversed() }
    }

    /// Apply this direction to an ascending comparison result.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }

    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

///
/// PaginationDirection
///
/// Traversal sense a paginator uses for `NextPage` when no other intent
/// applies. `Backward` walks the configured order from its far end.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationDirection {
    #[default]
    Forward,
    Backward,
}

///
/// ContinuationIntent
///
/// Per-request navigation choice, relative to the captured boundary row.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ContinuationIntent {
    NextPage,
    PreviousPage,
}

impl ContinuationIntent {
    /// Physical traversal sense for this intent under `direction`.
    ///
    /// `true` means rows after the reference in the configured column order.
    #[must_use]
    pub const fn is_forward(self, direction: PaginationDirection) -> bool {
        matches!(
            (self, direction),
            (Self::NextPage, PaginationDirection::Forward)
                | (Self::PreviousPage, PaginationDirection::Backward)
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NextPage => "next",
            Self::PreviousPage => "previous",
        }
    }
}

///
/// TESTS
///

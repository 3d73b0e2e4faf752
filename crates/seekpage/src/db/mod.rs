//! Keyset pagination engine.
//!
//! Leaf-first: direction vocabulary, column model, continuation tokens and
//! their serializer, the keyset predicate builder, the ordered-source
//! collaborator contract and finally the paginator that ties them together.

mod column;
pub mod cursor;
mod direction;
pub mod predicate;
mod source;

mod paginator;

// re-exports
pub use column::{ColumnDefinition, ColumnModel, ColumnValue, RowAccessor};
pub use cursor::{ContinuationToken, TokenCodec, TokenError, TokenErrorKind};
pub use direction::{ContinuationIntent, OrderDirection, PaginationDirection};
pub use paginator::{Page, Paginator, PaginatorBuilder};
pub use predicate::{CompareOp, ComparePredicate, Predicate, keyset_predicate};
pub use source::{OrderedSource, SortKey, SourceQuery};

//! Keyset (cursor) pagination: ordered multi-column paging with opaque,
//! tamper-evident continuation tokens.
//!
//! A [`Paginator`](db::Paginator) pages forward and backward through any
//! [`OrderedSource`](db::OrderedSource) without row offsets. Each page
//! carries tokens that capture its boundary rows' sort-column values.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod db;
pub mod error;
pub mod obs;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Length of the digest prefixed to hashed tokens.
pub const HASH_DIGEST_LEN: usize = 16;

///
/// Prelude
///
/// Paging vocabulary only. Codec stages and metrics stay one level down.
///

pub mod prelude {
    pub use crate::{
        config::{PaginationConfig, TokenOptions},
        db::{
            ColumnModel, ContinuationIntent, ContinuationToken, OrderDirection, OrderedSource,
            Page, PaginationDirection, Paginator, SourceQuery,
        },
        error::EngineError,
        value::Value,
    };
}

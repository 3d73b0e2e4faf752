//! Module: db::paginator
//! Responsibility: page orchestration over an ordered source.
//! Does not own: row storage, the token wire format, or predicate shape.
//! Boundary: one `get_page` call is a pure function of the request and the
//! source's contents; nothing is carried between calls except the seal.

mod page;


use crate::{
    config::{PaginationConfig, TokenOptions},
    db::{
        ColumnModel, ColumnValue, ContinuationIntent, OrderDirection, PaginationDirection,
        cursor::{ContinuationToken, TokenCodec},
        keyset_predicate,
        predicate::Predicate,
        source::{OrderedSource, SourceQuery},
    },
    error::{EngineError, ErrorOrigin},
    obs::sink::{MetricsEvent, record},
    value::{TaggedValueCodec, ValueCodec},
};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering as AtomicOrdering},
};
use tracing::{debug, warn};

// re-exports
pub use page::Page;

///
/// Paginator
///
/// Keyset paginator over a fixed column model.
///
/// The column model may grow through [`Paginator::add_column`] until the
/// first page request seals it. Sealed paginators are immutable and safe to
/// share across threads.
///

pub struct Paginator<R> {
    columns: ColumnModel<R>,
    config: PaginationConfig,
    value_codec: Arc<dyn ValueCodec>,
    codec: TokenCodec,
    sealed: AtomicBool,
}

impl<R> Paginator<R> {
    /// Create a paginator over `columns`.
    pub fn new(columns: ColumnModel<R>, config: PaginationConfig) -> Result<Self, EngineError> {
        Self::with_value_codec(columns, config, Arc::new(TaggedValueCodec))
    }

    /// Create a paginator whose tokens use a caller-supplied value codec.
    pub fn with_value_codec(
        columns: ColumnModel<R>,
        config: PaginationConfig,
        value_codec: Arc<dyn ValueCodec>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        if columns.is_empty() {
            return Err(EngineError::configuration(
                ErrorOrigin::Column,
                "column model must contain at least one column",
            ));
        }

        let codec = TokenCodec::with_codec(columns.schema(), config.token, Arc::clone(&value_codec));

        Ok(Self {
            columns,
            config,
            value_codec,
            codec,
            sealed: AtomicBool::new(false),
        })
    }

    #[must_use]
    pub fn builder() -> PaginatorBuilder<R> {
        PaginatorBuilder::new()
    }

    /// Append a sort column. Fails once a page has been requested.
    pub fn add_column<T, F>(
        &mut self,
        name: impl Into<String>,
        direction: OrderDirection,
        accessor: F,
    ) -> Result<&mut Self, EngineError>
    where
        T: ColumnValue,
        F: Fn(&R) -> T + Send + Sync + 'static,
    {
        if *self.sealed.get_mut() {
            return Err(EngineError::configuration(
                ErrorOrigin::Column,
                "column model is sealed after the first page request",
            ));
        }

        self.columns.add_column(name, direction, accessor);
        self.codec = TokenCodec::with_codec(
            self.columns.schema(),
            self.config.token,
            Arc::clone(&self.value_codec),
        );

        Ok(self)
    }

    #[must_use]
    pub const fn columns(&self) -> &ColumnModel<R> {
        &self.columns
    }

    #[must_use]
    pub const fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Token codec bound to this paginator's column schema.
    #[must_use]
    pub const fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(AtomicOrdering::Acquire)
    }

    /// Fetch one page relative to `token`.
    ///
    /// `None` and the empty string both mean "no boundary": `NextPage`
    /// then starts at the beginning of the traversal order and
    /// `PreviousPage` at its end.
    pub fn get_page<S>(
        &self,
        source: &S,
        token: Option<&str>,
        intent: ContinuationIntent,
        page_size: usize,
    ) -> Result<Page<R>, EngineError>
    where
        S: OrderedSource<R> + ?Sized,
    {
        self.validate_page_size(page_size)?;
        self.sealed.store(true, AtomicOrdering::Release);
        record(MetricsEvent::PageStart { intent });

        let token_text = token.unwrap_or_default();
        let reference = self.decode_request_token(token_text)?;
        let forward = intent.is_forward(self.config.direction);

        // Travel side: one spare row past the page tells whether more follow.
        let predicate = keyset_predicate(self.columns.columns(), reference.values(), forward)?;
        let mut rows = self.fetch(source, forward, predicate, page_size.saturating_add(1))?;
        let spare = rows.len() > page_size;
        rows.truncate(page_size);

        // Opposite side: nothing precedes an unfiltered request.
        let behind = if reference.is_none() {
            false
        } else {
            let anchor = rows.first().map_or_else(
                || reference.clone(),
                |row| ContinuationToken::capture(row, self.columns.columns()),
            );
            self.probe(source, &anchor, !forward)?
        };

        let (has_next, has_previous) = match intent {
            ContinuationIntent::NextPage => (spare, behind),
            ContinuationIntent::PreviousPage => (behind, spare),
        };

        if intent == ContinuationIntent::PreviousPage {
            rows.reverse();
        }

        let (next_token, previous_token) = match (rows.first(), rows.last()) {
            (Some(first), Some(last)) => (
                self.encode_token(&self.capture_token(last))?,
                self.encode_token(&self.capture_token(first))?,
            ),
            _ => (token_text.to_string(), token_text.to_string()),
        };

        debug!(
            intent = intent.as_str(),
            forward,
            page_size,
            rows = rows.len(),
            has_next,
            has_previous,
            "page served"
        );
        record(MetricsEvent::PageFinish {
            intent,
            rows: rows.len() as u64,
        });

        Ok(Page::new(
            rows,
            next_token,
            previous_token,
            has_next,
            has_previous,
        ))
    }

    /// First page in the traversal order.
    pub fn first_page<S>(&self, source: &S, page_size: usize) -> Result<Page<R>, EngineError>
    where
        S: OrderedSource<R> + ?Sized,
    {
        self.get_page(source, None, ContinuationIntent::NextPage, page_size)
    }

    /// Last page in the traversal order, evaluated under the inverted sense.
    pub fn last_page<S>(&self, source: &S, page_size: usize) -> Result<Page<R>, EngineError>
    where
        S: OrderedSource<R> + ?Sized,
    {
        self.get_page(source, None, ContinuationIntent::PreviousPage, page_size)
    }

    /// Sentinel text for the first page; pass it with `NextPage`.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn encode_first_page(&self) -> String {
        String::new()
    }

    /// Sentinel text for the last page; pass it with `PreviousPage`.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn encode_last_page(&self) -> String {
        String::new()
    }

    #[must_use]
    pub fn capture_token(&self, row: &R) -> ContinuationToken {
        ContinuationToken::capture(row, self.columns.columns())
    }

    pub fn encode_token(&self, token: &ContinuationToken) -> Result<String, EngineError> {
        self.codec.serialize(token).map_err(EngineError::from)
    }

    pub fn decode_token(&self, text: &str) -> Result<ContinuationToken, EngineError> {
        self.codec.deserialize(text).map_err(EngineError::from)
    }

    #[must_use]
    pub fn try_decode_token(&self, text: &str) -> Option<ContinuationToken> {
        self.codec.try_deserialize(text)
    }

    fn validate_page_size(&self, page_size: usize) -> Result<(), EngineError> {
        if page_size == 0 || page_size > self.config.max_page_size {
            return Err(EngineError::configuration(
                ErrorOrigin::Paginator,
                format!(
                    "page size {page_size} outside 1..={}",
                    self.config.max_page_size
                ),
            ));
        }

        Ok(())
    }

    fn decode_request_token(&self, text: &str) -> Result<ContinuationToken, EngineError> {
        match self.codec.deserialize(text) {
            Ok(token) => {
                if !token.is_none() {
                    record(MetricsEvent::TokenDecoded);
                }
                Ok(token)
            }
            Err(err) => {
                let kind = err.kind();
                warn!(kind = kind.as_str(), error = %err, "continuation token rejected");
                record(MetricsEvent::TokenRejected { kind });

                Err(err.into())
            }
        }
    }

    fn fetch<S>(
        &self,
        source: &S,
        forward: bool,
        predicate: Option<Predicate>,
        limit: usize,
    ) -> Result<Vec<R>, EngineError>
    where
        S: OrderedSource<R> + ?Sized,
    {
        let query = SourceQuery::new(self.columns.columns(), forward, predicate, limit);
        let rows = source
            .fetch(&query)
            .map_err(|err| EngineError::source_failed(format!("source fetch failed: {err}")))?;

        if rows.len() > limit {
            return Err(EngineError::source_invariant(format!(
                "source returned {} rows for limit {limit}",
                rows.len()
            )));
        }
        record(MetricsEvent::SourceFetch {
            rows: rows.len() as u64,
        });

        Ok(rows)
    }

    // One-row existence check strictly beyond `anchor` in the given sense.
    fn probe<S>(
        &self,
        source: &S,
        anchor: &ContinuationToken,
        forward: bool,
    ) -> Result<bool, EngineError>
    where
        S: OrderedSource<R> + ?Sized,
    {
        let predicate = keyset_predicate(self.columns.columns(), anchor.values(), forward)?;
        let found = !self.fetch(source, forward, predicate, 1)?.is_empty();
        record(MetricsEvent::BoundaryProbe { found });

        Ok(found)
    }
}

impl<R> std::fmt::Debug for Paginator<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("columns", &self.columns)
            .field("config", &self.config)
            .field("sealed", &self.is_sealed())
            .finish_non_exhaustive()
    }
}

///
/// PaginatorBuilder
///

pub struct PaginatorBuilder<R> {
    columns: ColumnModel<R>,
    config: PaginationConfig,
    value_codec: Arc<dyn ValueCodec>,
}

impl<R> PaginatorBuilder<R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: ColumnModel::new(),
            config: PaginationConfig::new(),
            value_codec: Arc::new(TaggedValueCodec),
        }
    }

    #[must_use]
    pub fn asc<T, F>(mut self, name: impl Into<String>, accessor: F) -> Self
    where
        T: ColumnValue,
        F: Fn(&R) -> T + Send + Sync + 'static,
    {
        self.columns.add_column(name, OrderDirection::Asc, accessor);
        self
    }

    #[must_use]
    pub fn desc<T, F>(mut self, name: impl Into<String>, accessor: F) -> Self
    where
        T: ColumnValue,
        F: Fn(&R) -> T + Send + Sync + 'static,
    {
        self.columns.add_column(name, OrderDirection::Desc, accessor);
        self
    }

    #[must_use]
    pub fn config(mut self, config: PaginationConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn direction(mut self, direction: PaginationDirection) -> Self {
        self.config.direction = direction;
        self
    }

    #[must_use]
    pub fn token_options(mut self, token: TokenOptions) -> Self {
        self.config.token = token;
        self
    }

    #[must_use]
    pub fn value_codec(mut self, value_codec: Arc<dyn ValueCodec>) -> Self {
        self.value_codec = value_codec;
        self
    }

    pub fn build(self) -> Result<Paginator<R>, EngineError> {
        Paginator::with_value_codec(self.columns, self.config, self.value_codec)
    }
}

impl<R> Default for PaginatorBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}

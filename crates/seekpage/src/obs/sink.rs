//! Metrics sink boundary.
//!
//! Pagination logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only allowed bridge between paging logic and the
//! thread-local metrics state.

use crate::{
    db::{ContinuationIntent, cursor::TokenErrorKind},
    obs::metrics,
};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = const { RefCell::new(None) };
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    PageStart {
        intent: ContinuationIntent,
    },
    PageFinish {
        intent: ContinuationIntent,
        rows: u64,
    },
    SourceFetch {
        rows: u64,
    },
    BoundaryProbe {
        found: bool,
    },
    TokenDecoded,
    TokenRejected {
        kind: TokenErrorKind,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::PageStart { intent } => {
                metrics::with_state_mut(|m| metrics::record_page_start(m, intent));
            }

            MetricsEvent::PageFinish { rows, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.pages_completed = m.ops.pages_completed.saturating_add(1);
                    m.ops.rows_returned = m.ops.rows_returned.saturating_add(rows);
                });
            }

            MetricsEvent::SourceFetch { rows } => {
                metrics::with_state_mut(|m| {
                    m.ops.source_fetches = m.ops.source_fetches.saturating_add(1);
                    m.ops.rows_fetched = m.ops.rows_fetched.saturating_add(rows);
                });
            }

            MetricsEvent::BoundaryProbe { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.boundary_probes = m.ops.boundary_probes.saturating_add(1);
                });
            }

            MetricsEvent::TokenDecoded => {
                metrics::with_state_mut(|m| {
                    m.ops.tokens_decoded = m.ops.tokens_decoded.saturating_add(1);
                });
            }

            MetricsEvent::TokenRejected { kind } => {
                metrics::with_state_mut(|m| {
                    m.ops.tokens_rejected = m.ops.tokens_rejected.saturating_add(1);
                    let entry = m.rejections.entry(kind.as_str().to_string()).or_default();
                    *entry = entry.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    // Clone out of the slot so a sink may itself install an override.
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current thread's metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state for the current thread.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
///
/// The previous sink is restored on every exit, including unwind.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

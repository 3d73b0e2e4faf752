use crate::db::ContinuationIntent;
use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for pagination activity.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,

    /// Token rejections keyed by `TokenErrorKind::as_str`.
    pub rejections: BTreeMap<String, u64>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Page entrypoints
    pub page_calls: u64,
    pub next_page_calls: u64,
    pub previous_page_calls: u64,
    pub pages_completed: u64,

    // Rows
    pub rows_returned: u64,
    pub rows_fetched: u64,

    // Source traffic
    pub source_fetches: u64,
    pub boundary_probes: u64,

    // Tokens
    pub tokens_decoded: u64,
    pub tokens_rejected: u64,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

pub(crate) fn record_page_start(m: &mut EventState, intent: ContinuationIntent) {
    m.ops.page_calls = m.ops.page_calls.saturating_add(1);
    match intent {
        ContinuationIntent::NextPage => {
            m.ops.next_page_calls = m.ops.next_page_calls.saturating_add(1);
        }
        ContinuationIntent::PreviousPage => {
            m.ops.previous_page_calls = m.ops.previous_page_calls.saturating_add(1);
        }
    }
}

///
/// EventReport
/// Counter snapshot plus derived averages.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    pub counters: EventState,
    pub avg_rows_per_page: f64,
    pub avg_source_fetches_per_page: f64,
}

/// Build a report from the in-memory counters.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub(crate) fn report() -> EventReport {
    let counters = with_state(Clone::clone);
    let pages = counters.ops.pages_completed;

    let (avg_rows_per_page, avg_source_fetches_per_page) = if pages > 0 {
        (
            counters.ops.rows_returned as f64 / pages as f64,
            counters.ops.source_fetches as f64 / pages as f64,
        )
    } else {
        (0.0, 0.0)
    };

    EventReport {
        counters,
        avg_rows_per_page,
        avg_source_fetches_per_page,
    }
}

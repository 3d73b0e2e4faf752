//! Observability: pagination telemetry and sink abstractions.
//!
//! Counters are process-local and per thread. Nothing here is read back by
//! the engine; the paginator only emits events.

pub(crate) mod metrics;
pub(crate) mod sink;


// re-exports
pub use metrics::{EventOps, EventReport, EventState};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};

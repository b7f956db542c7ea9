//! Metrics collection abstraction for the control plane.
//!
//! Every API operation reports here. Backends (prometheus, statsd, etc)
//! implement [`ControlMetrics`] and are injected into
//! [`crate::ControlApi`] as a [`MetricsHandle`].
mod backend;
pub use backend::{ControlMetrics, MetricsHandle, OpOutcome};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}

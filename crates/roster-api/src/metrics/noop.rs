use crate::metrics::backend::{ControlMetrics, OpOutcome};

/// No-op metrics backend that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl ControlMetrics for NoOpMetrics {
    #[inline(always)]
    fn record_op(&self, _: &'static str, _: OpOutcome, _: u64) {}

    #[inline(always)]
    fn record_ticket(&self, _: &'static str, _: &'static str) {}

    #[inline(always)]
    fn record_fanout(&self, _: bool) {}
}

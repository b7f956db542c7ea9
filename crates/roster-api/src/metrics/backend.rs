use std::sync::Arc;

/// Operation outcome for metrics classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpOutcome {
    /// Operation completed.
    Ok,
    /// Operation targeted an entity that does not exist.
    NotFound,
    /// Operation failed.
    Error,
}

impl OpOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            OpOutcome::Ok => "ok",
            OpOutcome::NotFound => "not_found",
            OpOutcome::Error => "error",
        }
    }
}

/// Backend metrics collection interface.
///
/// This trait abstracts metrics collection across different backends.
/// Implementations are injected into [`crate::ControlApi`] and called once
/// per served operation.
pub trait ControlMetrics: Send + Sync + 'static {
    /// Record one finished control-plane operation.
    ///
    /// # Arguments
    /// - `op`: Operation name (`create_job`, `list_nodes`, ...)
    /// - `outcome`: How the operation ended
    /// - `duration_ms`: Time to serve it in milliseconds
    fn record_op(&self, op: &'static str, outcome: OpOutcome, duration_ms: u64);

    /// Record a ticket moving through one of the job queues.
    ///
    /// # Arguments
    /// - `queue`: `pending` or `killed`
    /// - `action`: `pushed`, `removed` or `cleared`
    fn record_ticket(&self, queue: &'static str, action: &'static str);

    /// Record one container-cleanup request sent to a node agent.
    ///
    /// # Arguments
    /// - `success`: Whether the agent acknowledged the deletion
    fn record_fanout(&self, success: bool);
}

/// Shared handle to metrics backend.
///
/// Cloned into [`crate::ControlApi`]; wiring decides the implementation.
pub type MetricsHandle = Arc<dyn ControlMetrics>;

use std::sync::Arc;

use prometheus::{CounterVec, HistogramVec, Opts, Registry, proto::MetricFamily};

use roster_api::{ControlMetrics, OpOutcome};

/// Prometheus metrics backend for the control plane.
///
/// Implements [`ControlMetrics`] and exposes prometheus metrics that can be
/// scraped via an HTTP endpoint.
///
/// ## Metrics
/// - `roster_control_ops_total{op, outcome}` - Counter of served operations
/// - `roster_control_op_duration_seconds{op}` - Histogram of serve time
/// - `roster_job_tickets_total{queue, action}` - Counter of ticket moves
/// - `roster_container_cleanups_total{outcome}` - Counter of fan-out requests
///
/// ## Label cardinality
/// All labels are bounded (low cardinality):
/// - `op`: fixed operation names ("create_job", "list_nodes", ...)
/// - `outcome`: "ok", "not_found", "error"
/// - `queue`: "pending", "killed"
/// - `action`: "pushed", "removed", "cleared"
#[derive(Clone)]
pub struct PrometheusMetrics {
    ops: CounterVec,
    op_duration: HistogramVec,
    tickets: CounterVec,
    cleanups: CounterVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Create a new prometheus metrics backend with custom registry.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let ops = CounterVec::new(
            Opts::new("control_ops_total", "Total control operations served").namespace("roster"),
            &["op", "outcome"],
        )?;
        registry.register(Box::new(ops.clone()))?;

        let op_duration = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "control_op_duration_seconds",
                "Control operation serve time in seconds",
            )
            .namespace("roster")
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0]),
            &["op"],
        )?;
        registry.register(Box::new(op_duration.clone()))?;

        let tickets = CounterVec::new(
            Opts::new("job_tickets_total", "Total job ticket queue transitions")
                .namespace("roster"),
            &["queue", "action"],
        )?;
        registry.register(Box::new(tickets.clone()))?;

        let cleanups = CounterVec::new(
            Opts::new(
                "container_cleanups_total",
                "Total container cleanup requests sent to node agents",
            )
            .namespace("roster"),
            &["outcome"],
        )?;
        registry.register(Box::new(cleanups.clone()))?;

        Ok(Self {
            ops,
            op_duration,
            tickets,
            cleanups,
            registry,
        })
    }

    /// Create a new prometheus metrics backend with default registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    /// Gather all metrics for exposition.
    ///
    /// Use this to implement the `/metrics` HTTP endpoint.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Get reference to underlying prometheus registry.
    ///
    /// Useful for registering custom metrics alongside control-plane ones.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl ControlMetrics for PrometheusMetrics {
    fn record_op(&self, op: &'static str, outcome: OpOutcome, duration_ms: u64) {
        self.ops.with_label_values(&[op, outcome.as_label()]).inc();

        let duration_seconds = duration_ms as f64 / 1000.0;
        self.op_duration
            .with_label_values(&[op])
            .observe(duration_seconds);
    }

    fn record_ticket(&self, queue: &'static str, action: &'static str) {
        self.tickets.with_label_values(&[queue, action]).inc();
    }

    fn record_fanout(&self, success: bool) {
        let outcome = if success { "ok" } else { "error" };
        self.cleanups.with_label_values(&[outcome]).inc();
    }
}

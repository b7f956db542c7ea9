//! Prometheus metrics backend for the cluster control plane.
//!
//! This crate provides a [`PrometheusMetrics`] implementation of
//! [`roster_api::ControlMetrics`] that exposes metrics in Prometheus format.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use roster_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let handle: roster_api::MetricsHandle = Arc::new(metrics.clone());
//! // Hand `handle` to `ControlApi::with_metrics`; keep `metrics` around
//! // for the /metrics exposition endpoint.
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `roster_control_ops_total{op, outcome}` - Counter
//! - `roster_control_op_duration_seconds{op}` - Histogram
//! - `roster_job_tickets_total{queue, action}` - Counter
//! - `roster_container_cleanups_total{outcome}` - Counter
//!
//! ## HTTP Server
//! This crate does NOT provide an HTTP server for the `/metrics` endpoint.
//! Encode [`PrometheusMetrics::gather`] output with a [`TextEncoder`] from
//! whatever HTTP framework serves the control plane.

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};

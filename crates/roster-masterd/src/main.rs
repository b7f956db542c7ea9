mod config;
mod shutdown;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::{info, warn};

use roster_api::{ControlApi, HttpAgentClient, HttpApi};
use roster_model::{ApiServer, ClusterRecord, Connection};
use roster_observe::{init_local_offset, init_logging};
use roster_prometheus::{Encoder, PrometheusMetrics, TextEncoder};
use roster_store::{ClusterStore, MemoryBackend};

use crate::config::MasterdConfig;
use crate::shutdown::install_shutdown_handler;

fn main() -> anyhow::Result<()> {
    // 1) config
    let config = load_config()?;

    // 2) logging; the local offset must be captured before worker threads exist
    init_local_offset();
    init_logging(&config.logging)?;
    info!(cluster = %config.cluster_name, "master daemon starting");

    // 3) runtime
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building the async runtime")?;
    runtime.block_on(run(config))
}

/// Config path comes from argv[1], then `ROSTER_MASTERD_CONFIG`; with
/// neither set the daemon starts on defaults.
fn load_config() -> anyhow::Result<MasterdConfig> {
    let path = std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os("ROSTER_MASTERD_CONFIG"));
    match path {
        Some(path) => MasterdConfig::load(Path::new(&path)),
        None => Ok(MasterdConfig::default()),
    }
}

async fn run(config: MasterdConfig) -> anyhow::Result<()> {
    // 1) store
    let store = ClusterStore::new(Arc::new(MemoryBackend::new()), config.cluster_name.clone());
    seed_records(&store, &config).await?;

    // 2) metrics
    let metrics = PrometheusMetrics::new().context("registering prometheus metrics")?;

    // 3) control service
    let agents = HttpAgentClient::new(config.fanout.request_timeout())?;
    let api = ControlApi::new(store, Arc::new(agents))
        .with_metrics(Arc::new(metrics.clone()))
        .with_fanout(config.fanout.clone());

    // 4) http surface
    let router = HttpApi::new(Arc::new(api))
        .router()
        .merge(observability_router(Arc::new(metrics)));

    // 5) serve until a signal lands
    let shutdown = install_shutdown_handler()?;
    let addr = config.bind.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "control plane listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("serving the control plane")?;

    info!("master daemon stopped");
    Ok(())
}

/// Write the cluster record (and the master record when provisioned) so
/// joining nodes can read them back through the API.
async fn seed_records(store: &ClusterStore, config: &MasterdConfig) -> anyhow::Result<()> {
    let cluster = ClusterRecord {
        name: config.cluster_name.clone(),
        mode: config.mode.clone(),
        connection: Connection {
            api_server: ApiServer {
                port: config.bind.port,
            },
        },
        extra: serde_json::Map::new(),
    };
    store.set_cluster_details(&cluster).await?;

    if let Some(master) = &config.master {
        store.set_master_details(master).await?;
        info!(hostname = %master.hostname, "master record seeded");
    }
    Ok(())
}

fn observability_router(metrics: Arc<PrometheusMetrics>) -> Router {
    Router::new()
        .route("/metrics", get(serve_metrics))
        .with_state(metrics)
}

/// GET /metrics
async fn serve_metrics(State(metrics): State<Arc<PrometheusMetrics>>) -> Response {
    let families = metrics.gather();
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&families, &mut buffer) {
        warn!(error = %err, "metrics encoding failed");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    (
        [(header::CONTENT_TYPE, encoder.format_type().to_string())],
        buffer,
    )
        .into_response()
}

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use roster_model::{JobRecord, NodeRecord};

use crate::{control::StatusReport, error::ApiError, handler::ControlHandler};

/// HTTP control surface builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
}

impl<H> HttpApi<H>
where
    H: ControlHandler,
{
    /// Create new HTTP API with the given handler.
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Build axum router with mounted endpoints.
    ///
    /// Routes:
    /// - GET /status - liveness probe, unversioned
    /// - GET/POST /v1/nodes - list node records / register a node
    /// - GET/DELETE /v1/nodes/{name} - one node record / deregister it
    /// - GET/POST /v1/jobs - list job records / create a job
    /// - GET/DELETE /v1/jobs/{name} - one job record / request teardown
    /// - POST /v1/jobs:clean - reset ticket queues, sweep containers
    /// - GET /v1/cluster - cluster record
    /// - GET /v1/master - master record
    /// - GET /v1/containers - containers across all nodes
    pub fn router(self) -> Router {
        Router::new()
            .route("/status", get(status))
            .route("/v1/nodes", get(list_nodes::<H>))
            .route("/v1/nodes", post(create_node::<H>))
            .route("/v1/nodes/{name}", get(get_node::<H>))
            .route("/v1/nodes/{name}", delete(delete_node::<H>))
            .route("/v1/jobs", get(list_jobs::<H>))
            .route("/v1/jobs", post(create_job::<H>))
            .route("/v1/jobs/{name}", get(get_job::<H>))
            .route("/v1/jobs/{name}", delete(delete_job::<H>))
            .route("/v1/jobs:clean", post(clean_jobs::<H>))
            .route("/v1/cluster", get(get_cluster::<H>))
            .route("/v1/master", get(get_master::<H>))
            .route("/v1/containers", get(list_containers::<H>))
            .with_state(self.handler)
    }
}

/// Decode a JSON body into a record type; shape errors map to 400.
fn decode<T: DeserializeOwned>(what: &str, body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|err| ApiError::InvalidRequest(format!("{what}: {err}")))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /status
async fn status() -> impl IntoResponse {
    Json(StatusReport::now())
}

/// GET /v1/nodes
async fn list_nodes<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ControlHandler,
{
    let nodes = handler.list_nodes().await?;
    Ok(Json(nodes))
}

/// POST /v1/nodes
async fn create_node<H>(
    State(handler): State<Arc<H>>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ControlHandler,
{
    let details: NodeRecord = decode("node record", body)?;
    handler.create_node(details).await?;
    Ok(Json(json!({})))
}

/// GET /v1/nodes/{name}
async fn get_node<H>(
    State(handler): State<Arc<H>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ControlHandler,
{
    let node = handler.get_node(&name).await?;
    Ok(Json(node))
}

/// DELETE /v1/nodes/{name}
async fn delete_node<H>(
    State(handler): State<Arc<H>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ControlHandler,
{
    handler.delete_node(&name).await?;
    Ok(Json(json!({})))
}

/// GET /v1/jobs
async fn list_jobs<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ControlHandler,
{
    let jobs = handler.list_jobs().await?;
    Ok(Json(jobs))
}

/// POST /v1/jobs
async fn create_job<H>(
    State(handler): State<Arc<H>>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ControlHandler,
{
    let details: JobRecord = decode("job record", body)?;
    handler.create_job(details).await?;
    Ok(Json(json!({})))
}

/// GET /v1/jobs/{name}
async fn get_job<H>(
    State(handler): State<Arc<H>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ControlHandler,
{
    let job = handler.get_job(&name).await?;
    Ok(Json(job))
}

/// DELETE /v1/jobs/{name}
async fn delete_job<H>(
    State(handler): State<Arc<H>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ControlHandler,
{
    handler.delete_job(&name).await?;
    Ok(Json(json!({})))
}

/// POST /v1/jobs:clean
async fn clean_jobs<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ControlHandler,
{
    let report = handler.clean_jobs().await?;
    Ok(Json(report))
}

/// GET /v1/cluster
async fn get_cluster<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ControlHandler,
{
    let cluster = handler.get_cluster().await?;
    Ok(Json(cluster))
}

/// GET /v1/master
async fn get_master<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ControlHandler,
{
    let master = handler.get_master().await?;
    Ok(Json(master))
}

/// GET /v1/containers
async fn list_containers<H>(State(handler): State<Arc<H>>) -> Result<impl IntoResponse, ApiError>
where
    H: ControlHandler,
{
    let containers = handler.list_containers().await?;
    Ok(Json(containers))
}

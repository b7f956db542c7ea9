use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use roster_api::{AgentClient, AgentError, AgentTarget, ControlApi, HttpApi};
use roster_store::{ClusterStore, MemoryBackend};

/// Agent stub that records calls and fails for selected containers.
#[derive(Default)]
struct FakeAgent {
    calls: Mutex<Vec<(String, String)>>,
    failing: BTreeSet<String>,
}

#[async_trait]
impl AgentClient for FakeAgent {
    async fn delete_container(
        &self,
        target: &AgentTarget,
        container: &str,
    ) -> Result<(), AgentError> {
        self.calls
            .lock()
            .unwrap()
            .push((target.node.clone(), container.to_string()));
        if self.failing.contains(container) {
            return Err(AgentError::Rejected {
                url: format!("http://{}/containers/{container}", target.private_ip),
                status: 500,
            });
        }
        Ok(())
    }
}

fn app() -> (Router, ClusterStore) {
    app_with_agent(FakeAgent::default()).0
}

fn app_with_agent(agent: FakeAgent) -> ((Router, ClusterStore), Arc<FakeAgent>) {
    let store = ClusterStore::new(Arc::new(MemoryBackend::new()), "itest");
    let agent = Arc::new(agent);
    let api = ControlApi::new(store.clone(), agent.clone());
    ((HttpApi::new(Arc::new(api)).router(), store), agent)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn node_doc(name: &str) -> Value {
    json!({
        "name": name,
        "hostname": format!("{name}.internal"),
        "public_ip_address": "203.0.113.7",
        "private_ip_address": "10.0.0.7",
        "resources": {"cpu": 4, "memory": "16g", "gpu": 1},
    })
}

fn node_doc_with_containers(name: &str, containers: &[&str]) -> Value {
    let mut doc = node_doc(name);
    let map: serde_json::Map<String, Value> = containers
        .iter()
        .map(|c| (c.to_string(), json!({"state": "running"})))
        .collect();
    doc["containers"] = Value::Object(map);
    doc
}

#[tokio::test]
async fn status_answers_ok_with_epoch_time() {
    let (app, _) = app();

    let (status, body) = send(&app, get("/status")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert!(body["time"].as_f64().unwrap() > 1_704_067_200.0);
}

#[tokio::test]
async fn node_registration_round_trips_through_the_api() {
    let (app, _) = app();
    let doc = node_doc("n1");

    let (status, body) = send(&app, post_json("/v1/nodes", doc.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    let (status, body) = send(&app, get("/v1/nodes/n1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, doc);

    let (status, body) = send(&app, get("/v1/nodes")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "n1");
}

#[tokio::test]
async fn unknown_node_is_a_404_with_an_error_body() {
    let (app, _) = app();

    let (status, body) = send(&app, get("/v1/nodes/ghost")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "node 'ghost' not found");
}

#[tokio::test]
async fn malformed_node_body_is_a_400() {
    let (app, _) = app();

    let (status, body) = send(&app, post_json("/v1/nodes", json!({"hostname": "h"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("node record"));
}

#[tokio::test]
async fn deleting_an_unknown_node_is_a_404() {
    let (app, _) = app();

    let (status, _) = send(&app, delete("/v1/nodes/ghost")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn job_lifecycle_keeps_the_record_and_moves_tickets() {
    let (app, store) = app();
    let doc = json!({"name": "j1", "image": "worker:latest", "replicas": 2});

    let (status, _) = send(&app, post_json("/v1/jobs", doc.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.pending_job_tickets().await.unwrap(), ["j1"]);

    let (status, body) = send(&app, get("/v1/jobs/j1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, doc);

    let (status, body) = send(&app, delete("/v1/jobs/j1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
    assert!(store.pending_job_tickets().await.unwrap().is_empty());
    assert_eq!(store.killed_job_tickets().await.unwrap(), ["j1"]);

    // Teardown is ticket-driven; the record stays until cleaned.
    let (status, _) = send(&app, get("/v1/jobs/j1")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn deleting_an_unknown_job_succeeds_and_pushes_a_killed_ticket() {
    let (app, store) = app();

    let (status, _) = send(&app, delete("/v1/jobs/ghost")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.killed_job_tickets().await.unwrap(), ["ghost"]);
}

#[tokio::test]
async fn clean_resets_queues_and_reports_the_sweep() {
    let ((app, store), agent) = app_with_agent(FakeAgent::default());
    send(&app, post_json("/v1/nodes", node_doc_with_containers("n1", &["j1-0", "j1-1"]))).await;
    send(&app, post_json("/v1/nodes", node_doc_with_containers("n2", &["j2-0"]))).await;
    send(&app, post_json("/v1/jobs", json!({"name": "j1"}))).await;

    let (status, body) = send(&app, post_json("/v1/jobs:clean", json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["queues_deleted"], true);
    assert_eq!(body["failures"], 0);
    assert_eq!(body["deletions"].as_array().unwrap().len(), 3);
    assert!(store.pending_job_tickets().await.unwrap().is_empty());
    assert_eq!(agent.calls.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn clean_reports_per_container_failures() {
    let ((app, _), _) = app_with_agent(FakeAgent {
        failing: ["j1-1".to_string()].into(),
        ..FakeAgent::default()
    });
    send(&app, post_json("/v1/nodes", node_doc_with_containers("n1", &["j1-0", "j1-1"]))).await;

    let (status, body) = send(&app, post_json("/v1/jobs:clean", json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["failures"], 1);
    let failed: Vec<&Value> = body["deletions"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|d| d.get("error").is_some())
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["container"], "j1-1");
}

#[tokio::test]
async fn cluster_and_master_records_are_served() {
    let (app, store) = app();
    store
        .set_cluster_details(
            &serde_json::from_value(json!({
                "name": "itest",
                "mode": "standalone",
                "connection": {"api_server": {"port": 51812}},
            }))
            .unwrap(),
        )
        .await
        .unwrap();
    store
        .set_master_details(
            &serde_json::from_value(json!({
                "hostname": "master0",
                "username": "ops",
                "share": {"password": "s3cret"},
                "api_server": {"port": 51812},
                "store": {"port": 6379},
            }))
            .unwrap(),
        )
        .await
        .unwrap();

    let (status, body) = send(&app, get("/v1/cluster")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "itest");

    let (status, body) = send(&app, get("/v1/master")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hostname"], "master0");
}

#[tokio::test]
async fn missing_master_record_is_a_404() {
    let (app, _) = app();

    let (status, body) = send(&app, get("/v1/master")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("master"));
}

#[tokio::test]
async fn containers_are_listed_across_nodes() {
    let (app, _) = app();
    send(&app, post_json("/v1/nodes", node_doc_with_containers("n1", &["a", "b"]))).await;
    send(&app, post_json("/v1/nodes", node_doc_with_containers("n2", &["c"]))).await;

    let (status, body) = send(&app, get("/v1/containers")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
}

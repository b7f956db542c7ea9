//! Control-plane service over the cluster store.
mod clean;
pub use clean::{CleanReport, ContainerCleanup, FanoutConfig};

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use roster_model::{ClusterRecord, ContainerRecord, JobRecord, MasterRecord, NodeRecord};
use roster_store::ClusterStore;

use crate::agent::{AgentClient, AgentTarget};
use crate::error::ApiError;
use crate::handler::ControlHandler;
use crate::metrics::{MetricsHandle, OpOutcome, noop_metrics};

/// Liveness answer for the unversioned `/status` probe.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub status: &'static str,
    /// Seconds since the unix epoch at the time of the probe.
    pub time: f64,
}

impl StatusReport {
    /// Snapshot taken now.
    pub fn now() -> Self {
        let time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        Self { status: "OK", time }
    }
}

/// Control-plane operations for one cluster.
///
/// Owns the store handle and the agent client used for cleanup fan-out.
/// Everything is injected explicitly; there is no global state.
pub struct ControlApi {
    store: ClusterStore,
    agents: Arc<dyn AgentClient>,
    metrics: MetricsHandle,
    fanout: FanoutConfig,
}

impl ControlApi {
    /// Create the service with no-op metrics and default fan-out settings.
    pub fn new(store: ClusterStore, agents: Arc<dyn AgentClient>) -> Self {
        Self {
            store,
            agents,
            metrics: noop_metrics(),
            fanout: FanoutConfig::default(),
        }
    }

    /// Replace the metrics backend.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// Replace the fan-out settings.
    pub fn with_fanout(mut self, fanout: FanoutConfig) -> Self {
        self.fanout = fanout;
        self
    }

    /// Run one operation and report its outcome and duration to metrics.
    async fn observed<T, F>(&self, op: &'static str, fut: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let started = Instant::now();
        let result = fut.await;
        let outcome = match &result {
            Ok(_) => OpOutcome::Ok,
            Err(ApiError::NotFound { .. }) => OpOutcome::NotFound,
            Err(_) => OpOutcome::Error,
        };
        self.metrics
            .record_op(op, outcome, started.elapsed().as_millis() as u64);
        result
    }

    /// Ask every node's agent to delete the containers that node reports.
    ///
    /// Requests run concurrently up to the configured bound; one permit per
    /// in-flight request, released when the agent answers.
    async fn sweep_containers(&self, nodes: BTreeMap<String, NodeRecord>) -> CleanReport {
        let mut work = Vec::new();
        for (node_name, node) in nodes {
            for container in node.containers.keys() {
                let target = AgentTarget {
                    node: node_name.clone(),
                    private_ip: node.private_ip_address.clone(),
                    port: self.fanout.agent_port,
                };
                work.push((target, container.clone()));
            }
        }
        debug!(requests = work.len(), "starting cleanup fan-out");

        let semaphore = Arc::new(Semaphore::new(self.fanout.concurrency.max(1)));
        let mut requests = JoinSet::new();
        for (target, container) in work {
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                // The semaphore is never closed while the sweep runs.
                Err(_) => break,
            };
            let agents = Arc::clone(&self.agents);
            let metrics = Arc::clone(&self.metrics);
            requests.spawn(async move {
                let _permit = permit;
                let error = agents
                    .delete_container(&target, &container)
                    .await
                    .err()
                    .map(|err| err.to_string());
                metrics.record_fanout(error.is_none());
                if let Some(reason) = &error {
                    warn!(node = %target.node, %container, %reason, "container cleanup failed");
                }
                ContainerCleanup {
                    node: target.node,
                    container,
                    error,
                }
            });
        }

        let mut deletions = Vec::new();
        while let Some(joined) = requests.join_next().await {
            match joined {
                Ok(cleanup) => deletions.push(cleanup),
                Err(err) => warn!(error = %err, "cleanup request task failed"),
            }
        }
        CleanReport::new(deletions)
    }
}

#[async_trait]
impl ControlHandler for ControlApi {
    async fn list_nodes(&self) -> Result<Vec<NodeRecord>, ApiError> {
        self.observed("list_nodes", async {
            let nodes = self.store.get_name_to_node_details().await?;
            Ok(nodes.into_values().collect())
        })
        .await
    }

    async fn get_node(&self, name: &str) -> Result<NodeRecord, ApiError> {
        self.observed("get_node", async {
            self.store
                .get_node_details(name)
                .await?
                .ok_or_else(|| ApiError::not_found("node", name))
        })
        .await
    }

    async fn create_node(&self, details: NodeRecord) -> Result<(), ApiError> {
        self.observed("create_node", async {
            self.store.set_node_details(&details).await?;
            info!(node = %details.name, "node registered");
            Ok(())
        })
        .await
    }

    async fn delete_node(&self, name: &str) -> Result<(), ApiError> {
        self.observed("delete_node", async {
            if !self.store.delete_node_details(name).await? {
                return Err(ApiError::not_found("node", name));
            }
            info!(node = %name, "node deregistered");
            Ok(())
        })
        .await
    }

    async fn list_jobs(&self) -> Result<Vec<JobRecord>, ApiError> {
        self.observed("list_jobs", async {
            let jobs = self.store.get_name_to_job_details().await?;
            Ok(jobs.into_values().collect())
        })
        .await
    }

    async fn get_job(&self, name: &str) -> Result<JobRecord, ApiError> {
        self.observed("get_job", async {
            self.store
                .get_job_details(name)
                .await?
                .ok_or_else(|| ApiError::not_found("job", name))
        })
        .await
    }

    async fn create_job(&self, details: JobRecord) -> Result<(), ApiError> {
        self.observed("create_job", async {
            // Record first, ticket second. A crash in between leaves a
            // record with no ticket, which reconcilers can detect; the
            // reverse order could dispatch a job that has no record.
            self.store.set_job_details(&details).await?;
            self.store.push_pending_job_ticket(&details.name).await?;
            self.metrics.record_ticket("pending", "pushed");
            info!(job = %details.name, "job accepted");
            Ok(())
        })
        .await
    }

    async fn delete_job(&self, name: &str) -> Result<(), ApiError> {
        self.observed("delete_job", async {
            let removed = self.store.remove_pending_job_ticket(name).await?;
            if removed > 0 {
                self.metrics.record_ticket("pending", "removed");
            }
            self.store.push_killed_job_ticket(name).await?;
            self.metrics.record_ticket("killed", "pushed");
            info!(job = %name, removed_pending = removed, "job deletion requested");
            Ok(())
        })
        .await
    }

    async fn clean_jobs(&self) -> Result<CleanReport, ApiError> {
        self.observed("clean_jobs", async {
            self.store.delete_pending_jobs_queue().await?;
            self.metrics.record_ticket("pending", "cleared");
            self.store.delete_killed_jobs_queue().await?;
            self.metrics.record_ticket("killed", "cleared");

            let nodes = self.store.get_name_to_node_details().await?;
            let report = self.sweep_containers(nodes).await;
            info!(
                deletions = report.deletions.len(),
                failures = report.failures,
                "cleanup sweep finished"
            );
            Ok(report)
        })
        .await
    }

    async fn get_cluster(&self) -> Result<ClusterRecord, ApiError> {
        self.observed("get_cluster", async {
            self.store
                .get_cluster_details()
                .await?
                .ok_or_else(|| ApiError::not_found("cluster", self.store.cluster_name()))
        })
        .await
    }

    async fn get_master(&self) -> Result<MasterRecord, ApiError> {
        self.observed("get_master", async {
            self.store
                .get_master_details()
                .await?
                .ok_or_else(|| ApiError::not_found("master", self.store.cluster_name()))
        })
        .await
    }

    async fn list_containers(&self) -> Result<Vec<ContainerRecord>, ApiError> {
        self.observed("list_containers", async {
            let nodes = self.store.get_name_to_node_details().await?;
            let mut containers = BTreeMap::new();
            for node in nodes.into_values() {
                containers.extend(node.containers);
            }
            Ok(containers.into_values().collect())
        })
        .await
    }
}

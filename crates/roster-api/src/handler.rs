use async_trait::async_trait;
use roster_model::{ClusterRecord, ContainerRecord, JobRecord, MasterRecord, NodeRecord};

use crate::control::CleanReport;
use crate::error::ApiError;

/// Control-plane API handler.
///
/// This trait abstracts the backend implementation, allowing users to:
/// - Use the provided [`ControlApi`](crate::ControlApi)
/// - Implement custom handlers with additional logic (auth, quotas, etc.)
#[async_trait]
pub trait ControlHandler: Send + Sync + 'static {
    /// List every registered node.
    async fn list_nodes(&self) -> Result<Vec<NodeRecord>, ApiError>;

    /// Fetch one node record by name.
    async fn get_node(&self, name: &str) -> Result<NodeRecord, ApiError>;

    /// Register a node, replacing any record under the same name.
    async fn create_node(&self, details: NodeRecord) -> Result<(), ApiError>;

    /// Drop a node record. Containers and jobs are untouched.
    async fn delete_node(&self, name: &str) -> Result<(), ApiError>;

    /// List every job record.
    async fn list_jobs(&self) -> Result<Vec<JobRecord>, ApiError>;

    /// Fetch one job record by name.
    async fn get_job(&self, name: &str) -> Result<JobRecord, ApiError>;

    /// Persist a job record, then queue a pending ticket for it.
    async fn create_job(&self, details: JobRecord) -> Result<(), ApiError>;

    /// Withdraw a job: drop its pending tickets and queue a killed ticket.
    ///
    /// The job record itself stays in the store; an external executor
    /// consumes the killed ticket and tears the job's containers down.
    async fn delete_job(&self, name: &str) -> Result<(), ApiError>;

    /// Reset both ticket queues and ask every node agent to delete the
    /// containers its node reports.
    async fn clean_jobs(&self) -> Result<CleanReport, ApiError>;

    /// Fetch the cluster record.
    async fn get_cluster(&self) -> Result<ClusterRecord, ApiError>;

    /// Fetch the master record.
    async fn get_master(&self) -> Result<MasterRecord, ApiError>;

    /// List every container reported by the registered nodes.
    async fn list_containers(&self) -> Result<Vec<ContainerRecord>, ApiError>;
}

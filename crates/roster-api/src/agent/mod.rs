//! Outbound client for per-node agent APIs.
//!
//! The control plane never manages containers itself; it asks the agent
//! on the owning node to do it. [`ControlApi::clean_jobs`] fans
//! deletion requests out through this seam.
//!
//! [`ControlApi::clean_jobs`]: crate::ControlApi
mod http;
pub use http::HttpAgentClient;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from talking to a node agent.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The shared HTTP client could not be built.
    #[error("failed to build agent http client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never produced an HTTP response.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The agent answered with a non-success status.
    #[error("agent at {url} answered {status}")]
    Rejected { url: String, status: u16 },
}

/// Address of one node agent, plus the node name for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentTarget {
    /// Name of the node the agent runs on.
    pub node: String,
    /// Address the agent is reachable at from the master.
    pub private_ip: String,
    /// Port the agent serves its container API on.
    pub port: u16,
}

/// Client for the container API every node agent exposes.
#[async_trait]
pub trait AgentClient: Send + Sync + 'static {
    /// Ask the agent on `target` to delete one container.
    async fn delete_container(
        &self,
        target: &AgentTarget,
        container: &str,
    ) -> Result<(), AgentError>;
}

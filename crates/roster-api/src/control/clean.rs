use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fan-out settings for [`clean_jobs`](crate::ControlHandler::clean_jobs).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FanoutConfig {
    /// Port every node agent serves its container API on.
    pub agent_port: u16,
    /// Upper bound on in-flight cleanup requests.
    pub concurrency: usize,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
}

impl FanoutConfig {
    /// Per-request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            agent_port: 51812,
            concurrency: 16,
            request_timeout_ms: 5_000,
        }
    }
}

/// One container-deletion attempt inside a cleanup sweep.
#[derive(Debug, Clone, Serialize)]
pub struct ContainerCleanup {
    /// Node the container lives on.
    pub node: String,
    /// Container name as the node agent knows it.
    pub container: String,
    /// Agent-side failure, when the request did not go through.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContainerCleanup {
    /// True when the agent acknowledged the deletion.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate outcome of one cleanup sweep.
///
/// Per-target failures never abort the sweep; they are collected here and
/// handed back to the caller instead of being dropped on the floor.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
    /// Whether both ticket queues were reset.
    pub queues_deleted: bool,
    /// Every attempted container deletion, in completion order.
    pub deletions: Vec<ContainerCleanup>,
    /// How many of the attempts failed.
    pub failures: usize,
}

impl CleanReport {
    pub(crate) fn new(deletions: Vec<ContainerCleanup>) -> Self {
        let failures = deletions.iter().filter(|d| !d.succeeded()).count();
        Self {
            queues_deleted: true,
            deletions,
            failures,
        }
    }

    /// True when every deletion request was acknowledged.
    pub fn is_clean(&self) -> bool {
        self.failures == 0
    }
}

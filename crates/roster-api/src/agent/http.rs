use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::agent::{AgentClient, AgentError, AgentTarget};

/// [`AgentClient`] over plain HTTP with a shared connection pool.
///
/// Agents listen inside the cluster's private network; requests go to
/// `http://{private_ip}:{port}` directly, no TLS.
pub struct HttpAgentClient {
    http: reqwest::Client,
}

impl HttpAgentClient {
    /// Build a client whose requests time out after `request_timeout`.
    pub fn new(request_timeout: Duration) -> Result<Self, AgentError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(AgentError::Client)?;
        Ok(Self { http })
    }
}

#[async_trait]
impl AgentClient for HttpAgentClient {
    async fn delete_container(
        &self,
        target: &AgentTarget,
        container: &str,
    ) -> Result<(), AgentError> {
        let url = format!(
            "http://{}:{}/containers/{container}",
            target.private_ip, target.port
        );
        debug!(node = %target.node, %url, "requesting container deletion");

        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|source| AgentError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::Rejected {
                url,
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

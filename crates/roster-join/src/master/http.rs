use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use roster_model::{ClusterRecord, MasterRecord, NodeRecord};

use super::{MasterApi, MasterError};

/// Per-request time bound; join traffic is small and the master is close.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// [`MasterApi`] over HTTP, the only implementation used in production.
#[derive(Debug, Clone)]
pub struct HttpMasterClient {
    base: String,
    http: reqwest::Client,
}

impl HttpMasterClient {
    /// Client for the master API listening at `hostname:port`.
    pub fn new(hostname: &str, port: u16) -> Result<Self, MasterError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(MasterError::Client)?;
        Ok(Self {
            base: format!("http://{hostname}:{port}/v1"),
            http,
        })
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, MasterError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/{path}", self.base);
        debug!(%url, "master GET");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| MasterError::Transport {
                url: url.clone(),
                source,
            })?;
        let response = reject_error_status(&url, response).await?;
        response
            .json()
            .await
            .map_err(|source| MasterError::Decode { url, source })
    }
}

#[async_trait]
impl MasterApi for HttpMasterClient {
    async fn create_node(&self, node: &NodeRecord) -> Result<(), MasterError> {
        let url = format!("{}/nodes", self.base);
        debug!(%url, node = %node.name, "master POST");
        let response = self
            .http
            .post(&url)
            .json(node)
            .send()
            .await
            .map_err(|source| MasterError::Transport {
                url: url.clone(),
                source,
            })?;
        reject_error_status(&url, response).await?;
        Ok(())
    }

    async fn get_cluster(&self) -> Result<ClusterRecord, MasterError> {
        self.get_json("cluster").await
    }

    async fn get_master(&self) -> Result<MasterRecord, MasterError> {
        self.get_json("master").await
    }
}

async fn reject_error_status(
    url: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, MasterError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => "no detail".to_string(),
    };
    Err(MasterError::Rejected {
        url: url.to_string(),
        status: status.as_u16(),
        message,
    })
}

/// Error documents the master emits: `{"error": "..."}`.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

//! Client side of the master control plane, as seen by a joining node.
mod http;
pub use http::HttpMasterClient;

use async_trait::async_trait;
use thiserror::Error;

use roster_model::{ClusterRecord, MasterRecord, NodeRecord};

/// The subset of the master API a joining node calls.
#[async_trait]
pub trait MasterApi: Send + Sync {
    /// Register this node; an existing record with the same name is replaced.
    async fn create_node(&self, node: &NodeRecord) -> Result<(), MasterError>;

    /// The cluster identity record.
    async fn get_cluster(&self) -> Result<ClusterRecord, MasterError>;

    /// The master machine record, including the share credentials.
    async fn get_master(&self) -> Result<MasterRecord, MasterError>;
}

/// Errors from talking to the master API.
#[derive(Debug, Error)]
pub enum MasterError {
    /// The HTTP client itself could not be built.
    #[error("failed to build master client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never produced an HTTP response.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The master answered with a non-success status.
    #[error("master at {url} answered {status}: {message}")]
    Rejected {
        url: String,
        status: u16,
        message: String,
    },

    /// The response body was not the expected document.
    #[error("decoding response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

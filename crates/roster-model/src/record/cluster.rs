use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Cluster identity record.
///
/// Written once at provisioning time, read by every joining node. The
/// `connection` section tells nodes where the control plane listens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterRecord {
    pub name: String,
    pub mode: String,
    pub connection: Connection,
    /// Provisioner-authored fields stored but not interpreted.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Connection endpoints shared by every machine in the cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub api_server: ApiServer,
}

/// Listening port of the master API server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiServer {
    pub port: u16,
}

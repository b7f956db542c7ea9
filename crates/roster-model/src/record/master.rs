use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::cluster::ApiServer;

/// Master machine record, singleton per cluster.
///
/// Joining nodes read it to mount the master's shared directory and to find
/// the data-store port for their agent config. Nodes never write it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterRecord {
    pub hostname: String,
    /// Account owning the shared network mount.
    pub username: String,
    pub share: ShareCredentials,
    pub api_server: ApiServer,
    pub store: StoreEndpoint,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Password for the master's shared network mount. The account name is the
/// master's `username`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareCredentials {
    pub password: String,
}

/// Endpoint of the master's data store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreEndpoint {
    pub port: u16,
}

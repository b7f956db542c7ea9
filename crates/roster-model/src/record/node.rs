use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::container::ContainerRecord;

/// One worker machine.
///
/// Registered by the join flow and thereafter mutated only by the node's own
/// agent, which keeps `containers` current. The control plane stores the
/// document verbatim: fields it does not model ride along in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Unique key within the cluster.
    pub name: String,
    pub hostname: String,
    pub public_ip_address: String,
    pub private_ip_address: String,
    pub resources: ResourceCapacity,
    /// Container name to container record, maintained by the node agent.
    /// Absent until the agent first reports in.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub containers: BTreeMap<String, ContainerRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Declared capacity of a node.
///
/// Values are kept exactly as the operator wrote them (numbers and strings
/// both occur in practice); the control plane never does arithmetic on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceCapacity {
    pub cpu: Value,
    pub memory: Value,
    pub gpu: Value,
}

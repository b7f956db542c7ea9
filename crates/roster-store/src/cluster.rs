use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use roster_model::{ClusterRecord, ContainerRecord, JobRecord, MasterRecord, NodeRecord};

use crate::backend::KvBackend;
use crate::error::StoreError;

/// Typed view over one cluster's slice of the key-value backend.
///
/// Every persisted master/node/job/container record is owned by this type:
/// all mutation in the system passes through here. The two job-ticket queues
/// it manages are the only channel by which job intent reaches consumers
/// outside the control plane.
///
/// Cloning is cheap; clones share the backend handle.
#[derive(Clone)]
pub struct ClusterStore {
    backend: Arc<dyn KvBackend>,
    cluster: String,
}

impl ClusterStore {
    pub fn new(backend: Arc<dyn KvBackend>, cluster: impl Into<String>) -> Self {
        Self {
            backend,
            cluster: cluster.into(),
        }
    }

    /// Cluster this store is namespaced to.
    pub fn cluster_name(&self) -> &str {
        &self.cluster
    }

    pub async fn get_master_details(&self) -> Result<Option<MasterRecord>, StoreError> {
        self.read_record(&self.scoped("master")).await
    }

    pub async fn set_master_details(&self, details: &MasterRecord) -> Result<(), StoreError> {
        self.write_record(&self.scoped("master"), details).await
    }

    /// Returns `true` if a master record was present.
    pub async fn delete_master_details(&self) -> Result<bool, StoreError> {
        self.backend.delete(&self.scoped("master")).await
    }

    pub async fn get_cluster_details(&self) -> Result<Option<ClusterRecord>, StoreError> {
        self.read_record(&self.scoped("cluster")).await
    }

    pub async fn set_cluster_details(&self, details: &ClusterRecord) -> Result<(), StoreError> {
        self.write_record(&self.scoped("cluster"), details).await
    }

    pub async fn get_node_details(&self, name: &str) -> Result<Option<NodeRecord>, StoreError> {
        self.read_record(&self.scoped_entry("nodes", name)).await
    }

    /// Write a node record keyed by `details.name`, replacing any previous
    /// record under that name.
    pub async fn set_node_details(&self, details: &NodeRecord) -> Result<(), StoreError> {
        self.write_record(&self.scoped_entry("nodes", &details.name), details)
            .await
    }

    /// Returns `true` if a record was present.
    pub async fn delete_node_details(&self, name: &str) -> Result<bool, StoreError> {
        self.backend.delete(&self.scoped_entry("nodes", name)).await
    }

    /// Every node record, keyed by node name.
    pub async fn get_name_to_node_details(
        &self,
    ) -> Result<BTreeMap<String, NodeRecord>, StoreError> {
        self.scan_records(&self.scoped("nodes:")).await
    }

    pub async fn get_job_details(&self, name: &str) -> Result<Option<JobRecord>, StoreError> {
        self.read_record(&self.scoped_entry("jobs", name)).await
    }

    /// Write a job record keyed by `details.name`, replacing any previous
    /// record under that name.
    pub async fn set_job_details(&self, details: &JobRecord) -> Result<(), StoreError> {
        self.write_record(&self.scoped_entry("jobs", &details.name), details)
            .await
    }

    /// Returns `true` if a record was present.
    pub async fn delete_job_details(&self, name: &str) -> Result<bool, StoreError> {
        self.backend.delete(&self.scoped_entry("jobs", name)).await
    }

    /// Every job record, keyed by job name.
    pub async fn get_name_to_job_details(&self) -> Result<BTreeMap<String, JobRecord>, StoreError> {
        self.scan_records(&self.scoped("jobs:")).await
    }

    pub async fn get_container_details(
        &self,
        name: &str,
    ) -> Result<Option<ContainerRecord>, StoreError> {
        self.read_record(&self.scoped_entry("containers", name)).await
    }

    pub async fn set_container_details(
        &self,
        name: &str,
        details: &ContainerRecord,
    ) -> Result<(), StoreError> {
        self.write_record(&self.scoped_entry("containers", name), details)
            .await
    }

    /// Returns `true` if a record was present.
    pub async fn delete_container_details(&self, name: &str) -> Result<bool, StoreError> {
        self.backend
            .delete(&self.scoped_entry("containers", name))
            .await
    }

    /// Every container record, keyed by container name.
    pub async fn get_name_to_container_details(
        &self,
    ) -> Result<BTreeMap<String, ContainerRecord>, StoreError> {
        self.scan_records(&self.scoped("containers:")).await
    }

    /// Append a job name to the pending queue. Unbounded; never drops.
    pub async fn push_pending_job_ticket(&self, job_name: &str) -> Result<(), StoreError> {
        self.backend
            .push_back(&self.scoped(PENDING_QUEUE), job_name.to_string())
            .await
    }

    /// Pop the oldest pending ticket, `None` when the queue is empty.
    pub async fn pop_pending_job_ticket(&self) -> Result<Option<String>, StoreError> {
        self.backend.pop_front(&self.scoped(PENDING_QUEUE)).await
    }

    /// Remove every pending ticket for `job_name`, wherever it sits in the
    /// queue. Returns how many tickets were removed.
    pub async fn remove_pending_job_ticket(&self, job_name: &str) -> Result<usize, StoreError> {
        self.backend
            .remove_value(&self.scoped(PENDING_QUEUE), job_name)
            .await
    }

    pub async fn delete_pending_jobs_queue(&self) -> Result<(), StoreError> {
        self.backend.clear_list(&self.scoped(PENDING_QUEUE)).await
    }

    /// Snapshot of the pending queue, oldest first.
    pub async fn pending_job_tickets(&self) -> Result<Vec<String>, StoreError> {
        self.backend.elements(&self.scoped(PENDING_QUEUE)).await
    }

    /// Append a job name to the killed queue. Unbounded; never drops.
    pub async fn push_killed_job_ticket(&self, job_name: &str) -> Result<(), StoreError> {
        self.backend
            .push_back(&self.scoped(KILLED_QUEUE), job_name.to_string())
            .await
    }

    /// Pop the oldest killed ticket, `None` when the queue is empty.
    pub async fn pop_killed_job_ticket(&self) -> Result<Option<String>, StoreError> {
        self.backend.pop_front(&self.scoped(KILLED_QUEUE)).await
    }

    pub async fn delete_killed_jobs_queue(&self) -> Result<(), StoreError> {
        self.backend.clear_list(&self.scoped(KILLED_QUEUE)).await
    }

    /// Snapshot of the killed queue, oldest first.
    pub async fn killed_job_tickets(&self) -> Result<Vec<String>, StoreError> {
        self.backend.elements(&self.scoped(KILLED_QUEUE)).await
    }

    fn scoped(&self, suffix: &str) -> String {
        format!("roster:{}:{suffix}", self.cluster)
    }

    fn scoped_entry(&self, collection: &str, name: &str) -> String {
        format!("roster:{}:{collection}:{name}", self.cluster)
    }

    async fn read_record<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.backend.get(key).await? else {
            return Ok(None);
        };
        let record = serde_json::from_str(&raw).map_err(|source| StoreError::Codec {
            key: key.to_string(),
            source,
        })?;
        Ok(Some(record))
    }

    async fn write_record<T: Serialize>(&self, key: &str, record: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(record).map_err(|source| StoreError::Codec {
            key: key.to_string(),
            source,
        })?;
        self.backend.set(key, raw).await
    }

    async fn scan_records<T: DeserializeOwned>(
        &self,
        prefix: &str,
    ) -> Result<BTreeMap<String, T>, StoreError> {
        let mut records = BTreeMap::new();
        for (key, raw) in self.backend.scan_prefix(prefix).await? {
            let name = key.strip_prefix(prefix).unwrap_or(&key).to_string();
            let record = serde_json::from_str(&raw).map_err(|source| StoreError::Codec {
                key: key.clone(),
                source,
            })?;
            records.insert(name, record);
        }
        Ok(records)
    }
}

const PENDING_QUEUE: &str = "pending_job_tickets";
const KILLED_QUEUE: &str = "killed_job_tickets";

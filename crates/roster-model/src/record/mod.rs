//! Persisted entity records.
//!
//! Every record is a serde view over the JSON document held by the store.
//! Fields the control plane does not model are preserved through flattened
//! maps so documents round-trip verbatim.
mod cluster;
pub use cluster::{ApiServer, ClusterRecord, Connection};

mod container;
pub use container::ContainerRecord;

mod job;
pub use job::JobRecord;

mod master;
pub use master::{MasterRecord, ShareCredentials, StoreEndpoint};

mod node;
pub use node::{NodeRecord, ResourceCapacity};

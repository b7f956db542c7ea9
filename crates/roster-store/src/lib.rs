mod error;
pub use error::StoreError;

mod backend;
pub use backend::{KvBackend, MemoryBackend};

mod cluster;
pub use cluster::ClusterStore;

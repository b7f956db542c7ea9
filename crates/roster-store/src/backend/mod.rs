//! Key-value boundary the store is built on.
//!
//! Concrete backends implement [`KvBackend`]; the in-memory one ships here,
//! networked ones plug in behind the same seam.
mod memory;
pub use memory::MemoryBackend;

use async_trait::async_trait;

use crate::error::StoreError;

/// Minimal key-value + FIFO-list surface.
///
/// Each call is individually atomic. The trait deliberately offers no
/// cross-key transactions, so callers must tolerate partial multi-call
/// states (e.g. a record written but its queue entry not yet pushed).
#[async_trait]
pub trait KvBackend: Send + Sync + 'static {
    /// Read the value under `key`, `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Remove `key`. Returns `true` if a value was present.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// All `(key, value)` pairs whose key starts with `prefix`.
    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StoreError>;

    /// Append `value` to the tail of `list`. Unbounded; never drops.
    async fn push_back(&self, list: &str, value: String) -> Result<(), StoreError>;

    /// Pop the head of `list`, `None` when the list is empty or absent.
    async fn pop_front(&self, list: &str) -> Result<Option<String>, StoreError>;

    /// Remove every element of `list` equal to `value`, returning how many
    /// were removed.
    async fn remove_value(&self, list: &str, value: &str) -> Result<usize, StoreError>;

    /// Drop the whole list.
    async fn clear_list(&self, list: &str) -> Result<(), StoreError>;

    /// Snapshot of `list` from head to tail.
    async fn elements(&self, list: &str) -> Result<Vec<String>, StoreError>;
}

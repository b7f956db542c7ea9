use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::backend::KvBackend;
use crate::error::StoreError;

/// Process-local [`KvBackend`] holding everything in two maps.
///
/// Values and lists live in separate namespaces, so a record key and a queue
/// key can never shadow each other. Suited to single-process deployments and
/// tests.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    values: BTreeMap<String, String>,
    lists: BTreeMap<String, VecDeque<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Backend("memory store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl KvBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.locked()?.values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.locked()?.values.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.locked()?.values.remove(key).is_some())
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StoreError> {
        let state = self.locked()?;
        Ok(state
            .values
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    async fn push_back(&self, list: &str, value: String) -> Result<(), StoreError> {
        self.locked()?
            .lists
            .entry(list.to_string())
            .or_default()
            .push_back(value);
        Ok(())
    }

    async fn pop_front(&self, list: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .locked()?
            .lists
            .get_mut(list)
            .and_then(|elements| elements.pop_front()))
    }

    async fn remove_value(&self, list: &str, value: &str) -> Result<usize, StoreError> {
        let mut state = self.locked()?;
        let Some(elements) = state.lists.get_mut(list) else {
            return Ok(0);
        };
        let before = elements.len();
        elements.retain(|element| element != value);
        Ok(before - elements.len())
    }

    async fn clear_list(&self, list: &str) -> Result<(), StoreError> {
        self.locked()?.lists.remove(list);
        Ok(())
    }

    async fn elements(&self, list: &str) -> Result<Vec<String>, StoreError> {
        let state = self.locked()?;
        Ok(state
            .lists
            .get(list)
            .map(|elements| elements.iter().cloned().collect())
            .unwrap_or_default())
    }
}

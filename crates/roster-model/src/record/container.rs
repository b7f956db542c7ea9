use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Agent-owned container document.
///
/// Opaque to the control plane: it is stored, listed, and named during
/// cleanup fan-out, never interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerRecord(Value);

impl ContainerRecord {
    pub fn new(document: Value) -> Self {
        Self(document)
    }

    pub fn document(&self) -> &Value {
        &self.0
    }

    pub fn into_document(self) -> Value {
        self.0
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One submitted job.
///
/// Only `name` is interpreted here; the rest of the submitted document rides
/// along verbatim for schedulers to consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub name: String,
    #[serde(flatten)]
    pub spec: Map<String, Value>,
}

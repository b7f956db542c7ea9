use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    error::ModelError,
    record::{Connection, NodeRecord},
    schema::{MappingSchema, Schema},
};

/// Typed form of the operator-supplied join deployment descriptor.
///
/// Produced only by [`JoinDescriptor::from_document`], which validates the
/// raw document against [`join_descriptor_schema`] first. Downstream join
/// steps may therefore read fields without re-checking presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinDescriptor {
    pub mode: String,
    pub master: MasterEndpoint,
    /// Registration body: posted to the master exactly as written here.
    pub node: NodeRecord,
    pub connection: Connection,
}

/// Master coordinates as the operator writes them in the descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterEndpoint {
    pub hostname: String,
}

impl JoinDescriptor {
    /// Validate and convert a raw descriptor document.
    ///
    /// Fills defaultable keys in place before the typed conversion; all
    /// schema violations are reported together, not one at a time.
    pub fn from_document(mut doc: Value) -> Result<Self, ModelError> {
        join_descriptor_schema().validate_and_fill(&mut doc)?;
        Ok(serde_json::from_value(doc)?)
    }
}

/// Required shape of the join deployment descriptor.
///
/// Every key is required except `node.resources.gpu`, which defaults to an
/// empty string for nodes without accelerators.
pub fn join_descriptor_schema() -> Schema {
    MappingSchema::new()
        .field("mode", Schema::scalar())
        .field(
            "master",
            MappingSchema::new().field("hostname", Schema::scalar()),
        )
        .field(
            "node",
            MappingSchema::new()
                .field("name", Schema::scalar())
                .field("hostname", Schema::scalar())
                .field("public_ip_address", Schema::scalar())
                .field("private_ip_address", Schema::scalar())
                .field(
                    "resources",
                    MappingSchema::new()
                        .field("cpu", Schema::scalar())
                        .field("memory", Schema::scalar())
                        .defaulted("gpu", Schema::scalar(), json!("")),
                ),
        )
        .field(
            "connection",
            MappingSchema::new().field(
                "api_server",
                MappingSchema::new().field("port", Schema::scalar()),
            ),
        )
        .into()
}

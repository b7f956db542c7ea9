mod error;
pub use error::ModelError;

mod record;
pub use record::{
    ApiServer, ClusterRecord, Connection, ContainerRecord, JobRecord, MasterRecord, NodeRecord,
    ResourceCapacity, ShareCredentials, StoreEndpoint,
};

mod descriptor;
pub use descriptor::{JoinDescriptor, MasterEndpoint, join_descriptor_schema};

mod schema;
pub use schema::{KeyPath, MappingSchema, Schema, SchemaViolations, Violation};

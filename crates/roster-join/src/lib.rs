mod error;
pub use error::{JoinError, JoinErrorKind, JoinStep};

mod layout;
pub use layout::NodeLayout;

mod master;
pub use master::{HttpMasterClient, MasterApi, MasterError};

mod workflow;
pub use workflow::{
    AgentConfig, JoinSummary, JoinWorkflow, NODE_AGENT_UNIT, NODE_API_SERVER_UNIT, load_descriptor,
};

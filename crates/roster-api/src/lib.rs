mod error;
pub use error::ApiError;

pub mod metrics;
pub use metrics::{ControlMetrics, MetricsHandle, NoOpMetrics, OpOutcome};

mod agent;
pub use agent::{AgentClient, AgentError, AgentTarget, HttpAgentClient};

mod handler;
pub use handler::ControlHandler;

mod control;
pub use control::{CleanReport, ContainerCleanup, ControlApi, FanoutConfig, StatusReport};

mod http;
pub use http::HttpApi;

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use roster_api::FanoutConfig;
use roster_model::MasterRecord;
use roster_observe::LogConfig;

/// On-disk configuration for the master daemon.
///
/// Every section has a default so a minimal deployment can start from an
/// empty document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MasterdConfig {
    /// Cluster this daemon serves; namespaces every store key.
    pub cluster_name: String,
    /// Cluster mode advertised in the cluster record.
    pub mode: String,
    pub bind: BindConfig,
    pub logging: LogConfig,
    pub fanout: FanoutConfig,
    /// Master record seeded into the store at startup, when provisioned.
    pub master: Option<MasterRecord>,
}

impl MasterdConfig {
    /// Read and decode a JSON config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("decoding config file {}", path.display()))?;
        Ok(config)
    }
}

impl Default for MasterdConfig {
    fn default() -> Self {
        Self {
            cluster_name: "default".to_string(),
            mode: "standalone".to_string(),
            bind: BindConfig::default(),
            logging: LogConfig::default(),
            fanout: FanoutConfig::default(),
            master: None,
        }
    }
}

/// Listen address of the HTTP control surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BindConfig {
    pub host: String,
    pub port: u16,
}

impl BindConfig {
    /// `host:port` form accepted by the TCP listener.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 51812,
        }
    }
}

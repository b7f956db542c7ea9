//! The join workflow: linear steps, fail fast, no rollback.
mod scripts;

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use roster_exec::CommandRunner;
use roster_model::{ClusterRecord, JoinDescriptor, MasterRecord};

use crate::{
    error::{JoinError, JoinErrorKind, JoinStep},
    layout::NodeLayout,
    master::MasterApi,
};

/// Unit running the per-node agent.
pub const NODE_AGENT_UNIT: &str = "roster-node-agent.service";
/// Unit running the node-local API server.
pub const NODE_API_SERVER_UNIT: &str = "roster-node-api-server.service";

/// Time bound for each provisioning script; the cifs mount is the slow one.
const COMMAND_TIMEOUT: Duration = Duration::from_secs(300);

/// Read and validate the operator descriptor at `path`.
pub fn load_descriptor(path: &Path) -> Result<JoinDescriptor, JoinError> {
    let step = JoinStep::ValidateDescriptor;
    let raw = fs::read_to_string(path).map_err(|source| {
        JoinError::new(
            step,
            JoinErrorKind::Read {
                path: path.to_path_buf(),
                source,
            },
        )
    })?;
    let doc: Value = serde_json::from_str(&raw)
        .map_err(|source| JoinError::new(step, roster_model::ModelError::from(source)))?;
    JoinDescriptor::from_document(doc).map_err(|source| JoinError::new(step, source))
}

/// Config document the node-agent reads at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub cluster_name: String,
    pub node_name: String,
    pub master_hostname: String,
    pub store_port: u16,
}

/// What a completed join set up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSummary {
    pub cluster: String,
    pub node: String,
}

/// Drives a node through every join step in order.
///
/// Steps are not resumable and never rolled back; each one overwrites what a
/// previous attempt left behind, so rerunning after a fix is safe.
pub struct JoinWorkflow<M, R> {
    master: M,
    runner: R,
    layout: NodeLayout,
}

impl<M, R> JoinWorkflow<M, R>
where
    M: MasterApi,
    R: CommandRunner,
{
    pub fn new(master: M, runner: R, layout: NodeLayout) -> Self {
        Self {
            master,
            runner,
            layout,
        }
    }

    /// Run the whole workflow for an already validated descriptor.
    pub async fn run(&self, descriptor: &JoinDescriptor) -> Result<JoinSummary, JoinError> {
        self.register_node(descriptor).await?;
        let (cluster, master) = self.fetch_cluster_records().await?;
        self.ensure_docker_group().await?;
        self.mount_share(&master).await?;
        self.write_agent_config(descriptor, &cluster, &master)?;
        self.install_services(&cluster).await?;
        info!(cluster = %cluster.name, node = %descriptor.node.name, "node joined");
        Ok(JoinSummary {
            cluster: cluster.name,
            node: descriptor.node.name.clone(),
        })
    }

    async fn register_node(&self, descriptor: &JoinDescriptor) -> Result<(), JoinError> {
        let step = JoinStep::RegisterNode;
        info!(step = %step, node = %descriptor.node.name, "registering with the master");
        self.master
            .create_node(&descriptor.node)
            .await
            .map_err(|source| JoinError::new(step, source))
    }

    async fn fetch_cluster_records(&self) -> Result<(ClusterRecord, MasterRecord), JoinError> {
        let step = JoinStep::FetchClusterRecords;
        info!(step = %step, "reading the cluster and master records");
        let cluster = self
            .master
            .get_cluster()
            .await
            .map_err(|source| JoinError::new(step, source))?;
        let master = self
            .master
            .get_master()
            .await
            .map_err(|source| JoinError::new(step, source))?;
        Ok((cluster, master))
    }

    async fn ensure_docker_group(&self) -> Result<(), JoinError> {
        let step = JoinStep::EnsureDockerGroup;
        info!(step = %step, "creating the container privilege group");
        self.run_commands(step, &scripts::ensure_docker_group()).await
    }

    async fn mount_share(&self, master: &MasterRecord) -> Result<(), JoinError> {
        let step = JoinStep::MountShare;
        let mount_path = self.layout.share_root();
        info!(step = %step, path = %mount_path.display(), "mounting the master share");
        let script = scripts::mount_share(master, &mount_path.to_string_lossy());
        self.run_commands(step, &script).await
    }

    fn write_agent_config(
        &self,
        descriptor: &JoinDescriptor,
        cluster: &ClusterRecord,
        master: &MasterRecord,
    ) -> Result<(), JoinError> {
        let step = JoinStep::WriteAgentConfig;
        let config = AgentConfig {
            cluster_name: cluster.name.clone(),
            node_name: descriptor.node.name.clone(),
            master_hostname: master.hostname.clone(),
            store_port: master.store.port,
        };
        let path = self.layout.agent_config_path();
        info!(step = %step, path = %path.display(), "writing the agent config");
        let body = serde_json::to_string_pretty(&config)
            .map_err(|source| JoinError::new(step, JoinErrorKind::Encode(source)))?;
        write_file(step, &path, body.as_bytes())
    }

    async fn install_services(&self, cluster: &ClusterRecord) -> Result<(), JoinError> {
        let step = JoinStep::InstallServices;
        let home = self.layout.home().to_string_lossy().into_owned();
        let port = cluster.connection.api_server.port;
        for unit in [NODE_AGENT_UNIT, NODE_API_SERVER_UNIT] {
            info!(step = %step, unit, "installing the user service");
            let template_path = self.layout.service_template_path(unit);
            let template = fs::read_to_string(&template_path).map_err(|source| {
                JoinError::new(
                    step,
                    JoinErrorKind::Read {
                        path: template_path.clone(),
                        source,
                    },
                )
            })?;
            let rendered = scripts::render_unit(&template, &home, port);
            let unit_path = self.layout.systemd_unit_path(unit);
            write_file(step, &unit_path, rendered.as_bytes())?;
            self.run_commands(step, &scripts::start_user_service(unit)).await?;
        }
        Ok(())
    }

    async fn run_commands(&self, step: JoinStep, script: &str) -> Result<(), JoinError> {
        self.runner
            .run(script, Some(COMMAND_TIMEOUT))
            .await
            .map_err(|source| JoinError::new(step, source))?;
        Ok(())
    }
}

/// Create `path`'s parent directories and (over)write its contents.
fn write_file(step: JoinStep, path: &Path, contents: &[u8]) -> Result<(), JoinError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| {
            JoinError::new(
                step,
                JoinErrorKind::Write {
                    path: parent.to_path_buf(),
                    source,
                },
            )
        })?;
    }
    fs::write(path, contents).map_err(|source| {
        JoinError::new(
            step,
            JoinErrorKind::Write {
                path: path.to_path_buf(),
                source,
            },
        )
    })
}

//! End-to-end join runs against a fake master and command runner, with the
//! node's home directory pointed at a temp dir.
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use roster_exec::{CommandOutput, CommandRunner, ExecError};
use roster_join::{
    AgentConfig, JoinStep, JoinWorkflow, MasterApi, MasterError, NODE_AGENT_UNIT,
    NODE_API_SERVER_UNIT, NodeLayout, load_descriptor,
};
use roster_model::{ClusterRecord, JoinDescriptor, MasterRecord, NodeRecord};

#[derive(Clone, Default)]
struct FakeMaster {
    registered: Arc<Mutex<Vec<NodeRecord>>>,
    reject_create: bool,
}

impl FakeMaster {
    fn rejecting() -> Self {
        Self {
            reject_create: true,
            ..Self::default()
        }
    }

    fn cluster() -> ClusterRecord {
        serde_json::from_value(json!({
            "name": "dev",
            "mode": "standalone",
            "connection": {"api_server": {"port": 51812}},
        }))
        .unwrap()
    }

    fn master() -> MasterRecord {
        serde_json::from_value(json!({
            "hostname": "master0",
            "username": "ops",
            "share": {"password": "s3cret"},
            "api_server": {"port": 51812},
            "store": {"port": 6379},
        }))
        .unwrap()
    }
}

#[async_trait]
impl MasterApi for FakeMaster {
    async fn create_node(&self, node: &NodeRecord) -> Result<(), MasterError> {
        if self.reject_create {
            return Err(MasterError::Rejected {
                url: "http://master0:51812/v1/nodes".to_string(),
                status: 500,
                message: "store unavailable".to_string(),
            });
        }
        self.registered.lock().unwrap().push(node.clone());
        Ok(())
    }

    async fn get_cluster(&self) -> Result<ClusterRecord, MasterError> {
        Ok(FakeMaster::cluster())
    }

    async fn get_master(&self) -> Result<MasterRecord, MasterError> {
        Ok(FakeMaster::master())
    }
}

/// Records every script it is handed; fails any containing `fail_on`.
#[derive(Clone, Default)]
struct FakeRunner {
    scripts: Arc<Mutex<Vec<String>>>,
    fail_on: Option<&'static str>,
}

impl FakeRunner {
    fn failing_on(marker: &'static str) -> Self {
        Self {
            fail_on: Some(marker),
            ..Self::default()
        }
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(
        &self,
        script: &str,
        _timeout: Option<Duration>,
    ) -> Result<CommandOutput, ExecError> {
        self.scripts.lock().unwrap().push(script.to_string());
        if let Some(marker) = self.fail_on {
            if script.contains(marker) {
                return Err(ExecError::NonZeroExit {
                    code: Some(32),
                    stderr: "mount error(13): permission denied\n".to_string(),
                });
            }
        }
        Ok(CommandOutput::default())
    }
}

fn descriptor() -> JoinDescriptor {
    JoinDescriptor::from_document(descriptor_json()).unwrap()
}

/// Puts unit templates where the mounted share would carry them.
fn seed_unit_templates(home: &Path) {
    let layout = NodeLayout::new(home);
    let units = [
        (
            NODE_AGENT_UNIT,
            "[Service]\nExecStart={home_path}/bin/roster-node-agent\n",
        ),
        (
            NODE_API_SERVER_UNIT,
            "[Service]\nExecStart={home_path}/bin/api-server --port {api_server_port}\n",
        ),
    ];
    for (unit, body) in units {
        let path = layout.service_template_path(unit);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }
}

#[tokio::test]
async fn full_join_provisions_the_node() {
    let home = tempfile::tempdir().unwrap();
    seed_unit_templates(home.path());
    let master = FakeMaster::default();
    let runner = FakeRunner::default();
    let workflow = JoinWorkflow::new(master.clone(), runner.clone(), NodeLayout::new(home.path()));

    let summary = workflow.run(&descriptor()).await.unwrap();
    assert_eq!(summary.cluster, "dev");
    assert_eq!(summary.node, "node-a");

    // Registration posted the descriptor's node section as-is.
    let registered = master.registered.lock().unwrap();
    assert_eq!(registered.len(), 1);
    assert_eq!(registered[0].name, "node-a");

    // The agent config carries the identity of this node and its master.
    let layout = NodeLayout::new(home.path());
    let config: AgentConfig =
        serde_json::from_str(&fs::read_to_string(layout.agent_config_path()).unwrap()).unwrap();
    assert_eq!(
        config,
        AgentConfig {
            cluster_name: "dev".to_string(),
            node_name: "node-a".to_string(),
            master_hostname: "master0".to_string(),
            store_port: 6379,
        }
    );

    // Units were rendered with real values and installed for systemd --user.
    let agent_unit = fs::read_to_string(layout.systemd_unit_path(NODE_AGENT_UNIT)).unwrap();
    assert!(!agent_unit.contains("{home_path}"));
    assert!(agent_unit.contains(home.path().to_str().unwrap()));
    let api_unit = fs::read_to_string(layout.systemd_unit_path(NODE_API_SERVER_UNIT)).unwrap();
    assert!(api_unit.contains("--port 51812"));
}

#[tokio::test]
async fn provisioning_scripts_run_in_join_order() {
    let home = tempfile::tempdir().unwrap();
    seed_unit_templates(home.path());
    let master = FakeMaster::default();
    let runner = FakeRunner::default();
    let workflow = JoinWorkflow::new(master.clone(), runner.clone(), NodeLayout::new(home.path()));

    workflow.run(&descriptor()).await.unwrap();

    let scripts = runner.scripts.lock().unwrap();
    assert_eq!(scripts.len(), 4);
    assert!(scripts[0].contains("groupadd"));
    assert!(scripts[1].contains("//master0/sambashare"));
    assert!(scripts[2].contains("systemctl --user start roster-node-agent.service"));
    assert!(scripts[3].contains("systemctl --user start roster-node-api-server.service"));
}

#[tokio::test]
async fn mount_failure_names_the_step_and_keeps_stderr() {
    let home = tempfile::tempdir().unwrap();
    seed_unit_templates(home.path());
    let master = FakeMaster::default();
    let runner = FakeRunner::failing_on("mount -t cifs");
    let workflow = JoinWorkflow::new(master.clone(), runner.clone(), NodeLayout::new(home.path()));

    let err = workflow.run(&descriptor()).await.unwrap_err();
    assert_eq!(err.step, JoinStep::MountShare);
    assert!(
        err.command_stderr().unwrap().contains("permission denied"),
        "got: {err}"
    );

    // The workflow stopped before writing any node-local state.
    let layout = NodeLayout::new(home.path());
    assert!(!layout.agent_config_path().exists());
}

#[tokio::test]
async fn master_rejection_fails_registration() {
    let home = tempfile::tempdir().unwrap();
    let master = FakeMaster::rejecting();
    let runner = FakeRunner::default();
    let workflow = JoinWorkflow::new(master.clone(), runner.clone(), NodeLayout::new(home.path()));

    let err = workflow.run(&descriptor()).await.unwrap_err();
    assert_eq!(err.step, JoinStep::RegisterNode);
    assert!(err.to_string().contains("answered 500"), "got: {err}");
    assert!(runner.scripts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_unit_template_fails_the_service_step() {
    let home = tempfile::tempdir().unwrap();
    // No templates seeded: the share is mounted but empty.
    let master = FakeMaster::default();
    let runner = FakeRunner::default();
    let workflow = JoinWorkflow::new(master.clone(), runner.clone(), NodeLayout::new(home.path()));

    let err = workflow.run(&descriptor()).await.unwrap_err();
    assert_eq!(err.step, JoinStep::InstallServices);
    assert!(err.to_string().contains(NODE_AGENT_UNIT), "got: {err}");
}

#[tokio::test]
async fn rerunning_the_join_overwrites_cleanly() {
    let home = tempfile::tempdir().unwrap();
    seed_unit_templates(home.path());
    let master = FakeMaster::default();
    let runner = FakeRunner::default();
    let workflow = JoinWorkflow::new(master.clone(), runner.clone(), NodeLayout::new(home.path()));

    workflow.run(&descriptor()).await.unwrap();
    workflow.run(&descriptor()).await.unwrap();

    // Registration is an overwrite on the master side, so two posts are fine.
    assert_eq!(master.registered.lock().unwrap().len(), 2);
    let layout = NodeLayout::new(home.path());
    let config: AgentConfig =
        serde_json::from_str(&fs::read_to_string(layout.agent_config_path()).unwrap()).unwrap();
    assert_eq!(config.node_name, "node-a");
}

#[test]
fn descriptor_loading_validates_and_reports_by_step() {
    let dir = tempfile::tempdir().unwrap();

    let good = dir.path().join("good.json");
    fs::write(&good, descriptor_json().to_string()).unwrap();
    let descriptor = load_descriptor(&good).unwrap();
    assert_eq!(descriptor.node.name, "node-a");

    let missing = dir.path().join("missing.json");
    let err = load_descriptor(&missing).unwrap_err();
    assert_eq!(err.step, JoinStep::ValidateDescriptor);

    let malformed = dir.path().join("malformed.json");
    fs::write(&malformed, "{not json").unwrap();
    let err = load_descriptor(&malformed).unwrap_err();
    assert_eq!(err.step, JoinStep::ValidateDescriptor);

    let incomplete = dir.path().join("incomplete.json");
    let mut doc = descriptor_json();
    doc["master"].as_object_mut().unwrap().remove("hostname");
    fs::write(&incomplete, doc.to_string()).unwrap();
    let err = load_descriptor(&incomplete).unwrap_err();
    assert_eq!(err.step, JoinStep::ValidateDescriptor);
    assert!(err.to_string().contains("master.hostname"), "got: {err}");
}

fn descriptor_json() -> serde_json::Value {
    json!({
        "mode": "standalone",
        "master": {"hostname": "master0"},
        "node": {
            "name": "node-a",
            "hostname": "node-a.internal",
            "public_ip_address": "203.0.113.7",
            "private_ip_address": "10.0.0.7",
            "resources": {"cpu": 4, "memory": "16g"},
        },
        "connection": {"api_server": {"port": 51812}},
    })
}

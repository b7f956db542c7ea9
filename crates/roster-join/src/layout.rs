use std::path::{Path, PathBuf};

/// Filesystem layout of a joining node, rooted at one home directory.
///
/// Every path the workflow touches comes from here, so tests can point the
/// whole flow at a temporary directory.
#[derive(Debug, Clone)]
pub struct NodeLayout {
    home: PathBuf,
}

impl NodeLayout {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Layout under `$HOME`. `None` when the variable is unset.
    pub fn from_env() -> Option<Self> {
        std::env::var_os("HOME").map(Self::new)
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Mount point of the master's shared directory.
    pub fn share_root(&self) -> PathBuf {
        self.home.join(".roster")
    }

    /// Node-local state, never written to the share.
    pub fn local_root(&self) -> PathBuf {
        self.home.join(".roster-local")
    }

    /// Where the node-agent reads its config.
    pub fn agent_config_path(&self) -> PathBuf {
        self.local_root().join("services").join("roster-node-agent.config")
    }

    /// Unit template shipped on the master share.
    pub fn service_template_path(&self, unit: &str) -> PathBuf {
        self.share_root().join("lib").join("services").join(unit)
    }

    /// Where rendered units land for `systemctl --user` to find.
    pub fn systemd_unit_dir(&self) -> PathBuf {
        self.home.join(".config").join("systemd").join("user")
    }

    pub fn systemd_unit_path(&self, unit: &str) -> PathBuf {
        self.systemd_unit_dir().join(unit)
    }
}

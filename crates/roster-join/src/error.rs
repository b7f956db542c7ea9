use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use roster_exec::ExecError;
use roster_model::ModelError;

use crate::master::MasterError;

/// One stage of the join workflow.
///
/// Failures carry the stage they happened in so the operator knows where to
/// look. Finished stages are never rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinStep {
    /// Reading and validating the operator descriptor.
    ValidateDescriptor,
    /// Posting the node record to the master.
    RegisterNode,
    /// Reading the cluster and master records back.
    FetchClusterRecords,
    /// Creating the container privilege group.
    EnsureDockerGroup,
    /// Mounting the master's shared directory.
    MountShare,
    /// Writing the node-agent config file.
    WriteAgentConfig,
    /// Rendering, installing and starting the per-node services.
    InstallServices,
}

impl JoinStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinStep::ValidateDescriptor => "validate descriptor",
            JoinStep::RegisterNode => "register node",
            JoinStep::FetchClusterRecords => "fetch cluster records",
            JoinStep::EnsureDockerGroup => "ensure docker group",
            JoinStep::MountShare => "mount master share",
            JoinStep::WriteAgentConfig => "write agent config",
            JoinStep::InstallServices => "install services",
        }
    }
}

impl fmt::Display for JoinStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A join failure, tagged with the step it happened in.
#[derive(Debug, Error)]
#[error("{step} failed: {kind}")]
pub struct JoinError {
    pub step: JoinStep,
    #[source]
    pub kind: JoinErrorKind,
}

impl JoinError {
    pub fn new(step: JoinStep, kind: impl Into<JoinErrorKind>) -> Self {
        Self {
            step,
            kind: kind.into(),
        }
    }

    /// Stderr of the failed command when the step died running one.
    ///
    /// The join binary prints it verbatim under the error line.
    pub fn command_stderr(&self) -> Option<&str> {
        match &self.kind {
            JoinErrorKind::Command(ExecError::NonZeroExit { stderr, .. }) => Some(stderr),
            _ => None,
        }
    }
}

/// What actually went wrong inside a step.
#[derive(Debug, Error)]
pub enum JoinErrorKind {
    /// A file the step depends on could not be read.
    #[error("reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file the step produces could not be written.
    #[error("writing {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The descriptor failed validation or the typed conversion.
    #[error(transparent)]
    Descriptor(#[from] ModelError),

    /// A call to the master API failed.
    #[error(transparent)]
    Master(#[from] MasterError),

    /// A provisioning command failed, timed out, or could not be spawned.
    #[error(transparent)]
    Command(#[from] ExecError),

    /// The agent config could not be encoded.
    #[error("encoding agent config: {0}")]
    Encode(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use roster_exec::ExecError;

    use super::{JoinError, JoinStep};

    #[test]
    fn message_names_the_step() {
        let err = JoinError::new(
            JoinStep::MountShare,
            ExecError::NonZeroExit {
                code: Some(32),
                stderr: "mount error(13)\n".to_string(),
            },
        );
        assert_eq!(
            err.to_string(),
            "mount master share failed: process exited with non-zero code: 32: mount error(13)"
        );
    }

    #[test]
    fn command_stderr_comes_back_verbatim() {
        let err = JoinError::new(
            JoinStep::EnsureDockerGroup,
            ExecError::NonZeroExit {
                code: Some(1),
                stderr: "gpasswd: permission denied\n".to_string(),
            },
        );
        assert_eq!(err.command_stderr(), Some("gpasswd: permission denied\n"));
    }

    #[test]
    fn only_failed_commands_carry_stderr() {
        let err = JoinError::new(JoinStep::EnsureDockerGroup, ExecError::EmptyScript);
        assert_eq!(err.command_stderr(), None);
    }
}

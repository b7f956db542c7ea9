//! Command execution seam used by the bootstrap flow.
//!
//! Production code runs scripts through a real shell via [`ShellRunner`];
//! tests substitute a fake behind the same trait.
mod shell;
pub use shell::ShellRunner;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ExecError;

/// Runs one multi-line shell script to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Execute `script`, waiting at most `timeout` when one is given.
    ///
    /// A non-zero exit is an error, not a successful run with a bad status;
    /// callers that need the exit code read it off [`ExecError::NonZeroExit`].
    async fn run(
        &self,
        script: &str,
        timeout: Option<Duration>,
    ) -> Result<CommandOutput, ExecError>;
}

/// Captured output of a successfully exited command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

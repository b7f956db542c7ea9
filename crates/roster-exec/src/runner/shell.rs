use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, trace};

use crate::error::ExecError;
use crate::runner::{CommandOutput, CommandRunner};

/// [`CommandRunner`] backed by a real shell.
///
/// Scripts run as `{shell} -c {script}` with both output streams piped, so
/// multi-line scripts with pipes, redirects and `$USER` expansion behave the
/// way an operator typing them would expect.
pub struct ShellRunner {
    shell: PathBuf,
}

impl ShellRunner {
    pub fn new() -> Self {
        Self {
            shell: PathBuf::from("/bin/bash"),
        }
    }

    /// Use a different shell binary.
    pub fn with_shell(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(
        &self,
        script: &str,
        timeout: Option<Duration>,
    ) -> Result<CommandOutput, ExecError> {
        if script.trim().is_empty() {
            return Err(ExecError::EmptyScript);
        }

        trace!(shell = %self.shell.display(), "spawning shell script");

        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c").arg(script);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        // The child is reaped when the timeout arm drops the wait future.
        cmd.kill_on_drop(true);

        let child = cmd.spawn().map_err(|source| ExecError::Spawn {
            shell: self.shell.display().to_string(),
            source,
        })?;

        let gathered = child.wait_with_output();
        let output = match timeout {
            Some(limit) => tokio::time::timeout(limit, gathered)
                .await
                .map_err(|_| ExecError::Timeout { limit })?,
            None => gathered.await,
        }
        .map_err(ExecError::Output)?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(ExecError::NonZeroExit {
                code: output.status.code(),
                stderr,
            });
        }

        debug!("shell script exited successfully");
        Ok(CommandOutput { stdout, stderr })
    }
}

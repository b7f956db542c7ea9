use std::time::Duration;

use thiserror::Error;

/// Errors surfaced when running external commands.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The script was empty or whitespace. Caught before spawning.
    #[error("script is empty")]
    EmptyScript,

    /// The shell itself could not be started.
    #[error("failed to spawn '{shell}': {source}")]
    Spawn {
        shell: String,
        #[source]
        source: std::io::Error,
    },

    /// The process started but its output could not be collected.
    #[error("failed to collect command output: {0}")]
    Output(#[source] std::io::Error),

    /// The command ran and failed. Captured stderr is carried verbatim so
    /// callers can show the operator what the command printed.
    ///
    /// `code` is `None` when the process was terminated by a signal.
    #[error("{}", exit_message(.code, .stderr))]
    NonZeroExit { code: Option<i32>, stderr: String },

    /// The command exceeded its time bound and was killed. Distinct from
    /// [`ExecError::NonZeroExit`] so callers can tell "failed" from "hung".
    #[error("command did not finish within {limit:?}")]
    Timeout { limit: Duration },
}

fn exit_message(code: &Option<i32>, stderr: &str) -> String {
    let reason = match code {
        Some(code) => format!("process exited with non-zero code: {code}"),
        None => "process terminated by signal".to_string(),
    };
    if stderr.trim().is_empty() {
        reason
    } else {
        format!("{reason}: {}", stderr.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::ExecError;

    #[test]
    fn non_zero_exit_message_carries_code_and_stderr() {
        let err = ExecError::NonZeroExit {
            code: Some(2),
            stderr: "mount: permission denied\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "process exited with non-zero code: 2: mount: permission denied"
        );
    }

    #[test]
    fn signal_termination_is_named() {
        let err = ExecError::NonZeroExit {
            code: None,
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "process terminated by signal");
    }
}

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::error;

use roster_exec::ShellRunner;
use roster_join::{
    HttpMasterClient, JoinError, JoinStep, JoinSummary, JoinWorkflow, NodeLayout, load_descriptor,
};
use roster_observe::{LogConfig, init_logging};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    if let Err(err) = init_logging(&LogConfig::default()) {
        eprintln!("logging setup failed: {err}");
        return ExitCode::FAILURE;
    }

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("usage: roster-join <descriptor.json>");
        return ExitCode::from(2);
    };
    let Some(layout) = NodeLayout::from_env() else {
        eprintln!("HOME is not set; cannot locate the node directories");
        return ExitCode::FAILURE;
    };

    match join(&path, layout).await {
        Ok(summary) => {
            println!(
                "node '{}' joined cluster '{}'",
                summary.node, summary.cluster
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(step = %err.step, "join failed");
            eprintln!("{err}");
            if let Some(stderr) = err.command_stderr() {
                eprintln!("--- command stderr ---");
                eprintln!("{}", stderr.trim_end());
            }
            ExitCode::FAILURE
        }
    }
}

async fn join(path: &Path, layout: NodeLayout) -> Result<JoinSummary, JoinError> {
    let descriptor = load_descriptor(path)?;
    let master = HttpMasterClient::new(
        &descriptor.master.hostname,
        descriptor.connection.api_server.port,
    )
    .map_err(|source| JoinError::new(JoinStep::RegisterNode, source))?;
    let workflow = JoinWorkflow::new(master, ShellRunner::new(), layout);
    workflow.run(&descriptor).await
}

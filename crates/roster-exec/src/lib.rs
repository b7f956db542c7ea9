mod error;
pub use error::ExecError;

mod runner;
pub use runner::{CommandOutput, CommandRunner, ShellRunner};

use crate::commands::{CommandError, Output};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Seam between commands and the operating system. Commands assemble argv
/// and hand it here; tests swap in a mock to observe the exact invocation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Run `program` with `args`, capturing both output streams. A non-zero
    /// exit is not an `Err`; it comes back as `Output { successful: false }`.
    /// Only failing to launch the process at all is an error.
    async fn run(&self, program: &str, args: &[String]) -> Result<Output, CommandError>;
}

/// Runs tools as real child processes.
pub struct ProcessRunner;

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<Output, CommandError> {
        debug!(program, ?args, "spawning tool");

        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|source| CommandError::Launch {
                program: program.to_string(),
                source,
            })?;

        Ok(Output::from_process(output))
    }
}

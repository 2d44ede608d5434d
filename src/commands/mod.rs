pub mod git;
pub mod params;
pub mod wp;

pub use params::ParamBag;

use crate::credentials::CredentialError;
use async_trait::async_trait;

/// What a command reported after running.
///
/// A tool that ran but failed is not an error: it is an `Output` with
/// `successful == false`. Errors are reserved for work that never started
/// (missing tool, bad parameters, spawn failure).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub successful: bool,
    pub stdout: String,
    pub stderr: String,
}

impl Output {
    /// Convert a finished process into command output
    pub fn from_process(output: std::process::Output) -> Self {
        Self {
            successful: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    #[allow(dead_code)]
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            successful: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    #[allow(dead_code)]
    pub fn failure(stderr: impl Into<String>) -> Self {
        Self {
            successful: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Errors raised before or while launching a command, as opposed to the
/// command running and reporting failure through its `Output`.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{tool} is not installed or not usable; check your wpflow configuration")]
    ToolMissing { tool: String },

    #[error("command '{command}' requires parameter '{param}'")]
    MissingParam { command: String, param: String },

    #[error("parameter '{param}' of command '{command}' expects a {expected} value")]
    InvalidParam {
        command: String,
        param: String,
        expected: &'static str,
    },

    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error("failed to launch '{program}'")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// The uniform contract every command in either family fulfils
#[async_trait]
pub trait Command: Send + Sync {
    async fn execute(&self) -> Result<Output, CommandError>;
}

// Tests call `unwrap_err()` on `Result<Box<dyn Command>, _>`, which needs the
// Ok type to be `Debug`.
#[cfg(test)]
impl std::fmt::Debug for dyn Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<dyn Command>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_output_from_process_maps_exit_status() {
        use std::os::unix::process::ExitStatusExt;
        use std::process::ExitStatus;

        let ok = std::process::Output {
            status: ExitStatus::from_raw(0),
            stdout: b"done".to_vec(),
            stderr: Vec::new(),
        };
        let output = Output::from_process(ok);
        assert!(output.successful);
        assert_eq!(output.stdout, "done");
        assert!(output.stderr.is_empty());

        let failed = std::process::Output {
            status: ExitStatus::from_raw(256),
            stdout: Vec::new(),
            stderr: b"boom".to_vec(),
        };
        let output = Output::from_process(failed);
        assert!(!output.successful);
        assert_eq!(output.stderr, "boom");
    }

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = CommandError::MissingParam {
            command: "search-replace".to_string(),
            param: "oldValue".to_string(),
        };
        assert!(err.to_string().contains("search-replace"));
        assert!(err.to_string().contains("oldValue"));

        let err = CommandError::ToolMissing {
            tool: "wp-cli".to_string(),
        };
        assert!(err.to_string().contains("wp-cli"));
    }
}

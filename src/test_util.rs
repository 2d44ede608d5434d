//! Fixtures shared by the unit tests: a known configuration, permissive
//! collaborator stand-ins, and a runner that records every invocation.

use crate::commands::{CommandError, Output};
use crate::config::{BehaviorConfig, Config, FlowsConfig, GitConfig, WordPressConfig};
use crate::context::ExecutionContext;
use crate::credentials::{CredentialError, CredentialModel, CredentialStore};
use crate::runner::MockToolRunner;
use crate::tools::ToolCheck;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub fn test_config() -> Config {
    Config {
        wordpress: WordPressConfig {
            path: PathBuf::from("/srv/site"),
            php_binary: "php".to_string(),
            wp_cli: PathBuf::from("/srv/wp-cli.phar"),
        },
        git: GitConfig {
            repository: PathBuf::from("/srv/repo"),
        },
        flows: FlowsConfig { directory: None },
        behavior: BehaviorConfig { verbose: false },
    }
}

/// Tool check that always passes.
pub struct AlwaysOkTools;

#[async_trait]
impl ToolCheck for AlwaysOkTools {
    async fn ensure_wp(&self) -> Result<(), CommandError> {
        Ok(())
    }

    async fn ensure_git(&self) -> Result<(), CommandError> {
        Ok(())
    }
}

/// Tool check that reports every tool as missing.
pub struct NoTools;

#[async_trait]
impl ToolCheck for NoTools {
    async fn ensure_wp(&self) -> Result<(), CommandError> {
        Err(CommandError::ToolMissing {
            tool: "php".to_string(),
        })
    }

    async fn ensure_git(&self) -> Result<(), CommandError> {
        Err(CommandError::ToolMissing {
            tool: "git".to_string(),
        })
    }
}

/// Credential store with nothing configured; authenticated git falls back
/// to a plain `git` invocation.
pub struct NullCredentials;

impl CredentialStore for NullCredentials {
    fn configure(&self, _model: &CredentialModel) -> Result<(), CredentialError> {
        Ok(())
    }

    fn read(&self) -> Result<CredentialModel, CredentialError> {
        Err(CredentialError::NotConfigured)
    }

    fn exists(&self) -> bool {
        false
    }

    fn update(&self, _model: &CredentialModel) -> Result<(), CredentialError> {
        Err(CredentialError::NotConfigured)
    }

    fn git_command(&self) -> Result<String, CredentialError> {
        Ok("git".to_string())
    }
}

/// Context whose runner has no expectations; suits tests that only build
/// commands and never execute them.
pub fn test_context() -> Arc<ExecutionContext> {
    Arc::new(ExecutionContext::new(
        test_config(),
        Arc::new(MockToolRunner::new()),
        Arc::new(AlwaysOkTools),
        Arc::new(NullCredentials),
    ))
}

/// Every argv the recording context's runner has seen, program first.
pub type RecordedCalls = Arc<Mutex<Vec<Vec<String>>>>;

/// Context whose runner records each invocation and reports success.
pub fn recording_context() -> (Arc<ExecutionContext>, RecordedCalls) {
    recording_context_with(|_| Output::success(""))
}

/// Recording context whose runner derives each `Output` from the recorded
/// argv, for scripting failures mid-sequence.
pub fn recording_context_with(
    respond: impl Fn(&[String]) -> Output + Send + 'static,
) -> (Arc<ExecutionContext>, RecordedCalls) {
    let calls: RecordedCalls = Arc::new(Mutex::new(Vec::new()));
    let sink = calls.clone();

    let mut runner = MockToolRunner::new();
    runner.expect_run().returning(move |program, args| {
        let mut argv = vec![program.to_string()];
        argv.extend(args.iter().cloned());
        let output = respond(&argv);
        sink.lock().unwrap().push(argv);
        Ok(output)
    });

    let context = Arc::new(ExecutionContext::new(
        test_config(),
        Arc::new(runner),
        Arc::new(AlwaysOkTools),
        Arc::new(NullCredentials),
    ));
    (context, calls)
}

use crate::config::Config;
use crate::credentials::{CredentialStore, FileCredentialStore};
use crate::runner::{ProcessRunner, ToolRunner};
use crate::tools::{SystemToolCheck, ToolCheck};
use std::sync::Arc;

/// Shared services handed to every command builder: the configuration plus
/// the seams through which commands reach the outside world. Tests swap any
/// of them for mocks.
pub struct ExecutionContext {
    pub config: Config,
    pub runner: Arc<dyn ToolRunner>,
    pub tools: Arc<dyn ToolCheck>,
    pub credentials: Arc<dyn CredentialStore>,
}

impl ExecutionContext {
    pub fn new(
        config: Config,
        runner: Arc<dyn ToolRunner>,
        tools: Arc<dyn ToolCheck>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            config,
            runner,
            tools,
            credentials,
        }
    }

    /// Wire up the production implementations for `config`.
    pub fn from_config(config: Config) -> Self {
        let tools = SystemToolCheck::new(&config);
        let credentials = FileCredentialStore::new(config.credentials_path());

        Self {
            config,
            runner: Arc::new(ProcessRunner),
            tools: Arc::new(tools),
            credentials: Arc::new(credentials),
        }
    }
}

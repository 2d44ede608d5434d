//! Site-level commands: cache flushing and maintenance mode.

use super::run_wp;
use crate::catalog::types::{BuildResult, CommandGroup, CommandSpec, ParamInfo, ParamKind};
use crate::commands::{Command, CommandError, Output, ParamBag};
use crate::context::ExecutionContext;
use async_trait::async_trait;
use std::sync::Arc;

pub fn specs() -> Vec<CommandSpec> {
    vec![CacheFlushCommand::spec(), MaintenanceModeCommand::spec()]
}

/// `wp cache flush`
pub struct CacheFlushCommand {
    context: Arc<ExecutionContext>,
}

impl CacheFlushCommand {
    pub const NAME: &'static str = "cache-flush";

    pub fn spec() -> CommandSpec {
        CommandSpec::no_params::<Self>(
            Self::NAME,
            CommandGroup::Wp,
            "flush the object cache",
            Self::build,
        )
    }

    pub fn build(context: Arc<ExecutionContext>) -> BuildResult {
        Ok(Box::new(Self { context }))
    }
}

#[async_trait]
impl Command for CacheFlushCommand {
    async fn execute(&self) -> Result<Output, CommandError> {
        run_wp(&self.context, vec!["cache".to_string(), "flush".to_string()]).await
    }
}

/// `wp maintenance-mode activate|deactivate`
pub struct MaintenanceModeCommand {
    context: Arc<ExecutionContext>,
    enable: bool,
}

impl MaintenanceModeCommand {
    pub const NAME: &'static str = "maintenance-mode";

    pub fn spec() -> CommandSpec {
        CommandSpec::with_params::<Self>(
            Self::NAME,
            CommandGroup::Wp,
            "toggle maintenance mode",
            vec![ParamInfo::required(
                "enable",
                ParamKind::Boolean,
                "true activates maintenance mode, false deactivates it",
            )],
            Self::build,
        )
    }

    pub fn build(context: Arc<ExecutionContext>, params: ParamBag) -> BuildResult {
        Ok(Box::new(Self {
            enable: params.required_bool(Self::NAME, "enable")?,
            context,
        }))
    }

    fn args(&self) -> Vec<String> {
        let action = if self.enable { "activate" } else { "deactivate" };
        vec!["maintenance-mode".to_string(), action.to_string()]
    }
}

#[async_trait]
impl Command for MaintenanceModeCommand {
    async fn execute(&self) -> Result<Output, CommandError> {
        run_wp(&self.context, self.args()).await
    }
}

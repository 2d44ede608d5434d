//! Read-only inspection: status and log.

use super::run_git;
use crate::catalog::types::{BuildResult, CommandGroup, CommandSpec, ParamInfo, ParamKind};
use crate::commands::{Command, CommandError, Output, ParamBag};
use crate::context::ExecutionContext;
use async_trait::async_trait;
use std::sync::Arc;

pub fn specs() -> Vec<CommandSpec> {
    vec![StatusCommand::spec(), LogCommand::spec()]
}

/// `git status`
pub struct StatusCommand {
    context: Arc<ExecutionContext>,
}

impl StatusCommand {
    pub const NAME: &'static str = "git-status";

    pub fn spec() -> CommandSpec {
        CommandSpec::no_params::<Self>(
            Self::NAME,
            CommandGroup::Git,
            "show the working tree status",
            Self::build,
        )
    }

    pub fn build(context: Arc<ExecutionContext>) -> BuildResult {
        Ok(Box::new(Self { context }))
    }
}

#[async_trait]
impl Command for StatusCommand {
    async fn execute(&self) -> Result<Output, CommandError> {
        run_git(&self.context, vec!["status".to_string()]).await
    }
}

/// `git log --oneline -n <maxCount>`
pub struct LogCommand {
    context: Arc<ExecutionContext>,
    max_count: i64,
}

impl LogCommand {
    pub const NAME: &'static str = "git-log";

    pub fn spec() -> CommandSpec {
        CommandSpec::with_params::<Self>(
            Self::NAME,
            CommandGroup::Git,
            "show recent commits",
            vec![ParamInfo::optional(
                "maxCount",
                ParamKind::Integer,
                "10",
                "number of commits to show",
            )],
            Self::build,
        )
    }

    pub fn build(context: Arc<ExecutionContext>, params: ParamBag) -> BuildResult {
        Ok(Box::new(Self {
            max_count: params.int_or("maxCount", 10),
            context,
        }))
    }

    fn args(&self) -> Vec<String> {
        vec![
            "log".to_string(),
            "--oneline".to_string(),
            "-n".to_string(),
            self.max_count.to_string(),
        ]
    }
}

#[async_trait]
impl Command for LogCommand {
    async fn execute(&self) -> Result<Output, CommandError> {
        run_git(&self.context, self.args()).await
    }
}

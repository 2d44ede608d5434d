//! WordPress core commands: version reporting and updates.

use super::run_wp;
use crate::catalog::types::{BuildResult, CommandGroup, CommandSpec, ParamInfo, ParamKind};
use crate::commands::{Command, CommandError, Output, ParamBag};
use crate::context::ExecutionContext;
use async_trait::async_trait;
use std::sync::Arc;

pub fn specs() -> Vec<CommandSpec> {
    vec![CoreVersionCommand::spec(), CoreUpdateCommand::spec()]
}

/// `wp core version`
pub struct CoreVersionCommand {
    context: Arc<ExecutionContext>,
}

impl CoreVersionCommand {
    pub const NAME: &'static str = "core-version";

    pub fn spec() -> CommandSpec {
        CommandSpec::no_params::<Self>(
            Self::NAME,
            CommandGroup::Wp,
            "report the installed WordPress version",
            Self::build,
        )
    }

    pub fn build(context: Arc<ExecutionContext>) -> BuildResult {
        Ok(Box::new(Self { context }))
    }
}

#[async_trait]
impl Command for CoreVersionCommand {
    async fn execute(&self) -> Result<Output, CommandError> {
        run_wp(
            &self.context,
            vec!["core".to_string(), "version".to_string()],
        )
        .await
    }
}

/// `wp core update`: update WordPress itself, optionally pinned to a
/// version or restricted to minor releases.
pub struct CoreUpdateCommand {
    context: Arc<ExecutionContext>,
    version: String,
    minor: bool,
}

impl CoreUpdateCommand {
    pub const NAME: &'static str = "core-update";

    pub fn spec() -> CommandSpec {
        CommandSpec::with_params::<Self>(
            Self::NAME,
            CommandGroup::Wp,
            "update WordPress core",
            vec![
                ParamInfo::optional(
                    "version",
                    ParamKind::String,
                    "",
                    "exact version to update to; latest when empty",
                ),
                ParamInfo::optional(
                    "minor",
                    ParamKind::Boolean,
                    "false",
                    "only apply minor releases",
                ),
            ],
            Self::build,
        )
    }

    pub fn build(context: Arc<ExecutionContext>, params: ParamBag) -> BuildResult {
        Ok(Box::new(Self {
            version: params.str_or("version", ""),
            minor: params.bool_or("minor", false),
            context,
        }))
    }

    fn args(&self) -> Vec<String> {
        let mut args = vec!["core".to_string(), "update".to_string()];
        if !self.version.is_empty() {
            args.push(format!("--version={}", self.version));
        }
        if self.minor {
            args.push("--minor".to_string());
        }
        args
    }
}

#[async_trait]
impl Command for CoreUpdateCommand {
    async fn execute(&self) -> Result<Output, CommandError> {
        run_wp(&self.context, self.args()).await
    }
}

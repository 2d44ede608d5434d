//! Remote synchronization: push and pull, both routed through the
//! credential store's git invocation.

use super::run_git_authed;
use crate::catalog::types::{BuildResult, CommandGroup, CommandSpec, ParamInfo, ParamKind};
use crate::commands::{Command, CommandError, Output, ParamBag};
use crate::context::ExecutionContext;
use async_trait::async_trait;
use std::sync::Arc;

pub fn specs() -> Vec<CommandSpec> {
    vec![PushCommand::spec(), PullCommand::spec()]
}

fn remote_params() -> Vec<ParamInfo> {
    vec![
        ParamInfo::optional("remote", ParamKind::String, "origin", "remote name"),
        ParamInfo::optional(
            "branch",
            ParamKind::String,
            "",
            "branch to sync; the current branch when empty",
        ),
    ]
}

fn sync_args(action: &str, remote: &str, branch: &str) -> Vec<String> {
    let mut args = vec![action.to_string(), remote.to_string()];
    if !branch.is_empty() {
        args.push(branch.to_string());
    }
    args
}

/// `git push [remote] [branch]`
pub struct PushCommand {
    context: Arc<ExecutionContext>,
    remote: String,
    branch: String,
}

impl PushCommand {
    pub const NAME: &'static str = "git-push";

    pub fn spec() -> CommandSpec {
        CommandSpec::with_params::<Self>(
            Self::NAME,
            CommandGroup::Git,
            "push commits to a remote",
            remote_params(),
            Self::build,
        )
    }

    pub fn build(context: Arc<ExecutionContext>, params: ParamBag) -> BuildResult {
        Ok(Box::new(Self {
            remote: params.str_or("remote", "origin"),
            branch: params.str_or("branch", ""),
            context,
        }))
    }
}

#[async_trait]
impl Command for PushCommand {
    async fn execute(&self) -> Result<Output, CommandError> {
        let args = sync_args("push", &self.remote, &self.branch);
        run_git_authed(&self.context, args).await
    }
}

/// `git pull [remote] [branch]`
pub struct PullCommand {
    context: Arc<ExecutionContext>,
    remote: String,
    branch: String,
}

impl PullCommand {
    pub const NAME: &'static str = "git-pull";

    pub fn spec() -> CommandSpec {
        CommandSpec::with_params::<Self>(
            Self::NAME,
            CommandGroup::Git,
            "fetch and integrate from a remote",
            remote_params(),
            Self::build,
        )
    }

    pub fn build(context: Arc<ExecutionContext>, params: ParamBag) -> BuildResult {
        Ok(Box::new(Self {
            remote: params.str_or("remote", "origin"),
            branch: params.str_or("branch", ""),
            context,
        }))
    }
}

#[async_trait]
impl Command for PullCommand {
    async fn execute(&self) -> Result<Output, CommandError> {
        let args = sync_args("pull", &self.remote, &self.branch);
        run_git_authed(&self.context, args).await
    }
}

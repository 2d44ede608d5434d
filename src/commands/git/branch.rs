//! Branch management: checkout and listing.

use super::run_git;
use crate::catalog::types::{BuildResult, CommandGroup, CommandSpec, ParamInfo, ParamKind};
use crate::commands::{Command, CommandError, Output, ParamBag};
use crate::context::ExecutionContext;
use async_trait::async_trait;
use std::sync::Arc;

pub fn specs() -> Vec<CommandSpec> {
    vec![CheckoutCommand::spec(), BranchCommand::spec()]
}

/// `git checkout [-b] <branch>`
pub struct CheckoutCommand {
    context: Arc<ExecutionContext>,
    branch: String,
    create: bool,
}

impl CheckoutCommand {
    pub const NAME: &'static str = "git-checkout";

    pub fn spec() -> CommandSpec {
        CommandSpec::with_params::<Self>(
            Self::NAME,
            CommandGroup::Git,
            "switch branches",
            vec![
                ParamInfo::required("branch", ParamKind::String, "branch to switch to"),
                ParamInfo::optional(
                    "create",
                    ParamKind::Boolean,
                    "false",
                    "create the branch first",
                ),
            ],
            Self::build,
        )
    }

    pub fn build(context: Arc<ExecutionContext>, params: ParamBag) -> BuildResult {
        Ok(Box::new(Self {
            branch: params.required_str(Self::NAME, "branch")?,
            create: params.bool_or("create", false),
            context,
        }))
    }

    fn args(&self) -> Vec<String> {
        let mut args = vec!["checkout".to_string()];
        if self.create {
            args.push("-b".to_string());
        }
        args.push(self.branch.clone());
        args
    }
}

#[async_trait]
impl Command for CheckoutCommand {
    async fn execute(&self) -> Result<Output, CommandError> {
        run_git(&self.context, self.args()).await
    }
}

/// `git branch`: list local branches.
pub struct BranchCommand {
    context: Arc<ExecutionContext>,
}

impl BranchCommand {
    pub const NAME: &'static str = "git-branch";

    pub fn spec() -> CommandSpec {
        CommandSpec::no_params::<Self>(
            Self::NAME,
            CommandGroup::Git,
            "list local branches",
            Self::build,
        )
    }

    pub fn build(context: Arc<ExecutionContext>) -> BuildResult {
        Ok(Box::new(Self { context }))
    }
}

#[async_trait]
impl Command for BranchCommand {
    async fn execute(&self) -> Result<Output, CommandError> {
        run_git(&self.context, vec!["branch".to_string()]).await
    }
}

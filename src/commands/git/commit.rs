//! Staging and committing.

use super::run_git;
use crate::catalog::types::{BuildResult, CommandGroup, CommandSpec, ParamInfo, ParamKind};
use crate::commands::{Command, CommandError, Output, ParamBag};
use crate::context::ExecutionContext;
use async_trait::async_trait;
use std::sync::Arc;

pub fn specs() -> Vec<CommandSpec> {
    vec![AddCommand::spec(), CommitCommand::spec()]
}

/// `git add <pathspec>`
pub struct AddCommand {
    context: Arc<ExecutionContext>,
    pathspec: String,
}

impl AddCommand {
    pub const NAME: &'static str = "git-add";

    pub fn spec() -> CommandSpec {
        CommandSpec::with_params::<Self>(
            Self::NAME,
            CommandGroup::Git,
            "stage changes",
            vec![ParamInfo::optional(
                "pathspec",
                ParamKind::String,
                ".",
                "paths to stage; everything by default",
            )],
            Self::build,
        )
    }

    pub fn build(context: Arc<ExecutionContext>, params: ParamBag) -> BuildResult {
        Ok(Box::new(Self {
            pathspec: params.str_or("pathspec", "."),
            context,
        }))
    }
}

#[async_trait]
impl Command for AddCommand {
    async fn execute(&self) -> Result<Output, CommandError> {
        run_git(
            &self.context,
            vec!["add".to_string(), self.pathspec.clone()],
        )
        .await
    }
}

/// `git commit -m <message>`
pub struct CommitCommand {
    context: Arc<ExecutionContext>,
    message: String,
}

impl CommitCommand {
    pub const NAME: &'static str = "git-commit";

    pub fn spec() -> CommandSpec {
        CommandSpec::with_params::<Self>(
            Self::NAME,
            CommandGroup::Git,
            "record staged changes",
            vec![ParamInfo::required(
                "message",
                ParamKind::String,
                "commit message",
            )],
            Self::build,
        )
    }

    pub fn build(context: Arc<ExecutionContext>, params: ParamBag) -> BuildResult {
        Ok(Box::new(Self {
            message: params.required_str(Self::NAME, "message")?,
            context,
        }))
    }
}

#[async_trait]
impl Command for CommitCommand {
    async fn execute(&self) -> Result<Output, CommandError> {
        let args = vec![
            "commit".to_string(),
            "-m".to_string(),
            self.message.clone(),
        ];
        run_git(&self.context, args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{recording_context, test_context};
    use serde_json::json;

    #[test]
    fn test_commit_requires_a_message() {
        let err = CommitCommand::build(test_context(), ParamBag::new())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            CommandError::MissingParam { ref param, .. } if param == "message"
        ));
    }

    #[tokio::test]
    async fn test_add_defaults_to_everything() {
        let (context, calls) = recording_context();

        AddCommand::build(context, ParamBag::new())
            .unwrap()
            .execute()
            .await
            .unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls[0], vec!["git", "-C", "/srv/repo", "add", "."]);
    }

    #[tokio::test]
    async fn test_commit_passes_the_message_verbatim() {
        let (context, calls) = recording_context();

        let mut params = ParamBag::new();
        params.insert("message", json!("release: retarget URLs"));
        CommitCommand::build(context, params)
            .unwrap()
            .execute()
            .await
            .unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(
            calls[0],
            vec![
                "git",
                "-C",
                "/srv/repo",
                "commit",
                "-m",
                "release: retarget URLs"
            ]
        );
    }
}

//! Git command family. Most commands address the configured repository
//! with `git -C <repository>`; the ones that talk to a remote route their
//! invocation through the credential store so a configured SSH key is
//! picked up transparently.

pub mod branch;
pub mod clone;
pub mod commit;
pub mod inspect;
pub mod sync;

use crate::catalog::types::CommandSpec;
use crate::commands::{CommandError, Output};
use crate::context::ExecutionContext;
use crate::credentials::CredentialError;

/// Registration records for every git command.
pub fn manifest() -> Vec<CommandSpec> {
    let mut specs = Vec::new();
    specs.extend(clone::specs());
    specs.extend(commit::specs());
    specs.extend(sync::specs());
    specs.extend(branch::specs());
    specs.extend(inspect::specs());
    specs
}

/// Run git against the configured repository: `git -C <repository> <args…>`.
pub(crate) async fn run_git(
    context: &ExecutionContext,
    args: Vec<String>,
) -> Result<Output, CommandError> {
    context.tools.ensure_git().await?;

    let mut argv = repository_argv(context);
    argv.extend(args);
    context.runner.run("git", &argv).await
}

/// Like [`run_git`], but the program and its leading flags come from the
/// credential store, so SSH-configured installations get their key pinned
/// via `core.sshCommand`.
pub(crate) async fn run_git_authed(
    context: &ExecutionContext,
    args: Vec<String>,
) -> Result<Output, CommandError> {
    context.tools.ensure_git().await?;

    let (program, mut argv) = authed_invocation(context)?;
    argv.extend(repository_argv(context));
    argv.extend(args);
    context.runner.run(&program, &argv).await
}

/// Split the credential store's git invocation into program + leading args.
pub(crate) fn authed_invocation(
    context: &ExecutionContext,
) -> Result<(String, Vec<String>), CommandError> {
    let invocation = context.credentials.git_command()?;
    let mut parts = shell_words::split(&invocation).map_err(|_| {
        CommandError::Credentials(CredentialError::Malformed {
            reason: format!("unparsable git invocation '{invocation}'"),
        })
    })?;

    if parts.is_empty() {
        return Err(CommandError::Credentials(CredentialError::Malformed {
            reason: "empty git invocation".to_string(),
        }));
    }

    let program = parts.remove(0);
    Ok((program, parts))
}

fn repository_argv(context: &ExecutionContext) -> Vec<String> {
    vec![
        "-C".to_string(),
        context.config.git.repository.display().to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::credentials::{
        CredentialModel, CredentialStore, FileCredentialStore, MockCredentialStore,
    };
    use crate::runner::MockToolRunner;
    use crate::test_util::{recording_context, test_config, AlwaysOkTools};
    use std::sync::Arc;

    fn context_with_store(store: FileCredentialStore, config: Config) -> Arc<ExecutionContext> {
        Arc::new(ExecutionContext::new(
            config,
            Arc::new(MockToolRunner::new()),
            Arc::new(AlwaysOkTools),
            Arc::new(store),
        ))
    }

    #[tokio::test]
    async fn test_run_git_addresses_the_configured_repository() {
        let (context, calls) = recording_context();

        run_git(&context, vec!["status".to_string()]).await.unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls[0], vec!["git", "-C", "/srv/repo", "status"]);
    }

    #[test]
    fn test_authed_invocation_splits_the_ssh_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));
        store
            .configure(&CredentialModel::ssh("/home/deploy/.ssh/id_ed25519"))
            .unwrap();

        let context = context_with_store(store, test_config());
        let (program, args) = authed_invocation(&context).unwrap();

        assert_eq!(program, "git");
        assert_eq!(args[0], "-c");
        assert!(args[1].starts_with("core.sshCommand=ssh -i "));
    }

    #[test]
    fn test_authed_invocation_without_credentials_is_plain_git() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));

        let context = context_with_store(store, test_config());
        let (program, args) = authed_invocation(&context).unwrap();

        assert_eq!(program, "git");
        assert!(args.is_empty());
    }

    #[test]
    fn test_an_empty_git_invocation_is_malformed() {
        let mut store = MockCredentialStore::new();
        store.expect_git_command().returning(|| Ok(String::new()));

        let context = Arc::new(ExecutionContext::new(
            test_config(),
            Arc::new(MockToolRunner::new()),
            Arc::new(AlwaysOkTools),
            Arc::new(store),
        ));

        let err = authed_invocation(&context).unwrap_err();
        assert!(matches!(
            err,
            CommandError::Credentials(CredentialError::Malformed { .. })
        ));
    }
}

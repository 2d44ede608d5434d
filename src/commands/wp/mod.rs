//! WP-CLI command family. Every command shells out through [`run_wp`],
//! which launches the configured PHP interpreter against the WP-CLI phar
//! and pins the installation with `--path`.

pub mod core;
pub mod db;
pub mod plugin;
pub mod search_replace;
pub mod site;

use crate::catalog::types::CommandSpec;
use crate::commands::{CommandError, Output};
use crate::context::ExecutionContext;

/// Registration records for every WP command.
pub fn manifest() -> Vec<CommandSpec> {
    let mut specs = vec![search_replace::SearchReplaceCommand::spec()];
    specs.extend(db::specs());
    specs.extend(core::specs());
    specs.extend(plugin::specs());
    specs.extend(site::specs());
    specs
}

/// Run one WP-CLI invocation: `<php> <wp-cli.phar> <args…> --path=<site>`.
/// Verifies the toolchain first, so a missing interpreter or phar surfaces
/// as `ToolMissing` before anything is launched.
pub(crate) async fn run_wp(
    context: &ExecutionContext,
    args: Vec<String>,
) -> Result<Output, CommandError> {
    context.tools.ensure_wp().await?;

    let wordpress = &context.config.wordpress;
    let mut argv = vec![wordpress.wp_cli.display().to_string()];
    argv.extend(args);
    argv.push(format!("--path={}", wordpress.path.display()));

    context.runner.run(&wordpress.php_binary, &argv).await
}

//! Plugin management commands.

use super::run_wp;
use crate::catalog::types::{BuildResult, CommandGroup, CommandSpec, ParamInfo, ParamKind};
use crate::commands::{Command, CommandError, Output, ParamBag};
use crate::context::ExecutionContext;
use async_trait::async_trait;
use std::sync::Arc;

pub fn specs() -> Vec<CommandSpec> {
    vec![PluginInstallCommand::spec(), PluginListCommand::spec()]
}

/// `wp plugin install`: fetch a plugin from the directory, optionally
/// pinning a version and activating it in the same step.
pub struct PluginInstallCommand {
    context: Arc<ExecutionContext>,
    plugin: String,
    version: String,
    activate: bool,
}

impl PluginInstallCommand {
    pub const NAME: &'static str = "plugin-install";

    pub fn spec() -> CommandSpec {
        CommandSpec::with_params::<Self>(
            Self::NAME,
            CommandGroup::Wp,
            "install a plugin",
            vec![
                ParamInfo::required("plugin", ParamKind::String, "plugin slug, zip path, or URL"),
                ParamInfo::optional(
                    "version",
                    ParamKind::String,
                    "",
                    "exact version to install; latest when empty",
                ),
                ParamInfo::optional(
                    "activate",
                    ParamKind::Boolean,
                    "false",
                    "activate after installing",
                ),
            ],
            Self::build,
        )
    }

    pub fn build(context: Arc<ExecutionContext>, params: ParamBag) -> BuildResult {
        Ok(Box::new(Self {
            plugin: params.required_str(Self::NAME, "plugin")?,
            version: params.str_or("version", ""),
            activate: params.bool_or("activate", false),
            context,
        }))
    }

    fn args(&self) -> Vec<String> {
        let mut args = vec![
            "plugin".to_string(),
            "install".to_string(),
            self.plugin.clone(),
        ];
        if !self.version.is_empty() {
            args.push(format!("--version={}", self.version));
        }
        if self.activate {
            args.push("--activate".to_string());
        }
        args
    }
}

#[async_trait]
impl Command for PluginInstallCommand {
    async fn execute(&self) -> Result<Output, CommandError> {
        run_wp(&self.context, self.args()).await
    }
}

/// `wp plugin list`, optionally filtered by activation status.
pub struct PluginListCommand {
    context: Arc<ExecutionContext>,
    status: String,
}

impl PluginListCommand {
    pub const NAME: &'static str = "plugin-list";

    pub fn spec() -> CommandSpec {
        CommandSpec::with_params::<Self>(
            Self::NAME,
            CommandGroup::Wp,
            "list installed plugins",
            vec![ParamInfo::optional(
                "status",
                ParamKind::String,
                "",
                "filter by status: active, inactive, must-use, dropin",
            )],
            Self::build,
        )
    }

    pub fn build(context: Arc<ExecutionContext>, params: ParamBag) -> BuildResult {
        Ok(Box::new(Self {
            status: params.str_or("status", ""),
            context,
        }))
    }

    fn args(&self) -> Vec<String> {
        let mut args = vec!["plugin".to_string(), "list".to_string()];
        if !self.status.is_empty() {
            args.push(format!("--status={}", self.status));
        }
        args
    }
}

#[async_trait]
impl Command for PluginListCommand {
    async fn execute(&self) -> Result<Output, CommandError> {
        run_wp(&self.context, self.args()).await
    }
}

//! Database maintenance commands: export, import, repair, optimize.

use super::run_wp;
use crate::catalog::types::{BuildResult, CommandGroup, CommandSpec, ParamInfo, ParamKind};
use crate::commands::{Command, CommandError, Output, ParamBag};
use crate::context::ExecutionContext;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

pub fn specs() -> Vec<CommandSpec> {
    vec![
        DbExportCommand::spec(),
        DbImportCommand::spec(),
        DbRepairCommand::spec(),
        DbOptimizeCommand::spec(),
    ]
}

/// `wp db export`: dump the database to a SQL file. With no target file,
/// WP-CLI picks a timestamped name in the installation directory.
pub struct DbExportCommand {
    context: Arc<ExecutionContext>,
    output_file: PathBuf,
}

impl DbExportCommand {
    pub const NAME: &'static str = "db-export";

    pub fn spec() -> CommandSpec {
        CommandSpec::with_params::<Self>(
            Self::NAME,
            CommandGroup::Wp,
            "dump the database to a SQL file",
            vec![ParamInfo::optional(
                "outputFile",
                ParamKind::Path,
                "",
                "target file; WP-CLI picks a name when empty",
            )],
            Self::build,
        )
    }

    pub fn build(context: Arc<ExecutionContext>, params: ParamBag) -> BuildResult {
        Ok(Box::new(Self {
            output_file: params.path_or("outputFile", ""),
            context,
        }))
    }

    fn args(&self) -> Vec<String> {
        let mut args = vec!["db".to_string(), "export".to_string()];
        if !self.output_file.as_os_str().is_empty() {
            args.push(self.output_file.display().to_string());
        }
        args
    }
}

#[async_trait]
impl Command for DbExportCommand {
    async fn execute(&self) -> Result<Output, CommandError> {
        run_wp(&self.context, self.args()).await
    }
}

/// `wp db import`: load a SQL dump into the database.
pub struct DbImportCommand {
    context: Arc<ExecutionContext>,
    input_file: PathBuf,
}

impl DbImportCommand {
    pub const NAME: &'static str = "db-import";

    pub fn spec() -> CommandSpec {
        CommandSpec::with_params::<Self>(
            Self::NAME,
            CommandGroup::Wp,
            "load a SQL dump into the database",
            vec![ParamInfo::required(
                "inputFile",
                ParamKind::Path,
                "SQL dump to import",
            )],
            Self::build,
        )
    }

    pub fn build(context: Arc<ExecutionContext>, params: ParamBag) -> BuildResult {
        Ok(Box::new(Self {
            input_file: params.required_path(Self::NAME, "inputFile")?,
            context,
        }))
    }
}

#[async_trait]
impl Command for DbImportCommand {
    async fn execute(&self) -> Result<Output, CommandError> {
        let args = vec![
            "db".to_string(),
            "import".to_string(),
            self.input_file.display().to_string(),
        ];
        run_wp(&self.context, args).await
    }
}

/// `wp db repair`
pub struct DbRepairCommand {
    context: Arc<ExecutionContext>,
}

impl DbRepairCommand {
    pub const NAME: &'static str = "db-repair";

    pub fn spec() -> CommandSpec {
        CommandSpec::no_params::<Self>(
            Self::NAME,
            CommandGroup::Wp,
            "repair the database tables",
            Self::build,
        )
    }

    pub fn build(context: Arc<ExecutionContext>) -> BuildResult {
        Ok(Box::new(Self { context }))
    }
}

#[async_trait]
impl Command for DbRepairCommand {
    async fn execute(&self) -> Result<Output, CommandError> {
        run_wp(&self.context, vec!["db".to_string(), "repair".to_string()]).await
    }
}

/// `wp db optimize`
pub struct DbOptimizeCommand {
    context: Arc<ExecutionContext>,
}

impl DbOptimizeCommand {
    pub const NAME: &'static str = "db-optimize";

    pub fn spec() -> CommandSpec {
        CommandSpec::no_params::<Self>(
            Self::NAME,
            CommandGroup::Wp,
            "optimize the database tables",
            Self::build,
        )
    }

    pub fn build(context: Arc<ExecutionContext>) -> BuildResult {
        Ok(Box::new(Self { context }))
    }
}

#[async_trait]
impl Command for DbOptimizeCommand {
    async fn execute(&self) -> Result<Output, CommandError> {
        run_wp(&self.context, vec!["db".to_string(), "optimize".to_string()]).await
    }
}

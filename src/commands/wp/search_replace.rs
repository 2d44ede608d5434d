use super::run_wp;
use crate::catalog::types::{BuildResult, CommandGroup, CommandSpec, ParamInfo, ParamKind};
use crate::commands::{Command, CommandError, Output, ParamBag};
use crate::context::ExecutionContext;
use async_trait::async_trait;
use std::sync::Arc;

/// `wp search-replace`: rewrite a string across the WordPress database,
/// most commonly to retarget site URLs after moving an installation.
pub struct SearchReplaceCommand {
    context: Arc<ExecutionContext>,
    old_value: String,
    new_value: String,
    all_tables: bool,
    dry_run: bool,
}

impl SearchReplaceCommand {
    pub const NAME: &'static str = "search-replace";

    pub fn spec() -> CommandSpec {
        CommandSpec::with_params::<Self>(
            Self::NAME,
            CommandGroup::Wp,
            "replace a string across the database",
            vec![
                ParamInfo::required("oldValue", ParamKind::String, "text to search for"),
                ParamInfo::required("newValue", ParamKind::String, "replacement text"),
                ParamInfo::optional(
                    "allTables",
                    ParamKind::Boolean,
                    "false",
                    "include every table, not just the ones registered to the site",
                ),
                ParamInfo::optional(
                    "dryRun",
                    ParamKind::Boolean,
                    "false",
                    "report matches without writing",
                ),
            ],
            Self::build,
        )
    }

    pub fn build(context: Arc<ExecutionContext>, params: ParamBag) -> BuildResult {
        Ok(Box::new(Self {
            old_value: params.required_str(Self::NAME, "oldValue")?,
            new_value: params.required_str(Self::NAME, "newValue")?,
            all_tables: params.bool_or("allTables", false),
            dry_run: params.bool_or("dryRun", false),
            context,
        }))
    }

    fn args(&self) -> Vec<String> {
        let mut args = vec![
            "search-replace".to_string(),
            self.old_value.clone(),
            self.new_value.clone(),
        ];
        if self.all_tables {
            args.push("--all-tables".to_string());
        }
        if self.dry_run {
            args.push("--dry-run".to_string());
        }
        args
    }
}

#[async_trait]
impl Command for SearchReplaceCommand {
    async fn execute(&self) -> Result<Output, CommandError> {
        run_wp(&self.context, self.args()).await
    }
}

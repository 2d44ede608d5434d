use crate::catalog::types::{Builder, CommandGroup};
use crate::catalog::CommandRegistry;
use crate::commands::{Command, CommandError, ParamBag};
use crate::context::ExecutionContext;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("the {group} family has no command named '{name}'")]
    NotFound { group: CommandGroup, name: String },

    #[error("failed to assemble command '{name}'")]
    Instantiation {
        name: String,
        #[source]
        source: CommandError,
    },
}

/// Assembles runnable commands for one family out of the shared catalog.
/// The executor holds one factory per group; both share the same registry
/// and execution context.
pub struct CommandFactory {
    group: CommandGroup,
    registry: Arc<CommandRegistry>,
    context: Arc<ExecutionContext>,
}

impl CommandFactory {
    pub fn new(
        group: CommandGroup,
        registry: Arc<CommandRegistry>,
        context: Arc<ExecutionContext>,
    ) -> Self {
        Self {
            group,
            registry,
            context,
        }
    }

    #[allow(dead_code)]
    pub fn group(&self) -> CommandGroup {
        self.group
    }

    /// Assemble `name` with `params`. A name outside this family's slice of
    /// the catalog is `NotFound` before any construction happens; a builder
    /// rejecting its input is `Instantiation`.
    pub fn create(&self, name: &str, params: ParamBag) -> Result<Box<dyn Command>, FactoryError> {
        let spec = self
            .registry
            .spec(name)
            .filter(|spec| spec.info.group == self.group)
            .ok_or_else(|| FactoryError::NotFound {
                group: self.group,
                name: name.to_string(),
            })?;

        debug!(command = name, group = %self.group, "assembling command");

        let built = match spec.builder {
            Builder::WithParams(build) => build(self.context.clone(), params),
            Builder::NoParams(build) => build(self.context.clone()),
        };

        built.map_err(|source| FactoryError::Instantiation {
            name: name.to_string(),
            source,
        })
    }
}

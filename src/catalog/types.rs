use crate::commands::{Command, CommandError, ParamBag};
use crate::context::ExecutionContext;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The two command families the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CommandGroup {
    Wp,
    Git,
}

impl CommandGroup {
    /// Parse a wire-level group string, case-insensitively. Flow records
    /// carry the group as free text, so an unrecognized value is `None`
    /// rather than an error.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "WP" => Some(Self::Wp),
            "GIT" => Some(Self::Git),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wp => "WP",
            Self::Git => "GIT",
        }
    }
}

impl fmt::Display for CommandGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value kind a parameter expects; accessors on [`ParamBag`] coerce
/// wire-level JSON scalars to these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Boolean,
    Integer,
    #[allow(dead_code)]
    Float,
    Path,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Path => "path",
        };
        f.write_str(name)
    }
}

/// Declared metadata for one parameter of a command. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamInfo {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub default: Option<&'static str>,
    pub description: &'static str,
}

impl ParamInfo {
    pub fn required(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: None,
            description,
        }
    }

    pub fn optional(
        name: &'static str,
        kind: ParamKind,
        default: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: Some(default),
            description,
        }
    }
}

/// Catalog entry describing one command: its unique name within the group,
/// the concrete type behind it, and its parameters in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandInfo {
    pub name: &'static str,
    pub group: CommandGroup,
    pub description: &'static str,
    /// Rust type name of the implementing command, captured at registration
    pub implementation: &'static str,
    pub params: Vec<ParamInfo>,
}

pub type BuildResult = Result<Box<dyn Command>, CommandError>;

/// How a command is assembled from the shared context and a step's
/// parameters. The variant is fixed at registration time, so zero-parameter
/// commands never see a parameter bag.
#[derive(Clone, Copy)]
pub enum Builder {
    WithParams(fn(Arc<ExecutionContext>, ParamBag) -> BuildResult),
    NoParams(fn(Arc<ExecutionContext>) -> BuildResult),
}

/// One registration record: the descriptive metadata plus the builder that
/// turns it into a runnable command.
#[derive(Clone)]
pub struct CommandSpec {
    pub info: CommandInfo,
    pub builder: Builder,
}

impl CommandSpec {
    pub fn with_params<C: Command + 'static>(
        name: &'static str,
        group: CommandGroup,
        description: &'static str,
        params: Vec<ParamInfo>,
        builder: fn(Arc<ExecutionContext>, ParamBag) -> BuildResult,
    ) -> Self {
        Self {
            info: CommandInfo {
                name,
                group,
                description,
                implementation: std::any::type_name::<C>(),
                params,
            },
            builder: Builder::WithParams(builder),
        }
    }

    pub fn no_params<C: Command + 'static>(
        name: &'static str,
        group: CommandGroup,
        description: &'static str,
        builder: fn(Arc<ExecutionContext>) -> BuildResult,
    ) -> Self {
        Self {
            info: CommandInfo {
                name,
                group,
                description,
                implementation: std::any::type_name::<C>(),
                params: Vec::new(),
            },
            builder: Builder::NoParams(builder),
        }
    }
}

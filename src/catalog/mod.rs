pub mod factory;
pub mod types;

pub use factory::{CommandFactory, FactoryError};
pub use types::*;

use std::collections::HashMap;
use tracing::warn;

/// Catalog of every command the engine can run, keyed by name. Populated
/// once at construction and read-only afterwards; shared via `Arc` with the
/// factories and the executor, so concurrent readers need no locking.
pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandSpec>,
}

impl CommandRegistry {
    /// An empty registry; production code wants [`with_builtins`].
    ///
    /// [`with_builtins`]: CommandRegistry::with_builtins
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// The full built-in catalog, both command families.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for spec in crate::commands::wp::manifest() {
            registry.register(spec);
        }
        for spec in crate::commands::git::manifest() {
            registry.register(spec);
        }
        registry
    }

    /// Register a command under its name. On a name collision the latest
    /// registration wins and a warning names both implementations.
    pub fn register(&mut self, spec: CommandSpec) {
        let name = spec.info.name;
        let kept = spec.info.implementation;
        if let Some(previous) = self.commands.insert(name, spec) {
            warn!(
                command = name,
                replaced = previous.info.implementation,
                kept,
                "duplicate command registration, keeping the latest"
            );
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandInfo> {
        self.commands.get(name).map(|spec| &spec.info)
    }

    /// Every registered command, ordered by group then name.
    pub fn all(&self) -> Vec<&CommandInfo> {
        let mut infos: Vec<&CommandInfo> = self.commands.values().map(|spec| &spec.info).collect();
        infos.sort_by_key(|info| (info.group.as_str(), info.name));
        infos
    }

    /// One family's slice of the catalog, ordered by name. Never contains
    /// the other family's commands.
    pub fn by_group(&self, group: CommandGroup) -> Vec<&CommandInfo> {
        let mut infos: Vec<&CommandInfo> = self
            .commands
            .values()
            .map(|spec| &spec.info)
            .filter(|info| info.group == group)
            .collect();
        infos.sort_by_key(|info| info.name);
        infos
    }

    pub(crate) fn spec(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

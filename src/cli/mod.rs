use crate::catalog::{CommandGroup, CommandInfo, CommandRegistry};
use crate::commands::ParamBag;
use crate::config::Config;
use crate::context::ExecutionContext;
use crate::credentials::{CredentialError, CredentialKind, CredentialModel};
use crate::flow::executor::{ExecutionState, FlowExecutor, StepStatus};
use crate::flow::store::FlowStore;
use crate::flow::{Flow, FlowStep};
use crate::{Commands, Direction};
use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Command dispatcher that routes CLI commands to the engine.
pub struct CommandDispatcher {
    store: FlowStore,
    registry: Arc<CommandRegistry>,
    context: Arc<ExecutionContext>,
}

impl CommandDispatcher {
    pub fn new(config: Config) -> Result<Self> {
        let store = FlowStore::open(config.flows_dir())
            .context("Failed to open the flow storage directory")?;
        let registry = Arc::new(CommandRegistry::with_builtins());
        debug!(commands = registry.len(), "command catalog initialized");
        let context = Arc::new(ExecutionContext::from_config(config));

        Ok(Self {
            store,
            registry,
            context,
        })
    }

    pub async fn dispatch(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Run { flow } => self.run(&flow).await,
            Commands::List => self.list().await,
            Commands::Show { flow } => self.show(&flow).await,
            Commands::Create { flow, description } => self.create(&flow, &description).await,
            Commands::AddStep {
                flow,
                group,
                command,
                params,
            } => self.add_step(&flow, &group, &command, &params).await,
            Commands::MoveStep {
                flow,
                step,
                direction,
            } => self.move_step(&flow, step, direction).await,
            Commands::RemoveStep { flow, step } => self.remove_step(&flow, step).await,
            Commands::Delete { flow } => self.delete(&flow).await,
            Commands::Catalog { group } => self.catalog(group.as_deref()),
            Commands::Credentials {
                ssh_key,
                username,
                token,
            } => self.credentials(ssh_key, username, token),
            Commands::Config { .. } => unreachable!("Handled in main"),
        }
    }

    async fn run(&self, name: &str) -> Result<()> {
        let flow = self.store.load(name).await?;
        println!(
            "🚀 Running flow '{}' ({} steps)",
            flow.name,
            flow.steps.len()
        );

        let executor = FlowExecutor::new(self.registry.clone(), self.context.clone());
        let report = executor.execute(&flow).await;

        for step in &report.steps {
            let position = step.index + 1;
            match step.status {
                StepStatus::Succeeded => {
                    println!("✅ Step {}: {} [{}]", position, step.command, step.group);
                    if let Some(output) = &step.output {
                        print_indented(&output.stdout);
                    }
                }
                StepStatus::Skipped => {
                    println!(
                        "⏭️  Step {}: {} [{}] skipped - unknown group",
                        position, step.command, step.group
                    );
                }
                StepStatus::Failed => {
                    println!(
                        "❌ Step {}: {} [{}] failed",
                        position, step.command, step.group
                    );
                    if let Some(error) = &step.error {
                        print_indented(&error.to_string());
                    }
                    if let Some(output) = &step.output {
                        print_indented(&output.stderr);
                    }
                }
            }
        }

        let elapsed = report.finished_at - report.started_at;
        let seconds = elapsed.num_milliseconds() as f64 / 1000.0;
        match report.state {
            ExecutionState::Completed => {
                println!("🏁 Flow '{}' completed in {:.1}s", flow.name, seconds);
                Ok(())
            }
            ExecutionState::Aborted => {
                bail!(
                    "flow '{}' aborted after {} of {} steps",
                    flow.name,
                    report.steps.len(),
                    flow.steps.len()
                )
            }
            ExecutionState::Pending | ExecutionState::Running => {
                unreachable!("execute returns a terminal state")
            }
        }
    }

    async fn list(&self) -> Result<()> {
        let flows = self.store.load_all().await;
        if flows.is_empty() {
            println!(
                "No flows stored yet in {}. Create one with 'wpflow create <name>'.",
                self.store.directory().display()
            );
            return Ok(());
        }

        println!("📋 Stored flows:");
        for flow in flows {
            let steps = flow.steps.len();
            let plural = if steps == 1 { "step" } else { "steps" };
            if flow.description.is_empty() {
                println!("  {} ({} {})", flow.name, steps, plural);
            } else {
                println!(
                    "  {} ({} {}) - {}",
                    flow.name, steps, plural, flow.description
                );
            }
        }
        Ok(())
    }

    async fn show(&self, name: &str) -> Result<()> {
        let flow = self.store.load(name).await?;

        println!("📋 Flow '{}'", flow.name);
        if !flow.description.is_empty() {
            println!("   {}", flow.description);
        }
        if flow.steps.is_empty() {
            println!("   (no steps yet)");
            return Ok(());
        }

        for (index, step) in flow.steps.iter().enumerate() {
            println!("  {}. [{}] {}", index + 1, step.group, step.command);
            for key in step.parameters.sorted_keys() {
                if let Some(value) = step.parameters.get(key) {
                    println!("       {} = {}", key, value);
                }
            }
        }
        Ok(())
    }

    async fn create(&self, name: &str, description: &str) -> Result<()> {
        if self.store.contains(name) {
            bail!("a flow named '{name}' already exists");
        }

        let flow = Flow::new(name, description);
        self.store.save(&flow).await?;
        println!("✅ Created flow '{name}'");
        Ok(())
    }

    async fn add_step(
        &self,
        name: &str,
        group: &str,
        command: &str,
        raw_params: &[String],
    ) -> Result<()> {
        let Some(parsed_group) = CommandGroup::parse(group) else {
            bail!("unknown command group '{group}'; expected WP or GIT");
        };
        let known_in_group = self
            .registry
            .get(command)
            .is_some_and(|info| info.group == parsed_group);
        if !known_in_group {
            bail!(
                "the {parsed_group} family has no command named '{command}'; see 'wpflow commands'"
            );
        }

        let mut params = ParamBag::new();
        for raw in raw_params {
            let (key, value) = parse_param(raw)?;
            params.insert(key, value);
        }

        let mut flow = self.store.load(name).await?;
        flow.push_step(FlowStep::new(parsed_group.as_str(), command, params));
        self.store.save(&flow).await?;

        println!(
            "✅ Added step {} to flow '{}': {} [{}]",
            flow.steps.len(),
            name,
            command,
            parsed_group
        );
        Ok(())
    }

    async fn move_step(&self, name: &str, step: usize, direction: Direction) -> Result<()> {
        let index = step_index(step)?;
        let mut flow = self.store.load(name).await?;

        let moved = match direction {
            Direction::Up => flow.move_step_up(index),
            Direction::Down => flow.move_step_down(index),
        };

        if !moved {
            println!("⚠️  Step {step} of flow '{name}' cannot move further");
            return Ok(());
        }

        self.store.save(&flow).await?;
        println!("✅ Moved step {step} of flow '{name}'");
        Ok(())
    }

    async fn remove_step(&self, name: &str, step: usize) -> Result<()> {
        let index = step_index(step)?;
        let mut flow = self.store.load(name).await?;

        let Some(removed) = flow.remove_step(index) else {
            bail!("flow '{name}' has no step {step}");
        };

        self.store.save(&flow).await?;
        println!(
            "🗑️  Removed step {}: {} from flow '{}'",
            step, removed.command, name
        );
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.store.delete(name).await?;
        println!("🗑️  Deleted flow '{name}'");
        Ok(())
    }

    fn catalog(&self, group: Option<&str>) -> Result<()> {
        let infos = match group {
            Some(raw) => {
                let Some(parsed) = CommandGroup::parse(raw) else {
                    bail!("unknown command group '{raw}'; expected WP or GIT");
                };
                self.registry.by_group(parsed)
            }
            None => self.registry.all(),
        };

        let mut current_group = None;
        for info in infos {
            if current_group != Some(info.group) {
                println!("📦 {} commands:", info.group);
                current_group = Some(info.group);
            }
            print_command(info);
        }
        Ok(())
    }

    fn credentials(
        &self,
        ssh_key: Option<PathBuf>,
        username: Option<String>,
        token: Option<String>,
    ) -> Result<()> {
        let store = self.context.credentials.as_ref();

        match (ssh_key, username, token) {
            (Some(key), None, None) => {
                store.configure(&CredentialModel::ssh(key))?;
                println!("✅ Stored SSH credentials");
                Ok(())
            }
            (None, Some(username), Some(token)) => {
                store.configure(&CredentialModel::https(username, token))?;
                println!("✅ Stored HTTPS credentials");
                Ok(())
            }
            (None, None, None) => {
                match store.read() {
                    Ok(model) => match model.kind {
                        CredentialKind::Ssh => {
                            let key = model
                                .key_path
                                .map(|path| path.display().to_string())
                                .unwrap_or_else(|| "<missing key path>".to_string());
                            println!("🔑 SSH credentials configured (key: {key})");
                        }
                        CredentialKind::Https => {
                            let username = model.username.unwrap_or_default();
                            println!("🔑 HTTPS credentials configured (user: {username})");
                        }
                    },
                    Err(CredentialError::NotConfigured) => {
                        println!("No git credentials configured.");
                        println!("  wpflow credentials --ssh-key ~/.ssh/id_ed25519");
                        println!("  wpflow credentials --username deploy --token <token>");
                    }
                    Err(err) => return Err(err.into()),
                }
                Ok(())
            }
            _ => bail!("pass either --ssh-key, or --username with --token"),
        }
    }
}

fn print_command(info: &CommandInfo) {
    println!("  {} - {}", info.name, info.description);
    for param in &info.params {
        if param.required {
            println!(
                "       {} ({}, required) - {}",
                param.name, param.kind, param.description
            );
        } else {
            println!(
                "       {} ({}, default {:?}) - {}",
                param.name,
                param.kind,
                param.default.unwrap_or(""),
                param.description
            );
        }
    }
}

fn print_indented(text: &str) {
    for line in text.trim_end().lines().filter(|line| !line.trim().is_empty()) {
        println!("       {line}");
    }
}

/// Turn one `key=value` argument into a bag entry. Values parse as JSON
/// scalars first, so `count=3` and `dryRun=true` keep their types; anything
/// unparsable stays a string.
fn parse_param(raw: &str) -> Result<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("parameter '{raw}' is not of the form key=value");
    };
    if key.is_empty() {
        bail!("parameter '{raw}' has an empty key");
    }

    let value = match serde_json::from_str::<Value>(value) {
        Ok(parsed @ (Value::Bool(_) | Value::Number(_) | Value::Null)) => parsed,
        _ => Value::String(value.to_string()),
    };
    Ok((key.to_string(), value))
}

fn step_index(step: usize) -> Result<usize> {
    if step == 0 {
        bail!("steps are numbered from 1");
    }
    Ok(step - 1)
}

mod catalog;
mod cli;
mod commands;
mod config;
mod context;
mod credentials;
mod flow;
mod runner;
mod tools;

#[cfg(test)]
mod test_util;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "wpflow")]
#[command(about = "Workflow automation for WordPress sites and their git repositories")]
#[command(version = "0.1.0")]
struct Cli {
    /// Show verbose output for debugging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a stored flow, step by step
    Run {
        /// Name of the flow to execute
        flow: String,
    },
    /// List the stored flows
    List,
    /// Show one flow's steps and parameters
    Show {
        /// Name of the flow to show
        flow: String,
    },
    /// Create a new, empty flow
    Create {
        /// Name of the new flow
        flow: String,

        /// What the flow is for
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Append a step to a flow
    AddStep {
        /// Name of the flow to extend
        flow: String,

        /// Command group: WP or GIT
        #[arg(short, long)]
        group: String,

        /// Command name, as listed by 'wpflow commands'
        #[arg(short, long)]
        command: String,

        /// Step parameter, repeatable
        #[arg(short, long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },
    /// Move a step up or down within its flow
    MoveStep {
        /// Name of the flow
        flow: String,

        /// Step number, starting at 1
        step: usize,

        /// Where to move the step
        #[arg(value_enum)]
        direction: Direction,
    },
    /// Remove a step from a flow
    RemoveStep {
        /// Name of the flow
        flow: String,

        /// Step number, starting at 1
        step: usize,
    },
    /// Delete a stored flow
    Delete {
        /// Name of the flow to delete
        flow: String,
    },
    /// List the available commands and their parameters
    #[command(name = "commands")]
    Catalog {
        /// Restrict the listing to one group: WP or GIT
        #[arg(short, long)]
        group: Option<String>,
    },
    /// Configure or inspect the stored git credentials
    Credentials {
        /// Path to an SSH private key
        #[arg(long, value_name = "PATH")]
        ssh_key: Option<PathBuf>,

        /// Username for HTTPS remotes
        #[arg(long)]
        username: Option<String>,

        /// Access token for HTTPS remotes
        #[arg(long)]
        token: Option<String>,
    },
    /// Manage the wpflow configuration file
    Config {
        /// Show current configuration path and status
        #[arg(long)]
        show: bool,

        /// Generate sample configuration
        #[arg(long)]
        init: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Direction {
    Up,
    Down,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config management never needs the config itself loaded
    if let Commands::Config { show, init } = &cli.command {
        return handle_config_command(*show, *init);
    }

    let config = config::Config::load()?;
    init_logging(cli.verbose || config.behavior.verbose);

    let dispatcher = cli::CommandDispatcher::new(config)?;
    dispatcher.dispatch(cli.command).await
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "wpflow=debug" } else { "wpflow=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Handle the config command
fn handle_config_command(show: bool, init: bool) -> Result<()> {
    if init {
        let sample_config = config::Config::create_sample_config()?;
        println!("# Sample wpflow configuration");
        println!("# Copy this to ~/.config/wpflow/config.yaml or .wpflow.yaml");
        println!();
        println!("{}", sample_config);
        return Ok(());
    }

    if show {
        println!("🔍 wpflow configuration status:");
        println!();

        let local_config_path = PathBuf::from(".wpflow.yaml");
        if local_config_path.exists() {
            println!("✅ Directory config: .wpflow.yaml");
        } else {
            println!("❌ Directory config: .wpflow.yaml (not found)");
        }

        if let Some(user_config_path) = config::Config::user_config_path() {
            if user_config_path.exists() {
                println!("✅ User config: {}", user_config_path.display());
            } else {
                println!("❌ User config: {} (not found)", user_config_path.display());
                if let Some(parent) = user_config_path.parent() {
                    if !parent.exists() {
                        println!("   💡 Create directory: mkdir -p {}", parent.display());
                    }
                }
            }
        } else {
            println!("❌ User config: Unable to determine config directory");
        }

        println!();
        println!("💡 To create a sample config: wpflow config --init > ~/.config/wpflow/config.yaml");

        return Ok(());
    }

    // If no flags provided, show help
    println!("wpflow config management");
    println!();
    println!("Options:");
    println!("  --show  Show current configuration status");
    println!("  --init  Generate sample configuration");
    println!();
    println!("Examples:");
    println!("  wpflow config --show");
    println!("  wpflow config --init > ~/.config/wpflow/config.yaml");
    println!("  wpflow config --init > .wpflow.yaml  # Directory-specific config");

    Ok(())
}

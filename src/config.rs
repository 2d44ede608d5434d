use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub wordpress: WordPressConfig,
    #[serde(default)]
    pub git: GitConfig,
    #[serde(default)]
    pub flows: FlowsConfig,
    #[serde(default)]
    pub behavior: BehaviorConfig,
}

impl Default for Config {
    fn default() -> Self {
        load_default_config()
    }
}

/// Settings for the WordPress installation the WP commands run against
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WordPressConfig {
    /// Root of the WordPress installation, passed to WP-CLI as `--path`
    pub path: PathBuf,
    /// PHP interpreter used to launch WP-CLI
    #[serde(default = "default_php_binary")]
    pub php_binary: String,
    /// Location of the WP-CLI phar
    #[serde(default = "default_wp_cli")]
    pub wp_cli: PathBuf,
}

/// Settings for the working copy the git commands operate on
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitConfig {
    pub repository: PathBuf,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            repository: PathBuf::from("."),
        }
    }
}

/// Where flow records live on disk
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct FlowsConfig {
    /// Storage directory override; the user config directory is used when unset
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct BehaviorConfig {
    pub verbose: bool,
}

fn default_php_binary() -> String {
    "php".to_string()
}

fn default_wp_cli() -> PathBuf {
    PathBuf::from("wp-cli.phar")
}

impl Config {
    /// Load configuration from the standard config paths
    pub fn load() -> Result<Self> {
        // Try loading in this order:
        // 1. .wpflow.yaml in current directory (site-specific)
        // 2. <config dir>/wpflow/config.yaml (user-specific)
        // 3. Default configuration

        if let Ok(config) = Self::load_from_path(&PathBuf::from(".wpflow.yaml")) {
            return Ok(config);
        }

        if let Some(user_config_path) = Self::user_config_path() {
            if let Ok(config) = Self::load_from_path(&user_config_path) {
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Config file does not exist: {}", path.display());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Get the user configuration path
    pub fn user_config_path() -> Option<PathBuf> {
        Self::settings_dir().map(|dir| dir.join("config.yaml"))
    }

    /// Directory holding user-level wpflow state (config, credentials, flows)
    pub fn settings_dir() -> Option<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("wpflow"))
        } else {
            // Fallback to home directory
            dirs::home_dir().map(|home_dir| home_dir.join(".config").join("wpflow"))
        }
    }

    /// Directory the flow store reads and writes
    pub fn flows_dir(&self) -> PathBuf {
        if let Some(dir) = &self.flows.directory {
            return dir.clone();
        }

        Self::settings_dir()
            .map(|dir| dir.join("flows"))
            .unwrap_or_else(|| PathBuf::from(".wpflow").join("flows"))
    }

    /// Location of the credential record
    pub fn credentials_path(&self) -> PathBuf {
        Self::settings_dir()
            .map(|dir| dir.join("credentials.json"))
            .unwrap_or_else(|| PathBuf::from(".wpflow").join("credentials.json"))
    }

    /// Create a sample configuration file
    pub fn create_sample_config() -> Result<String> {
        let mut sample = load_default_config();

        sample.wordpress.path = PathBuf::from("/var/www/html");
        sample.wordpress.wp_cli = PathBuf::from("/usr/local/bin/wp-cli.phar");
        sample.git.repository = PathBuf::from("/var/www/html");

        serde_yaml::to_string(&sample).context("Failed to serialize sample configuration")
    }
}

/// Load the complete default configuration from embedded YAML
pub fn load_default_config() -> Config {
    // Embed the default configuration at compile time
    const DEFAULT_CONFIG: &str = include_str!("../config/default_config.yaml");

    serde_yaml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded default configuration")
}

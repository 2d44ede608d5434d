use crate::commands::CommandError;
use crate::config::Config;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;

/// Verifies the external tools a command family needs before any work is
/// attempted. Every WP command calls `ensure_wp` first; git commands call
/// `ensure_git`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ToolCheck: Send + Sync {
    async fn ensure_wp(&self) -> Result<(), CommandError>;
    async fn ensure_git(&self) -> Result<(), CommandError>;
}

/// Probes the real system: `<php> --version`, the WP-CLI phar on disk, and
/// `git --version`.
pub struct SystemToolCheck {
    php_binary: String,
    wp_cli: PathBuf,
}

impl SystemToolCheck {
    pub fn new(config: &Config) -> Self {
        Self {
            php_binary: config.wordpress.php_binary.clone(),
            wp_cli: config.wordpress.wp_cli.clone(),
        }
    }
}

#[async_trait]
impl ToolCheck for SystemToolCheck {
    async fn ensure_wp(&self) -> Result<(), CommandError> {
        if !responds_to_version(&self.php_binary).await {
            return Err(CommandError::ToolMissing {
                tool: self.php_binary.clone(),
            });
        }

        if !self.wp_cli.is_file() {
            return Err(CommandError::ToolMissing {
                tool: format!("WP-CLI ({})", self.wp_cli.display()),
            });
        }

        Ok(())
    }

    async fn ensure_git(&self) -> Result<(), CommandError> {
        if !responds_to_version("git").await {
            return Err(CommandError::ToolMissing {
                tool: "git".to_string(),
            });
        }

        Ok(())
    }
}

async fn responds_to_version(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[tokio::test]
    async fn test_ensure_wp_passes_with_working_binary_and_phar() {
        let dir = tempfile::tempdir().unwrap();
        let phar = dir.path().join("wp-cli.phar");
        std::fs::write(&phar, "<?php").unwrap();

        // `true` exits 0 for any arguments, standing in for a working php
        let check = SystemToolCheck {
            php_binary: "true".to_string(),
            wp_cli: phar,
        };

        assert!(check.ensure_wp().await.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_ensure_wp_reports_missing_phar() {
        let dir = tempfile::tempdir().unwrap();
        let check = SystemToolCheck {
            php_binary: "true".to_string(),
            wp_cli: dir.path().join("missing.phar"),
        };

        let err = check.ensure_wp().await.unwrap_err();
        assert!(matches!(err, CommandError::ToolMissing { ref tool } if tool.contains("WP-CLI")));
    }

    #[tokio::test]
    async fn test_ensure_wp_reports_missing_php() {
        let check = SystemToolCheck {
            php_binary: "wpflow-no-such-php".to_string(),
            wp_cli: PathBuf::from("wp-cli.phar"),
        };

        let err = check.ensure_wp().await.unwrap_err();
        assert!(matches!(err, CommandError::ToolMissing { ref tool } if tool == "wpflow-no-such-php"));
    }
}

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// How git authenticates against the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CredentialKind {
    Ssh,
    Https,
}

/// One stored credential record. SSH uses `key_path`; HTTPS uses
/// `username` + `token`. The record is persisted as plaintext JSON in the
/// settings directory; anything stronger would slot in behind
/// [`CredentialStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialModel {
    pub kind: CredentialKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_path: Option<PathBuf>,
}

impl CredentialModel {
    pub fn ssh(key_path: impl Into<PathBuf>) -> Self {
        Self {
            kind: CredentialKind::Ssh,
            username: None,
            token: None,
            key_path: Some(key_path.into()),
        }
    }

    pub fn https(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            kind: CredentialKind::Https,
            username: Some(username.into()),
            token: Some(token.into()),
            key_path: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("no git credentials configured; run 'wpflow credentials' to set them up")]
    NotConfigured,

    #[error("failed to access credential record at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("credential record at {path} is not valid JSON")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("credential record is incomplete: {reason}")]
    Malformed { reason: String },
}

/// Storage boundary for the git credential record. Commands that
/// authenticate (clone, pull, push) consult only this trait; the registry
/// and executor never touch it.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialStore: Send + Sync {
    /// Create the record, replacing any existing one.
    fn configure(&self, model: &CredentialModel) -> Result<(), CredentialError>;

    /// Read the record; `NotConfigured` when none exists.
    fn read(&self) -> Result<CredentialModel, CredentialError>;

    fn exists(&self) -> bool;

    /// Replace an existing record; `NotConfigured` when none exists.
    fn update(&self, model: &CredentialModel) -> Result<(), CredentialError>;

    /// The git invocation to use for authenticated calls. SSH credentials
    /// yield `git -c core.sshCommand=...` pinning the configured key; HTTPS
    /// (and the unconfigured case) yield plain `git`, with any token
    /// embedded in the remote URL by the command itself.
    fn git_command(&self) -> Result<String, CredentialError>;
}

/// Credential record persisted as a single JSON file.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialStore for FileCredentialStore {
    fn configure(&self, model: &CredentialModel) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| CredentialError::Io {
                path: self.path.clone(),
                source,
            })?;
        }

        let contents = serde_json::to_string_pretty(model).map_err(|source| {
            CredentialError::Decode {
                path: self.path.clone(),
                source,
            }
        })?;

        fs::write(&self.path, contents).map_err(|source| CredentialError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn read(&self) -> Result<CredentialModel, CredentialError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Err(CredentialError::NotConfigured);
            }
            Err(source) => {
                return Err(CredentialError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&contents).map_err(|source| CredentialError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn update(&self, model: &CredentialModel) -> Result<(), CredentialError> {
        if !self.exists() {
            return Err(CredentialError::NotConfigured);
        }
        self.configure(model)
    }

    fn git_command(&self) -> Result<String, CredentialError> {
        let model = match self.read() {
            Ok(model) => model,
            // Unauthenticated git still works for public remotes
            Err(CredentialError::NotConfigured) => return Ok("git".to_string()),
            Err(err) => return Err(err),
        };

        match model.kind {
            CredentialKind::Https => Ok("git".to_string()),
            CredentialKind::Ssh => {
                let key_path = model.key_path.ok_or_else(|| CredentialError::Malformed {
                    reason: "SSH credentials require a key path".to_string(),
                })?;
                let ssh_command = format!(
                    "core.sshCommand=ssh -i {} -o IdentitiesOnly=yes",
                    key_path.display()
                );
                Ok(shell_words::join(["git", "-c", ssh_command.as_str()]))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> FileCredentialStore {
        FileCredentialStore::new(dir.path().join("credentials.json"))
    }

    #[test]
    fn test_read_before_configure_is_not_configured() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        assert!(!store.exists());
        assert!(matches!(store.read(), Err(CredentialError::NotConfigured)));
    }

    #[test]
    fn test_configure_then_read_round_trips() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let model = CredentialModel::https("deploy", "s3cret");
        store.configure(&model).unwrap();

        assert!(store.exists());
        assert_eq!(store.read().unwrap(), model);
    }

    #[test]
    fn test_update_requires_existing_record() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let model = CredentialModel::ssh("/home/deploy/.ssh/id_ed25519");
        assert!(matches!(
            store.update(&model),
            Err(CredentialError::NotConfigured)
        ));

        store.configure(&model).unwrap();
        let replacement = CredentialModel::https("deploy", "s3cret");
        store.update(&replacement).unwrap();
        assert_eq!(store.read().unwrap(), replacement);
    }

    #[test]
    fn test_git_command_for_ssh_pins_the_key() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store
            .configure(&CredentialModel::ssh("/home/deploy/.ssh/id_ed25519"))
            .unwrap();

        let command = store.git_command().unwrap();
        let parts = shell_words::split(&command).unwrap();
        assert_eq!(parts[0], "git");
        assert_eq!(parts[1], "-c");
        assert_eq!(
            parts[2],
            "core.sshCommand=ssh -i /home/deploy/.ssh/id_ed25519 -o IdentitiesOnly=yes"
        );
    }

    #[test]
    fn test_git_command_for_https_and_unconfigured_is_plain_git() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.git_command().unwrap(), "git");

        store
            .configure(&CredentialModel::https("deploy", "s3cret"))
            .unwrap();
        assert_eq!(store.git_command().unwrap(), "git");
    }

    #[test]
    fn test_ssh_without_key_path_is_malformed() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store
            .configure(&CredentialModel {
                kind: CredentialKind::Ssh,
                username: None,
                token: None,
                key_path: None,
            })
            .unwrap();

        assert!(matches!(
            store.git_command(),
            Err(CredentialError::Malformed { .. })
        ));
    }

    #[test]
    fn test_kind_serializes_uppercase() {
        let text = serde_json::to_string(&CredentialKind::Ssh).unwrap();
        assert_eq!(text, "\"SSH\"");
        let back: CredentialKind = serde_json::from_str("\"HTTPS\"").unwrap();
        assert_eq!(back, CredentialKind::Https);
    }
}

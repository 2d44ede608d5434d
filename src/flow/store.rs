use crate::flow::Flow;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;
use thiserror::Error;
use tokio::fs;
use tracing::warn;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no flow named '{name}'")]
    NoSuchFlow { name: String },

    #[error("failed to access flow record at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("flow record at {path} is not valid JSON")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Directory-backed flow storage: one JSON record per flow, named after it,
/// with an in-memory name index built when the store opens. Every load
/// reads the record afresh; callers get their own instance each time.
pub struct FlowStore {
    directory: PathBuf,
    index: RwLock<HashMap<String, PathBuf>>,
}

impl FlowStore {
    /// Open a store rooted at `directory`, creating it when missing and
    /// indexing any `*.json` records already there by filename stem.
    pub fn open(directory: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory).map_err(|source| StoreError::Io {
            path: directory.clone(),
            source,
        })?;

        let mut index = HashMap::new();
        let entries = std::fs::read_dir(&directory).map_err(|source| StoreError::Io {
            path: directory.clone(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: directory.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                index.insert(stem.to_string(), path.clone());
            }
        }

        Ok(Self {
            directory,
            index: RwLock::new(index),
        })
    }

    pub fn directory(&self) -> &PathBuf {
        &self.directory
    }

    /// Every stored flow name, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.index.read().unwrap().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.read().unwrap().contains_key(name)
    }

    /// Write the flow's record and index it, replacing any previous record
    /// under the same name.
    pub async fn save(&self, flow: &Flow) -> Result<(), StoreError> {
        let path = self.record_path(&flow.name);
        let contents =
            serde_json::to_string_pretty(flow).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?;

        fs::write(&path, contents)
            .await
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;

        self.index.write().unwrap().insert(flow.name.clone(), path);
        Ok(())
    }

    /// Load one flow by name; a fresh instance on every call.
    pub async fn load(&self, name: &str) -> Result<Flow, StoreError> {
        let path = self.indexed_path(name)?;

        let contents = fs::read_to_string(&path)
            .await
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;

        serde_json::from_str(&contents).map_err(|source| StoreError::Json { path, source })
    }

    /// Remove a flow's record and its index entry.
    pub async fn delete(&self, name: &str) -> Result<(), StoreError> {
        let path = self.indexed_path(name)?;

        fs::remove_file(&path)
            .await
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;

        self.index.write().unwrap().remove(name);
        Ok(())
    }

    /// Load every indexed flow in name order. A record that fails to load
    /// is logged and skipped rather than blocking the rest.
    pub async fn load_all(&self) -> Vec<Flow> {
        let mut snapshot: Vec<(String, PathBuf)> = {
            let index = self.index.read().unwrap();
            index
                .iter()
                .map(|(name, path)| (name.clone(), path.clone()))
                .collect()
        };
        snapshot.sort_by(|a, b| a.0.cmp(&b.0));

        let mut flows = Vec::with_capacity(snapshot.len());
        for (name, _) in snapshot {
            match self.load(&name).await {
                Ok(flow) => flows.push(flow),
                Err(err) => warn!(flow = %name, error = %err, "skipping unreadable flow record"),
            }
        }
        flows
    }

    fn record_path(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{name}.json"))
    }

    fn indexed_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        self.index
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NoSuchFlow {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ParamBag;
    use crate::flow::FlowStep;
    use tempfile::tempdir;

    fn sample_flow(name: &str) -> Flow {
        let mut params = ParamBag::new();
        params.insert("oldValue", "http://old.example");
        params.insert("newValue", "http://new.example");

        let mut flow = Flow::new(name, "example flow");
        flow.push_step(FlowStep::new("WP", "search-replace", params));
        flow
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = FlowStore::open(dir.path()).unwrap();

        let flow = sample_flow("relocate");
        store.save(&flow).await.unwrap();

        let loaded = store.load("relocate").await.unwrap();
        assert_eq!(loaded, flow);
        assert_eq!(store.names(), vec!["relocate"]);
        assert!(store.contains("relocate"));
    }

    #[tokio::test]
    async fn test_load_unknown_flow_fails() {
        let dir = tempdir().unwrap();
        let store = FlowStore::open(dir.path()).unwrap();

        let err = store.load("ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::NoSuchFlow { ref name } if name == "ghost"));
    }

    #[tokio::test]
    async fn test_delete_removes_record_and_index_entry() {
        let dir = tempdir().unwrap();
        let store = FlowStore::open(dir.path()).unwrap();

        store.save(&sample_flow("doomed")).await.unwrap();
        store.delete("doomed").await.unwrap();

        assert!(store.names().is_empty());
        assert!(!dir.path().join("doomed.json").exists());
        assert!(matches!(
            store.delete("doomed").await,
            Err(StoreError::NoSuchFlow { .. })
        ));
    }

    #[tokio::test]
    async fn test_open_indexes_existing_records() {
        let dir = tempdir().unwrap();
        {
            let store = FlowStore::open(dir.path()).unwrap();
            store.save(&sample_flow("alpha")).await.unwrap();
            store.save(&sample_flow("beta")).await.unwrap();
        }
        std::fs::write(dir.path().join("notes.txt"), "not a flow").unwrap();

        let reopened = FlowStore::open(dir.path()).unwrap();
        assert_eq!(reopened.names(), vec!["alpha", "beta"]);

        let loaded = reopened.load("alpha").await.unwrap();
        assert_eq!(loaded.name, "alpha");
    }

    #[tokio::test]
    async fn test_load_all_skips_corrupt_records() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        let store = FlowStore::open(dir.path()).unwrap();
        store.save(&sample_flow("working")).await.unwrap();

        let flows = store.load_all().await;
        assert_eq!(flows.len(), 1);
        assert_eq!(flows[0].name, "working");
    }

    #[tokio::test]
    async fn test_record_uses_the_wire_field_names() {
        let dir = tempdir().unwrap();
        let store = FlowStore::open(dir.path()).unwrap();
        store.save(&sample_flow("wire")).await.unwrap();

        let raw = std::fs::read_to_string(dir.path().join("wire.json")).unwrap();
        assert!(raw.contains("\"flowName\""));
        assert!(raw.contains("\"commands\""));
        assert!(raw.contains("\"parametes\""));
        assert!(!raw.contains("\"parameters\""));
    }

    #[tokio::test]
    async fn test_loads_always_produce_fresh_instances() {
        let dir = tempdir().unwrap();
        let store = FlowStore::open(dir.path()).unwrap();
        store.save(&sample_flow("fresh")).await.unwrap();

        let mut first = store.load("fresh").await.unwrap();
        first.steps.clear();

        // mutating one load never affects the next
        let second = store.load("fresh").await.unwrap();
        assert_eq!(second.steps.len(), 1);
    }
}

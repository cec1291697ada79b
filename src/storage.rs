use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::model::WorkItemId;

/// Local storage for the opaque per-item blob the UI keeps alongside the
/// mirror (collapse state, notes, and the like). Injected into the engine
/// so embedders and tests choose the medium; the engine writes through on
/// every change and the newest value wins.
pub trait ExtraDataStore: Send {
    fn get(&self, id: &WorkItemId) -> Option<String>;

    fn set(&mut self, id: &WorkItemId, value: String) -> Result<()>;
}

/// A JSON map in a single file, loaded once at construction and rewritten
/// on every set.
pub struct FileExtraDataStore {
    path: PathBuf,
    data: HashMap<WorkItemId, String>,
}

impl FileExtraDataStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            HashMap::new()
        };
        Ok(Self { path, data })
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

impl ExtraDataStore for FileExtraDataStore {
    fn get(&self, id: &WorkItemId) -> Option<String> {
        self.data.get(id).cloned()
    }

    fn set(&mut self, id: &WorkItemId, value: String) -> Result<()> {
        self.data.insert(id.clone(), value);
        self.save()
    }
}

/// In-memory store for tests and embedders that want no persistence.
#[derive(Default)]
pub struct MemoryExtraDataStore {
    data: HashMap<WorkItemId, String>,
}

impl ExtraDataStore for MemoryExtraDataStore {
    fn get(&self, id: &WorkItemId) -> Option<String> {
        self.data.get(id).cloned()
    }

    fn set(&mut self, id: &WorkItemId, value: String) -> Result<()> {
        self.data.insert(id.clone(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_a_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extra_data.json");

        let mut store = FileExtraDataStore::new(path.clone()).unwrap();
        store.set(&"a".into(), "blob-1".into()).unwrap();

        let store = FileExtraDataStore::new(path).unwrap();
        assert_eq!(store.get(&"a".into()), Some("blob-1".into()));
        assert_eq!(store.get(&"b".into()), None);
    }

    #[test]
    fn the_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extra_data.json");

        let mut store = FileExtraDataStore::new(path.clone()).unwrap();
        store.set(&"a".into(), "old".into()).unwrap();
        store.set(&"a".into(), "new".into()).unwrap();

        let store = FileExtraDataStore::new(path).unwrap();
        assert_eq!(store.get(&"a".into()), Some("new".into()));
    }

    #[test]
    fn a_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extra_data.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileExtraDataStore::new(path).unwrap();
        assert_eq!(store.get(&"a".into()), None);
    }

    #[test]
    fn missing_parent_directories_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("extra_data.json");

        let mut store = FileExtraDataStore::new(path.clone()).unwrap();
        store.set(&"a".into(), "blob".into()).unwrap();
        assert!(path.exists());
    }
}

//! Persistence of player progress.
//!
//! The engine never saves on its own. Callers snapshot the game with
//! [`crate::Game::save_data`] and hand it to a store; a failed save should
//! be reported without interrupting play.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StoreResult;
use crate::progress::SaveData;

/// A place progress can be loaded from and saved to.
pub trait ProgressStore {
    /// Load the saved progress, if any exists.
    fn load(&self) -> StoreResult<Option<SaveData>>;

    /// Persist progress, replacing any previous save.
    fn save(&mut self, data: &SaveData) -> StoreResult<()>;
}

/// Stores progress as pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Use the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the save file if present.
    pub fn clear(&self) -> StoreResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

impl ProgressStore for JsonFileStore {
    fn load(&self) -> StoreResult<Option<SaveData>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&mut self, data: &SaveData) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Keeps the latest save in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Option<SaveData>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self) -> StoreResult<Option<SaveData>> {
        Ok(self.data.clone())
    }

    fn save(&mut self, data: &SaveData) -> StoreResult<()> {
        self.data = Some(data.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use tempfile::TempDir;

    #[test]
    fn file_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("save.json"));
        assert!(store.load().unwrap().is_none());

        let data = SaveData {
            level: 4,
            score: 900,
            ..SaveData::default()
        };
        store.save(&data).unwrap();
        assert_eq!(store.load().unwrap(), Some(data));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn corrupt_file_is_format_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("save.json");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::new(path);
        assert!(matches!(store.load(), Err(StoreError::Format(_))));
    }

    #[test]
    fn unwritable_path_is_io_error() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("missing").join("save.json"));
        assert!(matches!(
            store.save(&SaveData::default()),
            Err(StoreError::Io(_))
        ));
    }

    #[test]
    fn memory_store() {
        let mut store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());
        store.save(&SaveData::default()).unwrap();
        assert_eq!(store.load().unwrap(), Some(SaveData::default()));
    }
}

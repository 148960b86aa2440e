//! Persistence of character snapshots keyed by name

use crate::character::{Character, DEFAULT_NAME};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Placeholder names that cannot be saved under
const RESERVED_NAMES: [&str; 2] = [DEFAULT_NAME, "Test Hero"];

/// Persistence error
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access character file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode or decode character: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Give the character a name before saving")]
    NameRequired,
    #[error("A character named '{0}' already exists")]
    AlreadyExists(String),
    #[error("No character named '{0}'")]
    NotFound(String),
}

/// Keyed store of full character snapshots
pub trait CharacterStore {
    /// Save under the character's name. Fails on an existing entry unless
    /// `overwrite` is set.
    fn save(&mut self, character: &Character, overwrite: bool) -> Result<(), StoreError>;

    fn load(&self, name: &str) -> Result<Character, StoreError>;

    fn delete(&mut self, name: &str) -> Result<(), StoreError>;

    /// Saved names in sorted order
    fn list(&self) -> Result<Vec<String>, StoreError>;
}

fn storage_key(character: &Character) -> Result<&str, StoreError> {
    let name = character.name.trim();
    if name.is_empty() || RESERVED_NAMES.contains(&name) {
        return Err(StoreError::NameRequired);
    }
    Ok(name)
}

/// Insert an encoded snapshot into `entries`, honoring `overwrite`
fn put(
    entries: &mut BTreeMap<String, serde_json::Value>,
    character: &Character,
    overwrite: bool,
) -> Result<(), StoreError> {
    let key = storage_key(character)?;
    if !overwrite && entries.contains_key(key) {
        return Err(StoreError::AlreadyExists(key.to_string()));
    }
    entries.insert(key.to_string(), serde_json::to_value(character)?);
    Ok(())
}

/// In-memory store; snapshots are kept serialized so loads are independent copies
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, serde_json::Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl CharacterStore for MemoryStore {
    fn save(&mut self, character: &Character, overwrite: bool) -> Result<(), StoreError> {
        put(&mut self.entries, character, overwrite)?;
        tracing::info!(name = %character.name, "character saved");
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Character, StoreError> {
        let value = self
            .entries
            .get(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        Ok(serde_json::from_value(value.clone())?)
    }

    fn delete(&mut self, name: &str) -> Result<(), StoreError> {
        self.entries
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// A single JSON object file mapping name to snapshot
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file reads as an empty store
    fn read_all(&self) -> Result<BTreeMap<String, serde_json::Value>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, entries: &BTreeMap<String, serde_json::Value>) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl CharacterStore for JsonFileStore {
    fn save(&mut self, character: &Character, overwrite: bool) -> Result<(), StoreError> {
        let mut entries = self.read_all()?;
        put(&mut entries, character, overwrite)?;
        self.write_all(&entries)?;
        tracing::info!(name = %character.name, path = %self.path.display(), "character saved");
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Character, StoreError> {
        let mut entries = self.read_all()?;
        let value = entries
            .remove(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        Ok(serde_json::from_value(value)?)
    }

    fn delete(&mut self, name: &str) -> Result<(), StoreError> {
        let mut entries = self.read_all()?;
        if entries.remove(name).is_none() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        self.write_all(&entries)?;
        tracing::debug!(name, "character deleted");
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.read_all()?.into_keys().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::tests::sample_character;
    use crate::config::ReferenceData;
    use tempfile::TempDir;

    #[test]
    fn test_memory_roundtrip_is_independent() {
        let data = ReferenceData::builtin().unwrap();
        let mut character = sample_character(&data);
        let mut store = MemoryStore::new();
        store.save(&character, false).unwrap();

        character.traits.strength = 9;
        let loaded = store.load("Brannoc").unwrap();
        assert_eq!(loaded.traits.strength, 2);
        assert_eq!(store.list().unwrap(), vec!["Brannoc".to_string()]);
    }

    #[test]
    fn test_reserved_names_rejected() {
        let data = ReferenceData::builtin().unwrap();
        let mut character = sample_character(&data);
        let mut store = MemoryStore::new();
        for name in [DEFAULT_NAME, "Test Hero", "   "] {
            character.name = name.to_string();
            assert!(matches!(store.save(&character, true), Err(StoreError::NameRequired)));
        }
    }

    #[test]
    fn test_overwrite_requires_flag() {
        let data = ReferenceData::builtin().unwrap();
        let character = sample_character(&data);
        let mut store = MemoryStore::new();
        store.save(&character, false).unwrap();
        assert!(matches!(
            store.save(&character, false),
            Err(StoreError::AlreadyExists(name)) if name == "Brannoc"
        ));
        store.save(&character, true).unwrap();
        store.delete("Brannoc").unwrap();
        assert!(matches!(store.load("Brannoc"), Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete("Brannoc"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_json_file_store() {
        let data = ReferenceData::builtin().unwrap();
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("characters.json"));
        assert!(store.list().unwrap().is_empty());

        let character = sample_character(&data);
        store.save(&character, false).unwrap();
        let mut other = character.clone();
        other.name = "Aelin".into();
        store.save(&other, false).unwrap();

        let reopened = JsonFileStore::new(store.path());
        assert_eq!(reopened.list().unwrap(), vec!["Aelin".to_string(), "Brannoc".to_string()]);
        assert_eq!(reopened.load("Brannoc").unwrap(), character);

        store.delete("Aelin").unwrap();
        assert_eq!(store.list().unwrap(), vec!["Brannoc".to_string()]);
    }

    #[test]
    fn test_corrupt_file_is_json_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("characters.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.list(), Err(StoreError::Json(_))));
    }
}

use crate::domain::entity::{ObjectId, StoredRow};
use crate::domain::ports::{RecordStore, StoreLocation};
use crate::utils::error::PersistenceError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    rows: BTreeMap<ObjectId, StoredRow>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RecordStore for InMemoryStore {
    fn write_rows(&mut self, rows: &[StoredRow]) -> Result<(), PersistenceError> {
        for row in rows {
            self.rows.insert(row.id, row.clone());
        }
        Ok(())
    }

    fn read_rows(&self, entity: &str) -> Result<Vec<StoredRow>, PersistenceError> {
        Ok(self
            .rows
            .values()
            .filter(|row| row.entity == entity)
            .cloned()
            .collect())
    }
}

/// Keeps every row in one pretty-printed JSON array.
///
/// Writes land in a sibling temp file that is renamed over the target, so a
/// failed flush leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_all(&self) -> Result<BTreeMap<ObjectId, StoredRow>, PersistenceError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let data = fs::read(&self.path)?;
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }

        let rows: Vec<StoredRow> = serde_json::from_slice(&data)?;
        Ok(rows.into_iter().map(|row| (row.id, row)).collect())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RecordStore for JsonFileStore {
    fn write_rows(&mut self, rows: &[StoredRow]) -> Result<(), PersistenceError> {
        let mut all = self.load_all()?;
        for row in rows {
            all.insert(row.id, row.clone());
        }

        let rows: Vec<&StoredRow> = all.values().collect();
        let json = serde_json::to_string_pretty(&rows)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.temp_path();
        tracing::debug!("Writing {} rows to {}", rows.len(), temp_path.display());
        replace_file(&temp_path, &self.path, json.as_bytes())?;
        Ok(())
    }

    fn read_rows(&self, entity: &str) -> Result<Vec<StoredRow>, PersistenceError> {
        Ok(self
            .load_all()?
            .into_values()
            .filter(|row| row.entity == entity)
            .collect())
    }
}

/// Writes `bytes` to `temp_path` and renames it over `target`. On any failure
/// the temp file is removed and `target` is left as it was.
fn replace_file(temp_path: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let result = fs::write(temp_path, bytes).and_then(|_| fs::rename(temp_path, target));
    if result.is_err() {
        let _ = fs::remove_file(temp_path);
    }
    result
}

/// Builds the store a configuration points at.
pub fn open_store(location: &StoreLocation) -> Box<dyn RecordStore> {
    match location {
        StoreLocation::Memory => Box::new(InMemoryStore::new()),
        StoreLocation::File(path) => Box::new(JsonFileStore::new(path.clone())),
    }
}

use crate::domain::{Row, RowStore};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Storage key for the display name.
pub const DISPLAY_NAME_KEY: &str = "userName";
/// Storage key for the serialized row list.
pub const ROWS_KEY: &str = "percentageCalculatorData";

/// Durable string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(name)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)
                .with_context(|| format!("creating {}", self.dir.display()))?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        Ok(Some(content))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.ensure_dir()?;
        let path = self.path_for(key);
        fs::write(&path, value).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

/// In-process store, used when nothing should touch the disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Typed access to the two persisted values: the row list and the display
/// name. Loading never fails; anything missing or unreadable yields the
/// default.
pub struct StateRepository {
    store: Box<dyn KeyValueStore>,
}

impl StateRepository {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    pub fn load_rows(&self) -> RowStore {
        let raw = match self.store.get(ROWS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return RowStore::default(),
            Err(err) => {
                tracing::warn!(error = %err, "could not read saved rows, starting fresh");
                return RowStore::default();
            }
        };

        match serde_json::from_str::<Vec<Row>>(&raw) {
            Ok(rows) => {
                tracing::info!(count = rows.len(), "restored saved rows");
                RowStore::from_rows(rows)
            }
            Err(err) => {
                tracing::warn!(error = %err, "saved rows are not valid, starting fresh");
                RowStore::default()
            }
        }
    }

    pub fn save_rows(&mut self, rows: &RowStore) -> Result<()> {
        let json = serde_json::to_string(rows).context("serializing rows")?;
        self.store.set(ROWS_KEY, &json)
    }

    pub fn load_display_name(&self) -> String {
        match self.store.get(DISPLAY_NAME_KEY) {
            Ok(name) => name.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(error = %err, "could not read saved name");
                String::new()
            }
        }
    }

    pub fn save_display_name(&mut self, name: &str) -> Result<()> {
        self.store.set(DISPLAY_NAME_KEY, name)
    }
}

impl Default for StateRepository {
    fn default() -> Self {
        Self::in_memory()
    }
}

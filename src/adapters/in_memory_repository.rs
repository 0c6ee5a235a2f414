//! In-memory Q-table repository for testing.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, PoisonError},
};

use crate::{
    Result,
    error::Error,
    ports::QTableRepository,
    q_learning::{QTable, serialization},
};

/// In-memory repository for testing.
///
/// Stores the encoded JSON bytes keyed by path, so loads go through the same
/// decoder as the file repository. All clones share the same storage.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the number of tables currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    /// Check if a table exists at the given path.
    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(&path.to_string_lossy().to_string())
    }

    /// Store raw bytes at `path`, bypassing the encoder.
    pub fn insert_raw(&self, path: &Path, bytes: impl Into<Vec<u8>>) {
        self.storage()
            .insert(path.to_string_lossy().to_string(), bytes.into());
    }
}

impl QTableRepository for InMemoryRepository {
    fn save(&self, table: &QTable, path: &Path) -> Result<()> {
        let mut bytes = Vec::new();
        serialization::write_table(&mut bytes, table)?;
        self.insert_raw(path, bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<Option<QTable>> {
        let storage = self.storage();
        let Some(bytes) = storage.get(&path.to_string_lossy().to_string()) else {
            return Ok(None);
        };

        serialization::read_table(bytes.as_slice())
            .map(Some)
            .map_err(|e| Error::CorruptTable {
                path: path.display().to_string(),
                message: e.to_string(),
            })
    }
}

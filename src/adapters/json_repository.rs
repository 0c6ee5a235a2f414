//! JSON file implementation of the Q-table repository.
//!
//! One file per agent, in the layout described in
//! [`crate::q_learning::serialization`].

use std::{
    fs::File,
    io::{BufReader, BufWriter, ErrorKind, Write},
    path::Path,
};

use crate::{
    Result,
    error::Error,
    ports::QTableRepository,
    q_learning::{QTable, serialization},
};

/// File-backed Q-table repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileRepository;

impl JsonFileRepository {
    /// Create a new JSON repository.
    pub fn new() -> Self {
        Self
    }
}

fn storage_error(operation: &str, path: &Path, source: std::io::Error) -> Error {
    Error::StorageUnavailable {
        operation: operation.to_string(),
        path: path.display().to_string(),
        source,
    }
}

impl QTableRepository for JsonFileRepository {
    fn save(&self, table: &QTable, path: &Path) -> Result<()> {
        // Encode first so a table that cannot be written leaves the old file intact
        let mut bytes = Vec::new();
        serialization::write_table(&mut bytes, table)?;

        let file = File::create(path).map_err(|source| storage_error("create", path, source))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(&bytes)
            .and_then(|()| writer.flush())
            .map_err(|source| storage_error("write", path, source))?;

        Ok(())
    }

    fn load(&self, path: &Path) -> Result<Option<QTable>> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(storage_error("open", path, source)),
        };

        let table = serialization::read_table(BufReader::new(file)).map_err(|e| {
            Error::CorruptTable {
                path: path.display().to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Some(table))
    }
}

//! Repository port for Q-table persistence.

use std::path::Path;

use crate::{Result, q_learning::QTable};

/// Port for persisting and loading one agent's Q-table.
///
/// # Examples
///
/// ```no_run
/// use pong_rl::adapters::JsonFileRepository;
/// use pong_rl::ports::QTableRepository;
/// use pong_rl::q_learning::QTable;
/// use std::path::Path;
///
/// let repo = JsonFileRepository::new();
/// repo.save(&QTable::new(), Path::new("agent1_q_table.json"))?;
/// let loaded = repo.load(Path::new("agent1_q_table.json"))?;
/// assert!(loaded.is_some());
/// # Ok::<(), pong_rl::Error>(())
/// ```
pub trait QTableRepository {
    /// Save a table, overwriting whatever is stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::StorageUnavailable`] if the location cannot be
    /// created or written.
    fn save(&self, table: &QTable, path: &Path) -> Result<()>;

    /// Load the table stored at `path`.
    ///
    /// Returns `Ok(None)` when nothing is stored there.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::CorruptTable`] if the stored data cannot be
    /// decoded, or [`crate::Error::StorageUnavailable`] if it exists but
    /// cannot be read.
    fn load(&self, path: &Path) -> Result<Option<QTable>>;
}

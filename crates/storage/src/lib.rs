// Plog Storage Layer
//
// Log persistence interface with pluggable backends

pub mod trait_;
pub mod memory;
pub mod json;
pub mod csv;
mod file;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use trait_::*;
pub use memory::MemoryStorage;
pub use json::JsonStorage;
pub use crate::csv::CsvStorage;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStorage;

use plog_core::{BackendConfig, StorageError};
use std::sync::Arc;

/// Open the backend described by `config`, creating its store if absent
pub fn open_backend(config: &BackendConfig) -> Result<SharedStorage, StorageError> {
    let storage: SharedStorage = match config {
        BackendConfig::Json { path, write_mode } => {
            Arc::new(JsonStorage::open(path)?.with_write_mode(*write_mode))
        }
        BackendConfig::Csv { path, write_mode } => {
            Arc::new(CsvStorage::open(path)?.with_write_mode(*write_mode))
        }
        #[cfg(feature = "sqlite")]
        BackendConfig::Sqlite { path } => Arc::new(SqliteStorage::open(path)?),
        #[cfg(not(feature = "sqlite"))]
        BackendConfig::Sqlite { .. } => {
            return Err(StorageError::Config(
                "sqlite backend requires the `sqlite` feature".to_string(),
            ))
        }
        BackendConfig::Memory => Arc::new(MemoryStorage::new()),
    };
    Ok(storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plog_core::WriteMode;

    #[test]
    fn test_open_backend_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let configs = vec![
            BackendConfig::Json {
                path: dir.path().join("logs.json"),
                write_mode: WriteMode::Rewrite,
            },
            BackendConfig::Csv {
                path: dir.path().join("logs.csv"),
                write_mode: WriteMode::Atomic,
            },
            BackendConfig::Memory,
        ];

        let names: Vec<&str> = configs
            .iter()
            .map(|c| open_backend(c).unwrap().name())
            .collect();
        assert_eq!(names, vec!["json", "csv", "memory"]);
        assert!(dir.path().join("logs.json").exists());
        assert!(dir.path().join("logs.csv").exists());
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_open_sqlite_backend_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs.db");
        let storage = open_backend(&BackendConfig::Sqlite { path: path.clone() }).unwrap();
        assert_eq!(storage.name(), "sqlite");
        assert!(path.exists());
    }
}

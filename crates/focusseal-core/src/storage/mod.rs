mod config;
pub mod database;

pub use config::{Config, ExportConfig, LoggingConfig, StorageConfig};
pub use database::SqliteStore;

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::StorageError;

/// Key holding the serialized `TimerSettings`.
pub const SETTINGS_KEY: &str = "focusseal.settings";
/// Key holding the serialized session history.
pub const SESSIONS_KEY: &str = "focusseal.sessions";

/// Local key-value persistence. Values are whole JSON documents, rewritten
/// on every change; the last write wins.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Volatile store for tests and ephemeral runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Returns the data directory.
///
/// `FOCUSSEAL_HOME` wins when set. Otherwise `~/.config/focusseal[-dev]/`,
/// with the `-dev` suffix when `FOCUSSEAL_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("FOCUSSEAL_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FOCUSSEAL_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focusseal-dev")
            } else {
                base_dir.join("focusseal")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

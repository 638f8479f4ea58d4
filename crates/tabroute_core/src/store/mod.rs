//! Durable key-value state for config and window bindings.
//!
//! # Responsibility
//! - Define the storage contract used by the binding table and config loader.
//! - Keep the persisted layout stable: `config` in the synced area,
//!   `windowBindings` in the local area, both plain JSON documents.
//!
//! # Invariants
//! - A missing key reads as `None`, never as an error.
//! - Values that fail to decode are reported as `InvalidData`, not masked.

use crate::db::DbError;
use crate::model::config::Config;
use crate::model::window::WindowId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryStateStore;
pub use sqlite::SqliteStateStore;

/// Storage key of the routing config (synced area).
pub const CONFIG_KEY: &str = "config";
/// Storage key of the window binding table (local area).
pub const BINDINGS_KEY: &str = "windowBindings";

/// Persisted binding layout: window id to group name.
pub type BindingMap = BTreeMap<WindowId, String>;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage area of one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StorageArea {
    /// Follows the user across devices.
    Sync,
    /// Device-local; window ids are meaningless elsewhere.
    Local,
}

impl StorageArea {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::Local => "local",
        }
    }
}

/// Storage errors.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    InvalidData { key: String, message: String },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData { key, message } => {
                write!(f, "invalid stored value for `{key}`: {message}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData { .. } => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Key-value storage contract.
pub trait StateStore {
    fn read(&self, area: StorageArea, key: &str) -> StoreResult<Option<Value>>;
    fn write(&mut self, area: StorageArea, key: &str, value: &Value) -> StoreResult<()>;
    fn remove(&mut self, area: StorageArea, key: &str) -> StoreResult<()>;
}

/// Reads and decodes one typed value.
pub fn read_typed<T: DeserializeOwned>(
    store: &impl StateStore,
    area: StorageArea,
    key: &str,
) -> StoreResult<Option<T>> {
    let Some(value) = store.read(area, key)? else {
        return Ok(None);
    };
    serde_json::from_value(value)
        .map(Some)
        .map_err(|err| StoreError::InvalidData {
            key: key.to_string(),
            message: err.to_string(),
        })
}

/// Encodes and writes one typed value.
pub fn write_typed<T: Serialize>(
    store: &mut impl StateStore,
    area: StorageArea,
    key: &str,
    value: &T,
) -> StoreResult<()> {
    let encoded = serde_json::to_value(value).map_err(|err| StoreError::InvalidData {
        key: key.to_string(),
        message: err.to_string(),
    })?;
    store.write(area, key, &encoded)
}

/// Loads the routing config, defaulting when absent.
pub fn load_config(store: &impl StateStore) -> StoreResult<Config> {
    Ok(read_typed(store, StorageArea::Sync, CONFIG_KEY)?.unwrap_or_default())
}

pub fn save_config(store: &mut impl StateStore, config: &Config) -> StoreResult<()> {
    write_typed(store, StorageArea::Sync, CONFIG_KEY, config)
}

/// Loads the binding map, empty when absent.
pub fn load_bindings(store: &impl StateStore) -> StoreResult<BindingMap> {
    Ok(read_typed(store, StorageArea::Local, BINDINGS_KEY)?.unwrap_or_default())
}

pub fn save_bindings(store: &mut impl StateStore, bindings: &BindingMap) -> StoreResult<()> {
    write_typed(store, StorageArea::Local, BINDINGS_KEY, bindings)
}

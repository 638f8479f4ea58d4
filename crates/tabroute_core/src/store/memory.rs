//! In-memory state store for tests and snapshot replay.

use super::{StateStore, StorageArea, StoreResult};
use serde_json::Value;
use std::collections::BTreeMap;

/// Non-durable `StateStore`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    entries: BTreeMap<(StorageArea, String), Value>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateStore for MemoryStateStore {
    fn read(&self, area: StorageArea, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.entries.get(&(area, key.to_string())).cloned())
    }

    fn write(&mut self, area: StorageArea, key: &str, value: &Value) -> StoreResult<()> {
        self.entries.insert((area, key.to_string()), value.clone());
        Ok(())
    }

    fn remove(&mut self, area: StorageArea, key: &str) -> StoreResult<()> {
        self.entries.remove(&(area, key.to_string()));
        Ok(())
    }
}

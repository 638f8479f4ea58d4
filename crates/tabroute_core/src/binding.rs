//! Window-to-group binding table.
//!
//! # Responsibility
//! - Own the persisted `windowBindings` map and its in-memory mirror.
//! - Enforce one window per group on every bind.
//! - Self-heal bindings that point at windows the host no longer has.
//!
//! # Invariants
//! - After `bind(w, g)` completes, no window other than `w` maps to `g`.
//! - The mirror is replaced only after a successful write; a failed write
//!   invalidates it so the next read goes back to storage.

use crate::error::RouterResult;
use crate::host::WindowHost;
use crate::model::window::WindowId;
use crate::store::{load_bindings, save_bindings, BindingMap, StateStore, StoreResult};
use log::{debug, info, warn};

/// In-memory mirror of the persisted binding map.
#[derive(Debug, Clone, Default)]
pub struct BindingCache {
    entries: Option<BindingMap>,
}

impl BindingCache {
    pub fn is_loaded(&self) -> bool {
        self.entries.is_some()
    }

    pub fn invalidate(&mut self) {
        self.entries = None;
    }

    fn fill(&mut self, entries: BindingMap) {
        self.entries = Some(entries);
    }
}

/// Persisted binding table over a `StateStore`.
pub struct BindingTable<S: StateStore> {
    store: S,
    cache: BindingCache,
}

impl<S: StateStore> BindingTable<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            cache: BindingCache::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn cache(&self) -> &BindingCache {
        &self.cache
    }

    /// Re-synchronizes the mirror from durable storage.
    pub fn reload(&mut self) -> StoreResult<()> {
        let entries = load_bindings(&self.store)?;
        debug!(
            "event=bindings_reload module=binding status=ok entries={}",
            entries.len()
        );
        self.cache.fill(entries);
        Ok(())
    }

    /// Returns a copy of the full binding map.
    pub fn get(&mut self) -> StoreResult<BindingMap> {
        if let Some(entries) = &self.cache.entries {
            return Ok(entries.clone());
        }
        self.reload()?;
        Ok(self.cache.entries.clone().unwrap_or_default())
    }

    pub fn group_for_window(&mut self, window_id: WindowId) -> StoreResult<Option<String>> {
        Ok(self.get()?.remove(&window_id))
    }

    /// Binds `window_id` to `group`, evicting any other window bound to it.
    pub fn bind(&mut self, window_id: WindowId, group: &str) -> StoreResult<()> {
        let mut entries = self.get()?;
        let evicted = evict_group(&mut entries, group, Some(window_id));
        entries.insert(window_id, group.to_string());
        self.persist(entries)?;
        info!(
            "event=window_bind module=binding status=ok window_id={} group={} evicted={}",
            window_id,
            group,
            evicted.len()
        );
        Ok(())
    }

    /// Removes the binding of `window_id`; no write when it was unbound.
    pub fn unbind(&mut self, window_id: WindowId) -> StoreResult<Option<String>> {
        let mut entries = self.get()?;
        let removed = entries.remove(&window_id);
        if let Some(group) = &removed {
            self.persist(entries)?;
            info!(
                "event=window_unbind module=binding status=ok window_id={} group={}",
                window_id, group
            );
        }
        Ok(removed)
    }

    /// Removes every binding that points at `group`.
    pub fn unbind_group(&mut self, group: &str) -> StoreResult<Vec<WindowId>> {
        let mut entries = self.get()?;
        let evicted = evict_group(&mut entries, group, None);
        if !evicted.is_empty() {
            self.persist(entries)?;
        }
        Ok(evicted)
    }

    /// Replaces the whole table, without merging prior entries.
    pub fn replace_all(&mut self, entries: BindingMap) -> StoreResult<()> {
        let count = entries.len();
        self.persist(entries)?;
        info!("event=bindings_replace module=binding status=ok entries={count}");
        Ok(())
    }

    /// Finds the live window bound to `group`.
    ///
    /// Candidates whose window no longer exists are deleted from the table
    /// and the scan continues.
    pub fn find_window_for_group(
        &mut self,
        group: &str,
        host: &impl WindowHost,
    ) -> RouterResult<Option<WindowId>> {
        let candidates = self
            .get()?
            .into_iter()
            .filter(|(_, bound)| bound == group)
            .map(|(window_id, _)| window_id)
            .collect::<Vec<_>>();

        for window_id in candidates {
            if host.window_exists(window_id)? {
                return Ok(Some(window_id));
            }
            warn!(
                "event=stale_binding module=binding status=skip window_id={} group={}",
                window_id, group
            );
            self.unbind(window_id)?;
        }
        Ok(None)
    }

    fn persist(&mut self, entries: BindingMap) -> StoreResult<()> {
        match save_bindings(&mut self.store, &entries) {
            Ok(()) => {
                self.cache.fill(entries);
                Ok(())
            }
            Err(err) => {
                self.cache.invalidate();
                Err(err)
            }
        }
    }
}

fn evict_group(entries: &mut BindingMap, group: &str, keep: Option<WindowId>) -> Vec<WindowId> {
    let evicted = entries
        .iter()
        .filter(|(window_id, bound)| bound.as_str() == group && Some(**window_id) != keep)
        .map(|(window_id, _)| *window_id)
        .collect::<Vec<_>>();
    for window_id in &evicted {
        entries.remove(window_id);
    }
    evicted
}

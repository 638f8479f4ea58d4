#![allow(dead_code)]

use serde_json::Value;
use std::collections::HashSet;
use tabroute_core::host::TabGroupId;
use tabroute_core::{
    Config, Group, HostError, HostResult, InMemoryHost, MatchMode, MemoryStateStore,
    RoutingOptions, StateStore, StorageArea, StoreError, StoreResult, Tab, TabGroup,
    TabGroupColor, TabId, TabRouter, Window, WindowHost, WindowId,
};

pub fn simple(name: &str, patterns: &[&str], priority: i64) -> Group {
    Group::new(name, patterns, priority, MatchMode::Simple)
}

pub fn config_of(groups: Vec<Group>) -> Config {
    Config {
        groups,
        ..Config::default()
    }
}

/// Router over an in-memory store with `config` already saved.
pub fn router_with<H: WindowHost>(
    host: H,
    config: Config,
    options: RoutingOptions,
) -> TabRouter<MemoryStateStore, H> {
    let mut router = TabRouter::new(MemoryStateStore::new(), host, options);
    router.save_config(config).expect("config should save");
    router
}

pub fn window_of(host: &impl WindowHost, tab_id: TabId) -> Option<WindowId> {
    host.tab(tab_id)
        .expect("tab query should succeed")
        .map(|tab| tab.window_id)
}

/// Host wrapper whose moves fail for selected tabs.
pub struct FlakyHost {
    pub inner: InMemoryHost,
    pub failing_moves: HashSet<TabId>,
}

impl FlakyHost {
    pub fn new(inner: InMemoryHost, failing: &[TabId]) -> Self {
        Self {
            inner,
            failing_moves: failing.iter().copied().collect(),
        }
    }
}

impl WindowHost for FlakyHost {
    fn windows(&self) -> HostResult<Vec<Window>> {
        self.inner.windows()
    }

    fn tab(&self, tab_id: TabId) -> HostResult<Option<Tab>> {
        self.inner.tab(tab_id)
    }

    fn focused_window(&self) -> HostResult<Option<WindowId>> {
        self.inner.focused_window()
    }

    fn move_tab(&mut self, tab_id: TabId, window_id: WindowId) -> HostResult<()> {
        if self.failing_moves.contains(&tab_id) {
            return Err(HostError::Rejected(format!("tab {tab_id} is pinned")));
        }
        self.inner.move_tab(tab_id, window_id)
    }

    fn focus_window(&mut self, window_id: WindowId) -> HostResult<()> {
        self.inner.focus_window(window_id)
    }

    fn draw_attention(&mut self, window_id: WindowId) -> HostResult<()> {
        self.inner.draw_attention(window_id)
    }

    fn create_window_with_tab(&mut self, tab_id: TabId) -> HostResult<WindowId> {
        self.inner.create_window_with_tab(tab_id)
    }

    fn group_tabs(
        &mut self,
        window_id: WindowId,
        tab_ids: &[TabId],
        title: &str,
        color: TabGroupColor,
    ) -> HostResult<TabGroupId> {
        self.inner.group_tabs(window_id, tab_ids, title, color)
    }

    fn tab_groups(&self) -> HostResult<Vec<TabGroup>> {
        self.inner.tab_groups()
    }
}

/// State store that can be armed to reject its next write.
#[derive(Default)]
pub struct FailingStore {
    pub inner: MemoryStateStore,
    fail_next_write: bool,
}

impl FailingStore {
    pub fn fail_next_write(&mut self) {
        self.fail_next_write = true;
    }
}

impl StateStore for FailingStore {
    fn read(&self, area: StorageArea, key: &str) -> StoreResult<Option<Value>> {
        self.inner.read(area, key)
    }

    fn write(&mut self, area: StorageArea, key: &str, value: &Value) -> StoreResult<()> {
        if std::mem::take(&mut self.fail_next_write) {
            return Err(StoreError::from(rusqlite::Error::InvalidQuery));
        }
        self.inner.write(area, key, value)
    }

    fn remove(&mut self, area: StorageArea, key: &str) -> StoreResult<()> {
        self.inner.remove(area, key)
    }
}

//! Router use-case service.
//!
//! # Responsibility
//! - Own the binding table, the browser host and the routing engine for one
//!   process lifetime.
//! - Expose every UI-facing operation as one method.
//!
//! # Invariants
//! - Config is loaded fresh from storage for every decision.
//! - Every structural config change is validated, renumbered and only then
//!   persisted; a rejected change leaves stored config untouched.
//! - `startup` re-synchronizes the binding mirror before rebinding.

use crate::binding::BindingTable;
use crate::coordinator::{WindowCoordinator, WindowLabel};
use crate::error::{RouterError, RouterResult};
use crate::host::WindowHost;
use crate::matcher::{is_internal_url, matches_any};
use crate::model::config::{Config, ConfigError, Group, MatchMode};
use crate::model::window::{Tab, TabId, WindowId, WindowKind};
use crate::rebind::rebind;
use crate::resolver::MatchKind;
use crate::routing::{RouteOutcome, RoutingEngine, RoutingOptions};
use crate::sorter::{sort_all, SortReport};
use crate::store::{load_config, save_config, BindingMap, StateStore};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Focused window and its bound group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveWindow {
    pub window_id: Option<WindowId>,
    pub group: Option<String>,
}

/// Display row for one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSummary {
    pub id: WindowId,
    pub kind: WindowKind,
    pub focused: bool,
    pub tab_count: usize,
    pub first_tab_title: Option<String>,
    pub first_tab_url: Option<String>,
    pub group: Option<String>,
}

/// One open tab matched by a candidate pattern set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewHit {
    pub tab_id: TabId,
    pub window_id: WindowId,
    pub title: String,
    pub url: String,
    pub kind: MatchKind,
}

/// Process-lifetime router facade.
pub struct TabRouter<S: StateStore, H: WindowHost> {
    bindings: BindingTable<S>,
    host: H,
    engine: RoutingEngine,
}

impl<S: StateStore, H: WindowHost> TabRouter<S, H> {
    pub fn new(store: S, host: H, options: RoutingOptions) -> Self {
        Self {
            bindings: BindingTable::new(store),
            host,
            engine: RoutingEngine::new(options),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Process start: reload the binding mirror, then rebuild bindings from
    /// live windows.
    pub fn startup(&mut self) -> RouterResult<BindingMap> {
        self.bindings.reload()?;
        self.rebind()
    }

    pub fn config(&self) -> RouterResult<Config> {
        Ok(load_config(self.bindings.store())?)
    }

    /// Validates, renumbers and stores a full config.
    pub fn save_config(&mut self, mut config: Config) -> RouterResult<Config> {
        config.normalize()?;
        save_config(self.bindings.store_mut(), &config)?;
        info!(
            "event=config_save module=service status=ok groups={} enabled={}",
            config.groups.len(),
            config.enabled
        );
        Ok(config)
    }

    pub fn bindings(&mut self) -> RouterResult<BindingMap> {
        Ok(self.bindings.get()?)
    }

    pub fn save_bindings(&mut self, entries: BindingMap) -> RouterResult<()> {
        Ok(self.bindings.replace_all(entries)?)
    }

    /// Binds a window to an existing group.
    pub fn bind_window(&mut self, window_id: WindowId, group: &str) -> RouterResult<()> {
        let config = self.config()?;
        if config.group(group).is_none() {
            return Err(ConfigError::GroupNotFound(group.to_string()).into());
        }
        Ok(self.bindings.bind(window_id, group)?)
    }

    pub fn unbind_window(&mut self, window_id: WindowId) -> RouterResult<Option<String>> {
        Ok(self.bindings.unbind(window_id)?)
    }

    pub fn active_window(&mut self) -> RouterResult<ActiveWindow> {
        let window_id = self.host.focused_window()?;
        let group = match window_id {
            Some(id) => self.bindings.group_for_window(id)?,
            None => None,
        };
        Ok(ActiveWindow { window_id, group })
    }

    pub fn sort_all(&mut self) -> RouterResult<SortReport> {
        let config = self.config()?;
        sort_all(&config, &mut self.host, &mut self.bindings)
    }

    /// Rebuilds and stores the binding table from live windows.
    pub fn rebind(&mut self) -> RouterResult<BindingMap> {
        let config = self.config()?;
        let windows = self.host.windows()?;
        let entries = rebind(&config, &windows);
        self.bindings.replace_all(entries.clone())?;
        Ok(entries)
    }

    pub fn list_windows(&mut self) -> RouterResult<Vec<WindowSummary>> {
        let table = self.bindings.get()?;
        Ok(self
            .host
            .windows()?
            .into_iter()
            .map(|window| WindowSummary {
                id: window.id,
                kind: window.kind,
                focused: window.focused,
                tab_count: window.tabs.len(),
                first_tab_title: window.first_tab().map(|tab| tab.title.clone()),
                first_tab_url: window.first_tab().map(|tab| tab.url.clone()),
                group: table.get(&window.id).cloned(),
            })
            .collect())
    }

    /// Lists open tabs a candidate pattern set would claim. Read-only.
    pub fn preview_patterns(
        &self,
        patterns: &[String],
        mode: MatchMode,
    ) -> RouterResult<Vec<PreviewHit>> {
        let hits = self
            .host
            .windows()?
            .into_iter()
            .flat_map(|window| window.tabs)
            .filter(|tab| !is_internal_url(&tab.url))
            .filter_map(|tab| {
                let kind = if matches_any(&tab.title, patterns, mode) {
                    MatchKind::Title
                } else if matches_any(&tab.url, patterns, mode) {
                    MatchKind::Url
                } else {
                    return None;
                };
                Some(PreviewHit {
                    tab_id: tab.id,
                    window_id: tab.window_id,
                    title: tab.title,
                    url: tab.url,
                    kind,
                })
            })
            .collect::<Vec<_>>();
        debug!(
            "event=preview module=service status=ok mode={} patterns={} hits={}",
            mode.as_str(),
            patterns.len(),
            hits.len()
        );
        Ok(hits)
    }

    pub fn flash_window(&mut self, window_id: WindowId) -> RouterResult<()> {
        let mut coordinator = WindowCoordinator::new(&mut self.host, &mut self.bindings);
        Ok(coordinator.flash_window(window_id)?)
    }

    /// Labels a window's tabs with `title`, or with its bound group name.
    pub fn label_window(
        &mut self,
        window_id: WindowId,
        title: Option<String>,
    ) -> RouterResult<WindowLabel> {
        let title = match title {
            Some(title) => title,
            None => self
                .bindings
                .group_for_window(window_id)?
                .ok_or(RouterError::WindowUnbound(window_id))?,
        };
        let mut coordinator = WindowCoordinator::new(&mut self.host, &mut self.bindings);
        Ok(coordinator.label_window(window_id, &title)?)
    }

    pub fn export_config(&self) -> RouterResult<String> {
        Ok(self.config()?.export_json()?)
    }

    /// Replaces the group list with an imported one; other config fields
    /// are kept.
    pub fn import_config(&mut self, text: &str) -> RouterResult<Config> {
        let groups = Config::import_json(text)?;
        let mut config = self.config()?;
        config.groups = groups;
        self.save_config(config)
    }

    pub fn add_group(&mut self, group: Group) -> RouterResult<Config> {
        let mut config = self.config()?;
        config.add_group(group)?;
        self.save_config(config)
    }

    /// Replaces a group; a rename carries its window binding along.
    pub fn update_group(&mut self, original_name: &str, group: Group) -> RouterResult<Config> {
        let mut config = self.config()?;
        config.update_group(original_name, group.clone())?;
        let new_name = group.name.trim().to_string();
        let config = self.save_config(config)?;

        if new_name != original_name {
            for window_id in self.bindings.unbind_group(original_name)? {
                self.bindings.bind(window_id, &new_name)?;
            }
        }
        Ok(config)
    }

    /// Deletes a group and drops its window bindings.
    pub fn delete_group(&mut self, name: &str) -> RouterResult<Config> {
        let mut config = self.config()?;
        config.remove_group(name)?;
        let config = self.save_config(config)?;
        self.bindings.unbind_group(name)?;
        Ok(config)
    }

    pub fn move_group(&mut self, name: &str, target_rank: usize) -> RouterResult<Config> {
        let mut config = self.config()?;
        config.move_group(name, target_rank)?;
        self.save_config(config)
    }

    pub fn on_tab_navigated(&mut self, tab: &Tab) -> RouterResult<RouteOutcome> {
        let config = self.config()?;
        self.engine
            .on_tab_navigated(&config, &mut self.host, &mut self.bindings, tab)
    }

    pub fn on_tab_created(&mut self, tab: &Tab) -> RouterResult<RouteOutcome> {
        let config = self.config()?;
        self.engine
            .on_tab_created(&config, &mut self.host, &mut self.bindings, tab)
    }

    pub fn on_window_removed(&mut self, window_id: WindowId) -> RouterResult<Option<String>> {
        self.engine.on_window_removed(&mut self.bindings, window_id)
    }
}

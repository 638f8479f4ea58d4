//! Per-event routing decisions.
//!
//! # Responsibility
//! - Decide where one tab belongs whenever it is created or navigates.
//! - Drop bindings of windows the host reports as closed.
//!
//! # Invariants
//! - Disabled config or internal/empty URLs never move a tab.
//! - A tab already in its group's window is left alone.
//! - Move failures surface as `RouteOutcome::MoveFailed`, not as errors.

use crate::binding::BindingTable;
use crate::coordinator::{MoveOutcome, WindowCoordinator};
use crate::error::RouterResult;
use crate::host::WindowHost;
use crate::matcher::is_internal_url;
use crate::model::config::Config;
use crate::model::window::{Tab, TabId, WindowId};
use crate::resolver::{GroupResolver, MatchPolicy};
use crate::store::StateStore;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Engine options chosen by the embedding host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingOptions {
    pub policy: MatchPolicy,
    /// When a tab matches a group that has no window yet: `true` opens a
    /// window for the group, `false` leaves the tab until the next sort.
    pub create_window_on_unbound_match: bool,
}

impl Default for RoutingOptions {
    fn default() -> Self {
        Self {
            policy: MatchPolicy::default(),
            create_window_on_unbound_match: true,
        }
    }
}

/// What the engine did with one tab event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum RouteOutcome {
    /// Routing disabled or URL empty/internal.
    Ignored,
    /// Tab already sits in the window it belongs to.
    AlreadyHome { window_id: WindowId },
    Moved { group: String, window_id: WindowId },
    CreatedWindow { group: String, window_id: WindowId },
    /// Group matched but has no window and creation is turned off.
    LeftInPlace { group: String },
    MovedToCatchAll { window_id: WindowId },
    /// Catch-all configured but its window is gone.
    CatchAllMissing { window_id: WindowId },
    NoMatch,
    MoveFailed { window_id: WindowId, message: String },
}

impl RouteOutcome {
    fn label(&self) -> &'static str {
        match self {
            Self::Ignored => "ignored",
            Self::AlreadyHome { .. } => "already_home",
            Self::Moved { .. } => "moved",
            Self::CreatedWindow { .. } => "created_window",
            Self::LeftInPlace { .. } => "left_in_place",
            Self::MovedToCatchAll { .. } => "moved_to_catch_all",
            Self::CatchAllMissing { .. } => "catch_all_missing",
            Self::NoMatch => "no_match",
            Self::MoveFailed { .. } => "move_failed",
        }
    }
}

/// Event-driven router.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoutingEngine {
    options: RoutingOptions,
}

impl RoutingEngine {
    pub fn new(options: RoutingOptions) -> Self {
        Self { options }
    }

    /// Routes a tab after its URL or title changed.
    ///
    /// `tab` carries the new URL/title and the window the tab sits in now.
    pub fn on_tab_navigated<H: WindowHost, S: StateStore>(
        &self,
        config: &Config,
        host: &mut H,
        bindings: &mut BindingTable<S>,
        tab: &Tab,
    ) -> RouterResult<RouteOutcome> {
        let outcome = self.decide(config, host, bindings, tab)?;
        match &outcome {
            RouteOutcome::Ignored => debug!(
                "event=tab_route module=routing status=skip tab_id={} outcome=ignored",
                tab.id
            ),
            RouteOutcome::MoveFailed { window_id, message } => warn!(
                "event=tab_route module=routing status=error tab_id={} window_id={} error={}",
                tab.id, window_id, message
            ),
            other => info!(
                "event=tab_route module=routing status=ok tab_id={} outcome={}",
                tab.id,
                other.label()
            ),
        }
        Ok(outcome)
    }

    /// Routes a newly created tab.
    pub fn on_tab_created<H: WindowHost, S: StateStore>(
        &self,
        config: &Config,
        host: &mut H,
        bindings: &mut BindingTable<S>,
        tab: &Tab,
    ) -> RouterResult<RouteOutcome> {
        self.on_tab_navigated(config, host, bindings, tab)
    }

    /// Drops the binding of a closed window.
    pub fn on_window_removed<S: StateStore>(
        &self,
        bindings: &mut BindingTable<S>,
        window_id: WindowId,
    ) -> RouterResult<Option<String>> {
        Ok(bindings.unbind(window_id)?)
    }

    fn decide<H: WindowHost, S: StateStore>(
        &self,
        config: &Config,
        host: &mut H,
        bindings: &mut BindingTable<S>,
        tab: &Tab,
    ) -> RouterResult<RouteOutcome> {
        let (tab_id, current_window) = (tab.id, tab.window_id);
        if !config.enabled || is_internal_url(&tab.url) {
            return Ok(RouteOutcome::Ignored);
        }

        let resolver = GroupResolver::new(self.options.policy);
        let Some(info) = resolver.resolve(&tab.url, &tab.title, config) else {
            return route_to_catch_all(config, host, bindings, tab_id, current_window);
        };
        let group = info.group.name.clone();

        if bindings.group_for_window(current_window)?.as_deref() == Some(group.as_str()) {
            return Ok(RouteOutcome::AlreadyHome {
                window_id: current_window,
            });
        }

        if let Some(window_id) = bindings.find_window_for_group(&group, &*host)? {
            let mut coordinator = WindowCoordinator::new(host, bindings);
            return Ok(match coordinator.move_tab_to_window(tab_id, window_id) {
                MoveOutcome::Moved => RouteOutcome::Moved { group, window_id },
                MoveOutcome::Failed(message) => RouteOutcome::MoveFailed { window_id, message },
            });
        }

        if !self.options.create_window_on_unbound_match {
            return Ok(RouteOutcome::LeftInPlace { group });
        }

        let mut coordinator = WindowCoordinator::new(host, bindings);
        let window_id = coordinator.create_window_for_group(&group, tab_id)?;
        Ok(RouteOutcome::CreatedWindow { group, window_id })
    }
}

fn route_to_catch_all<H: WindowHost, S: StateStore>(
    config: &Config,
    host: &mut H,
    bindings: &mut BindingTable<S>,
    tab_id: TabId,
    current_window: WindowId,
) -> RouterResult<RouteOutcome> {
    let Some(catch_all) = config.catch_all_window_id else {
        return Ok(RouteOutcome::NoMatch);
    };
    if catch_all == current_window {
        return Ok(RouteOutcome::AlreadyHome {
            window_id: catch_all,
        });
    }
    if !host.window_exists(catch_all)? {
        warn!(
            "event=catch_all_missing module=routing status=skip window_id={} tab_id={}",
            catch_all, tab_id
        );
        return Ok(RouteOutcome::CatchAllMissing {
            window_id: catch_all,
        });
    }

    let mut coordinator = WindowCoordinator::new(host, bindings);
    Ok(match coordinator.move_tab_to_window(tab_id, catch_all) {
        MoveOutcome::Moved => RouteOutcome::MovedToCatchAll {
            window_id: catch_all,
        },
        MoveOutcome::Failed(message) => RouteOutcome::MoveFailed {
            window_id: catch_all,
            message,
        },
    })
}

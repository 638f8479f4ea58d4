//! Batch reconciliation of all open tabs.
//!
//! # Responsibility
//! - Move every matching tab into its group's window in one pass.
//! - Respect window ownership: a lower-priority group never takes tabs out of
//!   a window bound to a higher-priority group.
//!
//! # Invariants
//! - Groups run in ascending numeric priority regardless of resolver policy.
//! - Windows and bindings are re-read for every group; each candidate is
//!   re-verified right before it moves.
//! - One failed move never aborts the pass; it becomes an entry in
//!   `SortReport::errors`.

use crate::binding::BindingTable;
use crate::coordinator::{MoveOutcome, WindowCoordinator};
use crate::error::RouterResult;
use crate::host::WindowHost;
use crate::matcher::{is_internal_url, matches_any};
use crate::model::config::{Config, Group};
use crate::model::window::{Tab, TabId, WindowId};
use crate::store::{BindingMap, StateStore};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Summary of one `sort_all` pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortReport {
    pub moved: usize,
    pub errors: Vec<String>,
}

/// Sorts every open tab into its group's window.
///
/// Runs regardless of `config.enabled`: this is an explicit user action.
///
/// # Errors
/// Only when storage or window enumeration fails outright; individual tab
/// failures are collected in the report.
pub fn sort_all<H: WindowHost, S: StateStore>(
    config: &Config,
    host: &mut H,
    bindings: &mut BindingTable<S>,
) -> RouterResult<SortReport> {
    let sort_id = Uuid::new_v4();
    info!(
        "event=sort_all module=sorter status=start sort_id={} groups={}",
        sort_id,
        config.groups.len()
    );

    let mut report = SortReport::default();
    for group in config.groups_by_priority() {
        let moved_before = report.moved;
        sort_group(config, group, host, bindings, &mut report)?;
        info!(
            "event=sort_group module=sorter status=ok sort_id={} group={} moved={}",
            sort_id,
            group.name,
            report.moved - moved_before
        );
    }

    info!(
        "event=sort_all module=sorter status=ok sort_id={} moved={} errors={}",
        sort_id,
        report.moved,
        report.errors.len()
    );
    Ok(report)
}

fn sort_group<H: WindowHost, S: StateStore>(
    config: &Config,
    group: &Group,
    host: &mut H,
    bindings: &mut BindingTable<S>,
    report: &mut SortReport,
) -> RouterResult<()> {
    let windows = host.windows()?;
    let table = bindings.get()?;

    let candidates = windows
        .iter()
        .filter(|window| window.is_normal())
        .flat_map(|window| window.tabs.iter())
        .filter(|tab| tab_matches_group(tab, group))
        .filter(|tab| !window_is_owned(config, &table, tab.window_id, group))
        .map(|tab| tab.id)
        .collect::<Vec<TabId>>();

    for tab_id in candidates {
        let Some(tab) = host.tab(tab_id)? else {
            continue;
        };
        let target = bindings.find_window_for_group(&group.name, &*host)?;

        let mut coordinator = WindowCoordinator::new(host, bindings);
        match target {
            Some(window_id) if window_id == tab.window_id => {}
            Some(window_id) => match coordinator.move_tab_to_window(tab_id, window_id) {
                MoveOutcome::Moved => report.moved += 1,
                MoveOutcome::Failed(message) => record_failure(report, tab_id, &message),
            },
            // First candidate of an unbound group seeds its window.
            None => match coordinator.create_window_for_group(&group.name, tab_id) {
                Ok(_) => report.moved += 1,
                Err(err) => record_failure(report, tab_id, &err.to_string()),
            },
        }
    }
    Ok(())
}

fn tab_matches_group(tab: &Tab, group: &Group) -> bool {
    !is_internal_url(&tab.url)
        && (matches_any(&tab.url, &group.patterns, group.mode)
            || matches_any(&tab.title, &group.patterns, group.mode))
}

/// True when the tab's window is bound to this group or to a group with
/// strictly higher priority.
fn window_is_owned(config: &Config, table: &BindingMap, window_id: WindowId, group: &Group) -> bool {
    let Some(bound) = table.get(&window_id) else {
        return false;
    };
    if bound == &group.name {
        return true;
    }
    config
        .group(bound)
        .is_some_and(|owner| owner.priority < group.priority)
}

fn record_failure(report: &mut SortReport, tab_id: TabId, message: &str) {
    warn!(
        "event=sort_move module=sorter status=error tab_id={} error={}",
        tab_id, message
    );
    report.errors.push(format!("tab {tab_id}: {message}"));
}

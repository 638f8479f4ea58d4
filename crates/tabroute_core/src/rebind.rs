//! Startup rebinding from live tab evidence.
//!
//! Window ids do not survive a browser restart, so the persisted binding
//! table is rebuilt from scratch by looking at what each window contains.
//!
//! # Invariants
//! - Groups are visited in configured order, windows in host enumeration
//!   order; the first window with a matching tab wins.
//! - Each window and each group is claimed at most once per pass.
//! - Only normal windows and non-internal tabs count as evidence.
//! - The result replaces the previous table; nothing is merged.

use crate::matcher::{is_internal_url, matches_any};
use crate::model::config::{Config, Group};
use crate::model::window::{Window, WindowId};
use crate::store::BindingMap;
use log::{debug, info};
use std::collections::HashSet;

/// Builds a fresh binding map for `config` from `windows`.
pub fn rebind(config: &Config, windows: &[Window]) -> BindingMap {
    let mut bindings = BindingMap::new();
    let mut claimed_windows: HashSet<WindowId> = HashSet::new();
    let mut claimed_groups: HashSet<&str> = HashSet::new();

    for group in &config.groups {
        if claimed_groups.contains(group.name.as_str()) {
            continue;
        }

        let evidence = windows
            .iter()
            .filter(|window| window.is_normal() && !claimed_windows.contains(&window.id))
            .find(|window| window_has_evidence(window, group));

        match evidence {
            Some(window) => {
                claimed_windows.insert(window.id);
                claimed_groups.insert(group.name.as_str());
                bindings.insert(window.id, group.name.clone());
                debug!(
                    "event=rebind_group module=rebind status=ok group={} window_id={}",
                    group.name, window.id
                );
            }
            None => debug!(
                "event=rebind_group module=rebind status=skip group={} reason=no_evidence",
                group.name
            ),
        }
    }

    info!(
        "event=rebind module=rebind status=ok groups={} windows={} bound={}",
        config.groups.len(),
        windows.len(),
        bindings.len()
    );
    bindings
}

fn window_has_evidence(window: &Window, group: &Group) -> bool {
    window.tabs.iter().any(|tab| {
        !is_internal_url(&tab.url)
            && (matches_any(&tab.url, &group.patterns, group.mode)
                || matches_any(&tab.title, &group.patterns, group.mode))
    })
}

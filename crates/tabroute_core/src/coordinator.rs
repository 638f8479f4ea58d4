//! Window coordination: moving tabs, creating and presenting windows.
//!
//! # Responsibility
//! - Relocate tabs and focus the destination window.
//! - Create a dedicated window for a group and record its binding.
//! - Present windows to the user (focus + attention, tab-group labels).
//!
//! # Invariants
//! - A failed move is reported as `MoveOutcome::Failed`, never as an error.
//! - A window created for a group is bound to it before returning.

use crate::binding::BindingTable;
use crate::error::RouterResult;
use crate::host::{HostError, HostResult, TabGroupColor, TabGroupId, WindowHost};
use crate::model::window::{TabId, WindowId};
use crate::store::StateStore;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Result of one tab move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Failed(String),
}

impl MoveOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved)
    }
}

/// Label applied to a window's tabs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowLabel {
    pub group_id: TabGroupId,
    pub title: String,
    pub color: TabGroupColor,
}

/// Borrowing coordinator over one host and one binding table.
pub struct WindowCoordinator<'a, H: WindowHost, S: StateStore> {
    host: &'a mut H,
    bindings: &'a mut BindingTable<S>,
}

impl<'a, H: WindowHost, S: StateStore> WindowCoordinator<'a, H, S> {
    pub fn new(host: &'a mut H, bindings: &'a mut BindingTable<S>) -> Self {
        Self { host, bindings }
    }

    /// Moves a tab to the end of `window_id` and focuses that window.
    pub fn move_tab_to_window(&mut self, tab_id: TabId, window_id: WindowId) -> MoveOutcome {
        let result = self
            .host
            .move_tab(tab_id, window_id)
            .and_then(|()| self.host.focus_window(window_id));
        match result {
            Ok(()) => {
                info!(
                    "event=tab_move module=coordinator status=ok tab_id={} window_id={}",
                    tab_id, window_id
                );
                MoveOutcome::Moved
            }
            Err(err) => {
                warn!(
                    "event=tab_move module=coordinator status=error tab_id={} window_id={} error={}",
                    tab_id, window_id, err
                );
                MoveOutcome::Failed(err.to_string())
            }
        }
    }

    /// Creates a window holding `seed_tab`, focuses it and binds it to `group`.
    pub fn create_window_for_group(
        &mut self,
        group: &str,
        seed_tab: TabId,
    ) -> RouterResult<WindowId> {
        let window_id = self.host.create_window_with_tab(seed_tab)?;
        if let Err(err) = self.host.focus_window(window_id) {
            warn!(
                "event=window_focus module=coordinator status=error window_id={} error={}",
                window_id, err
            );
        }
        self.bindings.bind(window_id, group)?;
        info!(
            "event=window_create module=coordinator status=ok window_id={} group={} seed_tab={}",
            window_id, group, seed_tab
        );
        Ok(window_id)
    }

    /// Focuses a window and asks the host to draw attention to it.
    pub fn flash_window(&mut self, window_id: WindowId) -> HostResult<()> {
        self.host.focus_window(window_id)?;
        self.host.draw_attention(window_id)
    }

    /// Groups every tab of `window_id` under one labeled tab group.
    ///
    /// The color is the first palette entry not used by another window's
    /// tab groups.
    pub fn label_window(&mut self, window_id: WindowId, title: &str) -> HostResult<WindowLabel> {
        let window = self
            .host
            .windows()?
            .into_iter()
            .find(|window| window.id == window_id)
            .ok_or(HostError::WindowNotFound(window_id))?;
        let tab_ids = window.tabs.iter().map(|tab| tab.id).collect::<Vec<_>>();

        let in_use = self
            .host
            .tab_groups()?
            .into_iter()
            .filter(|group| group.window_id != window_id)
            .map(|group| group.color)
            .collect::<Vec<_>>();
        let color = pick_color(&in_use);

        let group_id = self.host.group_tabs(window_id, &tab_ids, title, color)?;
        info!(
            "event=window_label module=coordinator status=ok window_id={} tabs={} color={}",
            window_id,
            tab_ids.len(),
            color.as_str()
        );
        Ok(WindowLabel {
            group_id,
            title: title.to_string(),
            color,
        })
    }
}

/// Picks the first unused palette color, cycling once all are taken.
pub fn pick_color(in_use: &[TabGroupColor]) -> TabGroupColor {
    TabGroupColor::PALETTE
        .iter()
        .copied()
        .find(|color| !in_use.contains(color))
        .unwrap_or(TabGroupColor::PALETTE[in_use.len() % TabGroupColor::PALETTE.len()])
}

//! Browser host boundary.
//!
//! # Responsibility
//! - Describe every window/tab operation the core needs from the browser.
//! - Keep routing logic independent from a concrete browser API.
//!
//! # Invariants
//! - `windows()` returns windows in host enumeration order with tabs in strip
//!   order; rebinding depends on that order.
//! - `move_tab` appends the tab at the end of the target window.

use crate::model::window::{Tab, TabId, Window, WindowId};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;

pub use memory::InMemoryHost;

pub type HostResult<T> = Result<T, HostError>;

/// Host-side tab group identifier.
pub type TabGroupId = i64;

/// Fixed tab-group color palette, in preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabGroupColor {
    Grey,
    Blue,
    Red,
    Yellow,
    Green,
    Pink,
    Purple,
    Cyan,
    Orange,
}

impl TabGroupColor {
    pub const PALETTE: [TabGroupColor; 9] = [
        Self::Grey,
        Self::Blue,
        Self::Red,
        Self::Yellow,
        Self::Green,
        Self::Pink,
        Self::Purple,
        Self::Cyan,
        Self::Orange,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grey => "grey",
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Pink => "pink",
            Self::Purple => "purple",
            Self::Cyan => "cyan",
            Self::Orange => "orange",
        }
    }
}

/// One visual tab group as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabGroup {
    pub id: TabGroupId,
    pub window_id: WindowId,
    pub title: String,
    pub color: TabGroupColor,
}

/// Host operation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    WindowNotFound(WindowId),
    TabNotFound(TabId),
    /// The browser rejected the operation.
    Rejected(String),
}

impl Display for HostError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WindowNotFound(id) => write!(f, "window not found: {id}"),
            Self::TabNotFound(id) => write!(f, "tab not found: {id}"),
            Self::Rejected(message) => write!(f, "host rejected operation: {message}"),
        }
    }
}

impl Error for HostError {}

/// Window/tab operations provided by the browser.
pub trait WindowHost {
    /// All live windows with their tabs.
    fn windows(&self) -> HostResult<Vec<Window>>;

    /// One live tab, `None` when it no longer exists.
    fn tab(&self, tab_id: TabId) -> HostResult<Option<Tab>>;

    /// Currently focused window, if any.
    fn focused_window(&self) -> HostResult<Option<WindowId>>;

    fn move_tab(&mut self, tab_id: TabId, window_id: WindowId) -> HostResult<()>;

    fn focus_window(&mut self, window_id: WindowId) -> HostResult<()>;

    /// Requests user attention (taskbar flash) for a window.
    fn draw_attention(&mut self, window_id: WindowId) -> HostResult<()>;

    /// Creates a normal window holding `tab_id`, detaching it from its
    /// previous window. Returns the new window id.
    fn create_window_with_tab(&mut self, tab_id: TabId) -> HostResult<WindowId>;

    /// Groups `tab_ids` into one titled, colored tab group.
    fn group_tabs(
        &mut self,
        window_id: WindowId,
        tab_ids: &[TabId],
        title: &str,
        color: TabGroupColor,
    ) -> HostResult<TabGroupId>;

    fn tab_groups(&self) -> HostResult<Vec<TabGroup>>;

    fn window_exists(&self, window_id: WindowId) -> HostResult<bool> {
        Ok(self
            .windows()?
            .iter()
            .any(|window| window.id == window_id))
    }
}

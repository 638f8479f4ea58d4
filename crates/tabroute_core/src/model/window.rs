//! Window and tab snapshots.
//!
//! Windows and tabs are owned by the browser host. The core only reads these
//! snapshots and mutates real state through `WindowHost`.

use serde::{Deserialize, Serialize};

/// Browser window identifier.
pub type WindowId = i64;

/// Browser tab identifier.
pub type TabId = i64;

/// Window classification reported by the host.
///
/// Only `Normal` windows take part in sorting and rebinding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    #[default]
    Normal,
    Popup,
    App,
    Devtools,
    Other,
}

/// One tab as observed by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: TabId,
    pub window_id: WindowId,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
}

impl Tab {
    pub fn new(
        id: TabId,
        window_id: WindowId,
        url: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id,
            window_id,
            url: url.into(),
            title: title.into(),
        }
    }
}

/// One window with its tabs in strip order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    pub id: WindowId,
    #[serde(default)]
    pub kind: WindowKind,
    #[serde(default)]
    pub focused: bool,
    #[serde(default)]
    pub tabs: Vec<Tab>,
}

impl Window {
    pub fn new(id: WindowId) -> Self {
        Self {
            id,
            kind: WindowKind::Normal,
            focused: false,
            tabs: Vec::new(),
        }
    }

    pub fn is_normal(&self) -> bool {
        self.kind == WindowKind::Normal
    }

    pub fn first_tab(&self) -> Option<&Tab> {
        self.tabs.first()
    }
}

//! In-memory browser host.
//!
//! Backs snapshot replay in the CLI and the integration tests. Mirrors the
//! browser behaviors routing depends on: moved tabs are appended, and a window
//! whose last tab leaves is closed.

use super::{HostError, HostResult, TabGroup, TabGroupColor, TabGroupId, WindowHost};
use crate::model::window::{Tab, TabId, Window, WindowId, WindowKind};

/// Simulated browser state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHost {
    windows: Vec<Window>,
    focused: Option<WindowId>,
    tab_groups: Vec<TabGroup>,
    attention: Vec<WindowId>,
    next_window_id: WindowId,
    next_tab_id: TabId,
    next_group_id: TabGroupId,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self {
            next_window_id: 1,
            next_tab_id: 1,
            next_group_id: 1,
            ..Self::default()
        }
    }

    /// Builds a host from a recorded snapshot.
    ///
    /// Tab `window_id` fields are rewritten to the window that lists them, and
    /// fresh ids continue after the largest recorded id.
    pub fn from_windows(windows: Vec<Window>) -> Self {
        let mut host = Self::new();
        for mut window in windows {
            for tab in &mut window.tabs {
                tab.window_id = window.id;
                host.next_tab_id = host.next_tab_id.max(tab.id + 1);
            }
            if window.focused {
                host.focused = Some(window.id);
            }
            host.next_window_id = host.next_window_id.max(window.id + 1);
            host.windows.push(window);
        }
        host
    }

    /// Opens an empty window of `kind` and returns its id.
    pub fn add_window(&mut self, kind: WindowKind) -> WindowId {
        let id = self.next_window_id;
        self.next_window_id += 1;
        self.windows.push(Window {
            kind,
            ..Window::new(id)
        });
        id
    }

    /// Opens a window with an explicit id (snapshot-style fixtures).
    pub fn add_window_with_id(&mut self, id: WindowId, kind: WindowKind) -> WindowId {
        self.next_window_id = self.next_window_id.max(id + 1);
        self.windows.push(Window {
            kind,
            ..Window::new(id)
        });
        id
    }

    /// Appends a new tab to `window_id`.
    pub fn open_tab(
        &mut self,
        window_id: WindowId,
        url: impl Into<String>,
        title: impl Into<String>,
    ) -> HostResult<TabId> {
        let id = self.next_tab_id;
        let window = self.window_mut(window_id)?;
        window.tabs.push(Tab::new(id, window_id, url, title));
        self.next_tab_id += 1;
        Ok(id)
    }

    /// Updates the URL and title of a tab in place.
    pub fn navigate(
        &mut self,
        tab_id: TabId,
        url: impl Into<String>,
        title: impl Into<String>,
    ) -> HostResult<()> {
        let tab = self
            .windows
            .iter_mut()
            .flat_map(|window| window.tabs.iter_mut())
            .find(|tab| tab.id == tab_id)
            .ok_or(HostError::TabNotFound(tab_id))?;
        tab.url = url.into();
        tab.title = title.into();
        Ok(())
    }

    pub fn close_window(&mut self, window_id: WindowId) -> HostResult<()> {
        let index = self.window_index(window_id)?;
        self.windows.remove(index);
        self.forget_window(window_id);
        Ok(())
    }

    pub fn close_tab(&mut self, tab_id: TabId) -> HostResult<()> {
        let tab = self.detach_tab(tab_id)?;
        self.close_if_empty(tab.window_id);
        Ok(())
    }

    /// Windows that received an attention request, oldest first.
    pub fn attention_requests(&self) -> &[WindowId] {
        &self.attention
    }

    fn window_index(&self, window_id: WindowId) -> HostResult<usize> {
        self.windows
            .iter()
            .position(|window| window.id == window_id)
            .ok_or(HostError::WindowNotFound(window_id))
    }

    fn window_mut(&mut self, window_id: WindowId) -> HostResult<&mut Window> {
        let index = self.window_index(window_id)?;
        Ok(&mut self.windows[index])
    }

    fn detach_tab(&mut self, tab_id: TabId) -> HostResult<Tab> {
        for window in &mut self.windows {
            if let Some(position) = window.tabs.iter().position(|tab| tab.id == tab_id) {
                return Ok(window.tabs.remove(position));
            }
        }
        Err(HostError::TabNotFound(tab_id))
    }

    fn close_if_empty(&mut self, window_id: WindowId) {
        let empty = self
            .windows
            .iter()
            .any(|window| window.id == window_id && window.tabs.is_empty());
        if empty {
            self.windows.retain(|window| window.id != window_id);
            self.forget_window(window_id);
        }
    }

    fn forget_window(&mut self, window_id: WindowId) {
        self.tab_groups.retain(|group| group.window_id != window_id);
        if self.focused == Some(window_id) {
            self.focused = None;
        }
    }
}

impl WindowHost for InMemoryHost {
    fn windows(&self) -> HostResult<Vec<Window>> {
        Ok(self
            .windows
            .iter()
            .map(|window| Window {
                focused: self.focused == Some(window.id),
                ..window.clone()
            })
            .collect())
    }

    fn tab(&self, tab_id: TabId) -> HostResult<Option<Tab>> {
        Ok(self
            .windows
            .iter()
            .flat_map(|window| window.tabs.iter())
            .find(|tab| tab.id == tab_id)
            .cloned())
    }

    fn focused_window(&self) -> HostResult<Option<WindowId>> {
        Ok(self.focused)
    }

    fn move_tab(&mut self, tab_id: TabId, window_id: WindowId) -> HostResult<()> {
        self.window_index(window_id)?;
        let mut tab = self.detach_tab(tab_id)?;
        let source = tab.window_id;
        tab.window_id = window_id;
        self.window_mut(window_id)?.tabs.push(tab);
        if source != window_id {
            self.close_if_empty(source);
        }
        Ok(())
    }

    fn focus_window(&mut self, window_id: WindowId) -> HostResult<()> {
        self.window_index(window_id)?;
        self.focused = Some(window_id);
        Ok(())
    }

    fn draw_attention(&mut self, window_id: WindowId) -> HostResult<()> {
        self.window_index(window_id)?;
        self.attention.push(window_id);
        Ok(())
    }

    fn create_window_with_tab(&mut self, tab_id: TabId) -> HostResult<WindowId> {
        let mut tab = self.detach_tab(tab_id)?;
        let source = tab.window_id;
        let window_id = self.add_window(WindowKind::Normal);
        tab.window_id = window_id;
        self.window_mut(window_id)?.tabs.push(tab);
        self.close_if_empty(source);
        Ok(window_id)
    }

    fn group_tabs(
        &mut self,
        window_id: WindowId,
        tab_ids: &[TabId],
        title: &str,
        color: TabGroupColor,
    ) -> HostResult<TabGroupId> {
        let window = self.window_mut(window_id)?;
        if let Some(missing) = tab_ids
            .iter()
            .find(|tab_id| !window.tabs.iter().any(|tab| tab.id == **tab_id))
        {
            return Err(HostError::TabNotFound(*missing));
        }

        let id = self.next_group_id;
        self.next_group_id += 1;
        self.tab_groups.push(TabGroup {
            id,
            window_id,
            title: title.to_string(),
            color,
        });
        Ok(id)
    }

    fn tab_groups(&self) -> HostResult<Vec<TabGroup>> {
        Ok(self.tab_groups.clone())
    }
}

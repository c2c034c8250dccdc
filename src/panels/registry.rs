//! Installed panels, the current panel slot and its history.

use std::collections::HashSet;
use std::fmt;

use super::Panel;
use super::history::{NavigationSource, PanelHistory};
use crate::host::SearchController;

/// Factory for one panel, registered in display order.
pub struct PanelDescriptor {
    key: String,
    create: Box<dyn FnOnce() -> Box<dyn Panel>>,
}

impl PanelDescriptor {
    pub fn new(key: impl Into<String>, create: impl FnOnce() -> Box<dyn Panel> + 'static) -> Self {
        Self {
            key: key.into(),
            create: Box::new(create),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for PanelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelDescriptor")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Owns every panel. Insertion order is the rotation order.
#[derive(Default)]
pub struct PanelRegistry {
    panels: Vec<Box<dyn Panel>>,
    current: Option<usize>,
    history: PanelHistory,
}

impl fmt::Debug for PanelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelRegistry")
            .field("order", &self.order())
            .field("current", &self.current_key())
            .field("history", &self.history)
            .finish()
    }
}

impl PanelRegistry {
    /// Instantiate every descriptor whose key is not in `hidden`.
    pub fn build(descriptors: Vec<PanelDescriptor>, hidden: &HashSet<String>) -> Self {
        let mut panels = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            if hidden.contains(&descriptor.key) {
                log::info!("Panel '{}' hidden by host", descriptor.key);
                continue;
            }
            if panels
                .iter()
                .any(|p: &Box<dyn Panel>| p.key() == descriptor.key)
            {
                log::warn!("Duplicate panel '{}' ignored", descriptor.key);
                continue;
            }
            panels.push((descriptor.create)());
        }
        log::info!("Installed {} panels", panels.len());

        Self {
            panels,
            current: None,
            history: PanelHistory::new(),
        }
    }

    /// Panel keys in rotation order.
    pub fn order(&self) -> Vec<&str> {
        self.panels.iter().map(|p| p.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.panels.iter().position(|p| p.key() == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index_of(key).is_some()
    }

    pub fn panel_mut(&mut self, key: &str) -> Option<&mut dyn Panel> {
        let index = self.index_of(key)?;
        Some(self.panels[index].as_mut())
    }

    pub fn current_key(&self) -> Option<&str> {
        self.current.map(|i| self.panels[i].key())
    }

    pub fn current_panel_mut(&mut self) -> Option<&mut dyn Panel> {
        let index = self.current?;
        Some(self.panels[index].as_mut())
    }

    pub fn panels_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Panel>> {
        self.panels.iter_mut()
    }

    pub fn history(&self) -> &PanelHistory {
        &self.history
    }

    /// Assign the current panel slot. Returns true if it changed.
    ///
    /// The old panel is hidden, the new one shown, search is told, and a
    /// user-initiated activation is recorded in history.
    pub fn set_current(
        &mut self,
        index: Option<usize>,
        source: NavigationSource,
        search: Option<&mut dyn SearchController>,
    ) -> bool {
        let index = index.filter(|&i| i < self.panels.len());
        if self.current == index {
            return false;
        }

        if let Some(old) = self.current {
            self.panels[old].hide();
        }
        self.current = index;

        let Some(index) = index else {
            return true;
        };
        let panel = &mut self.panels[index];
        panel.show();
        if let Some(search) = search {
            search.active_panel_changed(panel.key());
        }
        if source == NavigationSource::UserInitiated {
            self.history.set_panel(panel.key());
        }
        crate::debug_info!("PANELS", "Current panel is now '{}'", panel.key());
        true
    }

    /// Activate the panel registered under `key`. Unknown keys do nothing.
    pub fn show_key(
        &mut self,
        key: &str,
        source: NavigationSource,
        search: Option<&mut dyn SearchController>,
    ) -> bool {
        match self.index_of(key) {
            Some(index) => self.set_current(Some(index), source, search),
            None => false,
        }
    }

    /// Rotate the current panel by one step, wrapping at both ends.
    pub fn rotate(&mut self, forward: bool, search: Option<&mut dyn SearchController>) -> bool {
        let len = self.panels.len();
        if len == 0 {
            return false;
        }
        let next = match self.current {
            Some(current) if forward => (current + 1) % len,
            Some(current) => (current + len - 1) % len,
            None => 0,
        };
        self.set_current(Some(next), NavigationSource::UserInitiated, search)
    }

    pub fn go_back(&mut self, search: Option<&mut dyn SearchController>) -> bool {
        let Some(key) = self.history.go_back().map(str::to_string) else {
            return false;
        };
        self.show_key(&key, NavigationSource::HistoryReplay, search)
    }

    pub fn go_forward(&mut self, search: Option<&mut dyn SearchController>) -> bool {
        let Some(key) = self.history.go_forward().map(str::to_string) else {
            return false;
        };
        self.show_key(&key, NavigationSource::HistoryReplay, search)
    }
}

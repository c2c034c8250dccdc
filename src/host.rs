//! Contracts between the coordinator and its hosting shell.
//!
//! The host supplies platform queries and the default backend channel; the
//! search bar, console drawer, toolbar, shortcuts overlay and per-session
//! models are separate collaborators. Each is a trait so a headless host (or a
//! test) can provide recording fakes.

use std::collections::HashSet;

use webinspector_keybindings::KeyEvent;

use crate::dom::Dom;

/// Synchronous queries and the default outbound channel of the hosting shell.
pub trait InspectorHost {
    /// Host platform name (`"mac"`, `"windows"`, `"linux"`, ...).
    fn platform(&self) -> String;

    fn port(&self) -> String;

    /// Comma separated panel keys the host wants hidden.
    fn hidden_panels(&self) -> Option<String> {
        None
    }

    fn localized_strings_url(&self) -> Option<String> {
        None
    }

    /// Host part used when building a remote page socket URL.
    fn location_host(&self) -> String {
        "localhost".to_string()
    }

    fn send_message_to_backend(&mut self, message: &str);

    /// The front-end finished loading.
    fn loaded(&mut self);
}

/// Global search bar.
pub trait SearchController {
    fn active_panel_changed(&mut self, panel_key: &str);

    /// Returns true if the shortcut was consumed.
    fn handle_shortcut(&mut self, _event: &KeyEvent) -> bool {
        false
    }
}

/// Console drawer overlay.
pub trait Drawer {
    fn set_visible(&mut self, visible: bool);
    fn is_visible(&self) -> bool;
    fn resize(&mut self) {}
    fn reset(&mut self) {}
}

pub trait Toolbar {
    fn resize(&mut self);
}

/// Keyboard shortcuts help overlay.
pub trait ShortcutsHelp {
    fn show(&mut self);
}

/// State tied to one backend session (resources map, debugger model, ...).
pub trait SessionModel {
    fn name(&self) -> &str;
    fn reset(&mut self);
}

/// Everything the coordinator is constructed with besides settings and panels.
pub struct Collaborators {
    pub host: Box<dyn InspectorHost>,
    pub dom: Box<dyn Dom>,
    pub search: Option<Box<dyn SearchController>>,
    pub drawer: Option<Box<dyn Drawer>>,
    pub toolbar: Option<Box<dyn Toolbar>>,
    pub shortcuts_help: Option<Box<dyn ShortcutsHelp>>,
    pub session_models: Vec<Box<dyn SessionModel>>,
}

impl Collaborators {
    pub fn new(host: Box<dyn InspectorHost>, dom: Box<dyn Dom>) -> Self {
        Self {
            host,
            dom,
            search: None,
            drawer: None,
            toolbar: None,
            shortcuts_help: None,
            session_models: Vec::new(),
        }
    }

    pub fn with_search(mut self, search: Box<dyn SearchController>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn with_drawer(mut self, drawer: Box<dyn Drawer>) -> Self {
        self.drawer = Some(drawer);
        self
    }

    pub fn with_toolbar(mut self, toolbar: Box<dyn Toolbar>) -> Self {
        self.toolbar = Some(toolbar);
        self
    }

    pub fn with_shortcuts_help(mut self, help: Box<dyn ShortcutsHelp>) -> Self {
        self.shortcuts_help = Some(help);
        self
    }

    pub fn with_session_model(mut self, model: Box<dyn SessionModel>) -> Self {
        self.session_models.push(model);
        self
    }
}

/// Split the host's hidden panel list. A missing list hides nothing.
pub fn parse_hidden_panels(list: Option<&str>) -> HashSet<String> {
    list.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_panel_list_is_trimmed() {
        let hidden = parse_hidden_panels(Some(" audits, timeline ,,"));
        assert_eq!(hidden.len(), 2);
        assert!(hidden.contains("audits"));
        assert!(hidden.contains("timeline"));
    }

    #[test]
    fn missing_hidden_list_is_empty() {
        assert!(parse_hidden_panels(None).is_empty());
        assert!(parse_hidden_panels(Some("")).is_empty());
    }
}

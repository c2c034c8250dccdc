//! Shared integration test helpers for webinspector.
//!
//! Recording fakes for every collaborator the coordinator talks to, plus a
//! [`TestContext`] builder that wires them into a loaded `Inspector`.
//!
//! ```ignore
//! mod common;
//! use common::TestContext;
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a
//! subset of helpers are used per file.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use webinspector::config::{MemoryBackend, SettingsStore};
use webinspector::dom::{Anchor, Dom, ElementId, HeadlessDom};
use webinspector::host::{
    Collaborators, Drawer, InspectorHost, SearchController, SessionModel, ShortcutsHelp, Toolbar,
};
use webinspector::keybindings::KeyEvent;
use webinspector::panels::{
    AnchorLocationHandler, CopyEvent, CopyHandler, Panel, PanelDescriptor, Resettable,
};
use webinspector::transport::{BackendTransport, TransportError};
use webinspector::{Inspector, LoadOutcome};

/// Ordered record of collaborator calls, shared by every fake.
pub type Log = Rc<RefCell<Vec<String>>>;

pub fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

pub fn count(log: &Log, entry: &str) -> usize {
    log.borrow().iter().filter(|e| e.as_str() == entry).count()
}

// ---------------------------------------------------------------------------
// DOM
// ---------------------------------------------------------------------------

/// `HeadlessDom` shared between the inspector and the test body.
#[derive(Clone, Default)]
pub struct SharedDom(pub Rc<RefCell<HeadlessDom>>);

impl Dom for SharedDom {
    fn text_content(&self, element: ElementId) -> String {
        self.0.borrow().text_content(element)
    }
    fn set_text_content(&mut self, element: ElementId, text: &str) {
        self.0.borrow_mut().set_text_content(element, text)
    }
    fn is_self_or_ancestor(&self, ancestor: ElementId, node: ElementId) -> bool {
        self.0.borrow().is_self_or_ancestor(ancestor, node)
    }
    fn focus(&mut self, element: ElementId) {
        self.0.borrow_mut().focus(element)
    }
    fn blur(&mut self, element: ElementId) {
        self.0.borrow_mut().blur(element)
    }
    fn selection_is_collapsed(&self) -> bool {
        self.0.borrow().selection_is_collapsed()
    }
    fn is_caret_inside(&self, element: ElementId) -> bool {
        self.0.borrow().is_caret_inside(element)
    }
    fn place_caret(&mut self, element: ElementId) {
        self.0.borrow_mut().place_caret(element)
    }
    fn add_class(&mut self, element: ElementId, class: &str) {
        self.0.borrow_mut().add_class(element, class)
    }
    fn remove_class(&mut self, element: ElementId, class: &str) {
        self.0.borrow_mut().remove_class(element, class)
    }
    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.0.borrow().has_class(element, class)
    }
    fn tab_index(&self, element: ElementId) -> i32 {
        self.0.borrow().tab_index(element)
    }
    fn set_tab_index(&mut self, element: ElementId, index: i32) {
        self.0.borrow_mut().set_tab_index(element, index)
    }
    fn scroll_position(&self, element: ElementId) -> (f64, f64) {
        self.0.borrow().scroll_position(element)
    }
    fn set_scroll_position(&mut self, element: ElementId, position: (f64, f64)) {
        self.0.borrow_mut().set_scroll_position(element, position)
    }
    fn is_editable_field(&self, element: ElementId) -> bool {
        self.0.borrow().is_editable_field(element)
    }
    fn enclosing_anchor(&self, element: ElementId) -> Option<Anchor> {
        self.0.borrow().enclosing_anchor(element)
    }
    fn set_style_property(&mut self, element: ElementId, property: &str, value: &str) {
        self.0.borrow_mut().set_style_property(element, property, value)
    }
}

// ---------------------------------------------------------------------------
// Host and collaborators
// ---------------------------------------------------------------------------

pub struct RecordingHost {
    pub platform: String,
    pub hidden: Option<String>,
    pub strings_url: Option<String>,
    pub log: Log,
    pub sent: Log,
}

impl InspectorHost for RecordingHost {
    fn platform(&self) -> String {
        self.platform.clone()
    }
    fn port(&self) -> String {
        "unknown".to_string()
    }
    fn hidden_panels(&self) -> Option<String> {
        self.hidden.clone()
    }
    fn localized_strings_url(&self) -> Option<String> {
        self.strings_url.clone()
    }
    fn location_host(&self) -> String {
        "localhost:9222".to_string()
    }
    fn send_message_to_backend(&mut self, message: &str) {
        self.sent.borrow_mut().push(message.to_string());
    }
    fn loaded(&mut self) {
        self.log.borrow_mut().push("host loaded".to_string());
    }
}

pub struct RecordingSearch {
    pub log: Log,
    /// Character the search bar claims as its own shortcut
    pub consumes: Option<&'static str>,
}

impl SearchController for RecordingSearch {
    fn active_panel_changed(&mut self, panel_key: &str) {
        self.log.borrow_mut().push(format!("search {}", panel_key));
    }
    fn handle_shortcut(&mut self, event: &KeyEvent) -> bool {
        let hit = matches!(
            (&event.key, self.consumes),
            (winit::keyboard::Key::Character(c), Some(want)) if c.as_str() == want
        );
        if hit {
            self.log.borrow_mut().push("search shortcut".to_string());
        }
        hit
    }
}

pub struct RecordingDrawer {
    pub log: Log,
    pub visible: bool,
}

impl Drawer for RecordingDrawer {
    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.log.borrow_mut().push(format!("drawer visible {}", visible));
    }
    fn is_visible(&self) -> bool {
        self.visible
    }
    fn resize(&mut self) {
        self.log.borrow_mut().push("drawer resize".to_string());
    }
    fn reset(&mut self) {
        self.log.borrow_mut().push("drawer reset".to_string());
    }
}

pub struct RecordingToolbar(pub Log);

impl Toolbar for RecordingToolbar {
    fn resize(&mut self) {
        self.0.borrow_mut().push("toolbar resize".to_string());
    }
}

pub struct RecordingHelp(pub Log);

impl ShortcutsHelp for RecordingHelp {
    fn show(&mut self) {
        self.0.borrow_mut().push("help".to_string());
    }
}

pub struct RecordingModel {
    pub name: &'static str,
    pub log: Log,
}

impl SessionModel for RecordingModel {
    fn name(&self) -> &str {
        self.name
    }
    fn reset(&mut self) {
        self.log.borrow_mut().push(format!("reset model {}", self.name));
    }
}

// ---------------------------------------------------------------------------
// Panels
// ---------------------------------------------------------------------------

/// Panel recording its lifecycle calls, with optional capabilities.
pub struct RecordingPanel {
    pub key: String,
    pub log: Log,
    /// Copy capability: clipboard text to supply
    pub copy_text: Option<String>,
    /// Reset capability
    pub resettable: bool,
    /// Anchor capability: hrefs starting with this prefix can be shown
    pub anchor_prefix: Option<String>,
    /// Character the panel claims as its own shortcut
    pub shortcut: Option<&'static str>,
}

impl RecordingPanel {
    pub fn new(key: &str, log: &Log) -> Self {
        Self {
            key: key.to_string(),
            log: log.clone(),
            copy_text: None,
            resettable: false,
            anchor_prefix: None,
            shortcut: None,
        }
    }

    fn record(&self, what: &str) {
        self.log.borrow_mut().push(format!("{} {}", what, self.key));
    }
}

impl Panel for RecordingPanel {
    fn key(&self) -> &str {
        &self.key
    }
    fn show(&mut self) {
        self.record("show");
    }
    fn hide(&mut self) {
        self.record("hide");
    }
    fn resize(&mut self) {
        self.record("resize");
    }
    fn handle_shortcut(&mut self, event: &KeyEvent) -> bool {
        let hit = matches!(
            (&event.key, self.shortcut),
            (winit::keyboard::Key::Character(c), Some(want)) if c.as_str() == want
        );
        if hit {
            self.record("shortcut");
        }
        hit
    }
    fn as_copy_handler(&mut self) -> Option<&mut dyn CopyHandler> {
        if self.copy_text.is_some() {
            Some(self)
        } else {
            None
        }
    }
    fn as_resettable(&mut self) -> Option<&mut dyn Resettable> {
        if self.resettable { Some(self) } else { None }
    }
    fn as_anchor_handler(&mut self) -> Option<&mut dyn AnchorLocationHandler> {
        if self.anchor_prefix.is_some() {
            Some(self)
        } else {
            None
        }
    }
}

impl CopyHandler for RecordingPanel {
    fn handle_copy_event(&mut self, event: &mut CopyEvent) {
        if let Some(text) = &self.copy_text {
            event.set_data(text.clone());
        }
        self.record("copy");
    }
}

impl Resettable for RecordingPanel {
    fn reset(&mut self) {
        self.record("reset");
    }
}

impl AnchorLocationHandler for RecordingPanel {
    fn can_show_anchor_location(&self, anchor: &Anchor) -> bool {
        self.anchor_prefix
            .as_deref()
            .is_some_and(|prefix| anchor.href.starts_with(prefix))
    }
    fn show_anchor_location(&mut self, anchor: &Anchor) {
        self.log
            .borrow_mut()
            .push(format!("{} shows {}", self.key, anchor.href));
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// In-memory socket; the test pushes inbound frames and reads outbound ones.
#[derive(Clone, Default)]
pub struct FakeTransport {
    pub outbound: Log,
    pub inbound: Rc<RefCell<VecDeque<String>>>,
    pub closed: Rc<RefCell<bool>>,
}

impl BackendTransport for FakeTransport {
    fn send(&mut self, text: String) -> Result<(), TransportError> {
        if *self.closed.borrow() {
            return Err(TransportError::ConnectionClosed);
        }
        self.outbound.borrow_mut().push(text);
        Ok(())
    }
    fn try_recv(&mut self) -> Option<String> {
        self.inbound.borrow_mut().pop_front()
    }
    fn is_connected(&self) -> bool {
        !*self.closed.borrow()
    }
}

// ---------------------------------------------------------------------------
// Context builder
// ---------------------------------------------------------------------------

/// A wired-up inspector plus handles on everything it talks to.
pub struct TestContext {
    pub inspector: Inspector,
    pub dom: Rc<RefCell<HeadlessDom>>,
    /// Collaborator and panel calls, in order
    pub log: Log,
    /// Messages sent over the host channel
    pub sent: Log,
    pub settings_backend: MemoryBackend,
}

pub struct Builder {
    panels: Vec<RecordingPanel>,
    platform: &'static str,
    hidden: Option<String>,
    strings_url: Option<String>,
    settings_backend: MemoryBackend,
    drawer_visible: bool,
    search_consumes: Option<&'static str>,
    log: Log,
}

impl Builder {
    pub fn new(keys: &[&str]) -> Self {
        let log = Log::default();
        Self {
            panels: keys.iter().map(|k| RecordingPanel::new(k, &log)).collect(),
            platform: "linux",
            hidden: None,
            strings_url: None,
            settings_backend: MemoryBackend::new(),
            drawer_visible: false,
            search_consumes: None,
            log,
        }
    }

    pub fn platform(mut self, platform: &'static str) -> Self {
        self.platform = platform;
        self
    }

    pub fn hidden(mut self, hidden: &str) -> Self {
        self.hidden = Some(hidden.to_string());
        self
    }

    pub fn localized_strings(mut self, url: &str) -> Self {
        self.strings_url = Some(url.to_string());
        self
    }

    pub fn settings_backend(mut self, backend: MemoryBackend) -> Self {
        self.settings_backend = backend;
        self
    }

    pub fn search_consumes(mut self, key: &'static str) -> Self {
        self.search_consumes = Some(key);
        self
    }

    /// Adjust the panel registered as `key` before it is installed.
    pub fn panel(mut self, key: &str, configure: impl FnOnce(&mut RecordingPanel)) -> Self {
        if let Some(panel) = self.panels.iter_mut().find(|p| p.key == key) {
            configure(panel);
        }
        self
    }

    /// Build without calling `loaded`.
    pub fn build_unloaded(self) -> TestContext {
        let dom = Rc::new(RefCell::new(HeadlessDom::new()));
        let sent = Log::default();
        let host = RecordingHost {
            platform: self.platform.to_string(),
            hidden: self.hidden,
            strings_url: self.strings_url,
            log: self.log.clone(),
            sent: sent.clone(),
        };
        let collaborators = Collaborators::new(Box::new(host), Box::new(SharedDom(dom.clone())))
            .with_search(Box::new(RecordingSearch {
                log: self.log.clone(),
                consumes: self.search_consumes,
            }))
            .with_drawer(Box::new(RecordingDrawer {
                log: self.log.clone(),
                visible: self.drawer_visible,
            }))
            .with_toolbar(Box::new(RecordingToolbar(self.log.clone())))
            .with_shortcuts_help(Box::new(RecordingHelp(self.log.clone())))
            .with_session_model(Box::new(RecordingModel {
                name: "resources",
                log: self.log.clone(),
            }))
            .with_session_model(Box::new(RecordingModel {
                name: "debugger",
                log: self.log.clone(),
            }));

        let descriptors = self
            .panels
            .into_iter()
            .map(|panel| {
                let key = panel.key.clone();
                PanelDescriptor::new(key, move || Box::new(panel) as Box<dyn Panel>)
            })
            .collect();

        let settings = SettingsStore::load(Box::new(self.settings_backend.clone()))
            .expect("memory settings load");

        TestContext {
            inspector: Inspector::new(settings, collaborators, descriptors),
            dom,
            log: self.log,
            sent,
            settings_backend: self.settings_backend,
        }
    }

    /// Build and load over the host channel, then clear the log.
    pub fn build(self) -> TestContext {
        let mut ctx = self.build_unloaded();
        assert_eq!(ctx.inspector.loaded(""), LoadOutcome::Ready);
        ctx.log.borrow_mut().clear();
        ctx
    }
}

impl TestContext {
    pub fn element(&self) -> ElementId {
        self.dom.borrow_mut().create_element(None)
    }

    pub fn text_element(&self, text: &str) -> ElementId {
        self.dom.borrow_mut().create_text_element(None, text)
    }

    pub fn anchor(&self, anchor: Anchor) -> ElementId {
        let mut dom = self.dom.borrow_mut();
        let element = dom.create_element(None);
        dom.set_anchor(element, anchor);
        element
    }

    pub fn log_entries(&self) -> Vec<String> {
        entries(&self.log)
    }

    pub fn clear_log(&self) {
        self.log.borrow_mut().clear();
    }

    /// Method names of everything sent over the host channel.
    pub fn sent_methods(&self) -> Vec<String> {
        self.sent
            .borrow()
            .iter()
            .filter_map(|text| serde_json::from_str::<serde_json::Value>(text).ok())
            .filter_map(|v| v.get("method").and_then(|m| m.as_str()).map(str::to_string))
            .collect()
    }
}

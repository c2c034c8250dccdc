//! The inspector coordinator.
//!
//! `Inspector` owns settings, focus tracking, editing sessions, the panel
//! registry and the backend plumbing, and turns document level input into
//! calls on them. Nothing is global: every collaborator is handed in at
//! construction, so independent instances can coexist.
//!
//! ## Sub-module layout
//!
//! | File | Contents |
//! |------|----------|
//! | `mod.rs` (this file) | `Inspector` type, accessors, panel activation, loop wiring |
//! | `impl_init.rs` | Constructor and lifecycle (`loaded`, `reset`, `frontend_reused`) |
//! | `backend_dispatch.rs` | Inbound queue, router, outbound commands, socket pump |
//! | `keyboard_handlers.rs` | Key down/up precedence chain and global shortcut actions |
//! | `mouse_events.rs` | Link click interception and follow strategies |
//! | `clipboard.rs` | Copy and paste routing |
//! | `highlight.rs` | Temporary DOM node highlighting |

mod backend_dispatch;
mod clipboard;
mod highlight;
mod impl_init;
mod keyboard_handlers;
mod mouse_events;

pub use impl_init::LoadOutcome;
pub use keyboard_handlers::ModifierKeys;
pub use highlight::HIGHLIGHT_DURATION;
pub use mouse_events::{ClickEvent, FOLLOW_LINK_DELAY};

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use webinspector_config::SettingsStore;
use webinspector_keybindings::{KeyEvent, KeybindingRegistry, Platform};

use crate::animation::{self, AnimationHandle, AnimationHost, Animator, StyleAnimation};
use crate::backend::{BackendMessage, BackendRouter};
use crate::dispatch_queue::DispatchQueue;
use crate::dom::{Dom, ElementId};
use crate::editing::{EditingConfig, EditingHandle, EditingManager};
use crate::event_loop::{self, EventLoop, EventLoopOwner, Task, TimerId};
use crate::focus::FocusTracker;
use crate::host::{
    Drawer, InspectorHost, SearchController, SessionModel, ShortcutsHelp, Toolbar,
};
use crate::localization::Localizer;
use crate::panels::{CopyHandler, NavigationSource, PanelDescriptor, PanelHistory, PanelRegistry};
use crate::transport::BackendTransport;

/// Panel shown when a requested key is unknown.
pub const FALLBACK_PANEL: &str = "elements";

/// Key handler attached to a focusable element. Returns true if consumed.
pub type FocusKeyHandler = Box<dyn FnMut(&KeyEvent) -> bool>;

/// Listener for modifier key changes.
pub type ModifierListener = Box<dyn FnMut(ModifierKeys)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    AwaitingSocket,
    Loaded,
}

#[derive(Debug, Default)]
struct HighlightState {
    node: Option<u64>,
    hide_timer: Option<TimerId>,
}

/// Top-level coordinator of one inspector front-end.
pub struct Inspector {
    event_loop: EventLoop<Inspector>,
    queue: DispatchQueue<BackendMessage>,
    lifecycle: Lifecycle,
    platform: Platform,

    // Injected collaborators
    settings: SettingsStore,
    host: Box<dyn InspectorHost>,
    dom: Box<dyn Dom>,
    search: Option<Box<dyn SearchController>>,
    drawer: Option<Box<dyn Drawer>>,
    toolbar: Option<Box<dyn Toolbar>>,
    shortcuts_help: Option<Box<dyn ShortcutsHelp>>,
    session_models: Vec<Box<dyn SessionModel>>,

    // Owned subsystems
    focus: FocusTracker,
    editing: EditingManager,
    panels: PanelRegistry,
    pending_panels: Vec<PanelDescriptor>,
    keybindings: KeybindingRegistry,
    localizer: Localizer,
    router: BackendRouter,
    transport: Option<Box<dyn BackendTransport>>,
    animator: Animator<Inspector>,

    // Per-element and transient state
    focus_key_handlers: HashMap<ElementId, FocusKeyHandler>,
    focus_copy_handlers: HashMap<ElementId, Box<dyn CopyHandler>>,
    modifier_keys: ModifierKeys,
    modifier_listeners: Vec<ModifierListener>,
    follow_link_timer: Option<TimerId>,
    highlight: HighlightState,
}

impl fmt::Debug for Inspector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inspector")
            .field("lifecycle", &self.lifecycle)
            .field("platform", &self.platform)
            .field("panels", &self.panels)
            .field("focus", &self.focus)
            .field("editing", &self.editing)
            .field("queued_messages", &self.queue.len())
            .finish_non_exhaustive()
    }
}

/// Borrow the optional search controller as a plain trait object.
fn search_mut(search: &mut Option<Box<dyn SearchController>>) -> Option<&mut dyn SearchController> {
    match search {
        Some(search) => Some(search.as_mut()),
        None => None,
    }
}

impl Inspector {
    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn is_loaded(&self) -> bool {
        self.lifecycle == Lifecycle::Loaded
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsStore {
        &mut self.settings
    }

    pub fn dom(&self) -> &dyn Dom {
        self.dom.as_ref()
    }

    pub fn dom_mut(&mut self) -> &mut dyn Dom {
        self.dom.as_mut()
    }

    pub fn panels(&self) -> &PanelRegistry {
        &self.panels
    }

    pub fn panel_order(&self) -> Vec<&str> {
        self.panels.order()
    }

    pub fn current_panel_key(&self) -> Option<&str> {
        self.panels.current_key()
    }

    pub fn history(&self) -> &PanelHistory {
        self.panels.history()
    }

    pub fn keybindings(&self) -> &KeybindingRegistry {
        &self.keybindings
    }

    pub fn router_mut(&mut self) -> &mut BackendRouter {
        &mut self.router
    }

    // ========================================================================
    // Focus
    // ========================================================================

    pub fn current_focus_element(&self) -> Option<ElementId> {
        self.focus.current()
    }

    pub fn previous_focus_element(&self) -> Option<ElementId> {
        self.focus.previous()
    }

    pub fn set_current_focus_element(&mut self, element: Option<ElementId>) {
        self.focus.set_current(self.dom.as_mut(), element);
    }

    pub fn reset_focus_element(&mut self) {
        self.focus.reset(self.dom.as_mut());
    }

    pub fn restore_focus_from_element(&mut self, element: ElementId) {
        self.focus.restore_from(self.dom.as_mut(), element);
    }

    /// Give `element` its own key handling while it is the focus element.
    pub fn set_focus_key_handler(&mut self, element: ElementId, handler: FocusKeyHandler) {
        self.focus_key_handlers.insert(element, handler);
    }

    /// Give `element` its own copy handling while it is the focus element.
    pub fn set_focus_copy_handler(&mut self, element: ElementId, handler: Box<dyn CopyHandler>) {
        self.focus_copy_handlers.insert(element, handler);
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Start an editing session on `element`; `None` if one is already open.
    pub fn start_editing(
        &mut self,
        element: ElementId,
        config: EditingConfig,
    ) -> Option<EditingHandle> {
        self.editing
            .start_editing(self.dom.as_mut(), &mut self.focus, element, config)
    }

    pub fn commit_editing(&mut self, handle: &EditingHandle) -> bool {
        self.editing
            .commit(self.dom.as_mut(), &mut self.focus, handle)
    }

    pub fn cancel_editing(&mut self, handle: &EditingHandle) -> bool {
        self.editing
            .cancel(self.dom.as_mut(), &mut self.focus, handle)
    }

    pub fn is_editing_any_field(&self) -> bool {
        self.editing.is_editing_any_field()
    }

    // ========================================================================
    // Panels
    // ========================================================================

    /// Show the panel registered as `key`.
    ///
    /// Unknown keys fall back to "elements", then to the first panel.
    pub fn show_panel(&mut self, key: &str) -> bool {
        let resolved = if self.panels.contains(key) {
            Some(key.to_string())
        } else if self.panels.contains(FALLBACK_PANEL) {
            log::debug!("Unknown panel '{}', showing '{}'", key, FALLBACK_PANEL);
            Some(FALLBACK_PANEL.to_string())
        } else {
            self.panels.order().first().map(|k| k.to_string())
        };
        let Some(resolved) = resolved else {
            return false;
        };
        let changed = self.panels.show_key(
            &resolved,
            NavigationSource::UserInitiated,
            search_mut(&mut self.search),
        );
        self.current_panel_changed(changed);
        true
    }

    /// Rotate to the next (or previous) panel, wrapping around.
    pub fn rotate_panel(&mut self, forward: bool) -> bool {
        let changed = self.panels.rotate(forward, search_mut(&mut self.search));
        self.current_panel_changed(changed);
        changed
    }

    pub fn go_back(&mut self) -> bool {
        let changed = self.panels.go_back(search_mut(&mut self.search));
        self.current_panel_changed(changed);
        changed
    }

    pub fn go_forward(&mut self) -> bool {
        let changed = self.panels.go_forward(search_mut(&mut self.search));
        self.current_panel_changed(changed);
        changed
    }

    fn current_panel_changed(&mut self, changed: bool) {
        if !changed {
            return;
        }
        let Some(key) = self.panels.current_key().map(str::to_string) else {
            return;
        };
        // Failure is logged by the store
        let _ = self.settings.set_last_active_panel(&key);
    }

    pub fn window_resize(&mut self) {
        if let Some(panel) = self.panels.current_panel_mut() {
            panel.resize();
        }
        if let Some(drawer) = self.drawer.as_mut() {
            drawer.resize();
        }
        if let Some(toolbar) = self.toolbar.as_mut() {
            toolbar.resize();
        }
    }

    // ========================================================================
    // Localization and animation
    // ========================================================================

    pub fn ui_string(&mut self, key: &str, args: &[&dyn fmt::Display]) -> String {
        self.localizer.ui_string(key, args)
    }

    pub fn localizer_mut(&mut self) -> &mut Localizer {
        &mut self.localizer
    }

    pub fn animate_style(
        &mut self,
        animations: Vec<StyleAnimation>,
        duration: Duration,
        on_complete: Option<Task<Inspector>>,
    ) -> AnimationHandle {
        animation::animate_style(self, animations, duration, on_complete)
    }

    pub fn cancel_animation(&mut self, handle: AnimationHandle) -> bool {
        animation::cancel(self, handle)
    }

    pub fn force_complete_animation(&mut self, handle: AnimationHandle) -> bool {
        animation::force_complete(self, handle)
    }

    // ========================================================================
    // Scheduling
    // ========================================================================

    /// Run one due task. Returns false if nothing was due.
    pub fn run_next_task(&mut self) -> bool {
        event_loop::run_next(self)
    }

    pub fn run_until_idle(&mut self) -> usize {
        event_loop::run_until_idle(self)
    }

    /// Move the loop clock forward, firing timers that come due.
    pub fn advance_time(&mut self, by: Duration) -> usize {
        event_loop::advance(self, by)
    }

    pub fn pending_tasks(&self) -> usize {
        self.event_loop.pending()
    }
}

impl EventLoopOwner for Inspector {
    fn event_loop(&mut self) -> &mut EventLoop<Self> {
        &mut self.event_loop
    }
}

impl AnimationHost for Inspector {
    fn animator(&mut self) -> &mut Animator<Self> {
        &mut self.animator
    }

    fn animation_dom(&mut self) -> &mut dyn Dom {
        self.dom.as_mut()
    }
}

//! Document level keyboard handling.
//!
//! Key presses are offered, in order, to: the editing session containing the
//! target, the shortcuts help overlay, the focus element's own handler, the
//! current panel, the search bar, and finally the reserved global shortcut
//! table. The first stage that consumes the key ends the chain. Keys typed
//! into an editable field stop after the help stage.

use serde_json::json;
use winit::keyboard::{Key, ModifiersState};

use webinspector_keybindings::KeyEvent;

use super::Inspector;
use crate::dom::ElementId;
use crate::shortcuts::GlobalAction;

/// Snapshot of held modifier keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierKeys {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl From<ModifiersState> for ModifierKeys {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
            meta: state.super_key(),
        }
    }
}

impl Inspector {
    /// Key press anywhere in the document. Returns true if consumed.
    pub fn document_key_down(&mut self, target: ElementId, event: &KeyEvent) -> bool {
        self.update_modifier_keys(event.modifiers);
        if !self.is_loaded() {
            return false;
        }

        if let Some(element) = self.editing.editing_element_for(self.dom.as_ref(), target) {
            crate::debug_log!("KEYS", "{:?} routed to editing session", event.key);
            return self
                .editing
                .handle_key_down(self.dom.as_mut(), &mut self.focus, element, event);
        }

        let in_editable_field = self.dom.is_editable_field(target);
        let action = self
            .keybindings
            .lookup(event)
            .and_then(|name| name.parse::<GlobalAction>().ok());

        if action == Some(GlobalAction::ShowShortcutsHelp)
            && !(in_editable_field && is_question_mark(event))
            && let Some(help) = self.shortcuts_help.as_mut()
        {
            help.show();
            return true;
        }

        if in_editable_field {
            return false;
        }

        if let Some(current) = self.focus.current()
            && let Some(handler) = self.focus_key_handlers.get_mut(&current)
            && handler(event)
        {
            crate::debug_log!("KEYS", "{:?} handled by focus element", event.key);
            return true;
        }

        if let Some(panel) = self.panels.current_panel_mut()
            && panel.handle_shortcut(event)
        {
            crate::debug_log!("KEYS", "{:?} handled by panel", event.key);
            return true;
        }

        if let Some(search) = self.search.as_mut()
            && search.handle_shortcut(event)
        {
            return true;
        }

        match action {
            Some(action) => self.perform_global_action(action),
            None => false,
        }
    }

    /// Key release anywhere in the document.
    pub fn document_key_up(&mut self, event: &KeyEvent) {
        self.update_modifier_keys(event.modifiers);
    }

    /// The window lost focus; no modifier is held any more.
    pub fn window_blur(&mut self) {
        self.update_modifier_keys(ModifiersState::empty());
    }

    pub fn modifier_keys(&self) -> ModifierKeys {
        self.modifier_keys
    }

    pub fn add_modifier_listener(&mut self, listener: super::ModifierListener) {
        self.modifier_listeners.push(listener);
    }

    fn update_modifier_keys(&mut self, state: ModifiersState) {
        let keys = ModifierKeys::from(state);
        if keys == self.modifier_keys {
            return;
        }
        self.modifier_keys = keys;
        for listener in &mut self.modifier_listeners {
            listener(keys);
        }
    }

    fn perform_global_action(&mut self, action: GlobalAction) -> bool {
        crate::debug_info!("KEYS", "Global action {}", action);
        match action {
            GlobalAction::PreviousPanel => self.rotate_panel(false),
            GlobalAction::NextPanel => self.rotate_panel(true),
            GlobalAction::HistoryBack => self.go_back(),
            GlobalAction::HistoryForward => self.go_forward(),
            GlobalAction::ToggleConsole => self.toggle_console(),
            GlobalAction::Reload => self.reload(false),
            GlobalAction::ReloadIgnoringCache => self.reload(true),
            // Reaches here only without a help overlay
            GlobalAction::ShowShortcutsHelp => false,
        }
    }

    /// Show or hide the console drawer and remember the choice.
    pub fn toggle_console(&mut self) -> bool {
        let Some(drawer) = self.drawer.as_mut() else {
            return false;
        };
        let visible = !drawer.is_visible();
        drawer.set_visible(visible);
        // Failure is logged by the store
        let _ = self.settings.set_console_visible(visible);
        true
    }

    /// Ask the backend to reload the inspected page.
    pub fn reload(&mut self, ignore_cache: bool) -> bool {
        self.send_command("Page.reload", Some(json!({ "ignoreCache": ignore_cache })), None);
        true
    }
}

fn is_question_mark(event: &KeyEvent) -> bool {
    matches!(&event.key, Key::Character(c) if c.as_str() == "?")
}

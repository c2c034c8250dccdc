//! Default value functions for settings.
//!
//! Used as `#[serde(default = "crate::defaults::...")]` attributes on
//! [`Settings`](crate::Settings) fields.

use crate::types::KeyBinding;

/// Panel shown when nothing else was persisted.
pub const DEFAULT_PANEL: &str = "elements";

pub fn last_active_panel() -> String {
    DEFAULT_PANEL.to_string()
}

/// Reserved global shortcuts.
///
/// `CmdOrCtrl` is Cmd on macOS and Ctrl elsewhere; the platform is resolved
/// once when the registry is built.
pub fn keybindings() -> Vec<KeyBinding> {
    vec![
        KeyBinding::new("CmdOrCtrl+[", "previous_panel"),
        KeyBinding::new("CmdOrCtrl+]", "next_panel"),
        KeyBinding::new("CmdOrCtrl+Alt+Left", "history_back"),
        KeyBinding::new("CmdOrCtrl+Alt+Right", "history_forward"),
        KeyBinding::new("Escape", "toggle_console"),
        KeyBinding::new("CmdOrCtrl+R", "reload"),
        KeyBinding::new("F5", "reload"),
        KeyBinding::new("CmdOrCtrl+Shift+R", "reload_ignoring_cache"),
        KeyBinding::new("Shift+F5", "reload_ignoring_cache"),
        KeyBinding::new("F1", "show_shortcuts_help"),
        KeyBinding::new("Shift+?", "show_shortcuts_help"),
    ]
}

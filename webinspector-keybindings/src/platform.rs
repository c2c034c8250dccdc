//! Platform-specific keybinding resolution.
//!
//! Contains:
//! - [`Platform`], resolved once at startup from the host's platform string
//! - `CmdOrCtrl` modifier expansion (Cmd on macOS, Ctrl elsewhere)
//! - Named key alias table (string → `NamedKey`)

use winit::keyboard::{ModifiersState, NamedKey};

/// Host platform, as far as shortcut resolution cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Mac,
    Windows,
    Linux,
    Other,
}

impl Platform {
    /// Resolve the host's platform string (`"mac"`, `"windows"`, `"linux"`, ...).
    pub fn from_host(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "mac" | "macos" | "darwin" | "mac-leopard" | "mac-snowleopard" => Platform::Mac,
            "windows" | "win" => Platform::Windows,
            "linux" => Platform::Linux,
            _ => Platform::Other,
        }
    }

    pub fn is_mac(self) -> bool {
        self == Platform::Mac
    }

    /// Resolve the `CmdOrCtrl` modifier for this platform.
    ///
    /// Returns `(expected_ctrl, expected_super)` given a `cmd_or_ctrl` flag and the
    /// raw `ctrl`/`super_key` values from the parsed chord.
    #[inline]
    pub fn resolve_cmd_or_ctrl(self, cmd_or_ctrl: bool, ctrl: bool, super_key: bool) -> (bool, bool) {
        if !cmd_or_ctrl {
            return (ctrl, super_key);
        }
        if self.is_mac() {
            (ctrl, true)
        } else {
            (true, super_key)
        }
    }

    /// True when exactly the platform's primary modifier (Cmd on macOS, Ctrl
    /// elsewhere) is held and nothing else.
    pub fn is_primary_modifier_only(self, state: ModifiersState) -> bool {
        let primary = if self.is_mac() {
            ModifiersState::SUPER
        } else {
            ModifiersState::CONTROL
        };
        state == primary
    }
}

/// Parse a named key string into a [`NamedKey`].
///
/// Accepts human-readable aliases such as `"Enter"`, `"Return"`, `"Esc"`,
/// `"PgUp"`, arrow keys, and function keys F1–F12.  Matching is
/// case-insensitive.  Returns `None` for unrecognised strings.
pub fn parse_named_key(s: &str) -> Option<NamedKey> {
    match s.to_lowercase().as_str() {
        // Function keys
        "f1" => Some(NamedKey::F1),
        "f2" => Some(NamedKey::F2),
        "f3" => Some(NamedKey::F3),
        "f4" => Some(NamedKey::F4),
        "f5" => Some(NamedKey::F5),
        "f6" => Some(NamedKey::F6),
        "f7" => Some(NamedKey::F7),
        "f8" => Some(NamedKey::F8),
        "f9" => Some(NamedKey::F9),
        "f10" => Some(NamedKey::F10),
        "f11" => Some(NamedKey::F11),
        "f12" => Some(NamedKey::F12),

        // Common named keys
        "enter" | "return" => Some(NamedKey::Enter),
        "escape" | "esc" => Some(NamedKey::Escape),
        "space" => Some(NamedKey::Space),
        "tab" => Some(NamedKey::Tab),
        "backspace" => Some(NamedKey::Backspace),
        "delete" | "del" => Some(NamedKey::Delete),
        "home" => Some(NamedKey::Home),
        "end" => Some(NamedKey::End),
        "pageup" | "pgup" => Some(NamedKey::PageUp),
        "pagedown" | "pgdn" => Some(NamedKey::PageDown),

        // Arrow keys
        "up" | "arrowup" => Some(NamedKey::ArrowUp),
        "down" | "arrowdown" => Some(NamedKey::ArrowDown),
        "left" | "arrowleft" => Some(NamedKey::ArrowLeft),
        "right" | "arrowright" => Some(NamedKey::ArrowRight),

        _ => None,
    }
}

//! Keybinding system for webinspector.
//!
//! Global shortcuts are described as structured key chords (modifier set +
//! logical key) and resolved against the host platform once, when the
//! registry is built.
//!
//! Features:
//! - Configurable key combinations (CmdOrCtrl+], Shift+F5, etc.)
//! - Per-platform `CmdOrCtrl` resolution
//! - Host-neutral [`KeyEvent`] built on winit's logical key types

mod matcher;
pub mod parser;
pub mod platform;

pub use matcher::{ChordMatcher, KeyEvent};
pub use parser::{KeyChord, ParseError, ParsedKey, parse_key_chord};
pub use platform::Platform;

use webinspector_config::KeyBinding;

/// Registry of keybindings mapping key chords to action names.
#[derive(Debug)]
pub struct KeybindingRegistry {
    /// Parsed chords and their action names, in configuration order
    bindings: Vec<(KeyChord, String)>,
    platform: Platform,
}

impl KeybindingRegistry {
    /// Create a new empty registry.
    pub fn new(platform: Platform) -> Self {
        Self {
            bindings: Vec::new(),
            platform,
        }
    }

    /// Build a registry from configured keybindings.
    ///
    /// Invalid keybinding strings are logged and skipped. When two entries
    /// parse to the same chord the later one wins.
    pub fn from_config(keybindings: &[KeyBinding], platform: Platform) -> Self {
        let mut registry = Self::new(platform);

        log::info!(
            "Building keybinding registry from {} config keybindings for {:?}",
            keybindings.len(),
            platform
        );
        for binding in keybindings {
            match parser::parse_key_chord(&binding.key) {
                Ok(chord) => {
                    log::debug!(
                        "Registered keybinding: {} -> {} (parsed as: {})",
                        binding.key,
                        binding.action,
                        chord
                    );
                    registry.insert(chord, &binding.action);
                }
                Err(e) => {
                    log::warn!(
                        "Invalid keybinding '{}' for action '{}': {}",
                        binding.key,
                        binding.action,
                        e
                    );
                }
            }
        }

        log::info!(
            "Keybinding registry initialized with {} bindings",
            registry.bindings.len()
        );
        registry
    }

    /// Bind `chord` to `action`, replacing any existing binding of that chord.
    pub fn insert(&mut self, chord: KeyChord, action: &str) {
        match self.bindings.iter_mut().find(|(c, _)| *c == chord) {
            Some(entry) => entry.1 = action.to_string(),
            None => self.bindings.push((chord, action.to_string())),
        }
    }

    /// Look up an action for a key event.
    ///
    /// Returns the action name if a matching keybinding is found.
    pub fn lookup(&self, event: &KeyEvent) -> Option<&str> {
        let matcher = ChordMatcher::from_event(event, self.platform);
        self.bindings
            .iter()
            .find(|(chord, _)| matcher.matches(chord))
            .map(|(_, action)| action.as_str())
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Check if the registry has any bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Get the number of registered bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }
}

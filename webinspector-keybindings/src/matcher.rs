//! Key event matching.
//!
//! Matches host key events against parsed [`KeyChord`]s for a resolved
//! [`Platform`].

use crate::parser::{KeyChord, ParsedKey};
use crate::platform::Platform;
use winit::keyboard::{Key, ModifiersState, NamedKey};

/// A key press as delivered by the host shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Logical key (layout-resolved)
    pub key: Key,
    /// Modifier state at the time of the press
    pub modifiers: ModifiersState,
    /// True for auto-repeat presses
    pub repeat: bool,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: ModifiersState) -> Self {
        Self {
            key,
            modifiers,
            repeat: false,
        }
    }

    /// A named key press (Enter, Escape, F5, ...).
    pub fn named(key: NamedKey, modifiers: ModifiersState) -> Self {
        Self::new(Key::Named(key), modifiers)
    }

    /// A character key press.
    pub fn character(text: &str, modifiers: ModifiersState) -> Self {
        Self::new(Key::Character(text.into()), modifiers)
    }

    pub fn is_named(&self, named: NamedKey) -> bool {
        self.key == Key::Named(named)
    }

    pub fn shift(&self) -> bool {
        self.modifiers.shift_key()
    }
}

/// Normalized key for matching purposes.
#[derive(Debug)]
enum MatchKey {
    Character(char),
    Named(NamedKey),
}

/// Matcher for comparing a key event against chords.
#[derive(Debug)]
pub struct ChordMatcher {
    ctrl: bool,
    alt: bool,
    shift: bool,
    super_key: bool,
    key: Option<MatchKey>,
    platform: Platform,
}

impl ChordMatcher {
    /// Create a matcher from a key event.
    pub fn from_event(event: &KeyEvent, platform: Platform) -> Self {
        let key = match &event.key {
            Key::Character(c) => c
                .chars()
                .next()
                .map(|ch| MatchKey::Character(ch.to_ascii_uppercase())),
            Key::Named(named) => Some(MatchKey::Named(*named)),
            _ => None,
        };

        Self {
            ctrl: event.modifiers.control_key(),
            alt: event.modifiers.alt_key(),
            shift: event.modifiers.shift_key(),
            super_key: event.modifiers.super_key(),
            key,
            platform,
        }
    }

    /// Check if this event matches the given chord.
    pub fn matches(&self, chord: &KeyChord) -> bool {
        let key_matches = match (&chord.key, &self.key) {
            (ParsedKey::Character(expected), Some(MatchKey::Character(actual))) => {
                actual.eq_ignore_ascii_case(expected)
            }
            (ParsedKey::Named(expected), Some(MatchKey::Named(actual))) => expected == actual,
            _ => false,
        };

        if !key_matches {
            return false;
        }

        let (expected_ctrl, expected_super) = self.platform.resolve_cmd_or_ctrl(
            chord.modifiers.cmd_or_ctrl,
            chord.modifiers.ctrl,
            chord.modifiers.super_key,
        );

        self.ctrl == expected_ctrl
            && self.alt == chord.modifiers.alt
            && self.shift == chord.modifiers.shift
            && self.super_key == expected_super
    }
}

//! Key chord parser.
//!
//! Parses human-readable key strings like "CmdOrCtrl+]" or "Shift+F5" into
//! [`KeyChord`] values, so shortcut tables never compare raw key identifiers.

use crate::platform::parse_named_key;
use std::fmt;
use winit::keyboard::NamedKey;

/// Error type for key parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseError {}

/// Set of modifiers a chord requires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub super_key: bool,
    /// If true, this represents CmdOrCtrl (Cmd on macOS, Ctrl elsewhere)
    pub cmd_or_ctrl: bool,
}

/// A parsed key chord (modifier set + logical key).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub modifiers: Modifiers,
    pub key: ParsedKey,
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        if self.modifiers.cmd_or_ctrl {
            parts.push("CmdOrCtrl".to_string());
        }
        if self.modifiers.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.modifiers.alt {
            parts.push("Alt".to_string());
        }
        if self.modifiers.shift {
            parts.push("Shift".to_string());
        }
        if self.modifiers.super_key {
            parts.push("Super".to_string());
        }

        match &self.key {
            ParsedKey::Character(c) => parts.push(c.to_string()),
            ParsedKey::Named(n) => parts.push(format!("{:?}", n)),
        }

        write!(f, "{}", parts.join("+"))
    }
}

/// The logical key of a chord.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParsedKey {
    /// A single character key (e.g., 'R', '[', '?'), stored uppercased
    Character(char),
    /// A named key (e.g., F5, Escape, ArrowLeft)
    Named(NamedKey),
}

/// Parse a key chord string into a [`KeyChord`].
///
/// Supported format: "Modifier+Modifier+Key"
///
/// Modifiers:
/// - `Ctrl`, `Control` - Control key
/// - `Alt`, `Option` - Alt/Option key
/// - `Shift` - Shift key
/// - `Super`, `Cmd`, `Command`, `Meta`, `Win` - Super/Cmd key
/// - `CmdOrCtrl` - Cmd on macOS, Ctrl on other platforms
///
/// Keys:
/// - Single characters: `R`, `[`, `]`, `?`, etc.
/// - Named keys: `F1`-`F12`, `Enter`, `Escape`, `Left`, `Tab`, etc.
///
/// A literal `+` key is written as the trailing part of `"Ctrl++"`.
pub fn parse_key_chord(s: &str) -> Result<KeyChord, ParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ParseError("Empty key combination".to_string()));
    }

    let (body, plus_key) = match s.strip_suffix("++") {
        Some(rest) => (rest, true),
        None if s == "+" => ("", true),
        None => (s, false),
    };

    let parts: Vec<&str> = if body.is_empty() {
        Vec::new()
    } else {
        body.split('+').map(str::trim).collect()
    };

    let mut modifiers = Modifiers::default();
    let mut key_part = if plus_key { Some("+") } else { None };

    for (i, part) in parts.iter().enumerate() {
        let is_last = i == parts.len() - 1 && !plus_key;

        let is_modifier = match part.to_lowercase().as_str() {
            "ctrl" | "control" => {
                modifiers.ctrl = true;
                true
            }
            "alt" | "option" => {
                modifiers.alt = true;
                true
            }
            "shift" => {
                modifiers.shift = true;
                true
            }
            "super" | "cmd" | "command" | "meta" | "win" => {
                modifiers.super_key = true;
                true
            }
            "cmdorctrl" => {
                modifiers.cmd_or_ctrl = true;
                true
            }
            _ => false,
        };

        if !is_modifier {
            if key_part.is_some() {
                return Err(ParseError(format!(
                    "Multiple keys specified: already have key, found '{}'",
                    part
                )));
            }
            key_part = Some(*part);
        } else if is_last {
            return Err(ParseError(
                "Key combination ends with modifier, no key specified".to_string(),
            ));
        }
    }

    let key_str = key_part.ok_or_else(|| ParseError("No key specified".to_string()))?;
    let key = parse_key(key_str)?;

    Ok(KeyChord { modifiers, key })
}

/// Parse a key string into a ParsedKey.
fn parse_key(s: &str) -> Result<ParsedKey, ParseError> {
    if let Some(named) = parse_named_key(s) {
        return Ok(ParsedKey::Named(named));
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(ParsedKey::Character(c.to_ascii_uppercase())),
        _ => Err(ParseError(format!("Unknown key: '{}'", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bracket_with_cmd_or_ctrl() {
        let chord = parse_key_chord("CmdOrCtrl+]").unwrap();
        assert!(chord.modifiers.cmd_or_ctrl);
        assert!(!chord.modifiers.ctrl);
        assert_eq!(chord.key, ParsedKey::Character(']'));
    }

    #[test]
    fn parses_arrow_with_two_modifiers() {
        let chord = parse_key_chord("CmdOrCtrl+Alt+Left").unwrap();
        assert!(chord.modifiers.cmd_or_ctrl);
        assert!(chord.modifiers.alt);
        assert_eq!(chord.key, ParsedKey::Named(NamedKey::ArrowLeft));
    }

    #[test]
    fn letters_are_uppercased() {
        let chord = parse_key_chord("ctrl+r").unwrap();
        assert!(chord.modifiers.ctrl);
        assert_eq!(chord.key, ParsedKey::Character('R'));
    }

    #[test]
    fn bare_named_key() {
        let chord = parse_key_chord("Escape").unwrap();
        assert_eq!(chord.modifiers, Modifiers::default());
        assert_eq!(chord.key, ParsedKey::Named(NamedKey::Escape));
    }

    #[test]
    fn literal_plus_key() {
        let chord = parse_key_chord("Ctrl++").unwrap();
        assert!(chord.modifiers.ctrl);
        assert_eq!(chord.key, ParsedKey::Character('+'));
    }

    #[test]
    fn rejects_malformed_chords() {
        assert!(parse_key_chord("").is_err());
        assert!(parse_key_chord("Ctrl+Shift").is_err());
        assert!(parse_key_chord("Ctrl+A+B").is_err());
        assert!(parse_key_chord("Ctrl+Banana").is_err());
    }

    #[test]
    fn display_round_trips_through_parser() {
        let chord = parse_key_chord("Shift+F5").unwrap();
        let reparsed = parse_key_chord(&chord.to_string()).unwrap();
        assert_eq!(chord, reparsed);
    }
}

//! Keyboard shortcuts (mode toggle) and modifier state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Keyboard modifier state accompanying a key or pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    /// Cmd on macOS, the Windows/Super key elsewhere.
    pub command: bool,
}

impl KeyModifiers {
    pub const NONE: KeyModifiers = KeyModifiers {
        ctrl: false,
        alt: false,
        shift: false,
        command: false,
    };

    /// Modifier that makes a lasso add to the existing selection.
    pub fn extends_selection(&self) -> bool {
        self.ctrl || self.command
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modifier {
    None,
    Ctrl,
    Alt,
    Shift,
    CtrlShift,
}

impl Modifier {
    fn matches(self, m: KeyModifiers) -> bool {
        match self {
            Modifier::None => !m.ctrl && !m.alt && !m.command,
            Modifier::Ctrl => (m.ctrl || m.command) && !m.alt && !m.shift,
            Modifier::Alt => m.alt && !m.ctrl && !m.command,
            Modifier::Shift => m.shift && !m.ctrl && !m.alt && !m.command,
            Modifier::CtrlShift => (m.ctrl || m.command) && m.shift && !m.alt,
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Modifier::None => "",
            Modifier::Ctrl => "Ctrl",
            Modifier::Alt => "Alt",
            Modifier::Shift => "Shift",
            Modifier::CtrlShift => "Ctrl+Shift",
        };
        write!(f, "{}", s)
    }
}

/// A single-key shortcut with an optional modifier.
///
/// Serialized as its display string, e.g. `"s"` or `"Ctrl+L"`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hotkey {
    pub modifier: Modifier,
    pub key: char,
}

impl Hotkey {
    pub fn new(modifier: Modifier, key: char) -> Self {
        Self { modifier, key }
    }

    /// Default key for toggling between zoom and lasso mode.
    pub fn mode_toggle_default() -> Self {
        Self::new(Modifier::None, 's')
    }

    /// Whether a pressed key plus modifiers triggers this hotkey.
    /// Letters compare case-insensitively.
    pub fn matches(&self, key: char, modifiers: KeyModifiers) -> bool {
        self.key.eq_ignore_ascii_case(&key) && self.modifier.matches(modifiers)
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self.key {
            ' ' => "Space".to_string(),
            other => other.to_string(),
        };
        if self.modifier == Modifier::None {
            write!(f, "{}", key)
        } else {
            write!(f, "{}+{}", self.modifier, key)
        }
    }
}

impl FromStr for Hotkey {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty hotkey".to_string());
        }
        let parts: Vec<&str> = s.split('+').map(|p| p.trim()).collect();
        let (last, mods) = match parts.split_last() {
            Some(split) => split,
            None => return Err("invalid hotkey".to_string()),
        };
        let key = match last.to_lowercase().as_str() {
            "space" => ' ',
            _ => {
                let mut chars = last.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => c,
                    _ => return Err(format!("key must be a single character, got '{}'", last)),
                }
            }
        };
        let mut lowers: Vec<String> = mods.iter().map(|m| m.to_lowercase()).collect();
        lowers.sort();
        let modifier = match lowers.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
            [] => Modifier::None,
            ["ctrl"] | ["control"] | ["cmd"] => Modifier::Ctrl,
            ["alt"] => Modifier::Alt,
            ["shift"] => Modifier::Shift,
            ["ctrl", "shift"] | ["control", "shift"] => Modifier::CtrlShift,
            other => return Err(format!("unknown modifier combo '{:?}'", other)),
        };
        Ok(Hotkey { modifier, key })
    }
}

impl TryFrom<String> for Hotkey {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Hotkey> for String {
    fn from(h: Hotkey) -> String {
        h.to_string()
    }
}

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A single key as the engine sees it.
///
/// Hosts translate their platform events into keys before calling the
/// engine, either directly or through [`KeyEvent::normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character, with shift already applied ('A', not 'a').
    Char(char),
    /// The Escape key, used to exit modes and cancel pending input.
    Esc,
    /// The Enter/Return key.
    Enter,
    /// The Backspace key.
    Backspace,
}

impl Key {
    pub fn char(self) -> Option<char> {
        match self {
            Key::Char(c) => Some(c),
            _ => None,
        }
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Key::Char(c)
    }
}

/// Parses the literal key tokens hosts send: a single character, or one of
/// `Escape`, `Esc`, `Enter`, `Backspace`.
impl FromStr for Key {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Escape" | "Esc" => return Ok(Key::Esc),
            "Enter" => return Ok(Key::Enter),
            "Backspace" => return Ok(Key::Backspace),
            _ => {}
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Key::Char(c)),
            _ => Err(Error::UnknownKey(s.to_string())),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::Esc => f.write_str("Escape"),
            Key::Enter => f.write_str("Enter"),
            Key::Backspace => f.write_str("Backspace"),
        }
    }
}

bitflags::bitflags! {
    /// Keyboard modifier flags.
    ///
    /// These can be combined to represent multiple modifiers held simultaneously.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

/// A raw key press with modifiers, as delivered by a host toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub key: Key,
    /// Modifier keys held during the key press.
    pub mods: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, mods: Modifiers) -> Self {
        Self { key, mods }
    }

    /// Maps a chord onto the key the engine understands.
    ///
    /// `Ctrl+C` and `Ctrl+[` become [`Key::Esc`]. Any other Ctrl/Alt/Meta
    /// chord has no meaning to the engine and yields `None`.
    pub fn normalize(self) -> Option<Key> {
        if self.mods.intersects(Modifiers::CTRL) {
            return match self.key {
                Key::Char('c' | 'C' | '[') => Some(Key::Esc),
                _ => None,
            };
        }
        if self.mods.intersects(Modifiers::ALT | Modifiers::META) {
            return None;
        }
        Some(self.key)
    }
}

impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self {
        Self {
            key,
            mods: Modifiers::empty(),
        }
    }
}

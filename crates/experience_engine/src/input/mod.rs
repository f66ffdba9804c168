//! Keyboard input
//!
//! Raw key events are described by [`Key`]; the [`InputRouter`] maps them to
//! [`AnimationCommand`]s through a configurable binding table.

mod router;

pub use router::InputRouter;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Non-character keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Space key
    Space,
    /// Up arrow
    ArrowUp,
    /// Down arrow
    ArrowDown,
    /// Left arrow
    ArrowLeft,
    /// Right arrow
    ArrowRight,
}

impl NamedKey {
    const ALL: [NamedKey; 7] = [
        Self::Enter,
        Self::Escape,
        Self::Space,
        Self::ArrowUp,
        Self::ArrowDown,
        Self::ArrowLeft,
        Self::ArrowRight,
    ];

    /// Key name as reported by browsers and windowing toolkits
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enter => "Enter",
            Self::Escape => "Escape",
            Self::Space => "Space",
            Self::ArrowUp => "ArrowUp",
            Self::ArrowDown => "ArrowDown",
            Self::ArrowLeft => "ArrowLeft",
            Self::ArrowRight => "ArrowRight",
        }
    }
}

/// A pressed key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Printable character, case preserved
    Character(char),
    /// Named key
    Named(NamedKey),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Character(c) => write!(f, "{c}"),
            Self::Named(named) => f.write_str(named.as_str()),
        }
    }
}

/// Key name that is neither a single character nor a known named key
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown key: '{0}'")]
pub struct KeyParseError(pub String);

impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(if c == ' ' { Self::Named(NamedKey::Space) } else { Self::Character(c) });
        }
        NamedKey::ALL
            .into_iter()
            .find(|named| named.as_str().eq_ignore_ascii_case(s))
            .map(Self::Named)
            .ok_or_else(|| KeyParseError(s.to_string()))
    }
}

/// Semantic animation command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationCommand {
    /// Crossfade to the named animation
    Play(String),
    /// Return to the default animation
    Stop,
}

/// Key aliases mapped to one command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    /// Key names, e.g. `"1"`, `"i"`, `"ArrowUp"`
    pub keys: Vec<String>,
    /// Command issued by any of the keys
    pub command: AnimationCommand,
}

impl KeyBinding {
    fn new(keys: &[&str], command: AnimationCommand) -> Self {
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            command,
        }
    }
}

/// The Fox scene's bindings: digits and initials for idle, walking, running and stop
pub fn default_bindings() -> Vec<KeyBinding> {
    vec![
        KeyBinding::new(&["1", "i", "I"], AnimationCommand::Play("idle".into())),
        KeyBinding::new(&["2", "w", "W"], AnimationCommand::Play("walking".into())),
        KeyBinding::new(&["3", "r", "R"], AnimationCommand::Play("running".into())),
        KeyBinding::new(&["0", "s", "S"], AnimationCommand::Stop),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys() {
        assert_eq!("i".parse(), Ok(Key::Character('i')));
        assert_eq!("I".parse(), Ok(Key::Character('I')));
        assert_eq!(" ".parse(), Ok(Key::Named(NamedKey::Space)));
        assert_eq!("ArrowUp".parse(), Ok(Key::Named(NamedKey::ArrowUp)));
        assert_eq!("enter".parse(), Ok(Key::Named(NamedKey::Enter)));
        assert_eq!("Hyper".parse::<Key>(), Err(KeyParseError("Hyper".into())));
        assert!("".parse::<Key>().is_err());
    }

    #[test]
    fn test_display_round_trips_named() {
        for named in NamedKey::ALL {
            assert_eq!(Key::Named(named).to_string().parse(), Ok(Key::Named(named)));
        }
    }
}

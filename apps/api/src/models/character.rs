use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single display glyph. Identity is its value.
///
/// Serializes as a one-character JSON string, matching the `/api/chars` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Character(char);

#[derive(Debug, Error, PartialEq)]
pub enum CharacterError {
    #[error("character value is empty")]
    Empty,
    #[error("'{0}' is more than one character")]
    TooLong(String),
}

impl Character {
    pub fn new(c: char) -> Self {
        Self(c)
    }

    pub fn as_char(self) -> char {
        self.0
    }

    /// Case-insensitive substring match. An empty term matches everything.
    pub fn matches(self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        self.0
            .to_lowercase()
            .collect::<String>()
            .contains(&term.to_lowercase())
    }
}

impl FromStr for Character {
    type Err = CharacterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Err(CharacterError::Empty),
            (Some(c), None) => Ok(Self(c)),
            (Some(_), Some(_)) => Err(CharacterError::TooLong(s.to_string())),
        }
    }
}

impl From<char> for Character {
    fn from(c: char) -> Self {
        Self(c)
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chosen character plus the number of practice rows printed for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedEntry {
    #[serde(rename = "char")]
    pub character: Character,
    pub lines: u32,
}

impl SelectedEntry {
    pub fn new(character: Character) -> Self {
        Self { character, lines: 1 }
    }
}

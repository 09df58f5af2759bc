//! The ordered, immutable list of candidate characters.
//!
//! Catalog position defines the band a character belongs to:
//! indices `[0, 100)` are basic, `[100, 500)` are common, the rest only show under `all`.

pub mod handlers;
pub mod loader;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Character;

pub use loader::{load_catalog, parse_catalog_source};

pub const BASIC_LIMIT: usize = 100;
pub const COMMON_LIMIT: usize = 500;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no array literal found in catalog source")]
    NoArrayLiteral,

    #[error("catalog is not a JSON array of strings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog is empty")]
    Empty,

    #[error("catalog entry {index} ('{value}') is not a single character")]
    InvalidEntry { index: usize, value: String },

    #[error("catalog entry {index} duplicates '{character}'")]
    Duplicate { index: usize, character: Character },
}

/// Mutually exclusive index-range filter over the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    #[default]
    All,
    Basic,
    Common,
}

impl Band {
    pub fn admits(self, index: usize) -> bool {
        match self {
            Band::All => true,
            Band::Basic => index < BASIC_LIMIT,
            Band::Common => (BASIC_LIMIT..COMMON_LIMIT).contains(&index),
        }
    }
}

impl FromStr for Band {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Band::All),
            "basic" => Ok(Band::Basic),
            "common" => Ok(Band::Common),
            other => Err(format!("unknown band filter '{other}'")),
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Band::All => "all",
            Band::Basic => "basic",
            Band::Common => "common",
        })
    }
}

/// Ordered catalog. Never empty, never holds duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    chars: Vec<Character>,
}

impl Catalog {
    /// Validates raw entries: non-empty, each exactly one character, no repeats.
    pub fn from_strings<S: AsRef<str>>(values: &[S]) -> Result<Self, CatalogError> {
        if values.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(values.len());
        let mut chars = Vec::with_capacity(values.len());
        for (index, value) in values.iter().enumerate() {
            let value = value.as_ref();
            let character = value
                .parse::<Character>()
                .map_err(|_| CatalogError::InvalidEntry {
                    index,
                    value: value.to_string(),
                })?;
            if !seen.insert(character) {
                return Err(CatalogError::Duplicate { index, character });
            }
            chars.push(character);
        }

        Ok(Self { chars })
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> &[Character] {
        &self.chars
    }

    pub fn get(&self, index: usize) -> Option<Character> {
        self.chars.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Character)> + '_ {
        self.chars.iter().copied().enumerate()
    }
}

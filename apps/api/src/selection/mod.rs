//! The ordered set of characters chosen for printing.
//!
//! Insertion order is display order. The set never holds duplicates and never
//! grows beyond its capacity (`MAX_SELECTION` unless built with another bound).

pub mod store;

use thiserror::Error;

use crate::models::{Character, SelectedEntry};

pub use store::{JsonFileStore, MemoryStore, PersistencePolicy, SelectionStore, StoreError};

pub const MAX_SELECTION: usize = 10;
pub const MAX_LINES: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("at most {max} characters can be selected")]
    Full { max: usize },

    #[error("line count must be between 1 and {max}, got {got}")]
    InvalidLines { got: u32, max: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadySelected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    entries: Vec<SelectedEntry>,
    capacity: usize,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self::with_capacity(MAX_SELECTION)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuilds a selection by adding each entry in order.
    ///
    /// Repeated characters keep their first position and last line count.
    /// Line counts are clamped to `1..=MAX_LINES`. Fails once capacity is exceeded.
    pub fn replay<'a, I>(entries: I) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = &'a SelectedEntry>,
    {
        let mut state = Self::new();
        for entry in entries {
            state.add(entry.character)?;
            state.set_lines(entry.character, entry.lines.clamp(1, MAX_LINES))?;
        }
        Ok(state)
    }

    pub fn entries(&self) -> &[SelectedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn contains(&self, character: Character) -> bool {
        self.position(character).is_some()
    }

    pub fn lines_of(&self, character: Character) -> Option<u32> {
        self.position(character).map(|i| self.entries[i].lines)
    }

    /// A catalog item is unselectable exactly when the selection is full and
    /// the item is not itself selected.
    pub fn is_item_disabled(&self, character: Character) -> bool {
        self.is_full() && !self.contains(character)
    }

    pub fn add(&mut self, character: Character) -> Result<AddOutcome, SelectionError> {
        if self.contains(character) {
            return Ok(AddOutcome::AlreadySelected);
        }
        if self.is_full() {
            return Err(SelectionError::Full { max: self.capacity });
        }
        self.entries.push(SelectedEntry::new(character));
        Ok(AddOutcome::Added)
    }

    /// Returns whether an entry was removed.
    pub fn remove(&mut self, character: Character) -> bool {
        match self.position(character) {
            Some(i) => {
                self.entries.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn toggle(&mut self, character: Character) -> Result<ToggleOutcome, SelectionError> {
        if self.remove(character) {
            return Ok(ToggleOutcome::Removed);
        }
        self.add(character)?;
        Ok(ToggleOutcome::Added)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Updates the line count of a selected character.
    ///
    /// Returns `Ok(false)` when the character is not selected.
    pub fn set_lines(&mut self, character: Character, lines: u32) -> Result<bool, SelectionError> {
        let Some(i) = self.position(character) else {
            return Ok(false);
        };
        if lines == 0 || lines > MAX_LINES {
            return Err(SelectionError::InvalidLines {
                got: lines,
                max: MAX_LINES,
            });
        }
        self.entries[i].lines = lines;
        Ok(true)
    }

    /// Adds every practicable glyph found in free text, in order, until full.
    ///
    /// Separators and unsupported symbols are skipped, as are characters already
    /// selected. Returns how many entries were added.
    pub fn add_custom(&mut self, text: &str) -> usize {
        let mut added = 0;
        for c in text.trim().chars().filter(|c| is_practice_glyph(*c)) {
            if self.is_full() {
                break;
            }
            if let Ok(AddOutcome::Added) = self.add(Character::new(c)) {
                added += 1;
            }
        }
        added
    }

    fn position(&self, character: Character) -> Option<usize> {
        self.entries.iter().position(|e| e.character == character)
    }
}

/// CJK unified ideographs plus ASCII letters and digits.
fn is_practice_glyph(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c) || c.is_ascii_alphanumeric()
}

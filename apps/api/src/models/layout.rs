use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Print size tier. Each tier fixes the cell edge length and how many practice
/// cells fit on one row of an A4 page next to the reference cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridSizeTier {
    Small,
    #[default]
    Medium,
    Large,
}

impl GridSizeTier {
    /// Cell edge length in CSS pixels.
    pub fn cell_px(self) -> u32 {
        match self {
            GridSizeTier::Small => 60,
            GridSizeTier::Medium => 80,
            GridSizeTier::Large => 100,
        }
    }

    pub fn practice_cells_per_row(self) -> u32 {
        match self {
            GridSizeTier::Small => 10,
            GridSizeTier::Medium => 7,
            GridSizeTier::Large => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GridSizeTier::Small => "small",
            GridSizeTier::Medium => "medium",
            GridSizeTier::Large => "large",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown grid size '{0}' (expected small, medium or large)")]
pub struct GridSizeError(pub String);

impl FromStr for GridSizeTier {
    type Err = GridSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(GridSizeTier::Small),
            "medium" => Ok(GridSizeTier::Medium),
            "large" => Ok(GridSizeTier::Large),
            other => Err(GridSizeError(other.to_string())),
        }
    }
}

impl fmt::Display for GridSizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layout inputs for the print document generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintLayoutConfig {
    pub grid_size: GridSizeTier,
    /// Ornamental animal glyph row instead of the fixed title.
    pub decorative_header: bool,
}

impl Default for PrintLayoutConfig {
    fn default() -> Self {
        Self {
            grid_size: GridSizeTier::Medium,
            decorative_header: true,
        }
    }
}

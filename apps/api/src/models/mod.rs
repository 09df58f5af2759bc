pub mod character;
pub mod layout;

pub use character::{Character, SelectedEntry};
pub use layout::{GridSizeError, GridSizeTier, PrintLayoutConfig};

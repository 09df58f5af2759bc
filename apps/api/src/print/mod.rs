// Print Document Generator
// Builds the printable practice sheet as a typed node tree, serialized once.

pub mod document;
pub mod handlers;
pub mod sheet;
pub mod styles;

pub use document::{Document, Element, Node};
pub use sheet::{build_sheet, render_sheet, PrintError};

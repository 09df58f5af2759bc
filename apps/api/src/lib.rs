//! Practice-sheet generator: pick up to ten characters from a catalog and
//! render a printable 米-grid worksheet for them.

pub mod browse;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod models;
pub mod print;
pub mod routes;
pub mod selection;
pub mod state;
pub mod workbench;

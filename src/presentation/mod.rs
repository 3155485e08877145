//! Presentation layer handling terminal UI and user input.
//!
//! Renders the commission table, totals and popups with ratatui, and maps
//! key presses onto application actions.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;

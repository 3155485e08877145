//! Infrastructure layer providing external service integrations.
//!
//! Persistence of the calculator state, report export to spreadsheet and
//! CSV files, and resolution of the directories both use.

pub mod persistence;
pub mod export;
pub mod config;

pub use persistence::*;
pub use export::*;
pub use config::*;

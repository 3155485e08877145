//! Application layer managing state and user workflows.
//!
//! Coordinates the domain types with persistence and export, and holds the
//! UI state the presentation layer renders.

pub mod state;

pub use state::*;

//! Hoa Hồng CTV - commission calculator library
//!
//! Row state, keypad navigation, persistence and report export for a
//! two-column commission table.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;

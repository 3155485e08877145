pub mod models;
pub mod cursor;
pub mod keypad;
pub mod format;
pub mod report;
pub mod errors;

pub use models::*;
pub use cursor::*;
pub use keypad::*;
pub use format::*;
pub use report::*;
pub use errors::*;

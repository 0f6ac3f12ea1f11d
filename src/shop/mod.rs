//! Monthly-reset item shop.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;

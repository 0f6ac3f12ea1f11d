//! Tasks and the reward processor: completion, undo, edit and delete.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;

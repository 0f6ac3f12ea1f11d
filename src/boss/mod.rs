//! Long-term goals as bosses damaged by completed tasks.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;

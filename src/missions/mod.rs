//! Weekly mission pool, daily gacha and burn-on-create.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;

//! Tracks, cumulative stats, the XP curve, rank titles and login streaks.

pub mod level;
pub mod rank;
pub mod stats;
pub mod streak;

pub use level::*;
pub use rank::*;
pub use stats::*;
pub use streak::*;

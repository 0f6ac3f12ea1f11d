//! Shared engine plumbing: state aggregate, events, errors, clock and config.

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod session_state;

pub use clock::*;
pub use config::*;
pub use error::*;
pub use events::*;
pub use session_state::*;

//! questlog - progression and economy engine for a gamified task tracker.
//!
//! Completing real-world tasks grants EXP on three tracks (study, exercise,
//! work). EXP drives levels, an idle gold generator, boss-style long-term
//! goals, a weekly mission pool with a daily gacha and a small shop.
//! [`session::GameSession`] is the entry point; the modules below are the
//! pure operations it wires together.

pub mod analytics;
pub mod boss;
pub mod build_info;
pub mod content;
pub mod core;
pub mod idle;
pub mod missions;
pub mod progression;
pub mod session;
pub mod shop;
pub mod skip;
pub mod storage;
pub mod tasks;

pub use crate::core::{
    ActionResult, Clock, EngineConfig, EngineError, EngineEvent, EngineResult, FixedClock,
    Outcome, SessionState, SystemClock,
};
pub use session::{AutoConfirm, Confirm, GameSession, SessionPrompt};

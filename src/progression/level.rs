//! XP curve: level 1 needs 100 EXP and every further level needs 10% more
//! than the previous one, rounded down.

use super::stats::{Stats, Track};
use crate::core::constants::{LEVEL_BASE_EXP, LEVEL_GROWTH_DEN, LEVEL_GROWTH_NUM};

/// Where a cumulative EXP total sits on the curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelInfo {
    pub level: u32,
    /// EXP earned inside the current level.
    pub current_level_exp: u64,
    /// EXP the current level requires before the next one.
    pub next_level_req: u64,
    /// `current_level_exp / next_level_req`, in `[0, 1)`.
    pub progress: f64,
}

/// Requirement of the level following `previous`. Pins at `u64::MAX` once
/// the curve no longer fits.
fn next_requirement(previous: u64) -> u64 {
    previous
        .checked_mul(LEVEL_GROWTH_NUM)
        .map_or(u64::MAX, |v| v / LEVEL_GROWTH_DEN)
}

/// Resolves a cumulative EXP total into level and in-level progress.
pub fn level_info(total_exp: u64) -> LevelInfo {
    let mut level = 1;
    let mut required = LEVEL_BASE_EXP;
    let mut remaining = total_exp;

    while remaining >= required {
        remaining -= required;
        level += 1;
        required = next_requirement(required);
    }

    LevelInfo {
        level,
        current_level_exp: remaining,
        next_level_req: required,
        progress: remaining as f64 / required as f64,
    }
}

pub fn level_for_exp(total_exp: u64) -> u32 {
    level_info(total_exp).level
}

/// Cumulative EXP at which `level` begins (sum of requirements for
/// levels `1..level`), or None when it does not fit in a `u64`.
pub fn checked_exp_for_level_start(level: u32) -> Option<u64> {
    let mut total: u64 = 0;
    let mut required = LEVEL_BASE_EXP;
    for _ in 1..level {
        total = total.checked_add(required)?;
        required = next_requirement(required);
    }
    Some(total)
}

/// Like [`checked_exp_for_level_start`], saturating at `u64::MAX`.
pub fn total_exp_for_level_start(level: u32) -> u64 {
    checked_exp_for_level_start(level).unwrap_or(u64::MAX)
}

/// Cumulative EXP for a manual correction entered as level plus in-level EXP.
/// None when the total overflows.
pub fn exp_for_level_and_progress(level: u32, exp_into_level: u64) -> Option<u64> {
    checked_exp_for_level_start(level.max(1))?.checked_add(exp_into_level)
}

/// Adds EXP to a track. Returns the new level when it crossed a boundary.
pub fn grant_exp(stats: &mut Stats, track: Track, amount: u64) -> Option<u32> {
    let old_level = level_for_exp(stats.get(track));
    stats.add(track, amount);
    let new_level = level_for_exp(stats.get(track));
    (new_level > old_level).then_some(new_level)
}

/// Sum of the three track levels.
pub fn total_level(stats: &Stats) -> u32 {
    Track::ALL
        .iter()
        .map(|track| level_for_exp(stats.get(*track)))
        .sum()
}

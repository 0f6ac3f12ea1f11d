//! Idle gold generator.
//!
//! Gold accrues continuously at a rate driven by the combined level of all
//! tracks and is banked on collection.

use crate::core::constants::{IDLE_LEVELS_PER_GOLD_HOUR, SECONDS_PER_HOUR};
use crate::core::events::{ActionResult, EngineEvent};
use crate::core::session_state::SessionState;
use crate::progression::{total_level, Stats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generator and shop bookkeeping persisted as one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorData {
    /// RFC 3339 instant of the last collection. Kept as text so that a
    /// corrupted value loads and is repaired on the next collect.
    #[serde(default)]
    pub last_collected: Option<String>,
    #[serde(default)]
    pub potion_count: u32,
    #[serde(default)]
    pub ticket_bought_count: u32,
    #[serde(default)]
    pub ticket_inventory: u32,
    #[serde(default)]
    pub last_shop_month: Option<String>,
}

impl GeneratorData {
    pub fn last_collected_at(&self) -> Option<DateTime<Utc>> {
        self.last_collected
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|t| t.with_timezone(&Utc))
    }

    pub fn mark_collected(&mut self, now: DateTime<Utc>) {
        self.last_collected = Some(now.to_rfc3339());
    }
}

/// Snapshot of the generator for display.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IdleReport {
    pub total_level: u32,
    pub rate_per_hour: u64,
    pub elapsed_seconds: i64,
    pub pending: u64,
}

/// Gold per hour: one per three combined levels, rounded down.
pub fn rate_per_hour(stats: &Stats) -> u64 {
    (total_level(stats) / IDLE_LEVELS_PER_GOLD_HOUR) as u64
}

/// Seconds since the last collection, or None when it was never recorded or
/// cannot be parsed.
fn elapsed_seconds(gen: &GeneratorData, now: DateTime<Utc>) -> Option<i64> {
    gen.last_collected_at()
        .map(|last| (now - last).num_seconds())
}

fn accrued(elapsed_seconds: i64, rate_per_hour: u64) -> u64 {
    if elapsed_seconds <= 0 {
        return 0;
    }
    let gold = elapsed_seconds as u128 * rate_per_hour as u128 / SECONDS_PER_HOUR as u128;
    u64::try_from(gold).unwrap_or(u64::MAX)
}

/// Uncollected gold at `now`.
pub fn pending_gold(stats: &Stats, gen: &GeneratorData, now: DateTime<Utc>) -> u64 {
    elapsed_seconds(gen, now)
        .map(|elapsed| accrued(elapsed, rate_per_hour(stats)))
        .unwrap_or(0)
}

pub fn idle_report(stats: &Stats, gen: &GeneratorData, now: DateTime<Utc>) -> IdleReport {
    let rate = rate_per_hour(stats);
    let elapsed = elapsed_seconds(gen, now).unwrap_or(0).max(0);
    IdleReport {
        total_level: total_level(stats),
        rate_per_hour: rate,
        elapsed_seconds: elapsed,
        pending: accrued(elapsed, rate),
    }
}

/// Banks pending gold and restarts the accrual window at `now`. A missing or
/// unreadable timestamp is repaired without paying anything.
pub fn collect(state: &mut SessionState, now: DateTime<Utc>) -> ActionResult {
    let amount = pending_gold(&state.stats, &state.generator, now);
    state.gold = state.gold.saturating_add(amount);
    state.generator.mark_collected(now);

    let mut result = ActionResult::default();
    if amount > 0 {
        tracing::debug!(amount, gold = state.gold, "collected idle gold");
        result.push(EngineEvent::IdleCollected { amount });
        result.push(EngineEvent::GoldEarned { amount });
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::total_exp_for_level_start;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
    }

    /// Stats whose combined level is 3 + 3 + 3 = 9 -> 3 gold/hour.
    fn level_nine_stats() -> Stats {
        let exp = total_exp_for_level_start(3);
        Stats {
            study: exp,
            exercise: exp,
            work: exp,
        }
    }

    fn collected_at(at: DateTime<Utc>) -> GeneratorData {
        let mut gen = GeneratorData::default();
        gen.mark_collected(at);
        gen
    }

    #[test]
    fn test_rate_per_hour() {
        // three level-1 tracks
        assert_eq!(rate_per_hour(&Stats::default()), 1);
        assert_eq!(rate_per_hour(&level_nine_stats()), 3);
    }

    #[test]
    fn test_pending_after_one_hour() {
        let gen = collected_at(t0());
        let pending = pending_gold(&level_nine_stats(), &gen, t0() + Duration::hours(1));
        assert_eq!(pending, 3);
    }

    #[test]
    fn test_pending_rounds_down() {
        let gen = collected_at(t0());
        // 1199 s at 3/h is 0.999 gold
        let pending = pending_gold(&level_nine_stats(), &gen, t0() + Duration::seconds(1199));
        assert_eq!(pending, 0);
        let pending = pending_gold(&level_nine_stats(), &gen, t0() + Duration::seconds(1200));
        assert_eq!(pending, 1);
    }

    #[test]
    fn test_pending_non_decreasing() {
        let gen = collected_at(t0());
        let stats = level_nine_stats();
        let mut last = 0;
        for minutes in (0..600).step_by(7) {
            let pending = pending_gold(&stats, &gen, t0() + Duration::minutes(minutes));
            assert!(pending >= last);
            last = pending;
        }
    }

    #[test]
    fn test_clock_behind_last_collected_pays_nothing() {
        let gen = collected_at(t0());
        assert_eq!(
            pending_gold(&level_nine_stats(), &gen, t0() - Duration::hours(5)),
            0
        );
    }

    #[test]
    fn test_missing_timestamp_pays_nothing() {
        let gen = GeneratorData::default();
        assert_eq!(pending_gold(&level_nine_stats(), &gen, t0()), 0);
    }

    #[test]
    fn test_collect_repairs_garbage_timestamp() {
        let mut state = SessionState::default();
        state.stats = level_nine_stats();
        state.generator.last_collected = Some("not a date".to_string());

        let result = collect(&mut state, t0());
        assert!(result.events.is_empty());
        assert_eq!(state.gold, 0);
        assert_eq!(state.generator.last_collected_at(), Some(t0()));

        let result = collect(&mut state, t0() + Duration::hours(2));
        assert_eq!(state.gold, 6);
        assert_eq!(result.gold_earned(), 6);
    }

    #[test]
    fn test_back_to_back_collects_do_not_double_count() {
        let mut state = SessionState::default();
        state.stats = level_nine_stats();
        state.generator.mark_collected(t0());

        let now = t0() + Duration::hours(1);
        collect(&mut state, now);
        collect(&mut state, now);
        assert_eq!(state.gold, 3);
    }

    #[test]
    fn test_idle_report() {
        let gen = collected_at(t0());
        let report = idle_report(&level_nine_stats(), &gen, t0() + Duration::minutes(40));
        assert_eq!(report.total_level, 9);
        assert_eq!(report.rate_per_hour, 3);
        assert_eq!(report.elapsed_seconds, 2400);
        assert_eq!(report.pending, 2);
    }
}

//! Daily login streak and its 7-day bonus cycle.

use crate::core::constants::{
    STREAK_BIG_BONUS, STREAK_CYCLE_DAYS, STREAK_DAILY_BONUS, STREAK_MID_BONUS,
    STREAK_MID_CYCLE_DAY,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    #[serde(default)]
    pub last_login_date: Option<NaiveDate>,
    #[serde(default)]
    pub count: u32,
}

/// Bonus schedule derived from the current streak count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakInfo {
    pub current_streak: u32,
    pub bonus_exp: u64,
    pub days_to_next_big_bonus: u32,
    pub is_big_bonus: bool,
}

impl StreakState {
    /// Records a visit on `today`. Returns true when the stored state changed
    /// and needs persisting; a second visit on the same day is a no-op.
    pub fn advance(&mut self, today: NaiveDate) -> bool {
        if self.last_login_date == Some(today) {
            return false;
        }

        let consecutive = self
            .last_login_date
            .map(|last| (today - last).num_days() == 1)
            .unwrap_or(false);

        self.count = if consecutive {
            self.count.saturating_add(1)
        } else {
            1
        };
        self.last_login_date = Some(today);
        true
    }

    pub fn info(&self) -> StreakInfo {
        streak_info(self.count)
    }
}

pub fn streak_info(count: u32) -> StreakInfo {
    if count == 0 {
        return StreakInfo {
            current_streak: 0,
            bonus_exp: 0,
            days_to_next_big_bonus: STREAK_CYCLE_DAYS,
            is_big_bonus: false,
        };
    }

    let cycle_day = count % STREAK_CYCLE_DAYS;

    let (bonus_exp, is_big_bonus) = if cycle_day == 0 {
        (STREAK_BIG_BONUS, true)
    } else if cycle_day == STREAK_MID_CYCLE_DAY {
        (STREAK_MID_BONUS, false)
    } else {
        (STREAK_DAILY_BONUS, false)
    };

    let days_to_next_big_bonus = if cycle_day == 0 {
        STREAK_CYCLE_DAYS
    } else {
        STREAK_CYCLE_DAYS - cycle_day
    };

    StreakInfo {
        current_streak: count,
        bonus_exp,
        days_to_next_big_bonus,
        is_big_bonus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_visit_starts_at_one() {
        let mut streak = StreakState::default();
        assert!(streak.advance(date(2026, 10, 18)));
        assert_eq!(streak.count, 1);
        assert_eq!(streak.last_login_date, Some(date(2026, 10, 18)));
    }

    #[test]
    fn test_same_day_is_idempotent() {
        let mut streak = StreakState::default();
        streak.advance(date(2026, 10, 18));
        assert!(!streak.advance(date(2026, 10, 18)));
        assert_eq!(streak.count, 1);
    }

    #[test]
    fn test_consecutive_days_increment() {
        let mut streak = StreakState::default();
        let start = date(2026, 10, 1);
        for offset in 0..10 {
            streak.advance(start + chrono::Duration::days(offset));
        }
        assert_eq!(streak.count, 10);
    }

    #[test]
    fn test_gap_resets_to_one() {
        let mut streak = StreakState {
            last_login_date: Some(date(2026, 10, 10)),
            count: 6,
        };
        streak.advance(date(2026, 10, 12));
        assert_eq!(streak.count, 1);
    }

    #[test]
    fn test_backwards_clock_resets_to_one() {
        let mut streak = StreakState {
            last_login_date: Some(date(2026, 10, 10)),
            count: 4,
        };
        streak.advance(date(2026, 10, 9));
        assert_eq!(streak.count, 1);
    }

    #[test]
    fn test_month_boundary_counts_as_consecutive() {
        let mut streak = StreakState {
            last_login_date: Some(date(2026, 9, 30)),
            count: 2,
        };
        streak.advance(date(2026, 10, 1));
        assert_eq!(streak.count, 3);
    }

    #[test]
    fn test_bonus_schedule() {
        let day3 = streak_info(3);
        assert_eq!(day3.bonus_exp, 30);
        assert!(!day3.is_big_bonus);
        assert_eq!(day3.days_to_next_big_bonus, 4);

        let day7 = streak_info(7);
        assert_eq!(day7.bonus_exp, 100);
        assert!(day7.is_big_bonus);
        assert_eq!(day7.days_to_next_big_bonus, 7);

        let day10 = streak_info(10);
        assert_eq!(day10.bonus_exp, 30);

        for count in [1, 2, 4, 5, 6, 8, 9, 11] {
            let info = streak_info(count);
            assert_eq!(info.bonus_exp, 10, "count {}", count);
            assert!(!info.is_big_bonus);
        }
    }

    #[test]
    fn test_no_streak_pays_nothing() {
        let info = StreakState::default().info();
        assert_eq!(info.bonus_exp, 0);
        assert!(!info.is_big_bonus);
    }

    #[test]
    fn test_days_to_big_bonus_counts_down() {
        let days: Vec<u32> = (1..=7)
            .map(|c| streak_info(c).days_to_next_big_bonus)
            .collect();
        assert_eq!(days, vec![6, 5, 4, 3, 2, 1, 7]);
    }
}

//! Clock source for "today", ISO week ids and shop months.
//!
//! The local calendar date governs overdue detection, the one-gacha-per-day
//! gate and streak continuity. The ISO week id governs pool rollover and the
//! `YYYY-MM` key governs shop price resets.

use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use std::cell::Cell;
use std::rc::Rc;

pub trait Clock {
    /// Current instant, used for idle accrual.
    fn now(&self) -> DateTime<Utc>;

    /// Current local calendar date.
    fn today(&self) -> NaiveDate;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock that only moves when told to. `today()` is the UTC date of `now()`.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    /// Clock pinned to midday UTC on the given date.
    pub fn at_date(date: NaiveDate) -> Self {
        let noon = date
            .and_hms_opt(12, 0, 0)
            .unwrap_or_default()
            .and_utc();
        Self::new(noon)
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance_seconds(&self, seconds: i64) {
        self.now
            .set(self.now.get() + chrono::Duration::seconds(seconds));
    }

    pub fn advance_days(&self, days: i64) {
        self.now.set(self.now.get() + chrono::Duration::days(days));
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn today(&self) -> NaiveDate {
        self.now.get().date_naive()
    }
}

/// Lets a test keep a handle on a clock it hands to a session.
impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// ISO week identifier, e.g. `2026-W42`.
pub fn week_id(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

/// Shop month key, e.g. `2026-10`.
pub fn month_key(date: NaiveDate) -> String {
    format!("{}-{:02}", date.year(), date.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_id_uses_iso_year() {
        // 2021-01-03 is a Sunday belonging to ISO week 53 of 2020
        assert_eq!(week_id(date(2021, 1, 3)), "2020-W53");
        assert_eq!(week_id(date(2021, 1, 4)), "2021-W01");
    }

    #[test]
    fn test_week_id_same_for_whole_week() {
        let monday = date(2026, 10, 12);
        for offset in 0..7 {
            let d = monday + chrono::Duration::days(offset);
            assert_eq!(week_id(d), "2026-W42");
        }
        assert_eq!(week_id(date(2026, 10, 19)), "2026-W43");
    }

    #[test]
    fn test_month_key_zero_padded() {
        assert_eq!(month_key(date(2026, 3, 9)), "2026-03");
        assert_eq!(month_key(date(2026, 12, 31)), "2026-12");
    }

    #[test]
    fn test_fixed_clock_advances() {
        let clock = FixedClock::at_date(date(2026, 10, 18));
        assert_eq!(clock.today(), date(2026, 10, 18));

        clock.advance_days(1);
        assert_eq!(clock.today(), date(2026, 10, 19));

        let before = clock.now();
        clock.advance_seconds(90);
        assert_eq!((clock.now() - before).num_seconds(), 90);
    }
}

//! Read-only views over history: activity heatmap and stat radar.

use crate::core::constants::MAX_HEATMAP_WEEKS;
use crate::progression::{Stats, Track, NUM_TRACKS};
use crate::tasks::{Task, TaskStatus};
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub count: u32,
}

/// One cell per day over the last `weeks * 7` days ending today, oldest
/// first. Counts completed tasks; rest tasks and skips are excluded.
/// `weeks` is capped at [`MAX_HEATMAP_WEEKS`] and the window never reaches
/// before the earliest representable date.
pub fn activity_heatmap(tasks: &[Task], today: NaiveDate, weeks: u32) -> Vec<HeatmapCell> {
    let days = i64::from(weeks.min(MAX_HEATMAP_WEEKS)) * 7;
    if days == 0 {
        return Vec::new();
    }
    let start = today
        .checked_sub_signed(Duration::days(days - 1))
        .unwrap_or(NaiveDate::MIN);
    let days = (today - start).num_days() + 1;

    let mut counts: HashMap<NaiveDate, u32> = HashMap::new();
    for task in tasks.iter().filter(|t| counts_as_activity(t)) {
        if task.date >= start && task.date <= today {
            *counts.entry(task.date).or_insert(0) += 1;
        }
    }

    (0..days)
        .map(|offset| {
            let date = start + Duration::days(offset);
            HeatmapCell {
                date,
                count: counts.get(&date).copied().unwrap_or(0),
            }
        })
        .collect()
}

fn counts_as_activity(task: &Task) -> bool {
    !task.is_sabori
        && matches!(
            task.status,
            TaskStatus::Completed | TaskStatus::CompletedOverdue
        )
}

/// Each track's EXP relative to the strongest one, in `[0, 1]`.
pub fn stat_radar(stats: &Stats) -> [(Track, f64); NUM_TRACKS] {
    let max = stats.max_value().max(1) as f64;
    Track::ALL.map(|track| (track, stats.get(track) as f64 / max))
}

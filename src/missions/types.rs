use crate::progression::Track;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type MissionId = Uuid;

/// A candidate mission in the weekly pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolMission {
    pub id: MissionId,
    pub title: String,
    pub track: Track,
    pub reward: u64,
    #[serde(default)]
    pub is_sabori: bool,
    #[serde(default)]
    pub is_used: bool,
}

impl PoolMission {
    pub fn new(title: impl Into<String>, track: Track, reward: u64, is_sabori: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            track,
            reward,
            is_sabori,
            is_used: false,
        }
    }
}

/// The week's missions. Replaced wholesale at each ISO-week boundary; within
/// a week `is_used` only ever flips from false to true.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionPool {
    /// ISO week the pool was generated for, e.g. `2026-W42`.
    #[serde(default)]
    pub week_id: Option<String>,
    #[serde(default)]
    pub missions: Vec<PoolMission>,
}

impl MissionPool {
    pub fn new(week_id: impl Into<String>, missions: Vec<PoolMission>) -> Self {
        Self {
            week_id: Some(week_id.into()),
            missions,
        }
    }

    /// True when the pool belongs to a different week than `current_week`.
    pub fn needs_rollover(&self, current_week: &str) -> bool {
        self.week_id.as_deref() != Some(current_week)
    }

    /// Replaces the whole pool. Incoming used flags are cleared.
    pub fn replace(&mut self, week_id: impl Into<String>, missions: Vec<PoolMission>) {
        self.week_id = Some(week_id.into());
        self.missions = missions
            .into_iter()
            .map(|m| PoolMission {
                is_used: false,
                ..m
            })
            .collect();
    }

    pub fn get(&self, id: MissionId) -> Option<&PoolMission> {
        self.missions.iter().find(|m| m.id == id)
    }

    pub fn unused(&self) -> impl Iterator<Item = &PoolMission> {
        self.missions.iter().filter(|m| !m.is_used)
    }

    pub fn unused_count(&self) -> usize {
        self.unused().count()
    }

    pub fn has_unused(&self) -> bool {
        self.unused().next().is_some()
    }

    /// Uniform pick among unused missions. Does not mark anything.
    pub fn pick_unused<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&PoolMission> {
        let unused: Vec<&PoolMission> = self.unused().collect();
        unused.choose(rng).copied()
    }

    /// Flags a mission used. Returns false if it was unknown or already used.
    pub fn mark_used(&mut self, id: MissionId) -> bool {
        match self.missions.iter_mut().find(|m| m.id == id) {
            Some(mission) if !mission.is_used => {
                mission.is_used = true;
                true
            }
            _ => false,
        }
    }

    /// Burns one random unused mission without spawning a task.
    pub fn burn_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<MissionId> {
        let id = self.pick_unused(rng)?.id;
        self.mark_used(id);
        Some(id)
    }
}

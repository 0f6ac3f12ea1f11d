use crate::boss::Boss;
use crate::idle::GeneratorData;
use crate::missions::MissionPool;
use crate::progression::{Stats, StreakState};
use crate::tasks::Task;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Free-text context handed to the content generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub hobbies: String,
    #[serde(default)]
    pub recent_activities: String,
    #[serde(default)]
    pub weekly_goal: Option<String>,
}

/// Small bookkeeping values that do not belong to any one subsystem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMeta {
    #[serde(default)]
    pub streak: StreakState,
    /// Day on which the daily gacha was last accepted.
    #[serde(default)]
    pub last_gacha_date: Option<NaiveDate>,
}

/// Everything the engine knows about one user. Owned by a single
/// `GameSession`; every operation reads and writes through it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub gold: u64,
    #[serde(default)]
    pub generator: GeneratorData,
    #[serde(default)]
    pub bosses: Vec<Boss>,
    #[serde(default)]
    pub pool: MissionPool,
    #[serde(default)]
    pub profile: UserProfile,
    #[serde(default)]
    pub meta: SessionMeta,
}

impl SessionState {
    pub fn active_boss(&self) -> Option<&Boss> {
        self.bosses.iter().find(|b| b.is_active())
    }

    pub fn tasks_on(&self, date: NaiveDate) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| t.date == date)
    }

    pub fn defeated_bosses(&self) -> impl Iterator<Item = &Boss> {
        self.bosses.iter().filter(|b| !b.is_active())
    }
}

//! Events produced by engine operations.
//!
//! Operations mutate `SessionState` and report what happened as a list of
//! [`EngineEvent`]s so the presentation layer can show level-up modals,
//! boss banners and toasts without the engine depending on any UI types.

use crate::boss::BossId;
use crate::missions::MissionId;
use crate::progression::Track;
use crate::shop::ShopItem;
use crate::tasks::TaskId;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    // ── Progression ─────────────────────────────────────────────
    /// A track crossed one or more level boundaries.
    LevelUp { track: Track, level: u32 },

    /// EXP granted to a track by a task completion.
    ExpGained { track: Track, amount: u64 },

    /// EXP removed from a track (rest penalty, emergency skip, undo).
    ExpLost { track: Track, amount: u64 },

    /// Gold added to the balance.
    GoldEarned { amount: u64 },

    // ── Tasks ───────────────────────────────────────────────────
    TaskCompleted {
        task_id: TaskId,
        reward: u64,
        overdue: bool,
    },

    /// A rest task was taken; the penalty hit the strongest track.
    RestTaken {
        task_id: TaskId,
        track: Track,
        penalty: u64,
    },

    TaskReopened { task_id: TaskId },

    TaskDeleted { task_id: TaskId },

    // ── Mission pool ────────────────────────────────────────────
    /// A mission was burned because a task landed on an empty day.
    MissionBurned { mission_id: MissionId },

    /// The daily gacha mission was accepted.
    MissionAccepted {
        mission_id: MissionId,
        task_id: TaskId,
    },

    /// Login streak bonus applied with the accepted gacha mission.
    StreakBonus { track: Track, amount: u64 },

    PoolReplaced { week_id: String, missions: usize },

    // ── Boss ────────────────────────────────────────────────────
    BossDamaged {
        boss_id: BossId,
        damage: u64,
        hp_left: u64,
    },

    BossDefeated {
        boss_id: BossId,
        name: String,
        reward_gold: u64,
        exp_per_track: u64,
    },

    // ── Economy ─────────────────────────────────────────────────
    IdleCollected { amount: u64 },

    ShopMonthReset { month: String },

    ItemPurchased { item: ShopItem, cost: u64 },

    SkipTicketUsed { remaining: u32 },

    TasksSkipped {
        count: usize,
        penalty_total: u64,
        waived: bool,
    },
}

/// Outcome of a handler: the events it produced, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionResult {
    pub events: Vec<EngineEvent>,
}

impl ActionResult {
    pub fn push(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = EngineEvent>) {
        self.events.extend(events);
    }

    /// Level-up events, in the order they fired.
    pub fn level_ups(&self) -> impl Iterator<Item = (Track, u32)> + '_ {
        self.events.iter().filter_map(|e| match e {
            EngineEvent::LevelUp { track, level } => Some((*track, *level)),
            _ => None,
        })
    }

    pub fn leveled_up(&self) -> bool {
        self.level_ups().next().is_some()
    }

    /// Total gold earned across all `GoldEarned` events.
    pub fn gold_earned(&self) -> u64 {
        self.events
            .iter()
            .map(|e| match e {
                EngineEvent::GoldEarned { amount } => *amount,
                _ => 0,
            })
            .sum()
    }

    pub fn boss_defeated(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, EngineEvent::BossDefeated { .. }))
    }
}

/// Result of a handler that needs interactive confirmation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Applied(ActionResult),
    /// The user declined; nothing changed.
    Cancelled,
}

impl Outcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    pub fn events(&self) -> &[EngineEvent] {
        match self {
            Outcome::Applied(result) => &result.events,
            Outcome::Cancelled => &[],
        }
    }
}

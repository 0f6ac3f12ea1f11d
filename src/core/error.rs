//! Engine errors surfaced to the caller.
//!
//! Every variant is a user-facing rejection: the operation that returned it
//! left the session state untouched.

use crate::boss::BossId;
use crate::missions::MissionId;
use crate::tasks::TaskId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    #[error("task {0} is not done")]
    TaskNotDone(TaskId),

    #[error("task {0} is already done")]
    TaskAlreadyDone(TaskId),

    #[error("rest tasks cannot be undone; correct stats manually instead")]
    SaboriUndo,

    #[error("task title must not be empty")]
    EmptyTitle,

    #[error("reward {reward} is too large (max {max})", max = i64::MAX)]
    RewardTooLarge { reward: u64 },

    #[error("level {level} with {exp} EXP is beyond the level curve")]
    LevelOutOfRange { level: u32, exp: u64 },

    #[error("today's gacha has already been used")]
    GachaAlreadyUsed,

    #[error("no unused missions left in this week's pool")]
    PoolExhausted,

    #[error("mission {0} not found in the current pool")]
    MissionNotFound(MissionId),

    #[error("mission {0} has already been used")]
    MissionAlreadyUsed(MissionId),

    #[error("weekly setup needs at least one goal")]
    NoGoals,

    #[error("not enough gold: need {cost}, have {gold}")]
    InsufficientGold { cost: u64, gold: u64 },

    #[error("no skip tickets in inventory")]
    NoSkipTicket,

    #[error("a boss is already active; defeat or abandon it first")]
    BossAlreadyActive,

    #[error("boss {0} not found")]
    BossNotFound(BossId),
}

pub type EngineResult<T> = Result<T, EngineError>;

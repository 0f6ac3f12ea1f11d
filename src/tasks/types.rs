use crate::progression::Track;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type TaskId = Uuid;

/// Lifecycle of a task. Replaces the old habit of encoding outcomes in the
/// sign of the reward value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    /// Done on or before its date.
    Completed,
    /// Done after its date; the reward was decayed.
    CompletedOverdue,
    /// A rest task that was taken; a penalty hit the strongest track.
    Rested,
    /// Abandoned by emergency skip; the reward was charged as a penalty.
    Skipped,
    /// Abandoned by emergency skip with a ticket; no stat change.
    SkippedWaived,
}

impl TaskStatus {
    pub fn is_done(&self) -> bool {
        !matches!(self, TaskStatus::Pending)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
            TaskStatus::CompletedOverdue => "completed late",
            TaskStatus::Rested => "rested",
            TaskStatus::Skipped => "skipped",
            TaskStatus::SkippedWaived => "voided",
        }
    }
}

/// Stat delta a task applied when it left `Pending`. The delta is nominal:
/// it is what was requested before the 0 floor clamped it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub track: Track,
    pub delta: i64,
}

impl LedgerEntry {
    pub fn gain(track: Track, amount: u64) -> Self {
        Self {
            track,
            delta: signed(amount),
        }
    }

    pub fn loss(track: Track, amount: u64) -> Self {
        Self {
            track,
            delta: -signed(amount),
        }
    }
}

/// `amount` as a ledger delta, pinned at `i64::MAX`.
pub fn signed(amount: u64) -> i64 {
    i64::try_from(amount).unwrap_or(i64::MAX)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub track: Track,
    pub date: NaiveDate,
    /// Non-negative reward. Completion overwrites it with the granted amount
    /// (decayed when overdue, the penalty for rest tasks).
    pub reward: u64,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger: Option<LedgerEntry>,
    #[serde(default)]
    pub is_sabori: bool,
}

impl Task {
    pub fn new(title: impl Into<String>, track: Track, date: NaiveDate, reward: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            track,
            date,
            reward,
            status: TaskStatus::Pending,
            ledger: None,
            is_sabori: false,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status.is_done()
    }

    /// Signed delta shown in history: positive for rewards, negative for
    /// penalties, zero for voided tasks.
    pub fn display_delta(&self) -> i64 {
        self.ledger.map(|l| l.delta).unwrap_or(0)
    }
}

/// Fields a user can change on an existing task. `None` keeps the old value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub track: Option<Track>,
    pub reward: Option<u64>,
    pub date: Option<NaiveDate>,
}

/// Input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub track: Track,
    pub date: NaiveDate,
    pub reward: u64,
    pub is_sabori: bool,
}

impl NewTask {
    pub fn new(title: impl Into<String>, track: Track, date: NaiveDate, reward: u64) -> Self {
        Self {
            title: title.into(),
            track,
            date,
            reward,
            is_sabori: false,
        }
    }

    pub fn rest(mut self) -> Self {
        self.is_sabori = true;
        self
    }
}

//! Task state transitions and the stat accounting behind them.
//!
//! `pending ⇄ done`; rest (sabori) tasks cannot go back to pending.

use super::types::{signed, LedgerEntry, NewTask, Task, TaskEdit, TaskId, TaskStatus};
use crate::boss::logic::apply_task_damage;
use crate::core::constants::{
    GOLD_PER_REWARD_DEN, GOLD_PER_REWARD_NUM, MAX_TASK_REWARD, OVERDUE_REWARD_DEN,
    OVERDUE_REWARD_NUM, SABORI_PENALTY_MAX, SABORI_PENALTY_MIN,
};
use crate::core::error::{EngineError, EngineResult};
use crate::core::events::{ActionResult, EngineEvent};
use crate::core::session_state::SessionState;
use crate::progression::{grant_exp, level_for_exp, Track};
use chrono::NaiveDate;
use rand::Rng;

/// Reward granted for completing a task dated `task_date` on `today`.
pub fn granted_reward(base_reward: u64, task_date: NaiveDate, today: NaiveDate) -> u64 {
    if task_date < today {
        base_reward.saturating_mul(OVERDUE_REWARD_NUM) / OVERDUE_REWARD_DEN
    } else {
        base_reward
    }
}

/// Gold income for a granted reward.
pub fn gold_for_reward(reward: u64) -> u64 {
    reward.saturating_mul(GOLD_PER_REWARD_NUM) / GOLD_PER_REWARD_DEN
}

pub fn roll_sabori_penalty<R: Rng + ?Sized>(rng: &mut R) -> u64 {
    rng.gen_range(SABORI_PENALTY_MIN..=SABORI_PENALTY_MAX)
}

fn task_index(state: &SessionState, id: TaskId) -> EngineResult<usize> {
    state
        .tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or(EngineError::TaskNotFound(id))
}

fn check_reward(reward: u64) -> EngineResult<()> {
    if reward > MAX_TASK_REWARD {
        return Err(EngineError::RewardTooLarge { reward });
    }
    Ok(())
}

fn check_new_task(new: &NewTask) -> EngineResult<()> {
    if new.title.trim().is_empty() {
        return Err(EngineError::EmptyTitle);
    }
    check_reward(new.reward)
}

/// Appends a task without touching the mission pool.
pub fn insert_task(state: &mut SessionState, new: NewTask) -> EngineResult<TaskId> {
    check_new_task(&new)?;
    let title = new.title.trim();
    let mut task = Task::new(title, new.track, new.date, new.reward);
    task.is_sabori = new.is_sabori;
    let id = task.id;
    state.tasks.push(task);
    Ok(id)
}

/// Adds a manually entered task. The first task placed on an empty day burns
/// one random unused mission from the weekly pool.
pub fn add_task<R: Rng + ?Sized>(
    state: &mut SessionState,
    new: NewTask,
    rng: &mut R,
) -> EngineResult<(TaskId, ActionResult)> {
    check_new_task(&new)?;

    let mut result = ActionResult::default();
    let day_is_empty = !state.tasks.iter().any(|t| t.date == new.date);
    if day_is_empty {
        if let Some(mission_id) = state.pool.burn_random(rng) {
            tracing::debug!(%mission_id, date = %new.date, "burned mission for empty day");
            result.push(EngineEvent::MissionBurned { mission_id });
        }
    }

    let id = insert_task(state, new)?;
    Ok((id, result))
}

/// Marks a pending task done and applies its reward or rest penalty.
pub fn complete_task<R: Rng + ?Sized>(
    state: &mut SessionState,
    id: TaskId,
    today: NaiveDate,
    rng: &mut R,
) -> EngineResult<ActionResult> {
    let index = task_index(state, id)?;
    if state.tasks[index].is_done() {
        return Err(EngineError::TaskAlreadyDone(id));
    }

    if state.tasks[index].is_sabori {
        Ok(take_rest(state, index, rng))
    } else {
        Ok(complete_productive(state, index, today))
    }
}

fn take_rest<R: Rng + ?Sized>(state: &mut SessionState, index: usize, rng: &mut R) -> ActionResult {
    let penalty = roll_sabori_penalty(rng);
    let target = state.stats.strongest_track();
    let removed = state.stats.sub_clamped(target, penalty);

    let task = &mut state.tasks[index];
    task.reward = penalty;
    task.track = target;
    task.status = TaskStatus::Rested;
    task.ledger = Some(LedgerEntry::loss(target, penalty));

    let mut result = ActionResult::default();
    result.push(EngineEvent::RestTaken {
        task_id: task.id,
        track: target,
        penalty,
    });
    if removed > 0 {
        result.push(EngineEvent::ExpLost {
            track: target,
            amount: removed,
        });
    }
    result
}

fn complete_productive(state: &mut SessionState, index: usize, today: NaiveDate) -> ActionResult {
    let mut result = ActionResult::default();

    let (task_id, track, reward, overdue) = {
        let task = &mut state.tasks[index];
        let reward = granted_reward(task.reward, task.date, today);
        let overdue = task.date < today;
        task.reward = reward;
        task.status = if overdue {
            TaskStatus::CompletedOverdue
        } else {
            TaskStatus::Completed
        };
        task.ledger = Some(LedgerEntry::gain(task.track, reward));
        (task.id, task.track, reward, overdue)
    };

    result.push(EngineEvent::TaskCompleted {
        task_id,
        reward,
        overdue,
    });

    if reward > 0 {
        result.push(EngineEvent::ExpGained {
            track,
            amount: reward,
        });
    }
    if let Some(level) = grant_exp(&mut state.stats, track, reward) {
        result.push(EngineEvent::LevelUp { track, level });
    }

    let gold = gold_for_reward(reward);
    state.gold = state.gold.saturating_add(gold);
    if gold > 0 {
        result.push(EngineEvent::GoldEarned { amount: gold });
    }

    result.extend(apply_task_damage(state, reward));
    result
}

/// Reverses a task's ledger entry against the stats, clamping at 0.
fn reverse_ledger(state: &mut SessionState, ledger: LedgerEntry) -> Option<EngineEvent> {
    if ledger.delta > 0 {
        let removed = state
            .stats
            .sub_clamped(ledger.track, ledger.delta.unsigned_abs());
        (removed > 0).then_some(EngineEvent::ExpLost {
            track: ledger.track,
            amount: removed,
        })
    } else if ledger.delta < 0 {
        let amount = ledger.delta.unsigned_abs();
        state.stats.add(ledger.track, amount);
        Some(EngineEvent::ExpGained {
            track: ledger.track,
            amount,
        })
    } else {
        None
    }
}

/// Returns a done task to pending and takes back its stat delta. Gold and
/// boss damage are not refunded.
pub fn undo_task(state: &mut SessionState, id: TaskId) -> EngineResult<ActionResult> {
    let index = task_index(state, id)?;
    let task = &state.tasks[index];
    if !task.is_done() {
        return Err(EngineError::TaskNotDone(id));
    }
    if task.is_sabori {
        return Err(EngineError::SaboriUndo);
    }

    let mut result = ActionResult::default();
    if let Some(ledger) = task.ledger {
        result.extend(reverse_ledger(state, ledger));
    }

    let task = &mut state.tasks[index];
    task.status = TaskStatus::Pending;
    task.ledger = None;
    result.push(EngineEvent::TaskReopened { task_id: id });
    Ok(result)
}

/// Removes a task. A done productive task first has its stat delta reversed.
pub fn delete_task(state: &mut SessionState, id: TaskId) -> EngineResult<ActionResult> {
    let index = task_index(state, id)?;
    let mut result = ActionResult::default();

    let task = &state.tasks[index];
    if task.is_done() && !task.is_sabori {
        if let Some(ledger) = task.ledger {
            result.extend(reverse_ledger(state, ledger));
        }
    }

    state.tasks.remove(index);
    result.push(EngineEvent::TaskDeleted { task_id: id });
    Ok(result)
}

/// Delta a done task should carry for its status and reward.
fn delta_for_status(status: TaskStatus, reward: u64) -> i64 {
    match status {
        TaskStatus::Completed | TaskStatus::CompletedOverdue => signed(reward),
        TaskStatus::Skipped => -signed(reward),
        TaskStatus::Pending | TaskStatus::Rested | TaskStatus::SkippedWaived => 0,
    }
}

/// Applies user edits. On a done productive task the old `(track, delta)` is
/// reversed and the new one applied.
pub fn edit_task(state: &mut SessionState, id: TaskId, edit: TaskEdit) -> EngineResult<ActionResult> {
    let index = task_index(state, id)?;
    if let Some(title) = &edit.title {
        if title.trim().is_empty() {
            return Err(EngineError::EmptyTitle);
        }
    }
    if let Some(reward) = edit.reward {
        check_reward(reward)?;
    }

    let task = &mut state.tasks[index];
    let old_ledger = task.ledger;
    let rebalance = task.is_done() && !task.is_sabori;

    if let Some(title) = edit.title {
        task.title = title.trim().to_string();
    }
    if let Some(track) = edit.track {
        task.track = track;
    }
    if let Some(reward) = edit.reward {
        task.reward = reward;
    }
    if let Some(date) = edit.date {
        task.date = date;
    }

    let mut result = ActionResult::default();
    if !rebalance {
        return Ok(result);
    }

    let new_ledger = LedgerEntry {
        track: task.track,
        delta: delta_for_status(task.status, task.reward),
    };
    task.ledger = Some(new_ledger);
    if old_ledger == Some(new_ledger) {
        return Ok(result);
    }

    let levels_before = Track::ALL.map(|t| level_for_exp(state.stats.get(t)));
    if let Some(ledger) = old_ledger {
        result.extend(reverse_ledger(state, ledger));
    }
    result.extend(apply_ledger(state, new_ledger));

    // Only a level above the pre-edit one counts as a level-up
    for (track, before) in Track::ALL.into_iter().zip(levels_before) {
        let after = level_for_exp(state.stats.get(track));
        if after > before {
            result.push(EngineEvent::LevelUp {
                track,
                level: after,
            });
        }
    }

    Ok(result)
}

/// Applies a ledger entry to the stats, clamping at 0.
fn apply_ledger(state: &mut SessionState, ledger: LedgerEntry) -> Option<EngineEvent> {
    let amount = ledger.delta.unsigned_abs();
    if ledger.delta > 0 {
        state.stats.add(ledger.track, amount);
        Some(EngineEvent::ExpGained {
            track: ledger.track,
            amount,
        })
    } else if ledger.delta < 0 {
        let removed = state.stats.sub_clamped(ledger.track, amount);
        (removed > 0).then_some(EngineEvent::ExpLost {
            track: ledger.track,
            amount: removed,
        })
    } else {
        None
    }
}

pub fn pending_tasks_on(state: &SessionState, date: NaiveDate) -> impl Iterator<Item = &Task> {
    state
        .tasks
        .iter()
        .filter(move |t| t.date == date && !t.is_done())
}

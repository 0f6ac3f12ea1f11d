//! End-of-day emergency skip.

use crate::core::error::{EngineError, EngineResult};
use crate::core::events::{ActionResult, EngineEvent};
use crate::core::session_state::SessionState;
use crate::tasks::{LedgerEntry, TaskId, TaskStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkipMode {
    /// Spend one ticket; no stat change.
    Ticket,
    /// Each skipped task's reward is taken from its track.
    Penalty,
}

/// Tasks an emergency skip on `today` would touch.
pub fn skip_targets(state: &SessionState, today: NaiveDate) -> Vec<TaskId> {
    state
        .tasks
        .iter()
        .filter(|t| t.date == today && !t.is_done())
        .map(|t| t.id)
        .collect()
}

/// Closes every pending task dated `today`. With no targets nothing is
/// consumed and the result is empty.
pub fn emergency_skip(
    state: &mut SessionState,
    today: NaiveDate,
    mode: SkipMode,
) -> EngineResult<ActionResult> {
    let targets = skip_targets(state, today);
    let mut result = ActionResult::default();
    if targets.is_empty() {
        return Ok(result);
    }

    match mode {
        SkipMode::Ticket => {
            if state.generator.ticket_inventory == 0 {
                return Err(EngineError::NoSkipTicket);
            }
            state.generator.ticket_inventory -= 1;
            result.push(EngineEvent::SkipTicketUsed {
                remaining: state.generator.ticket_inventory,
            });

            for task in state.tasks.iter_mut().filter(|t| targets.contains(&t.id)) {
                task.status = TaskStatus::SkippedWaived;
                task.ledger = Some(LedgerEntry {
                    track: task.track,
                    delta: 0,
                });
            }

            result.push(EngineEvent::TasksSkipped {
                count: targets.len(),
                penalty_total: 0,
                waived: true,
            });
        }
        SkipMode::Penalty => {
            let mut penalty_total: u64 = 0;
            for task in state.tasks.iter_mut().filter(|t| targets.contains(&t.id)) {
                let removed = state.stats.sub_clamped(task.track, task.reward);
                penalty_total = penalty_total.saturating_add(task.reward);
                task.status = TaskStatus::Skipped;
                task.ledger = Some(LedgerEntry::loss(task.track, task.reward));
                if removed > 0 {
                    result.push(EngineEvent::ExpLost {
                        track: task.track,
                        amount: removed,
                    });
                }
            }

            result.push(EngineEvent::TasksSkipped {
                count: targets.len(),
                penalty_total,
                waived: false,
            });
        }
    }

    tracing::info!(?mode, count = targets.len(), "emergency skip");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::Track;
    use crate::tasks::Task;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn state_with_today_tasks() -> SessionState {
        let mut state = SessionState::default();
        state.stats.study = 100;
        state.stats.work = 15;
        state.tasks.push(Task::new("Essay", Track::Study, today(), 40));
        state.tasks.push(Task::new("Report", Track::Work, today(), 30));
        state
            .tasks
            .push(Task::new("Tomorrow", Track::Work, today().succ_opt().unwrap(), 30));
        state
    }

    #[test]
    fn test_ticket_skip_waives_everything() {
        let mut state = state_with_today_tasks();
        state.generator.ticket_inventory = 2;
        let before = state.stats;

        let result = emergency_skip(&mut state, today(), SkipMode::Ticket).unwrap();

        assert_eq!(state.generator.ticket_inventory, 1);
        assert_eq!(state.stats, before);
        assert_eq!(state.tasks[0].status, TaskStatus::SkippedWaived);
        assert_eq!(state.tasks[1].status, TaskStatus::SkippedWaived);
        assert_eq!(state.tasks[0].display_delta(), 0);
        assert_eq!(state.tasks[2].status, TaskStatus::Pending);
        assert!(result.events.contains(&EngineEvent::TasksSkipped {
            count: 2,
            penalty_total: 0,
            waived: true
        }));
    }

    #[test]
    fn test_ticket_skip_without_ticket_rejected() {
        let mut state = state_with_today_tasks();
        let snapshot = state.clone();
        assert_eq!(
            emergency_skip(&mut state, today(), SkipMode::Ticket),
            Err(EngineError::NoSkipTicket)
        );
        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_penalty_skip_charges_rewards_with_floor() {
        let mut state = state_with_today_tasks();
        let result = emergency_skip(&mut state, today(), SkipMode::Penalty).unwrap();

        assert_eq!(state.stats.study, 60);
        assert_eq!(state.stats.work, 0);
        assert_eq!(state.tasks[0].status, TaskStatus::Skipped);
        assert_eq!(state.tasks[1].display_delta(), -30);
        assert!(result.events.contains(&EngineEvent::TasksSkipped {
            count: 2,
            penalty_total: 70,
            waived: false
        }));
    }

    #[test]
    fn test_no_targets_consumes_nothing() {
        let mut state = SessionState::default();
        state.generator.ticket_inventory = 1;
        let result = emergency_skip(&mut state, today(), SkipMode::Ticket).unwrap();
        assert!(result.events.is_empty());
        assert_eq!(state.generator.ticket_inventory, 1);
    }

    #[test]
    fn test_done_tasks_are_not_targets() {
        let mut state = state_with_today_tasks();
        state.tasks[0].status = TaskStatus::Completed;
        assert_eq!(skip_targets(&state, today()), vec![state.tasks[1].id]);
    }
}

//! Boss creation, damage from completed tasks and the defeat payout.

use super::types::{Boss, BossId};
use crate::content::BossAnalysis;
use crate::core::constants::BOSS_EXP_SPLIT;
use crate::core::error::{EngineError, EngineResult};
use crate::core::events::{ActionResult, EngineEvent};
use crate::core::session_state::SessionState;
use crate::progression::{grant_exp, Track};
use chrono::NaiveDate;

pub fn active_boss(state: &SessionState) -> Option<&Boss> {
    state.bosses.iter().find(|b| b.is_active())
}

/// Whole days until the deadline, never less than one.
pub fn days_remaining(deadline: NaiveDate, today: NaiveDate) -> u32 {
    (deadline - today).num_days().clamp(1, u32::MAX as i64) as u32
}

pub fn ensure_no_active_boss(state: &SessionState) -> EngineResult<()> {
    match active_boss(state) {
        Some(_) => Err(EngineError::BossAlreadyActive),
        None => Ok(()),
    }
}

/// Spawns a boss for a long-term goal from the generator's sizing.
pub fn create_boss(
    state: &mut SessionState,
    name: &str,
    deadline: Option<NaiveDate>,
    analysis: BossAnalysis,
) -> EngineResult<BossId> {
    let name = name.trim();
    if name.is_empty() {
        return Err(EngineError::EmptyTitle);
    }
    ensure_no_active_boss(state)?;

    let boss = Boss::new(name, analysis.hp, analysis.archetype, deadline)
        .with_description(analysis.description);
    let id = boss.id;
    tracing::info!(%id, name, hp = boss.hp, archetype = %boss.archetype, "boss created");
    state.bosses.push(boss);
    Ok(id)
}

/// Removes a boss record outright. An abandoned boss never counts as
/// defeated.
pub fn abandon_boss(state: &mut SessionState, id: BossId) -> EngineResult<Boss> {
    let index = state
        .bosses
        .iter()
        .position(|b| b.id == id)
        .ok_or(EngineError::BossNotFound(id))?;
    Ok(state.bosses.remove(index))
}

/// Applies a completed task's granted reward as damage to the active boss
/// and pays out on the killing blow.
pub fn apply_task_damage(state: &mut SessionState, damage: u64) -> Vec<EngineEvent> {
    let mut events = Vec::new();

    let Some(boss) = state.bosses.iter_mut().find(|b| b.is_active()) else {
        return events;
    };

    let defeated = boss.take_damage(damage);
    events.push(EngineEvent::BossDamaged {
        boss_id: boss.id,
        damage,
        hp_left: boss.hp,
    });

    if defeated {
        let (boss_id, name, reward_gold, exp_reward) =
            (boss.id, boss.name.clone(), boss.reward_gold, boss.exp_reward);
        events.extend(pay_out_defeat(state, boss_id, name, reward_gold, exp_reward));
    }

    events
}

fn pay_out_defeat(
    state: &mut SessionState,
    boss_id: BossId,
    name: String,
    reward_gold: u64,
    exp_reward: u64,
) -> Vec<EngineEvent> {
    let mut result = ActionResult::default();
    let exp_per_track = exp_reward / BOSS_EXP_SPLIT;

    tracing::info!(%boss_id, name = %name, reward_gold, exp_per_track, "boss defeated");
    result.push(EngineEvent::BossDefeated {
        boss_id,
        name,
        reward_gold,
        exp_per_track,
    });

    state.gold = state.gold.saturating_add(reward_gold);
    if reward_gold > 0 {
        result.push(EngineEvent::GoldEarned {
            amount: reward_gold,
        });
    }

    if exp_per_track > 0 {
        for track in Track::ALL {
            result.push(EngineEvent::ExpGained {
                track,
                amount: exp_per_track,
            });
            if let Some(level) = grant_exp(&mut state.stats, track, exp_per_track) {
                result.push(EngineEvent::LevelUp { track, level });
            }
        }
    }

    result.events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boss::{BossArchetype, BossStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn analysis(hp: u64) -> BossAnalysis {
        BossAnalysis {
            archetype: BossArchetype::Golem,
            hp,
            description: "A wall of unfinished work".to_string(),
        }
    }

    fn state_with_boss(hp: u64) -> SessionState {
        let mut state = SessionState::default();
        create_boss(&mut state, "Ship the app", None, analysis(hp)).unwrap();
        state
    }

    #[test]
    fn test_days_remaining_floor_of_one() {
        assert_eq!(days_remaining(date(2026, 10, 28), date(2026, 10, 18)), 10);
        assert_eq!(days_remaining(date(2026, 10, 18), date(2026, 10, 18)), 1);
        assert_eq!(days_remaining(date(2026, 10, 1), date(2026, 10, 18)), 1);
    }

    #[test]
    fn test_only_one_active_boss() {
        let mut state = state_with_boss(500);
        assert_eq!(
            create_boss(&mut state, "Second goal", None, analysis(100)),
            Err(EngineError::BossAlreadyActive)
        );
        assert_eq!(state.bosses.len(), 1);
    }

    #[test]
    fn test_new_boss_allowed_after_defeat() {
        let mut state = state_with_boss(10);
        apply_task_damage(&mut state, 10);
        create_boss(&mut state, "Next goal", None, analysis(100)).unwrap();
        assert_eq!(state.bosses.len(), 2);
        assert_eq!(state.bosses.iter().filter(|b| b.is_active()).count(), 1);
    }

    #[test]
    fn test_damage_without_boss_is_noop() {
        let mut state = SessionState::default();
        assert!(apply_task_damage(&mut state, 50).is_empty());
    }

    #[test]
    fn test_killing_blow_pays_out() {
        // hp 40 from a boss sized for 1000
        let mut state = state_with_boss(1000);
        state.bosses[0].hp = 40;
        let reward_gold = state.bosses[0].reward_gold;
        let exp_reward = state.bosses[0].exp_reward;

        let events = apply_task_damage(&mut state, 50);

        let boss = &state.bosses[0];
        assert_eq!(boss.hp, 0);
        assert_eq!(boss.status, BossStatus::Defeated);
        assert_eq!(state.gold, reward_gold);
        let split = exp_reward / 3;
        assert_eq!(state.stats.study, split);
        assert_eq!(state.stats.exercise, split);
        assert_eq!(state.stats.work, split);
        assert!(events
            .iter()
            .any(|e| matches!(e, EngineEvent::BossDefeated { .. })));
    }

    #[test]
    fn test_payout_fires_once() {
        let mut state = state_with_boss(30);
        apply_task_damage(&mut state, 30);
        let gold = state.gold;
        let stats = state.stats;

        let events = apply_task_damage(&mut state, 30);
        assert!(events.is_empty());
        assert_eq!(state.gold, gold);
        assert_eq!(state.stats, stats);
    }

    #[test]
    fn test_partial_damage_reports_hp_left() {
        let mut state = state_with_boss(100);
        let events = apply_task_damage(&mut state, 35);
        assert_eq!(
            events,
            vec![EngineEvent::BossDamaged {
                boss_id: state.bosses[0].id,
                damage: 35,
                hp_left: 65
            }]
        );
    }

    #[test]
    fn test_payout_levels_up_tracks() {
        let mut state = state_with_boss(1500);
        state.bosses[0].hp = 1;
        // exp_reward 300 -> 100 per track, enough for level 2 everywhere
        let events = apply_task_damage(&mut state, 1);
        let level_ups = events
            .iter()
            .filter(|e| matches!(e, EngineEvent::LevelUp { level: 2, .. }))
            .count();
        assert_eq!(level_ups, 3);
    }

    #[test]
    fn test_abandon_deletes_record() {
        let mut state = state_with_boss(100);
        let id = state.bosses[0].id;
        let removed = abandon_boss(&mut state, id).unwrap();
        assert_eq!(removed.status, BossStatus::Active);
        assert!(state.bosses.is_empty());
        assert_eq!(abandon_boss(&mut state, id), Err(EngineError::BossNotFound(id)));
    }

    #[test]
    fn test_create_boss_rejects_blank_name() {
        let mut state = SessionState::default();
        assert_eq!(
            create_boss(&mut state, "  ", None, analysis(100)),
            Err(EngineError::EmptyTitle)
        );
    }
}

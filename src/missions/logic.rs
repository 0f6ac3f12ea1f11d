//! Weekly pool installation and the daily gacha.

use super::types::{MissionId, PoolMission};
use crate::core::constants::{WEEKLY_MAX_SABORI, WEEKLY_MISSION_COUNT};
use crate::core::error::{EngineError, EngineResult};
use crate::core::events::{ActionResult, EngineEvent};
use crate::core::session_state::SessionState;
use crate::progression::grant_exp;
use crate::tasks::{insert_task, NewTask, TaskId};
use chrono::NaiveDate;
use rand::Rng;

/// Splits the weekly goal text into one goal per non-blank line.
pub fn parse_goals(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Caps generator output at the weekly size and rest-mission limit.
pub fn normalize_weekly_missions(missions: Vec<PoolMission>) -> Vec<PoolMission> {
    let mut sabori = 0;
    missions
        .into_iter()
        .filter(|m| {
            if m.is_sabori {
                sabori += 1;
                sabori <= WEEKLY_MAX_SABORI
            } else {
                true
            }
        })
        .take(WEEKLY_MISSION_COUNT)
        .collect()
}

/// Swaps in a new weekly pool.
pub fn install_weekly_pool(
    state: &mut SessionState,
    week_id: &str,
    missions: Vec<PoolMission>,
) -> ActionResult {
    let count = missions.len();
    state.pool.replace(week_id, missions);
    tracing::info!(week_id, missions = count, "installed weekly mission pool");

    let mut result = ActionResult::default();
    result.push(EngineEvent::PoolReplaced {
        week_id: week_id.to_string(),
        missions: count,
    });
    result
}

/// True while today's draw is still unclaimed and the pool has missions left.
pub fn gacha_available(state: &SessionState, today: NaiveDate) -> bool {
    state.meta.last_gacha_date != Some(today) && state.pool.has_unused()
}

fn check_gacha_gate(state: &SessionState, today: NaiveDate) -> EngineResult<()> {
    if state.meta.last_gacha_date == Some(today) {
        return Err(EngineError::GachaAlreadyUsed);
    }
    if !state.pool.has_unused() {
        return Err(EngineError::PoolExhausted);
    }
    Ok(())
}

/// Draws a mission uniformly among the unused ones. Rolling does not consume
/// anything; only [`accept_gacha`] does.
pub fn roll_gacha<R: Rng + ?Sized>(
    state: &SessionState,
    today: NaiveDate,
    rng: &mut R,
) -> EngineResult<PoolMission> {
    check_gacha_gate(state, today)?;
    state
        .pool
        .pick_unused(rng)
        .cloned()
        .ok_or(EngineError::PoolExhausted)
}

/// Accepts a drawn mission: marks it used, closes today's gacha, creates a
/// task dated today and pays the streak bonus onto the mission's track.
pub fn accept_gacha(
    state: &mut SessionState,
    mission_id: MissionId,
    today: NaiveDate,
) -> EngineResult<(TaskId, ActionResult)> {
    check_gacha_gate(state, today)?;

    let mission = state
        .pool
        .get(mission_id)
        .cloned()
        .ok_or(EngineError::MissionNotFound(mission_id))?;
    if mission.is_used {
        return Err(EngineError::MissionAlreadyUsed(mission_id));
    }

    let mut new_task = NewTask::new(mission.title.clone(), mission.track, today, mission.reward);
    new_task.is_sabori = mission.is_sabori;
    let task_id = insert_task(state, new_task)?;

    state.pool.mark_used(mission_id);
    state.meta.last_gacha_date = Some(today);

    let mut result = ActionResult::default();
    result.push(EngineEvent::MissionAccepted {
        mission_id,
        task_id,
    });

    let bonus = state.meta.streak.info().bonus_exp;
    if bonus > 0 {
        result.push(EngineEvent::StreakBonus {
            track: mission.track,
            amount: bonus,
        });
        if let Some(level) = grant_exp(&mut state.stats, mission.track, bonus) {
            result.push(EngineEvent::LevelUp {
                track: mission.track,
                level,
            });
        }
    }

    Ok((task_id, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::{StreakState, Track};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn seeded_state() -> SessionState {
        let mut state = SessionState::default();
        install_weekly_pool(
            &mut state,
            "2026-W42",
            vec![
                PoolMission::new("Read paper", Track::Study, 40, false),
                PoolMission::new("Gym", Track::Exercise, 50, false),
            ],
        );
        state.meta.streak = StreakState {
            last_login_date: Some(today()),
            count: 3,
        };
        state
    }

    #[test]
    fn test_parse_goals_skips_blank_lines() {
        let goals = parse_goals("  Pass the exam \n\n Run 20km\n   \n");
        assert_eq!(goals, vec!["Pass the exam", "Run 20km"]);
    }

    #[test]
    fn test_normalize_caps_sabori_and_size() {
        let mut missions = Vec::new();
        for i in 0..5 {
            missions.push(PoolMission::new(format!("Rest {}", i), Track::Study, 10, true));
        }
        for i in 0..6 {
            missions.push(PoolMission::new(format!("Work {}", i), Track::Work, 30, false));
        }
        let normalized = normalize_weekly_missions(missions);
        assert_eq!(normalized.len(), 7);
        assert_eq!(normalized.iter().filter(|m| m.is_sabori).count(), 3);
    }

    #[test]
    fn test_roll_does_not_consume() {
        let state = seeded_state();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        roll_gacha(&state, today(), &mut rng).unwrap();
        roll_gacha(&state, today(), &mut rng).unwrap();
        assert_eq!(state.pool.unused_count(), 2);
    }

    #[test]
    fn test_accept_creates_task_and_pays_streak_bonus() {
        let mut state = seeded_state();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mission = roll_gacha(&state, today(), &mut rng).unwrap();

        let (task_id, result) = accept_gacha(&mut state, mission.id, today()).unwrap();

        let task = state.tasks.iter().find(|t| t.id == task_id).unwrap();
        assert_eq!(task.title, mission.title);
        assert_eq!(task.track, mission.track);
        assert_eq!(task.reward, mission.reward);
        assert_eq!(task.date, today());
        assert!(!task.is_done());

        // Streak day 3 pays 30
        assert_eq!(state.stats.get(mission.track), 30);
        assert!(result.events.contains(&EngineEvent::StreakBonus {
            track: mission.track,
            amount: 30
        }));
        assert_eq!(state.meta.last_gacha_date, Some(today()));
        assert_eq!(state.pool.unused_count(), 1);
    }

    #[test]
    fn test_second_accept_same_day_rejected() {
        let mut state = seeded_state();
        let first = state.pool.missions[0].id;
        let second = state.pool.missions[1].id;
        accept_gacha(&mut state, first, today()).unwrap();

        assert_eq!(
            accept_gacha(&mut state, second, today()),
            Err(EngineError::GachaAlreadyUsed)
        );
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            roll_gacha(&state, today(), &mut rng),
            Err(EngineError::GachaAlreadyUsed)
        );
        assert!(!gacha_available(&state, today()));

        let tomorrow = today().succ_opt().unwrap();
        assert!(gacha_available(&state, tomorrow));
        accept_gacha(&mut state, second, tomorrow).unwrap();
    }

    #[test]
    fn test_gacha_on_exhausted_pool() {
        let mut state = seeded_state();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        state.pool.burn_random(&mut rng);
        state.pool.burn_random(&mut rng);
        assert_eq!(
            roll_gacha(&state, today(), &mut rng),
            Err(EngineError::PoolExhausted)
        );
    }

    #[test]
    fn test_accept_used_mission_rejected() {
        let mut state = seeded_state();
        let id = state.pool.missions[0].id;
        state.pool.mark_used(id);
        assert_eq!(
            accept_gacha(&mut state, id, today()),
            Err(EngineError::MissionAlreadyUsed(id))
        );
        assert!(state.tasks.is_empty());
        assert_eq!(state.meta.last_gacha_date, None);
    }

    #[test]
    fn test_accept_unknown_mission_rejected() {
        let mut state = seeded_state();
        let id = uuid::Uuid::new_v4();
        assert_eq!(
            accept_gacha(&mut state, id, today()),
            Err(EngineError::MissionNotFound(id))
        );
    }

    #[test]
    fn test_streak_bonus_can_level_up() {
        let mut state = seeded_state();
        state.meta.streak.count = 7;
        let mission_id = state.pool.missions[0].id;
        state.stats.study = 95;

        let (_, result) = accept_gacha(&mut state, mission_id, today()).unwrap();
        assert_eq!(state.stats.study, 195);
        assert_eq!(result.level_ups().collect::<Vec<_>>(), vec![(Track::Study, 2)]);
    }

    #[test]
    fn test_accepted_rest_mission_keeps_flag() {
        let mut state = SessionState::default();
        install_weekly_pool(
            &mut state,
            "2026-W42",
            vec![PoolMission::new("Bath", Track::Exercise, 10, true)],
        );
        let id = state.pool.missions[0].id;
        let (task_id, _) = accept_gacha(&mut state, id, today()).unwrap();
        let task = state.tasks.iter().find(|t| t.id == task_id).unwrap();
        assert!(task.is_sabori);
    }
}

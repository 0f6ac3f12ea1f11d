//! Deterministic content used when no generator is available or it fails.

use super::{BossAnalysis, ContentError, ContentGenerator, TaskAnalysis};
use crate::boss::BossArchetype;
use crate::core::constants::{
    BOSS_BASE_HP, BOSS_HP_PER_DAY, FALLBACK_FILLER_REWARD, FALLBACK_GOAL_REWARD,
    FALLBACK_SABORI_REWARD, FALLBACK_TASK_REWARD, WEEKLY_MAX_SABORI, WEEKLY_MISSION_COUNT,
};
use crate::core::session_state::UserProfile;
use crate::missions::PoolMission;
use crate::progression::Track;
use chrono::NaiveDate;

const SABORI_FILLER_TITLE: &str = "Hobby time (relax)";
const STUDY_FILLER_TITLE: &str = "Reading for self-improvement";
const BOSS_DESCRIPTION: &str = "A mighty trial blocks the road ahead...";

#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackGenerator;

impl FallbackGenerator {
    pub fn task_analysis(&self) -> TaskAnalysis {
        TaskAnalysis {
            track: Track::Work,
            reward: FALLBACK_TASK_REWARD,
        }
    }

    pub fn boss_analysis(&self, days_remaining: u32) -> BossAnalysis {
        BossAnalysis {
            archetype: BossArchetype::Dragon,
            hp: days_remaining as u64 * BOSS_HP_PER_DAY + BOSS_BASE_HP,
            description: BOSS_DESCRIPTION.to_string(),
        }
    }

    /// Goals become work missions, then rest fillers (up to three), then
    /// study fillers until the week is full.
    pub fn weekly_missions(&self, goals: &[String]) -> Vec<PoolMission> {
        let mut missions: Vec<PoolMission> = goals
            .iter()
            .map(|goal| PoolMission::new(goal.clone(), Track::Work, FALLBACK_GOAL_REWARD, false))
            .collect();

        let mut sabori = 0;
        while missions.len() < WEEKLY_MISSION_COUNT {
            if sabori < WEEKLY_MAX_SABORI {
                missions.push(PoolMission::new(
                    SABORI_FILLER_TITLE,
                    Track::Exercise,
                    FALLBACK_SABORI_REWARD,
                    true,
                ));
                sabori += 1;
            } else {
                missions.push(PoolMission::new(
                    STUDY_FILLER_TITLE,
                    Track::Study,
                    FALLBACK_FILLER_REWARD,
                    false,
                ));
            }
        }
        missions
    }
}

impl ContentGenerator for FallbackGenerator {
    fn analyze_task(&self, _title: &str, _date: NaiveDate) -> Result<TaskAnalysis, ContentError> {
        Ok(self.task_analysis())
    }

    fn generate_weekly_missions(
        &self,
        goals: &[String],
        _profile: &UserProfile,
    ) -> Result<Vec<PoolMission>, ContentError> {
        Ok(self.weekly_missions(goals))
    }

    fn analyze_boss(&self, _name: &str, days_remaining: u32) -> Result<BossAnalysis, ContentError> {
        Ok(self.boss_analysis(days_remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_order_without_goals() {
        let missions = FallbackGenerator.weekly_missions(&[]);
        assert_eq!(missions.len(), 7);
        assert!(missions[..3].iter().all(|m| m.is_sabori && m.track == Track::Exercise));
        assert!(missions[3..].iter().all(|m| !m.is_sabori && m.track == Track::Study));
        assert_eq!(missions[0].reward, 10);
        assert_eq!(missions[6].reward, 30);
    }

    #[test]
    fn test_goals_come_first() {
        let goals = vec!["Pass exam".to_string(), "Run 5k".to_string()];
        let missions = FallbackGenerator.weekly_missions(&goals);
        assert_eq!(missions.len(), 7);
        assert_eq!(missions[1].title, "Run 5k");
        assert_eq!(missions[1].track, Track::Work);
        assert_eq!(missions[1].reward, 50);
        assert_eq!(missions.iter().filter(|m| m.is_sabori).count(), 3);
    }

    #[test]
    fn test_many_goals_skip_fillers() {
        let goals: Vec<String> = (0..9).map(|i| format!("Goal {}", i)).collect();
        let missions = FallbackGenerator.weekly_missions(&goals);
        assert_eq!(missions.len(), 9);
        assert!(missions.iter().all(|m| !m.is_sabori));
    }

    #[test]
    fn test_boss_sizing() {
        let analysis = FallbackGenerator.boss_analysis(30);
        assert_eq!(analysis.hp, 4000);
        assert_eq!(analysis.archetype, BossArchetype::Dragon);
    }

    #[test]
    fn test_fresh_ids() {
        let missions = FallbackGenerator.weekly_missions(&[]);
        assert_ne!(missions[0].id, missions[1].id);
    }
}

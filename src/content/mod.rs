//! Content generation capability.
//!
//! The engine asks a [`ContentGenerator`] to classify tasks, size bosses and
//! draft the weekly mission pool. Any failure is logged and replaced by the
//! deterministic [`FallbackGenerator`] output, so callers never see a
//! generator error.

pub mod fallback;
pub mod http;

pub use fallback::FallbackGenerator;
pub use http::HttpGenerator;

use crate::boss::BossArchetype;
use crate::core::session_state::UserProfile;
use crate::missions::{normalize_weekly_missions, PoolMission};
use crate::progression::Track;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("content request failed: {0}")]
    Transport(String),

    #[error("could not decode content response: {0}")]
    Decode(String),

    #[error("content generator returned nothing")]
    Empty,

    #[error("no content generator configured")]
    Disabled,
}

/// Track and reward suggested for a new task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAnalysis {
    #[serde(rename = "type")]
    pub track: Track,
    pub reward: u64,
}

/// Sizing for a new boss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossAnalysis {
    #[serde(rename = "type")]
    pub archetype: BossArchetype,
    pub hp: u64,
    #[serde(default)]
    pub description: String,
}

pub trait ContentGenerator {
    fn analyze_task(&self, title: &str, date: NaiveDate) -> Result<TaskAnalysis, ContentError>;

    /// Candidate missions for the week: seven in total, at most three rest
    /// missions.
    fn generate_weekly_missions(
        &self,
        goals: &[String],
        profile: &UserProfile,
    ) -> Result<Vec<PoolMission>, ContentError>;

    fn analyze_boss(&self, name: &str, days_remaining: u32) -> Result<BossAnalysis, ContentError>;
}

pub fn analyze_task_or_fallback(
    generator: &dyn ContentGenerator,
    title: &str,
    date: NaiveDate,
) -> TaskAnalysis {
    match generator.analyze_task(title, date) {
        Ok(analysis) => analysis,
        Err(e) => {
            tracing::warn!(error = %e, "task analysis failed, using default");
            FallbackGenerator.task_analysis()
        }
    }
}

/// Weekly missions from the generator, capped to the pool limits. An error
/// or an empty answer yields the fallback pool.
pub fn weekly_missions_or_fallback(
    generator: &dyn ContentGenerator,
    goals: &[String],
    profile: &UserProfile,
) -> Vec<PoolMission> {
    let missions = match generator.generate_weekly_missions(goals, profile) {
        Ok(missions) if !missions.is_empty() => missions,
        Ok(_) => {
            tracing::warn!("weekly generation returned no missions, using fallback pool");
            FallbackGenerator.weekly_missions(goals)
        }
        Err(e) => {
            tracing::warn!(error = %e, "weekly generation failed, using fallback pool");
            FallbackGenerator.weekly_missions(goals)
        }
    };
    normalize_weekly_missions(missions)
}

pub fn analyze_boss_or_fallback(
    generator: &dyn ContentGenerator,
    name: &str,
    days_remaining: u32,
) -> BossAnalysis {
    match generator.analyze_boss(name, days_remaining) {
        Ok(analysis) => analysis,
        Err(e) => {
            tracing::warn!(error = %e, "boss analysis failed, using default sizing");
            FallbackGenerator.boss_analysis(days_remaining)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Generator that fails every call.
    struct Broken;

    impl ContentGenerator for Broken {
        fn analyze_task(&self, _: &str, _: NaiveDate) -> Result<TaskAnalysis, ContentError> {
            Err(ContentError::Transport("connection refused".to_string()))
        }

        fn generate_weekly_missions(
            &self,
            _: &[String],
            _: &UserProfile,
        ) -> Result<Vec<PoolMission>, ContentError> {
            Err(ContentError::Empty)
        }

        fn analyze_boss(&self, _: &str, _: u32) -> Result<BossAnalysis, ContentError> {
            Err(ContentError::Decode("expected object".to_string()))
        }
    }

    /// Generator that over-delivers rest missions.
    struct Lazy;

    impl ContentGenerator for Lazy {
        fn analyze_task(&self, _: &str, _: NaiveDate) -> Result<TaskAnalysis, ContentError> {
            Ok(TaskAnalysis {
                track: Track::Study,
                reward: 80,
            })
        }

        fn generate_weekly_missions(
            &self,
            _: &[String],
            _: &UserProfile,
        ) -> Result<Vec<PoolMission>, ContentError> {
            Ok((0..10)
                .map(|i| PoolMission::new(format!("Nap {}", i), Track::Exercise, 10, true))
                .collect())
        }

        fn analyze_boss(&self, _: &str, _: u32) -> Result<BossAnalysis, ContentError> {
            Err(ContentError::Disabled)
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_task_fallback_on_error() {
        let analysis = analyze_task_or_fallback(&Broken, "Write report", date());
        assert_eq!(
            analysis,
            TaskAnalysis {
                track: Track::Work,
                reward: 30
            }
        );
    }

    #[test]
    fn test_task_uses_generator_when_ok() {
        let analysis = analyze_task_or_fallback(&Lazy, "Read", date());
        assert_eq!(analysis.reward, 80);
    }

    #[test]
    fn test_boss_fallback_sizing() {
        let analysis = analyze_boss_or_fallback(&Broken, "Marathon", 7);
        assert_eq!(analysis.archetype, BossArchetype::Dragon);
        assert_eq!(analysis.hp, 1700);
    }

    #[test]
    fn test_weekly_fallback_on_error() {
        let goals = vec!["Finish thesis".to_string()];
        let missions = weekly_missions_or_fallback(&Broken, &goals, &UserProfile::default());
        assert_eq!(missions.len(), 7);
        assert_eq!(missions[0].title, "Finish thesis");
    }

    #[test]
    fn test_weekly_generator_output_is_capped() {
        let missions = weekly_missions_or_fallback(&Lazy, &[], &UserProfile::default());
        assert_eq!(missions.len(), 3);
        assert!(missions.iter().all(|m| m.is_sabori));
    }

    #[test]
    fn test_analysis_wire_format() {
        let analysis: BossAnalysis =
            serde_json::from_str(r#"{"type":"kraken","hp":2400,"description":"Deep waters"}"#)
                .unwrap();
        assert_eq!(analysis.archetype, BossArchetype::Kraken);
        assert_eq!(analysis.hp, 2400);

        let task: TaskAnalysis = serde_json::from_str(r#"{"type":"exercise","reward":45}"#).unwrap();
        assert_eq!(task.track, Track::Exercise);
    }
}

//! JSON-over-HTTP content generator.
//!
//! Every call is a POST of a [`ContentRequest`] to one endpoint, which
//! answers with the JSON shape of the requested analysis.

use super::{BossAnalysis, ContentError, ContentGenerator, TaskAnalysis};
use crate::core::config::EngineConfig;
use crate::core::session_state::UserProfile;
use crate::missions::PoolMission;
use crate::progression::Track;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentRequest<'a> {
    AnalyzeTask {
        title: &'a str,
        date: NaiveDate,
    },
    WeeklyMissions {
        goals: &'a [String],
        hobbies: &'a str,
        recent_activities: &'a str,
    },
    AnalyzeBoss {
        name: &'a str,
        days_remaining: u32,
    },
}

/// One mission as the endpoint returns it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct GeneratedMission {
    title: String,
    #[serde(rename = "type")]
    track: Track,
    reward: u64,
    #[serde(default, rename = "isSabori")]
    is_sabori: bool,
}

impl From<GeneratedMission> for PoolMission {
    fn from(m: GeneratedMission) -> Self {
        PoolMission::new(m.title, m.track, m.reward, m.is_sabori)
    }
}

pub struct HttpGenerator {
    agent: ureq::Agent,
    url: String,
    api_key: Option<String>,
}

impl HttpGenerator {
    pub fn new(url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            url: url.into(),
            api_key,
        }
    }

    /// Generator for the configured endpoint, if any.
    pub fn from_config(config: &EngineConfig) -> Option<Self> {
        let url = config.content_url.as_ref()?;
        Some(Self::new(
            url.clone(),
            config.content_key.clone(),
            Duration::from_secs(config.content_timeout_secs),
        ))
    }

    fn post<T: DeserializeOwned>(&self, request: &ContentRequest<'_>) -> Result<T, ContentError> {
        let mut call = self
            .agent
            .post(&self.url)
            .set("User-Agent", "questlog");
        if let Some(key) = &self.api_key {
            call = call.set("Authorization", &format!("Bearer {}", key));
        }

        let response = call
            .send_json(request)
            .map_err(|e| ContentError::Transport(e.to_string()))?;
        response
            .into_json::<T>()
            .map_err(|e| ContentError::Decode(e.to_string()))
    }
}

impl ContentGenerator for HttpGenerator {
    fn analyze_task(&self, title: &str, date: NaiveDate) -> Result<TaskAnalysis, ContentError> {
        self.post(&ContentRequest::AnalyzeTask { title, date })
    }

    fn generate_weekly_missions(
        &self,
        goals: &[String],
        profile: &UserProfile,
    ) -> Result<Vec<PoolMission>, ContentError> {
        let missions: Vec<GeneratedMission> = self.post(&ContentRequest::WeeklyMissions {
            goals,
            hobbies: &profile.hobbies,
            recent_activities: &profile.recent_activities,
        })?;
        if missions.is_empty() {
            return Err(ContentError::Empty);
        }
        Ok(missions.into_iter().map(PoolMission::from).collect())
    }

    fn analyze_boss(&self, name: &str, days_remaining: u32) -> Result<BossAnalysis, ContentError> {
        self.post(&ContentRequest::AnalyzeBoss {
            name,
            days_remaining,
        })
    }
}

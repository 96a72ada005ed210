use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ids::JobId;

/// A paid task offered in a minigame scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pay: u32,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub difficulty: JobDifficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_note: Option<String>,
    /// Health lost doing the work, applied after the pay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_cost: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobDifficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    #[serde(other)]
    Unknown,
}

impl JobDifficulty {
    /// How long the simulated work takes before the pay lands.
    pub fn work_duration(self) -> Duration {
        match self {
            Self::Hard => Duration::from_millis(2000),
            Self::Medium => Duration::from_millis(1500),
            Self::Easy | Self::Unknown => Duration::from_millis(1000),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_difficulty_is_tolerated() {
        let job: Job = serde_json::from_str(
            r#"{"id": "porter", "title": "Porter", "pay": 4, "difficulty": "brutal"}"#,
        )
        .expect("parse");
        assert_eq!(job.difficulty, JobDifficulty::Unknown);
        assert_eq!(job.difficulty.work_duration(), Duration::from_millis(1000));
    }

    #[test]
    fn hard_jobs_take_longest() {
        assert!(JobDifficulty::Hard.work_duration() > JobDifficulty::Medium.work_duration());
        assert!(JobDifficulty::Medium.work_duration() > JobDifficulty::Easy.work_duration());
    }
}

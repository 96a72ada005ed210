//! Chapter aggregate - one playable unit of authored content
//!
//! Chapters are parsed once per session and never mutated afterwards. Load
//! fails on structural problems (malformed JSON, unknown scene types, empty
//! or duplicated scene ids); softer authoring mistakes such as a `next` that
//! points nowhere are reported by [`Chapter::content_issues`] and handled at
//! runtime by halting the transition.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::SceneGraph;
use crate::entities::{Character, Job, SceneKind};
use crate::error::{ContentIssue, ContentIssueKind, DomainError};
use crate::ids::ChapterId;
use crate::value_objects::{PlayerStats, StartingStats};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: ChapterId,
    pub title: String,
    #[serde(default)]
    pub era: String,
    #[serde(default)]
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Presentation hints (colours, fonts); opaque to the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<serde_json::Value>,
    #[serde(default)]
    pub starting_stats: StartingStats,
    #[serde(default)]
    pub characters: Vec<Character>,
    pub scenes: SceneGraph,
    #[serde(default)]
    pub jobs: Vec<Job>,
    /// Glossary terms this chapter introduces.
    #[serde(default)]
    pub glossary: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guiding_question: Option<String>,
}

/// The listing view of a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterSummary {
    pub id: ChapterId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub era: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl Chapter {
    /// Parse and structurally validate a chapter document.
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, DomainError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn starting_player_stats(&self) -> PlayerStats {
        self.starting_stats.to_player_stats()
    }

    pub fn summary(&self) -> ChapterSummary {
        ChapterSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            era: self.era.clone(),
            region: self.region.clone(),
            difficulty: self.difficulty.clone(),
            thumbnail: self.thumbnail.clone(),
            description: self.description.clone(),
        }
    }

    /// Authoring problems that do not prevent play.
    pub fn content_issues(&self) -> Vec<ContentIssue> {
        let mut issues = self.scenes.dangling_references();

        for scene in self.scenes.iter() {
            match &scene.kind {
                SceneKind::CharacterSelect(_) if self.characters.is_empty() => {
                    issues.push(ContentIssue::new(
                        Some(scene.id.clone()),
                        ContentIssueKind::NoCharacters,
                    ));
                }
                SceneKind::Quiz(quiz) => {
                    for (i, q) in quiz.questions.iter().enumerate() {
                        if q.correct >= q.options.len() {
                            issues.push(ContentIssue::new(
                                Some(scene.id.clone()),
                                ContentIssueKind::AnswerOutOfRange {
                                    question: i,
                                    answer: q.correct,
                                },
                            ));
                        }
                    }
                }
                SceneKind::Summary(summary) => {
                    for (i, q) in summary.quiz.iter().enumerate() {
                        if q.correct >= q.options.len() {
                            issues.push(ContentIssue::new(
                                Some(scene.id.clone()),
                                ContentIssueKind::AnswerOutOfRange {
                                    question: i,
                                    answer: q.correct,
                                },
                            ));
                        }
                    }
                }
                SceneKind::Minigame(minigame) => {
                    let mut seen = HashSet::new();
                    for job in &minigame.jobs {
                        if !seen.insert(&job.id) {
                            issues.push(ContentIssue::new(
                                Some(scene.id.clone()),
                                ContentIssueKind::DuplicateJob {
                                    job_id: job.id.to_string(),
                                },
                            ));
                        }
                    }
                }
                _ => {}
            }
        }
        issues
    }

    /// Jobs offered by a minigame scene: its own list, or the chapter board.
    pub fn jobs_for<'a>(&'a self, scene_jobs: &'a [Job]) -> &'a [Job] {
        if scene_jobs.is_empty() {
            &self.jobs
        } else {
            scene_jobs
        }
    }
}

/// Sort key for chapter listings: numeric ids numerically, then the rest.
pub fn chapter_order(a: &ChapterId, b: &ChapterId) -> std::cmp::Ordering {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAPTER: &str = r#"{
        "id": 2,
        "title": "Edo Japan",
        "era": "Edo Japan",
        "region": "Kanto",
        "startingStats": {"health": 100, "money": 10, "currency": "mon"},
        "characters": [{"name": "Ronin", "description": "A wandering swordsman"}],
        "scenes": [
            {"id": "pick", "type": "character-select", "next": "intro"},
            {"id": "intro", "type": "narrative", "next": "missing"},
            {"id": "quiz", "type": "quiz", "questions": [{"question": "?", "options": ["a"], "correct": 3}]}
        ]
    }"#;

    #[test]
    fn parses_numeric_id_and_stats() {
        let chapter = Chapter::from_json(CHAPTER).expect("chapter");
        assert_eq!(chapter.id.as_str(), "2");
        assert_eq!(chapter.starting_player_stats().currency, "mon");
        assert_eq!(chapter.scenes.entry_scene().id.as_str(), "pick");
    }

    #[test]
    fn collects_content_issues_without_failing() {
        let chapter = Chapter::from_json(CHAPTER).expect("chapter");
        let issues = chapter.content_issues();
        assert!(issues
            .iter()
            .any(|i| matches!(i.kind, ContentIssueKind::DanglingReference { .. })));
        assert!(issues
            .iter()
            .any(|i| matches!(i.kind, ContentIssueKind::AnswerOutOfRange { answer: 3, .. })));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = Chapter::from_json(r#"{"id": 1, "title": "x", "scenes": [{"id": "a"}]}"#)
            .expect_err("missing type");
        assert!(matches!(err, DomainError::Parse(_)));
    }

    #[test]
    fn summary_keeps_listing_fields() {
        let chapter = Chapter::from_json(CHAPTER).expect("chapter");
        let summary = chapter.summary();
        assert_eq!(summary.title, "Edo Japan");
        assert_eq!(summary.region, "Kanto");
    }

    #[test]
    fn numeric_ids_sort_numerically() {
        let mut ids = vec![
            ChapterId::new("10"),
            ChapterId::new("alpha"),
            ChapterId::new("2"),
        ];
        ids.sort_by(chapter_order);
        let ordered: Vec<_> = ids.iter().map(ChapterId::as_str).collect();
        assert_eq!(ordered, vec!["2", "10", "alpha"]);
    }
}

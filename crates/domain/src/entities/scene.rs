//! Scene records - the nodes of a chapter's narrative graph
//!
//! A scene is a set of common presentation fields plus a variant payload
//! selected by the `type` key. Each variant carries only the fields that make
//! sense for it, so a `choice` scene without `choices` or a `travel` scene
//! without `routes` fails at chapter load rather than at render time.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::entities::{Job, Npc};
use crate::ids::SceneId;
use crate::value_objects::StatDelta;

pub const DEFAULT_INN_COST: u32 = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: SceneId,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "narrative")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npc: Option<Npc>,
    #[serde(default, alias = "dialogue", skip_serializing_if = "Option::is_none")]
    pub npc_dialogue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub educational_term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub educational_note: Option<String>,
    /// Prompt for the AI illustration; the title and text are used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
    #[serde(flatten)]
    pub kind: SceneKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SceneKind {
    CharacterSelect(CharacterSelectScene),
    Narrative(NarrativeScene),
    Choice(ChoiceScene),
    Setback(SetbackScene),
    Rest(RestScene),
    Minigame(MinigameScene),
    Travel(TravelScene),
    Quiz(QuizScene),
    Summary(SummaryScene),
}

impl Scene {
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            SceneKind::CharacterSelect(_) => "character-select",
            SceneKind::Narrative(_) => "narrative",
            SceneKind::Choice(_) => "choice",
            SceneKind::Setback(_) => "setback",
            SceneKind::Rest(_) => "rest",
            SceneKind::Minigame(_) => "minigame",
            SceneKind::Travel(_) => "travel",
            SceneKind::Quiz(_) => "quiz",
            SceneKind::Summary(_) => "summary",
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self.kind, SceneKind::Choice(_))
    }

    pub fn is_character_select(&self) -> bool {
        matches!(self.kind, SceneKind::CharacterSelect(_))
    }

    /// Every scene reference this scene makes, labelled by the authored field.
    pub fn references(&self) -> Vec<(&'static str, &SceneId)> {
        let labelled: Vec<(&'static str, Option<&SceneId>)> = match &self.kind {
            SceneKind::CharacterSelect(s) => vec![("next", s.next.as_ref())],
            SceneKind::Narrative(s) => vec![("next", s.next.as_ref())],
            SceneKind::Choice(s) => s
                .choices
                .iter()
                .flat_map(|c| [("outcome", c.outcome.as_ref()), ("next", c.next.as_ref())])
                .collect(),
            SceneKind::Setback(s) => vec![("next", s.next.as_ref())],
            SceneKind::Rest(s) => vec![("next", s.next.as_ref())],
            SceneKind::Minigame(s) => vec![("next", s.next.as_ref())],
            SceneKind::Travel(s) => s
                .routes
                .iter()
                .flat_map(|r| [("outcome", r.outcome.as_ref()), ("next", r.next.as_ref())])
                .collect(),
            SceneKind::Quiz(s) => vec![("next", s.next.as_ref())],
            SceneKind::Summary(s) => vec![("quizScene", s.quiz_scene.as_ref())],
        };
        labelled
            .into_iter()
            .filter_map(|(field, target)| target.map(|t| (field, t)))
            .collect()
    }

    /// Text sent to the image generator for this scene.
    pub fn image_prompt(&self) -> Option<String> {
        if let Some(prompt) = self.image_prompt.as_deref().filter(|p| !p.trim().is_empty()) {
            return Some(prompt.to_string());
        }
        if self.title.trim().is_empty() && self.text.trim().is_empty() {
            return None;
        }
        let excerpt: String = self.text.chars().take(200).collect();
        Some(format!("{}. {}", self.title, excerpt).trim().to_string())
    }
}

// =============================================================================
// Variant payloads
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSelectScene {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<SceneId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choice_prompt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeScene {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<SceneId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continue_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceScene {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<SceneId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<SceneId>,
    #[serde(default)]
    pub cost: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat_change: Option<StatDelta>,
}

impl Choice {
    /// `outcome` wins over `next`.
    pub fn target(&self) -> Option<&SceneId> {
        self.outcome.as_ref().or(self.next.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetbackScene {
    #[serde(default)]
    pub retry: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<SceneId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestScene {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_options: Option<Vec<RestOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inn_cost: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<SceneId>,
}

impl RestScene {
    /// Authored options, or camp / inn / temple when none are given.
    pub fn options(&self) -> Cow<'_, [RestOption]> {
        match &self.rest_options {
            Some(options) => Cow::Borrowed(options.as_slice()),
            None => Cow::Owned(RestOption::defaults(
                self.inn_cost.unwrap_or(DEFAULT_INN_COST),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub cost: u32,
    #[serde(default)]
    pub health: u32,
    #[serde(default)]
    pub description: String,
}

impl RestOption {
    pub fn defaults(inn_cost: u32) -> Vec<RestOption> {
        vec![
            RestOption {
                id: Some("camp".into()),
                label: "Camp outdoors".into(),
                cost: 0,
                health: 10,
                description: "Free but basic rest. +10 health.".into(),
            },
            RestOption {
                id: Some("inn".into()),
                label: "Stay at an inn".into(),
                cost: inn_cost,
                health: 30,
                description: "Comfortable rest. +30 health.".into(),
            },
            RestOption {
                id: Some("temple".into()),
                label: "Temple shelter".into(),
                cost: 0,
                health: 20,
                description: "Monks offer free shelter. +20 health.".into(),
            },
        ]
    }

    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            self.id.as_deref().unwrap_or("Rest")
        } else {
            &self.label
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinigameScene {
    /// Empty means "offer the chapter's job board".
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<SceneId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelScene {
    #[serde(alias = "choices")]
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(default, alias = "name")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub cost: u32,
    #[serde(default)]
    pub health_cost: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_transport: Option<String>,
    #[serde(default)]
    pub is_long: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat_change: Option<StatDelta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<SceneId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<SceneId>,
}

impl Route {
    pub fn target(&self) -> Option<&SceneId> {
        self.outcome.as_ref().or(self.next.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizScene {
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<SceneId>,
}

/// A multiple-choice question. Chapter quizzes write `question`/`correct`,
/// summary quizzes write `q`/`answer`; both forms are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    #[serde(alias = "q")]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(alias = "answer")]
    pub correct: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuizQuestion {
    pub fn is_correct(&self, answer: usize) -> bool {
        answer == self.correct
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryScene {
    #[serde(default, alias = "summaryText", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub lessons: Vec<String>,
    #[serde(default)]
    pub key_terms: Vec<String>,
    #[serde(default)]
    pub analysis_questions: Vec<String>,
    #[serde(default)]
    pub quiz: Vec<QuizQuestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guiding_question_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_scene: Option<SceneId>,
}

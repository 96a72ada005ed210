//! Render model for the current scene.

use super::action::{Action, SceneVisit, Ticket};
use crate::ids::SceneId;

#[derive(Debug, Clone, PartialEq)]
pub struct SceneView {
    pub ticket: Ticket,
    pub visit: SceneVisit,
    pub scene_id: SceneId,
    pub kind: &'static str,
    pub title: String,
    pub era: String,
    /// Scene text with placeholders substituted.
    pub text: String,
    pub background: Option<String>,
    pub npc: Option<NpcView>,
    pub edu: Option<EduNote>,
    /// Character-select prompt or setback lesson.
    pub aside: Option<String>,
    pub controls: Vec<Control>,
    pub quiz: Option<QuizPrompt>,
    pub summary: Option<SummaryView>,
}

impl SceneView {
    pub fn enabled_controls(&self) -> impl Iterator<Item = &Control> {
        self.controls.iter().filter(|c| c.enabled)
    }

    pub fn control(&self, action: &Action) -> Option<&Control> {
        self.controls.iter().find(|c| &c.action == action)
    }

    pub fn is_terminal(&self) -> bool {
        self.summary.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpcView {
    pub name: String,
    pub avatar: Option<String>,
    pub description: String,
    pub line: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EduNote {
    pub term: String,
    pub note: String,
}

/// One actionable element. Disabled controls are rendered but refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub action: Action,
    pub label: String,
    pub detail: Option<String>,
    pub enabled: bool,
    pub reason: Option<String>,
}

impl Control {
    pub(crate) fn enabled(action: Action, label: impl Into<String>) -> Self {
        Self {
            action,
            label: label.into(),
            detail: None,
            enabled: true,
            reason: None,
        }
    }

    pub(crate) fn with_detail(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        if !detail.is_empty() {
            self.detail = Some(detail);
        }
        self
    }

    pub(crate) fn disabled_unless(mut self, ok: bool, reason: impl FnOnce() -> String) -> Self {
        if !ok {
            self.enabled = false;
            self.reason = Some(reason());
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizPrompt {
    /// 1-based.
    pub number: usize,
    pub total: usize,
    pub question: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryStats {
    pub scenes_visited: usize,
    pub money_earned: i64,
    pub final_health: u32,
    pub final_money: u32,
    pub items_collected: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryView {
    pub stats: SummaryStats,
    pub message: String,
    pub guiding_question: Option<String>,
    pub guiding_answer: Option<String>,
    pub lessons: Vec<String>,
    pub key_terms: Vec<String>,
    pub analysis_questions: Vec<String>,
    pub historical_note: Option<String>,
    pub quiz: Option<QuizPrompt>,
    /// `(score, total)` once the inline quiz is finished.
    pub quiz_result: Option<(usize, usize)>,
}

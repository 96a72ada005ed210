//! Player actions, control tickets and step outcomes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::{JobId, SceneId};

/// Something the player can do on the current scene.
///
/// Indexes refer to the authored order of characters, choices, rest
/// options, routes or quiz options on that scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "camelCase")]
pub enum Action {
    Continue,
    SelectCharacter(usize),
    Choose(usize),
    Rest(usize),
    Work(JobId),
    Travel(usize),
    Answer(usize),
    Retry,
    Restart,
    OpenQuiz,
}

/// Identifies one rendering of one scene.
///
/// Controls carry the ticket of the render that produced them. Any state
/// change bumps the generation, so a second activation of the same control
/// (double click, late callback) no longer matches and is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ticket {
    scene_id: SceneId,
    generation: u64,
}

impl Ticket {
    pub(crate) fn new(scene_id: SceneId, generation: u64) -> Self {
        Self {
            scene_id,
            generation,
        }
    }

    pub fn scene_id(&self) -> &SceneId {
        &self.scene_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Identifies one visit to a scene. Re-renders inside a visit (completing a
/// job, answering a quiz question) keep the same visit.
///
/// Async content (dialogue, images) is tagged with the visit it was
/// requested for and dropped if the player has moved on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SceneVisit {
    scene_id: SceneId,
    visit: u64,
}

impl SceneVisit {
    pub(crate) fn new(scene_id: SceneId, visit: u64) -> Self {
        Self { scene_id, visit }
    }

    pub fn scene_id(&self) -> &SceneId {
        &self.scene_id
    }

    pub fn number(&self) -> u64 {
        self.visit
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Moved to another scene (or re-entered the same one via retry).
    Entered { from: SceneId, to: SceneId },
    /// Same scene, new render (job done, quiz question answered).
    Rerendered,
    /// Nothing changed.
    Unchanged,
    /// The transition could not complete; the player stays put.
    Halted(HaltReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HaltReason {
    /// The scene offers nowhere to go.
    DeadEnd,
    /// The authored target does not exist in the chapter.
    MissingScene(SceneId),
}

/// Player-facing side information about a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    CharacterChosen {
        name: String,
    },
    Answered {
        correct: bool,
        explanation: Option<String>,
        correct_option: Option<String>,
    },
    JobCompleted {
        title: String,
        pay: u32,
    },
    JobAlreadyDone {
        title: String,
    },
    Rested {
        label: String,
    },
    Travelling {
        destination: Option<String>,
    },
    SummaryQuizFinished {
        score: usize,
        total: usize,
    },
}

impl Feedback {
    pub fn message(&self, currency: &str) -> String {
        match self {
            Self::CharacterChosen { name } => format!("Playing as: {}", name),
            Self::Answered { correct: true, .. } => "Correct!".to_string(),
            Self::Answered {
                explanation: Some(explanation),
                ..
            } => explanation.clone(),
            Self::Answered {
                correct_option: Some(option),
                ..
            } => format!("The answer was: {}", option),
            Self::Answered { .. } => "Incorrect.".to_string(),
            Self::JobCompleted { title, pay } => {
                format!("{} complete! +{} {}", title, pay, currency)
            }
            Self::JobAlreadyDone { title } => format!("Already done {} today.", title),
            Self::Rested { label } => format!("{} - Rested well!", label),
            Self::Travelling { destination } => format!(
                "Travelling to {}...",
                destination.as_deref().unwrap_or("next location")
            ),
            Self::SummaryQuizFinished { score, total } => {
                format!("Score: {} / {}. {}", score, total, quiz_rating(*score, *total))
            }
        }
    }
}

pub fn quiz_rating(score: usize, total: usize) -> &'static str {
    let ratio = if total == 0 {
        1.0
    } else {
        score as f64 / total as f64
    };
    if ratio >= 0.7 {
        "Excellent work!"
    } else if ratio >= 0.5 {
        "Good effort!"
    } else {
        "Review the chapter to strengthen your knowledge!"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub transition: Transition,
    pub feedback: Vec<Feedback>,
}

impl StepOutcome {
    pub(crate) fn new(transition: Transition) -> Self {
        Self {
            transition,
            feedback: Vec::new(),
        }
    }

    pub(crate) fn halted(reason: HaltReason) -> Self {
        Self::new(Transition::Halted(reason))
    }

    pub(crate) fn with(mut self, feedback: Feedback) -> Self {
        self.feedback.push(feedback);
        self
    }

    pub fn entered(&self) -> Option<&SceneId> {
        match &self.transition {
            Transition::Entered { to, .. } => Some(to),
            _ => None,
        }
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.transition, Transition::Halted(_))
    }

    /// Whether the scene state changed and should be persisted and redrawn.
    pub fn changed_state(&self) -> bool {
        !matches!(self.transition, Transition::Unchanged)
            && !(self.is_halted() && self.feedback.is_empty())
    }
}

/// Why an action was refused. Nothing was mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("control for scene '{scene_id}' is stale")]
    Stale { scene_id: SceneId },

    #[error("{action:?} is not available on scene '{scene_id}'")]
    NotAvailable { scene_id: SceneId, action: Action },

    #[error("{reason}")]
    Disabled { reason: String },
}

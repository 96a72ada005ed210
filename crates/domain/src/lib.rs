//! ChronoQuest domain
//!
//! Pure game model: chapter content, the stat engine, the scene state
//! machine and progress snapshots. No I/O lives here.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod offline;
pub mod progress;
pub mod runner;
pub mod text;
pub mod value_objects;

pub use aggregates::{chapter_order, Chapter, ChapterSummary, SceneGraph, StatEngine};

pub use entities::{
    Character, CharacterSelectScene, Choice, ChoiceScene, Glossary, GlossaryEntry, Job,
    JobDifficulty, MinigameScene, NarrativeScene, Npc, Player, QuizQuestion, QuizScene,
    RestOption, RestScene, Route, Scene, SceneKind, SetbackScene, SummaryScene, TravelScene,
};

pub use error::{ContentIssue, ContentIssueKind, DomainError};
pub use events::StatEvent;
pub use ids::{ChapterId, JobId, SceneId};
pub use progress::{ProgressSnapshot, ResumePlan, HISTORY_WINDOW, SNAPSHOT_TTL_MS};

pub use runner::{
    Action, Control, Feedback, HaltReason, ResumePoint, SceneRunner, SceneView, SceneVisit,
    StepOutcome, SummaryStats, SummaryView, Ticket, Transition, TransitionError,
};

pub use text::render_placeholders;
pub use value_objects::{AppliedDelta, PlayerStats, StartingStats, StatDelta};

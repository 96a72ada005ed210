//! Entities - authored chapter content

mod character;
mod glossary;
mod job;
mod scene;

pub use character::{Character, Npc, Player, DEFAULT_PLAYER_NAME};
pub use glossary::{Glossary, GlossaryEntry};
pub use job::{Job, JobDifficulty};
pub use scene::{
    CharacterSelectScene, Choice, ChoiceScene, MinigameScene, NarrativeScene, QuizQuestion,
    QuizScene, RestOption, RestScene, Route, Scene, SceneKind, SetbackScene, SummaryScene,
    TravelScene, DEFAULT_INN_COST,
};

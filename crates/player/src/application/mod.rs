//! Application layer - the per-player game session and its collaborators.

pub mod ai_content;
pub mod chapter_store;
pub mod progress_store;
pub mod session;

pub use ai_content::{
    AiContentClient, DialogueContext, DialogueLine, DialogueReply, SceneImage, Speaker,
};
pub use chapter_store::{ChapterStore, ChapterStoreError};
pub use progress_store::ProgressStore;
pub use session::{
    ContentUpdate, GameSession, GlossaryTerm, MapEntry, Notice, StartOutcome, DEFAULT_NPC_NAME,
};

//! Use cases - User story orchestration.
//!
//! Each module contains use cases for one area of the API. Use cases depend
//! only on port traits and are tested against mocks.

pub mod chat;
pub mod content;
pub mod image;
pub mod progress;
pub mod prompt;
pub mod status;

pub use chat::{ChatError, ChatWithNpc};
pub use content::{AuthoringError, ChapterCatalog, SaveChapter};
pub use image::{GenerateImage, ImageError, ImageGallery};
pub use progress::ProgressMirror;
pub use status::ServiceStatus;

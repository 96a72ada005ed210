//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::ports::{
    AiWorkerPort, ContentRepo, ConversationRepo, ImageCacheRepo, ProgressRepo,
};
use crate::use_cases::{
    ChapterCatalog, ChatWithNpc, GenerateImage, ImageGallery, ProgressMirror, SaveChapter,
    ServiceStatus,
};

/// Main application state.
///
/// Holds all use cases. Passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub chat: ChatWithNpc,
    pub images: GenerateImage,
    pub gallery: ImageGallery,
    pub catalog: ChapterCatalog,
    pub authoring: SaveChapter,
    pub progress: ProgressMirror,
    pub status: ServiceStatus,
}

/// Port implementations the application is built from.
pub struct Ports {
    pub worker: Arc<dyn AiWorkerPort>,
    pub images: Arc<dyn ImageCacheRepo>,
    pub conversations: Arc<dyn ConversationRepo>,
    pub progress: Arc<dyn ProgressRepo>,
    pub content: Arc<dyn ContentRepo>,
}

impl App {
    pub fn new(ports: Ports, worker_url: impl Into<String>) -> Self {
        let use_cases = UseCases {
            chat: ChatWithNpc::new(ports.worker.clone(), ports.conversations.clone()),
            images: GenerateImage::new(ports.worker.clone(), ports.images.clone()),
            gallery: ImageGallery::new(ports.images.clone()),
            catalog: ChapterCatalog::new(ports.content.clone()),
            authoring: SaveChapter::new(ports.content),
            progress: ProgressMirror::new(ports.progress),
            status: ServiceStatus::new(
                ports.worker,
                ports.images,
                ports.conversations,
                worker_url,
            ),
        };

        Self { use_cases }
    }
}

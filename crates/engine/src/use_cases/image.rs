//! Image generation use cases: scene images, NPC portraits, the gallery.
//!
//! Generated images are cached locally by prompt hash. A cache hit never
//! reaches the worker.

use std::sync::Arc;

use chronoquest_shared::{ImageRecord, ImageRequest, ImageResponse, PortraitRequest};

use crate::infrastructure::ports::{
    AiWorkerPort, ImageCacheRepo, NewImageRecord, RepoError, WorkerError, WorkerImageRequest,
};

use super::prompt::{
    full_image_prompt, portrait_prompt, portrait_scene_id, prompt_hash, IMAGE_MODEL,
};

/// Gallery page sizes.
pub const GALLERY_LIMIT: u32 = 200;
pub const CHAPTER_GALLERY_LIMIT: u32 = 100;

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("prompt required")]
    MissingPrompt,
    #[error("npcName required")]
    MissingNpcName,
    #[error(transparent)]
    Worker(#[from] WorkerError),
}

pub struct GenerateImage {
    worker: Arc<dyn AiWorkerPort>,
    images: Arc<dyn ImageCacheRepo>,
}

impl GenerateImage {
    pub fn new(worker: Arc<dyn AiWorkerPort>, images: Arc<dyn ImageCacheRepo>) -> Self {
        Self { worker, images }
    }

    pub async fn execute(&self, request: ImageRequest) -> Result<ImageResponse, ImageError> {
        if request.prompt.trim().is_empty() {
            return Err(ImageError::MissingPrompt);
        }

        let era = request.era.unwrap_or_default();
        let region = request.region.unwrap_or_default();
        let full_prompt = full_image_prompt(&request.prompt, &era, &region);
        let hash = prompt_hash(&full_prompt);

        match self.images.find_by_hash(&hash).await {
            Ok(Some(cached)) => {
                tracing::debug!(hash = %hash, "Image cache hit");
                return Ok(ImageResponse {
                    url: cached.url,
                    r2_key: cached.r2_key,
                    cached: true,
                    model: cached.model,
                    id: Some(cached.id),
                });
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Image cache lookup failed, generating"),
        }

        let chapter_id = request.chapter_id.map(|id| id.into_string());
        let scene_id = request.scene_id;
        tracing::info!(
            hash = %hash,
            chapter_id = chapter_id.as_deref().unwrap_or(""),
            scene_id = scene_id.as_deref().unwrap_or(""),
            "Generating image"
        );

        let generated = self
            .worker
            .image(WorkerImageRequest {
                prompt: request.prompt,
                era,
                region,
                chapter_id: chapter_id.clone().unwrap_or_default(),
                scene_id: scene_id.clone().unwrap_or_default(),
                width: request.width,
                height: request.height,
            })
            .await?;

        if let Err(e) = self
            .images
            .insert(NewImageRecord {
                prompt: full_prompt,
                prompt_hash: hash,
                r2_key: generated.r2_key.clone(),
                url: generated.url.clone(),
                model: IMAGE_MODEL.to_string(),
                chapter_id,
                scene_id,
            })
            .await
        {
            tracing::warn!(error = %e, "Failed to cache generated image");
        }

        Ok(generated)
    }

    /// Portraits are ordinary images with a prompt built from the NPC.
    pub async fn portrait(&self, request: PortraitRequest) -> Result<ImageResponse, ImageError> {
        let npc_name = request.npc_name.trim();
        if npc_name.is_empty() {
            return Err(ImageError::MissingNpcName);
        }

        let era = request.era.unwrap_or_default();
        let region = request.region.unwrap_or_default();
        let prompt = portrait_prompt(
            npc_name,
            &era,
            &region,
            request.description.as_deref().unwrap_or(""),
        );

        self.execute(ImageRequest {
            prompt,
            era: Some(era),
            region: Some(region),
            chapter_id: request.chapter_id,
            scene_id: Some(portrait_scene_id(npc_name)),
            ..ImageRequest::default()
        })
        .await
    }
}

/// Read-side of the image cache.
pub struct ImageGallery {
    images: Arc<dyn ImageCacheRepo>,
}

impl ImageGallery {
    pub fn new(images: Arc<dyn ImageCacheRepo>) -> Self {
        Self { images }
    }

    pub async fn list(&self, chapter_id: Option<String>) -> Result<Vec<ImageRecord>, RepoError> {
        let chapter_id = chapter_id.filter(|c| !c.is_empty());
        let limit = if chapter_id.is_some() {
            CHAPTER_GALLERY_LIMIT
        } else {
            GALLERY_LIMIT
        };
        self.images.list(chapter_id, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockAiWorkerPort, MockImageCacheRepo};
    use chronoquest_domain::ChapterId;

    fn request() -> ImageRequest {
        ImageRequest {
            prompt: "A busy rice market at dawn".into(),
            era: Some("Edo Japan".into()),
            region: Some("Kanto".into()),
            chapter_id: Some(ChapterId::new("2")),
            scene_id: Some("market".into()),
            ..ImageRequest::default()
        }
    }

    fn cached_record() -> ImageRecord {
        ImageRecord {
            id: 7,
            prompt_hash: "f8fc89efaadd359d".into(),
            prompt: "...".into(),
            chapter_id: Some("2".into()),
            scene_id: Some("market".into()),
            r2_key: Some("images/market.png".into()),
            url: "https://cdn.example/market.png".into(),
            model: Some(IMAGE_MODEL.into()),
            created_at: "2026-03-01T12:00:00+00:00".into(),
        }
    }

    #[tokio::test]
    async fn cache_hit_skips_the_worker() {
        let mut images = MockImageCacheRepo::new();
        images
            .expect_find_by_hash()
            .withf(|hash| hash == "f8fc89efaadd359d")
            .returning(|_| Ok(Some(cached_record())));
        let mut worker = MockAiWorkerPort::new();
        worker.expect_image().never();

        let use_case = GenerateImage::new(Arc::new(worker), Arc::new(images));
        let response = use_case.execute(request()).await.unwrap();
        assert!(response.cached);
        assert_eq!(response.id, Some(7));
        assert_eq!(response.url, "https://cdn.example/market.png");
    }

    #[tokio::test]
    async fn cache_miss_generates_and_stores_full_prompt() {
        let mut images = MockImageCacheRepo::new();
        images.expect_find_by_hash().returning(|_| Ok(None));
        images
            .expect_insert()
            .withf(|r| {
                r.prompt_hash == "f8fc89efaadd359d"
                    && r.prompt.contains("Setting: Edo Japan, Kanto.")
                    && r.model == IMAGE_MODEL
                    && r.chapter_id.as_deref() == Some("2")
            })
            .times(1)
            .returning(|_| Ok(()));

        let mut worker = MockAiWorkerPort::new();
        worker
            .expect_image()
            .withf(|req| req.prompt == "A busy rice market at dawn" && req.width == 1024)
            .returning(|_| {
                Ok(ImageResponse {
                    url: "https://cdn.example/new.png".into(),
                    r2_key: Some("images/new.png".into()),
                    cached: false,
                    model: Some(IMAGE_MODEL.into()),
                    id: None,
                })
            });

        let use_case = GenerateImage::new(Arc::new(worker), Arc::new(images));
        let response = use_case.execute(request()).await.unwrap();
        assert!(!response.cached);
        assert_eq!(response.url, "https://cdn.example/new.png");
    }

    #[tokio::test]
    async fn worker_failure_is_reported() {
        let mut images = MockImageCacheRepo::new();
        images.expect_find_by_hash().returning(|_| Ok(None));
        images.expect_insert().never();
        let mut worker = MockAiWorkerPort::new();
        worker.expect_image().returning(|_| {
            Err(WorkerError::Status {
                status: 500,
                body: "provider down".into(),
            })
        });

        let use_case = GenerateImage::new(Arc::new(worker), Arc::new(images));
        let result = use_case.execute(request()).await;
        assert!(matches!(result, Err(ImageError::Worker(_))));
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected() {
        let use_case = GenerateImage::new(
            Arc::new(MockAiWorkerPort::new()),
            Arc::new(MockImageCacheRepo::new()),
        );
        let mut req = request();
        req.prompt = " ".into();
        assert!(matches!(
            use_case.execute(req).await,
            Err(ImageError::MissingPrompt)
        ));
    }

    #[tokio::test]
    async fn portrait_uses_npc_scene_id() {
        let mut images = MockImageCacheRepo::new();
        images.expect_find_by_hash().returning(|_| Ok(None));
        images
            .expect_insert()
            .withf(|r| r.scene_id.as_deref() == Some("portrait_Lady_Aiko"))
            .returning(|_| Ok(()));
        let mut worker = MockAiWorkerPort::new();
        worker
            .expect_image()
            .withf(|req| {
                req.scene_id == "portrait_Lady_Aiko" && req.prompt.starts_with("Portrait of Lady Aiko")
            })
            .returning(|_| {
                Ok(ImageResponse {
                    url: "https://cdn.example/aiko.png".into(),
                    r2_key: None,
                    cached: false,
                    model: None,
                    id: None,
                })
            });

        let use_case = GenerateImage::new(Arc::new(worker), Arc::new(images));
        let response = use_case
            .portrait(PortraitRequest {
                npc_name: "Lady Aiko".into(),
                era: Some("Edo Japan".into()),
                region: Some("Kyoto".into()),
                description: Some("A tea master".into()),
                chapter_id: None,
            })
            .await
            .unwrap();
        assert_eq!(response.url, "https://cdn.example/aiko.png");
    }

    #[tokio::test]
    async fn gallery_limit_depends_on_filter() {
        let mut images = MockImageCacheRepo::new();
        images
            .expect_list()
            .withf(|chapter, limit| chapter.is_none() && *limit == GALLERY_LIMIT)
            .returning(|_, _| Ok(vec![]));
        images
            .expect_list()
            .withf(|chapter, limit| {
                chapter.as_deref() == Some("3") && *limit == CHAPTER_GALLERY_LIMIT
            })
            .returning(|_, _| Ok(vec![cached_record()]));

        let gallery = ImageGallery::new(Arc::new(images));
        assert!(gallery.list(None).await.unwrap().is_empty());
        assert!(gallery.list(Some(String::new())).await.unwrap().is_empty());
        assert_eq!(gallery.list(Some("3".into())).await.unwrap().len(), 1);
    }
}

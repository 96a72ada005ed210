//! Service status: health check and cache statistics.

use std::sync::Arc;

use chronoquest_shared::{HealthResponse, ImageStatsResponse};

use crate::infrastructure::ports::{AiWorkerPort, ConversationRepo, ImageCacheRepo, RepoError};

pub const SERVER_NAME: &str = concat!("ChronoQuest v", env!("CARGO_PKG_VERSION"));

pub struct ServiceStatus {
    worker: Arc<dyn AiWorkerPort>,
    images: Arc<dyn ImageCacheRepo>,
    conversations: Arc<dyn ConversationRepo>,
    worker_url: String,
}

impl ServiceStatus {
    pub fn new(
        worker: Arc<dyn AiWorkerPort>,
        images: Arc<dyn ImageCacheRepo>,
        conversations: Arc<dyn ConversationRepo>,
        worker_url: impl Into<String>,
    ) -> Self {
        Self {
            worker,
            images,
            conversations,
            worker_url: worker_url.into(),
        }
    }

    pub async fn health(&self) -> Result<HealthResponse, RepoError> {
        let worker_ok = match self.worker.stats().await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Worker stats probe failed");
                false
            }
        };

        Ok(HealthResponse {
            status: "ok".to_string(),
            server: SERVER_NAME.to_string(),
            worker_url: self.worker_url.clone(),
            worker_ok,
            local_images: self.images.count().await?,
            local_convos: self.conversations.count().await?,
        })
    }

    pub async fn image_stats(&self) -> Result<ImageStatsResponse, RepoError> {
        let worker = self.worker.stats().await.ok();

        Ok(ImageStatsResponse {
            local_images: self.images.count().await?,
            local_convos: self.conversations.count().await?,
            worker_images: worker.map(|s| s.images),
            worker_convos: worker.map(|s| s.conversations),
            worker_url: self.worker_url.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{
        MockAiWorkerPort, MockConversationRepo, MockImageCacheRepo, WorkerError, WorkerStats,
    };

    fn counts() -> (MockImageCacheRepo, MockConversationRepo) {
        let mut images = MockImageCacheRepo::new();
        images.expect_count().returning(|| Ok(12));
        let mut conversations = MockConversationRepo::new();
        conversations.expect_count().returning(|| Ok(30));
        (images, conversations)
    }

    #[tokio::test]
    async fn health_reports_worker_down_without_failing() {
        let (images, conversations) = counts();
        let mut worker = MockAiWorkerPort::new();
        worker
            .expect_stats()
            .returning(|| Err(WorkerError::RequestFailed("refused".into())));

        let status = ServiceStatus::new(
            Arc::new(worker),
            Arc::new(images),
            Arc::new(conversations),
            "http://worker",
        );
        let health = status.health().await.unwrap();
        assert_eq!(health.status, "ok");
        assert!(!health.worker_ok);
        assert_eq!(health.local_images, 12);
        assert_eq!(health.local_convos, 30);
    }

    #[tokio::test]
    async fn image_stats_include_worker_counts() {
        let (images, conversations) = counts();
        let mut worker = MockAiWorkerPort::new();
        worker.expect_stats().returning(|| {
            Ok(WorkerStats {
                images: 400,
                conversations: 900,
            })
        });

        let status = ServiceStatus::new(
            Arc::new(worker),
            Arc::new(images),
            Arc::new(conversations),
            "http://worker",
        );
        let stats = status.image_stats().await.unwrap();
        assert_eq!(stats.worker_images, Some(400));
        assert_eq!(stats.worker_convos, Some(900));
        assert_eq!(stats.worker_url, "http://worker");
    }
}

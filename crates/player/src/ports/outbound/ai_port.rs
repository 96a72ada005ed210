//! AI content proxy (`/api/ai/*` on the engine)

use async_trait::async_trait;

use chronoquest_shared::{ChatRequest, ChatResponse, ImageRequest, ImageResponse, PortraitRequest};

use super::ClientError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiContentPort: Send + Sync {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ClientError>;

    async fn image(&self, request: ImageRequest) -> Result<ImageResponse, ClientError>;

    async fn portrait(&self, request: PortraitRequest) -> Result<ImageResponse, ClientError>;
}

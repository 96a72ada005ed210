//! AI worker client
//!
//! The worker is an HTTP service that fronts the generative model provider
//! and the long-term image/conversation stores. Requests are plain JSON.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use chronoquest_shared::ImageResponse;

use crate::infrastructure::ports::{
    AiWorkerPort, WorkerChatReply, WorkerChatRequest, WorkerError, WorkerImageRequest,
    WorkerStats,
};

/// Default worker base URL.
pub const DEFAULT_WORKER_URL: &str = "http://localhost:8787";

/// Chat replies are short; do not wait long for them.
pub const DEFAULT_CHAT_TIMEOUT: Duration = Duration::from_secs(30);

/// Image generation is slow.
pub const DEFAULT_IMAGE_TIMEOUT: Duration = Duration::from_secs(90);

const STATS_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the AI worker's JSON API
#[derive(Clone)]
pub struct WorkerClient {
    client: Client,
    base_url: String,
    chat_timeout: Duration,
    image_timeout: Duration,
}

impl WorkerClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeouts(base_url, DEFAULT_CHAT_TIMEOUT, DEFAULT_IMAGE_TIMEOUT)
    }

    pub fn with_timeouts(base_url: &str, chat_timeout: Duration, image_timeout: Duration) -> Self {
        // Per-request timeouts below are tighter than this ceiling
        let client = Client::builder()
            .timeout(chat_timeout.max(image_timeout))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            chat_timeout,
            image_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, WorkerError> {
        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            body.truncate(200);
            return Err(WorkerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| WorkerError::InvalidResponse(e.to_string()))
    }
}

impl Default for WorkerClient {
    fn default() -> Self {
        Self::new(DEFAULT_WORKER_URL)
    }
}

fn map_reqwest_error(e: reqwest::Error) -> WorkerError {
    if e.is_timeout() {
        WorkerError::Timeout
    } else {
        WorkerError::RequestFailed(e.to_string())
    }
}

#[async_trait]
impl AiWorkerPort for WorkerClient {
    async fn chat(&self, request: WorkerChatRequest) -> Result<WorkerChatReply, WorkerError> {
        tracing::debug!(npc = %request.npc_name, turns = request.history.len(), "Worker chat");
        Self::send(
            self.client
                .post(format!("{}/chat", self.base_url))
                .timeout(self.chat_timeout)
                .json(&request),
        )
        .await
    }

    async fn image(&self, request: WorkerImageRequest) -> Result<ImageResponse, WorkerError> {
        tracing::debug!(scene_id = %request.scene_id, "Worker image");
        Self::send(
            self.client
                .post(format!("{}/image", self.base_url))
                .timeout(self.image_timeout)
                .json(&request),
        )
        .await
    }

    async fn stats(&self) -> Result<WorkerStats, WorkerError> {
        Self::send(
            self.client
                .get(format!("{}/stats", self.base_url))
                .timeout(STATS_TIMEOUT),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::ChatTurn;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = WorkerClient::new("https://worker.example.dev/");
        assert_eq!(client.base_url(), "https://worker.example.dev");
    }

    #[test]
    fn chat_request_uses_worker_field_names() {
        let body = serde_json::to_value(WorkerChatRequest {
            user_message: "Hello".into(),
            npc_name: "Hiro".into(),
            era: "Edo Japan".into(),
            chapter_title: "Edo Japan".into(),
            history: vec![ChatTurn::user("a"), ChatTurn::assistant("b")],
            chapter_id: "2".into(),
        })
        .unwrap();
        assert_eq!(body["userMessage"], "Hello");
        assert_eq!(body["chapterTitle"], "Edo Japan");
        assert_eq!(body["history"][1]["role"], "assistant");
    }

    #[tokio::test]
    async fn unreachable_worker_is_a_request_failure() {
        // Port 9 (discard) is never served locally
        let client = WorkerClient::with_timeouts(
            "http://127.0.0.1:9",
            Duration::from_secs(2),
            Duration::from_secs(2),
        );
        let result = client.stats().await;
        assert!(matches!(
            result,
            Err(WorkerError::RequestFailed(_)) | Err(WorkerError::Timeout)
        ));
    }
}

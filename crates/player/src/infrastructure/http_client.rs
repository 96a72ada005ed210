//! HTTP client for the engine API.
//!
//! Implements content loading, the AI proxy and the progress mirror against
//! a running engine. Every request carries the session id header so the
//! engine files progress under the same session across restarts.

use async_trait::async_trait;
use std::time::Duration;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use chronoquest_domain::{ChapterId, ChapterSummary, Glossary, ProgressSnapshot};
use chronoquest_shared::{
    ChatRequest, ChatResponse, ErrorBody, ImageRequest, ImageResponse, PortraitRequest,
    SaveProgressResponse, SESSION_HEADER,
};

use crate::ports::outbound::{AiContentPort, ClientError, ContentSource, ProgressSyncPort};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

/// Request deadlines are enforced by the callers; this only bounds connecting.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct ApiClient {
    client: Client,
    base_url: String,
    session_id: String,
}

impl ApiClient {
    pub fn new(base_url: &str, session_id: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .connect_timeout(CONNECT_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
            session_id: session_id.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .header(SESSION_HEADER, &self.session_id)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .header(SESSION_HEADER, &self.session_id)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| match b.details {
                    Some(details) => format!("{}: {}", b.error, details),
                    None => b.error,
                })
                .unwrap_or(body);
            if status == StatusCode::NOT_FOUND {
                return Err(ClientError::NotFound(message));
            }
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response.json().await.map_err(ClientError::invalid)
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::Request(e.to_string())
    }
}

#[async_trait]
impl ContentSource for ApiClient {
    async fn list_chapters(&self) -> Result<Vec<ChapterSummary>, ClientError> {
        Self::send(self.get("/api/chapters")).await
    }

    async fn chapter(&self, id: &ChapterId) -> Result<serde_json::Value, ClientError> {
        Self::send(self.get(&format!("/api/chapters/{}", id))).await
    }

    async fn glossary(&self) -> Result<Glossary, ClientError> {
        Self::send(self.get("/api/glossary")).await
    }
}

#[async_trait]
impl AiContentPort for ApiClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ClientError> {
        Self::send(self.post("/api/ai/chat").json(&request)).await
    }

    async fn image(&self, request: ImageRequest) -> Result<ImageResponse, ClientError> {
        Self::send(self.post("/api/ai/image").json(&request)).await
    }

    async fn portrait(&self, request: PortraitRequest) -> Result<ImageResponse, ClientError> {
        Self::send(self.post("/api/ai/portrait").json(&request)).await
    }
}

#[async_trait]
impl ProgressSyncPort for ApiClient {
    async fn push(&self, snapshot: &ProgressSnapshot) -> Result<(), ClientError> {
        let response: SaveProgressResponse =
            Self::send(self.post("/api/progress/save").json(snapshot)).await?;
        if response.success {
            Ok(())
        } else {
            Err(ClientError::invalid("progress save not acknowledged"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:3000/", "sid");
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.session_id(), "sid");
    }

    #[tokio::test]
    async fn unreachable_engine_is_a_request_error() {
        // Port 9 (discard) is never served locally
        let client = ApiClient::new("http://127.0.0.1:9", "sid");
        let result = client.list_chapters().await;
        assert!(matches!(
            result,
            Err(ClientError::Request(_)) | Err(ClientError::Timeout)
        ));
    }
}

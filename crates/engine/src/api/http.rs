//! HTTP routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use chronoquest_domain::{ChapterId, ChapterSummary, Glossary, ProgressSnapshot};
use chronoquest_shared::{
    AdminChapterRequest, AdminChapterResponse, ChatRequest, ChatResponse, ErrorBody,
    HealthResponse, ImageRecord, ImageRequest, ImageResponse, ImageStatsResponse,
    PortraitRequest, SaveProgressResponse,
};

use super::session::SessionId;
use crate::app::App;
use crate::infrastructure::ports::{ContentError, RepoError};
use crate::use_cases::{AuthoringError, ChatError, ImageError};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/chapters", get(list_chapters))
        .route("/api/chapters/{id}", get(get_chapter))
        .route("/api/glossary", get(glossary))
        .route("/api/ai/chat", post(chat))
        .route("/api/ai/image", post(generate_image))
        .route("/api/ai/portrait", post(generate_portrait))
        .route("/api/progress/save", post(save_progress))
        .route("/api/progress/load", get(load_progress))
        .route("/api/admin/chapter", post(save_chapter))
        .route("/api/images", get(list_images))
        .route("/api/images/stats", get(image_stats))
}

async fn health(State(app): State<Arc<App>>) -> Result<Json<HealthResponse>, ApiError> {
    Ok(Json(app.use_cases.status.health().await?))
}

async fn list_chapters(
    State(app): State<Arc<App>>,
) -> Result<Json<Vec<ChapterSummary>>, ApiError> {
    Ok(Json(app.use_cases.catalog.list().await?))
}

async fn get_chapter(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    app.use_cases
        .catalog
        .get(&ChapterId::new(id))
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Chapter not found".to_string()))
}

async fn glossary(State(app): State<Arc<App>>) -> Result<Json<Glossary>, ApiError> {
    Ok(Json(app.use_cases.catalog.glossary().await?))
}

async fn chat(
    State(app): State<Arc<App>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let reply = app
        .use_cases
        .chat
        .execute(request)
        .await
        .map_err(|e| match e {
            ChatError::MissingMessage => ApiError::BadRequest(e.to_string()),
        })?;
    Ok(Json(reply))
}

async fn generate_image(
    State(app): State<Arc<App>>,
    Json(request): Json<ImageRequest>,
) -> Result<Json<ImageResponse>, ApiError> {
    let image = app
        .use_cases
        .images
        .execute(request)
        .await
        .map_err(|e| ApiError::from_image(e, "Image generation failed"))?;
    Ok(Json(image))
}

async fn generate_portrait(
    State(app): State<Arc<App>>,
    Json(request): Json<PortraitRequest>,
) -> Result<Json<ImageResponse>, ApiError> {
    let image = app
        .use_cases
        .images
        .portrait(request)
        .await
        .map_err(|e| ApiError::from_image(e, "Portrait generation failed"))?;
    Ok(Json(image))
}

async fn save_progress(
    State(app): State<Arc<App>>,
    session: SessionId,
    Json(snapshot): Json<ProgressSnapshot>,
) -> Result<Response, ApiError> {
    app.use_cases
        .progress
        .save(session.as_str(), &snapshot)
        .await?;
    Ok(session.respond(Json(SaveProgressResponse { success: true })))
}

/// Returns the stored snapshot, or `{}` when the session has none.
async fn load_progress(
    State(app): State<Arc<App>>,
    session: SessionId,
) -> Result<Response, ApiError> {
    let body = match app.use_cases.progress.load(session.as_str()).await? {
        Some(snapshot) => serde_json::to_value(snapshot)
            .map_err(|e| ApiError::Internal(e.to_string()))?,
        None => serde_json::json!({}),
    };
    Ok(session.respond(Json(body)))
}

async fn save_chapter(
    State(app): State<Arc<App>>,
    Json(request): Json<AdminChapterRequest>,
) -> Result<Json<AdminChapterResponse>, ApiError> {
    let saved = app
        .use_cases
        .authoring
        .execute(request)
        .await
        .map_err(|e| match e {
            AuthoringError::MissingChapter => ApiError::BadRequest(e.to_string()),
            AuthoringError::Invalid(issues) => ApiError::Invalid(issues),
            AuthoringError::Content(e) => e.into(),
        })?;
    Ok(Json(saved))
}

#[derive(Debug, Default, Deserialize)]
struct ImagesQuery {
    chapter: Option<String>,
}

async fn list_images(
    State(app): State<Arc<App>>,
    Query(query): Query<ImagesQuery>,
) -> Result<Json<Vec<ImageRecord>>, ApiError> {
    let chapter = query.chapter.filter(|c| !c.is_empty());
    Ok(Json(app.use_cases.gallery.list(chapter).await?))
}

async fn image_stats(State(app): State<Arc<App>>) -> Result<Json<ImageStatsResponse>, ApiError> {
    Ok(Json(app.use_cases.status.image_stats().await?))
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    /// A chapter document failed validation.
    Invalid(Vec<String>),
    /// The AI worker failed.
    BadGateway { error: String, details: String },
    Internal(String),
}

impl ApiError {
    fn from_image(error: ImageError, failure: &str) -> Self {
        match error {
            ImageError::MissingPrompt | ImageError::MissingNpcName => {
                ApiError::BadRequest(error.to_string())
            }
            ImageError::Worker(e) => ApiError::BadGateway {
                error: failure.to_string(),
                details: e.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorBody::new(msg)),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorBody::new(msg)),
            ApiError::Invalid(issues) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("Invalid chapter data").with_issues(issues),
            ),
            ApiError::BadGateway { error, details } => {
                tracing::warn!(error = %error, details = %details, "Worker request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody::new(error).with_details(details),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("Internal error"),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<ContentError> for ApiError {
    fn from(e: ContentError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

//! AI content boundary
//!
//! Every call is bounded by a timeout and never fails: dialogue degrades to
//! the era's canned lines and images degrade to no image. Successful images
//! are memoized per scene and portraits per NPC, so revisiting a scene costs
//! nothing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chronoquest_domain::offline::{fallback_line, is_fallback_model, FALLBACK_MODEL};
use chronoquest_domain::ChapterId;
use chronoquest_shared::{ChatRequest, ImageRequest, ImageResponse, PortraitRequest};

use crate::ports::outbound::{AiContentPort, ClientError};

pub const DEFAULT_CHAT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_IMAGE_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Player,
    Npc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueLine {
    pub speaker: Speaker,
    pub text: String,
}

/// Who is being talked to, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueContext {
    pub npc_name: String,
    pub era: String,
    pub chapter_id: ChapterId,
    pub chapter_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueReply {
    pub reply: String,
    pub model: String,
    /// The reply came from the canned pools, here or on the engine.
    pub offline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneImage {
    pub url: String,
    /// Served from the engine's cache rather than freshly generated.
    pub cached: bool,
}

impl From<ImageResponse> for SceneImage {
    fn from(response: ImageResponse) -> Self {
        Self {
            url: response.url,
            cached: response.cached,
        }
    }
}

pub struct AiContentClient {
    port: Option<Arc<dyn AiContentPort>>,
    chat_timeout: Duration,
    image_timeout: Duration,
    images: Mutex<HashMap<String, SceneImage>>,
    portraits: Mutex<HashMap<String, SceneImage>>,
    online: AtomicBool,
}

impl AiContentClient {
    pub fn new(port: Arc<dyn AiContentPort>) -> Self {
        Self::build(Some(port))
    }

    /// A client with no engine behind it: every call resolves to fallback.
    pub fn offline() -> Self {
        Self::build(None)
    }

    fn build(port: Option<Arc<dyn AiContentPort>>) -> Self {
        let online = port.is_some();
        Self {
            port,
            chat_timeout: DEFAULT_CHAT_TIMEOUT,
            image_timeout: DEFAULT_IMAGE_TIMEOUT,
            images: Mutex::new(HashMap::new()),
            portraits: Mutex::new(HashMap::new()),
            online: AtomicBool::new(online),
        }
    }

    pub fn with_timeouts(mut self, chat: Duration, image: Duration) -> Self {
        self.chat_timeout = chat;
        self.image_timeout = image;
        self
    }

    /// Whether the last dialogue came from the AI rather than the fallback.
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }

    pub async fn get_dialogue(
        &self,
        context: &DialogueContext,
        message: &str,
        history: &[DialogueLine],
    ) -> DialogueReply {
        let request = ChatRequest {
            message: message.to_string(),
            npc_name: Some(context.npc_name.clone()),
            chapter_era: Some(context.era.clone()),
            chapter_id: Some(context.chapter_id.clone()),
            chapter_title: Some(context.chapter_title.clone()),
        };

        let result = match &self.port {
            Some(port) => bounded(self.chat_timeout, port.chat(request)).await,
            None => Err(ClientError::Request("offline".into())),
        };

        let reply = match result {
            Ok(response) if !response.reply.trim().is_empty() => DialogueReply {
                offline: is_fallback_model(&response.model),
                reply: response.reply,
                model: response.model,
            },
            Ok(_) => Self::fallback(context, history),
            Err(e) => {
                tracing::debug!(npc = %context.npc_name, error = %e, "Dialogue unavailable, using fallback");
                Self::fallback(context, history)
            }
        };

        self.online.store(!reply.offline, Ordering::Relaxed);
        reply
    }

    fn fallback(context: &DialogueContext, history: &[DialogueLine]) -> DialogueReply {
        let turn = history
            .iter()
            .filter(|line| line.speaker == Speaker::Npc)
            .count();
        DialogueReply {
            reply: fallback_line(&context.era, turn).to_string(),
            model: FALLBACK_MODEL.to_string(),
            offline: true,
        }
    }

    /// Background image for a scene, memoized per `{chapterId}_{sceneId}`.
    pub async fn get_scene_image(&self, request: ImageRequest) -> Option<SceneImage> {
        let key = match (&request.chapter_id, &request.scene_id) {
            (Some(chapter), Some(scene)) => Some(format!("{}_{}", chapter, scene)),
            _ => None,
        };
        if let Some(hit) = key.as_deref().and_then(|k| remembered(&self.images, k)) {
            return Some(hit);
        }

        let port = self.port.as_ref()?;
        match bounded(self.image_timeout, port.image(request)).await {
            Ok(response) => {
                let image = SceneImage::from(response);
                if let Some(key) = key {
                    remember(&self.images, key, image.clone());
                }
                Some(image)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Scene image unavailable");
                None
            }
        }
    }

    /// NPC portrait, memoized per NPC name.
    pub async fn get_portrait(&self, request: PortraitRequest) -> Option<SceneImage> {
        if let Some(hit) = remembered(&self.portraits, &request.npc_name) {
            return Some(hit);
        }

        let port = self.port.as_ref()?;
        let npc_name = request.npc_name.clone();
        match bounded(self.image_timeout, port.portrait(request)).await {
            Ok(response) => {
                let image = SceneImage::from(response);
                remember(&self.portraits, npc_name, image.clone());
                Some(image)
            }
            Err(e) => {
                tracing::debug!(npc = %npc_name, error = %e, "Portrait unavailable");
                None
            }
        }
    }
}

async fn bounded<T>(
    limit: Duration,
    call: impl std::future::Future<Output = Result<T, ClientError>>,
) -> Result<T, ClientError> {
    tokio::time::timeout(limit, call)
        .await
        .unwrap_or(Err(ClientError::Timeout))
}

fn remembered(memo: &Mutex<HashMap<String, SceneImage>>, key: &str) -> Option<SceneImage> {
    memo.lock().ok().and_then(|m| m.get(key).cloned())
}

fn remember(memo: &Mutex<HashMap<String, SceneImage>>, key: String, image: SceneImage) {
    if let Ok(mut m) = memo.lock() {
        m.insert(key, image);
    }
}

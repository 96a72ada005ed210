//! Engine configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `SERVER_HOST` - bind address (default: 0.0.0.0)
//! - `SERVER_PORT` / `PORT` - bind port (default: 3000)
//! - `AI_WORKER_URL` - base URL of the AI worker
//! - `CONTENT_DIR` - directory holding `chapter_*.json` and `glossary.json` (default: data)
//! - `CACHE_DB` - SQLite cache path (default: data/chronoquest.db)
//! - `CHAT_TIMEOUT_SECS` - worker chat timeout (default: 30)
//! - `IMAGE_TIMEOUT_SECS` - worker image timeout (default: 90)
//! - `CORS_ALLOWED_ORIGINS` - `*` or a comma-separated origin list; unset disables CORS

use std::path::PathBuf;
use std::time::Duration;

use crate::infrastructure::worker::{DEFAULT_CHAT_TIMEOUT, DEFAULT_IMAGE_TIMEOUT, DEFAULT_WORKER_URL};

pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_CONTENT_DIR: &str = "data";
pub const DEFAULT_CACHE_DB: &str = "data/chronoquest.db";

/// Read an environment variable, falling back to `default` when missing or unparseable.
fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub server_host: String,
    pub server_port: u16,
    pub worker_url: String,
    pub content_dir: PathBuf,
    pub cache_db: String,
    pub chat_timeout: Duration,
    pub image_timeout: Duration,
    pub cors_allowed_origins: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            worker_url: DEFAULT_WORKER_URL.to_string(),
            content_dir: PathBuf::from(DEFAULT_CONTENT_DIR),
            cache_db: DEFAULT_CACHE_DB.to_string(),
            chat_timeout: DEFAULT_CHAT_TIMEOUT,
            image_timeout: DEFAULT_IMAGE_TIMEOUT,
            cors_allowed_origins: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let server_port = env_string("SERVER_PORT")
            .or_else(|| env_string("PORT"))
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.server_port);

        Self {
            server_host: env_string("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port,
            worker_url: env_string("AI_WORKER_URL").unwrap_or(defaults.worker_url),
            content_dir: env_string("CONTENT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.content_dir),
            cache_db: env_string("CACHE_DB").unwrap_or(defaults.cache_db),
            chat_timeout: Duration::from_secs(env_or(
                "CHAT_TIMEOUT_SECS",
                defaults.chat_timeout.as_secs(),
            )),
            image_timeout: Duration::from_secs(env_or(
                "IMAGE_TIMEOUT_SECS",
                defaults.image_timeout.as_secs(),
            )),
            cors_allowed_origins: env_string("CORS_ALLOWED_ORIGINS"),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

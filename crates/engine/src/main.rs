//! ChronoQuest Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chronoquest_engine::{
    api,
    app::{App, Ports},
    config::EngineConfig,
    infrastructure::{
        clock::SystemClock,
        content::FsContentRepo,
        ports::ClockPort,
        resilient_worker::{ResilientWorkerClient, RetryConfig},
        sqlite::SqliteCache,
        worker::WorkerClient,
    },
};
use chronoquest_shared::SESSION_HEADER;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine is usually run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chronoquest_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ChronoQuest Engine");

    let config = EngineConfig::from_env();
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);

    tracing::info!(path = %config.cache_db, "Opening cache database");
    let cache = Arc::new(SqliteCache::new(&config.cache_db, clock).await?);

    let worker_client = Arc::new(WorkerClient::with_timeouts(
        &config.worker_url,
        config.chat_timeout,
        config.image_timeout,
    ));
    let retry_config = RetryConfig::default();
    tracing::info!(
        worker_url = %config.worker_url,
        "AI worker configured with retry: max_retries={}, base_delay_ms={}",
        retry_config.max_retries,
        retry_config.base_delay_ms
    );
    let worker = Arc::new(ResilientWorkerClient::new(worker_client, retry_config));

    tracing::info!(dir = %config.content_dir.display(), "Serving chapter content");
    let content = Arc::new(FsContentRepo::new(config.content_dir.clone()));

    let app = Arc::new(App::new(
        Ports {
            worker,
            images: cache.clone(),
            conversations: cache.clone(),
            progress: cache,
            content,
        },
        config.worker_url.clone(),
    ));

    let mut router = api::http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer(config.cors_allowed_origins.as_deref()) {
        router = router.layer(cors);
    }

    // Start server
    let addr: SocketAddr = config.bind_address().parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer(allowed_origins: Option<&str>) -> Option<CorsLayer> {
    let allowed_origins = allowed_origins?;

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        // The player sends its session id and JSON bodies, both of which trigger preflights.
        .allow_headers([
            HeaderName::from_static(SESSION_HEADER),
            axum::http::header::CONTENT_TYPE,
        ]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}

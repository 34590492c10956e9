use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod api;
pub mod draft;
pub mod startup_checks;
pub mod vault;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub vault: VaultConfig,
    #[serde(default)]
    pub draft: Option<DraftConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub name: String,
    pub log_level: String,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VaultConfig {
    /// Where posts are stored. Overridable with the POSTS_DIR environment
    /// variable; defaults to a `posts` directory next to the process.
    pub source_directory: PathBuf,
    #[serde(default)]
    pub refresh_interval_minutes: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DraftConfig {
    pub model: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Environment variable holding the generation service API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3001,
            },
            app: AppConfig {
                name: "Lumina".to_string(),
                log_level: "info".to_string(),
                base_url: None,
            },
            vault: VaultConfig {
                source_directory: PathBuf::from("posts"),
                refresh_interval_minutes: None,
            },
            draft: None,
        }
    }
}

use axum::{Router, routing::get, routing::post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use vault::{VaultRoot, VaultStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<VaultStore>,
    pub draft: Option<Arc<draft::DraftGenerator>>,
    pub config: Config,
}

pub async fn create_app(config: Config) -> Router {
    let store = Arc::new(VaultStore::new(VaultRoot::new(
        config.vault.source_directory.clone(),
    )));

    if let Err(e) = store.refresh().await {
        tracing::warn!("Initial vault scan failed: {}", e);
    }

    if let Some(interval_minutes) = config.vault.refresh_interval_minutes
        && interval_minutes > 0
    {
        VaultStore::start_background_refresh(store.clone(), interval_minutes);
    }

    let draft = config
        .draft
        .as_ref()
        .and_then(draft::DraftGenerator::from_config)
        .map(Arc::new);
    if draft.is_none() {
        tracing::info!("Draft generation disabled (no API key configured)");
    }

    let app_state = AppState {
        store,
        draft,
        config,
    };

    Router::new()
        .route(
            "/api/posts",
            get(api::list_posts_handler).post(api::save_post_handler),
        )
        .route("/api/generate", post(api::generate_draft_handler))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    let method = request.method();
                    let uri = request.uri();

                    tracing::info_span!(
                        "http_request",
                        method = %method,
                        uri = %uri,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::info!(
                            target: "access_log",
                            status = %response.status(),
                            latency_ms = %latency.as_millis(),
                            "response"
                        );
                    },
                ),
        )
        .with_state(app_state)
}

//! JSON API over the vault: the network contract served to web deployments
//! that have no direct filesystem access.

use crate::AppState;
use crate::draft::DraftRequest;
use crate::vault::types::{derive_excerpt, read_time_minutes};
use crate::vault::{Author, Post};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

/// Post-shaped request body. Everything but title and content is optional;
/// an id that is already a filename selects the file to overwrite.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePostRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
}

impl SavePostRequest {
    fn into_post(self) -> Post {
        let content = self.content.unwrap_or_default();
        let title = self
            .title
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| "Untitled".to_string());

        let excerpt = self.excerpt.unwrap_or_else(|| derive_excerpt(&content));
        let read_time_minutes = read_time_minutes(&content);

        Post {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            title,
            excerpt,
            content,
            author: self.author.unwrap_or_default(),
            cover_image_url: self.cover_image_url.unwrap_or_default(),
            published_at: self.published_at.unwrap_or_else(Utc::now),
            read_time_minutes,
            tags: self.tags,
            categories: self.categories,
            file_ref: None,
        }
        .with_publish_defaults()
    }
}

/// `GET /api/posts`: rescan the vault and return the collection, newest
/// first. The scan runs per request so the listing always reflects disk.
pub async fn list_posts_handler(State(app_state): State<AppState>) -> impl IntoResponse {
    match app_state.store.refresh().await {
        Ok(_) => Json(app_state.store.list().await).into_response(),
        Err(e) => {
            error!("Failed to fetch posts: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch posts" })),
            )
                .into_response()
        }
    }
}

/// `POST /api/posts`: create or overwrite the backing file, then respond
/// with the post as re-parsed from what was actually written.
pub async fn save_post_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<SavePostRequest>,
) -> impl IntoResponse {
    match app_state.store.save(payload.into_post()).await {
        Ok(saved) => Json(saved).into_response(),
        Err(e) => {
            error!("Failed to save post: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to save post" })),
            )
                .into_response()
        }
    }
}

/// `POST /api/generate`: produce a structured draft for a topic.
pub async fn generate_draft_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<DraftRequest>,
) -> impl IntoResponse {
    let Some(generator) = app_state.draft.as_ref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "Draft generation is not configured" })),
        )
            .into_response();
    };

    let tone = payload.tone.as_deref().unwrap_or("Professional");

    match generator.generate(&payload.topic, tone).await {
        Ok(draft) => Json(draft).into_response(),
        Err(e) => {
            error!("Draft generation failed: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "Draft generation failed" })),
            )
                .into_response()
        }
    }
}

//! AI-assisted draft generation against a hosted generation service.
//!
//! The service is an opaque capability: one request, one structured draft or
//! an error. Without an API key in the environment the feature is disabled
//! rather than failing at startup.

use crate::DraftConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const SYSTEM_INSTRUCTION: &str = "You are an expert blog writer. \
Your goal is to write high-quality, engaging, and well-structured blog posts in Markdown format. \
The content should use standard Markdown: ## for sections, **bold** for emphasis, etc. \
Do not include the main # Title in the 'content' field, as it is handled separately.";

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("request to generation service failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("generation service returned an unusable response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct DraftRequest {
    pub topic: String,
    #[serde(default)]
    pub tone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDraft {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub read_time_minutes: u32,
}

pub struct DraftGenerator {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl DraftGenerator {
    /// Build a generator from config, reading the API key from the configured
    /// environment variable. Returns `None` when no key is set.
    pub fn from_config(config: &DraftConfig) -> Option<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.is_empty())?;

        Some(Self {
            client: reqwest::Client::new(),
            endpoint: config
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            model: config.model.clone(),
            api_key,
        })
    }

    pub async fn generate(&self, topic: &str, tone: &str) -> Result<GeneratedDraft, DraftError> {
        debug!("Requesting draft for topic: {}", topic);

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        );

        let body = serde_json::json!({
            "systemInstruction": {
                "parts": [{
                    "text": format!("{} Ensure the tone is {}.", SYSTEM_INSTRUCTION, tone)
                }]
            },
            "contents": [{
                "parts": [{
                    "text": format!("Write a comprehensive blog post about: \"{}\".", topic)
                }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "excerpt": { "type": "STRING" },
                        "content": { "type": "STRING" },
                        "tags": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "categories": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "readTimeMinutes": { "type": "INTEGER" }
                    },
                    "required": ["title", "excerpt", "content", "tags", "categories", "readTimeMinutes"]
                }
            }
        });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DraftError::InvalidResponse(format!(
                "status {} from generation service",
                status
            )));
        }

        let payload: serde_json::Value = response.json().await?;
        let text = payload
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(|value| value.as_str())
            .ok_or_else(|| DraftError::InvalidResponse("no candidate text".to_string()))?;

        serde_json::from_str(text).map_err(|e| DraftError::InvalidResponse(e.to_string()))
    }
}

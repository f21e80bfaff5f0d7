//! Gemini integration
//!
//! Provides:
//! - `GeminiClient`: a thin client over the `generateContent` REST endpoint
//! - `ModelClient`: the startup-time ready/unavailable state around it

mod types;

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use types::{GenerateContentRequest, GenerationConfig, RequestContent, RequestPart};
pub use types::{Blob, Candidate, Content, GenerateContentResponse, Part, PromptFeedback};

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Longest upstream error body kept in an error message
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Errors from the model provider or from building the client
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("API key not configured")]
    MissingApiKey,

    #[error("API key is not a valid header value")]
    InvalidApiKey,

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to model failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("model API error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode model response: {0}")]
    Decode(String),
}

/// Client for one Gemini model
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a client. The key is validated here and never stored in
    /// plain form outside the client's default headers.
    pub fn new(
        api_key: &str,
        base_url: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, ModelError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ModelError::MissingApiKey);
        }

        let mut key_value = HeaderValue::from_str(api_key).map_err(|_| ModelError::InvalidApiKey)?;
        key_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key_value);

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(ModelError::Client)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// Model name requests are sent to
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Send a prompt plus one reference image.
    ///
    /// No retries: any transport or API failure is returned as-is.
    pub async fn generate_content(
        &self,
        prompt: &str,
        image: &[u8],
        mime_type: &str,
    ) -> Result<GenerateContentResponse, ModelError> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![
                    RequestPart::Text { text: prompt },
                    RequestPart::InlineData {
                        inline_data: Blob {
                            mime_type: mime_type.to_string(),
                            data: BASE64.encode(image),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["TEXT", "IMAGE"],
            },
        };

        debug!(
            "Sending generateContent request to {} ({} byte {} image)",
            self.model,
            image.len(),
            mime_type
        );

        let response = self.client.post(self.endpoint()).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini API error: {} - {}", status, body);
            return Err(ModelError::Api {
                status,
                body: truncate_chars(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| ModelError::Decode(e.to_string()))
    }
}

fn truncate_chars(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let truncated: String = value.chars().take(limit).collect();
    format!("{truncated}...")
}

/// Model adapter state, fixed at startup.
///
/// There is no transition out of `Unavailable`; recovering requires a
/// restart with a working configuration.
#[derive(Debug)]
pub enum ModelClient {
    Ready(GeminiClient),
    Unavailable { reason: String },
}

impl ModelClient {
    /// Build the adapter from configuration, logging loudly on failure
    pub fn from_config(config: &Config) -> Self {
        let result = match config.api_key.as_ref() {
            Some(key) => GeminiClient::new(
                key.expose_secret(),
                &config.api_base_url,
                &config.model,
                config.request_timeout(),
            ),
            None => Err(ModelError::MissingApiKey),
        };

        match result {
            Ok(client) => {
                info!("Gemini client initialized for model '{}'", client.model());
                ModelClient::Ready(client)
            }
            Err(e) => {
                error!(
                    "Gemini client initialization failed, image generation disabled: {}",
                    e
                );
                ModelClient::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ModelClient::Ready(_))
    }
}

//! Product shot generation pipeline
//!
//! 1. Resolve the product and read its reference image from disk
//! 2. Build the prompt from the requested style tags
//! 3. Send prompt + image to the model and pull the first image back out

use std::io;
use std::path::PathBuf;

use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::gemini::{GenerateContentResponse, ModelClient, ModelError};
use crate::images::build_prompt;

/// Generation failures, one variant per outcome the API reports
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("image generation service unavailable: {0}")]
    Unavailable(String),

    #[error("no product found for case id: {0}")]
    UnknownCase(String),

    #[error("failed to read reference image {path}: {source}", path = path.display())]
    ReferenceImage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("model returned no candidates (feedback: {0})")]
    NoCandidates(String),

    #[error("model returned content but no image data was found")]
    NoImageData,
}

impl GenerateError {
    /// HTTP status the API answers with
    pub fn status_code(&self) -> StatusCode {
        match self {
            GenerateError::UnknownCase(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A decoded image returned by the model
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// Generate a product shot for `case_id` styled by `tags`
pub async fn generate_case_image<S: AsRef<str>>(
    model: &ModelClient,
    catalog: &Catalog,
    case_id: &str,
    tags: &[S],
) -> Result<GeneratedImage, GenerateError> {
    let client = match model {
        ModelClient::Ready(client) => client,
        ModelClient::Unavailable { reason } => {
            return Err(GenerateError::Unavailable(reason.clone()))
        }
    };

    let product = catalog
        .products
        .get(case_id)
        .ok_or_else(|| GenerateError::UnknownCase(case_id.to_string()))?;

    // Not cached: read on every request
    let image = tokio::fs::read(&product.image_path)
        .await
        .map_err(|source| GenerateError::ReferenceImage {
            path: product.image_path.clone(),
            source,
        })?;
    let mime_type = mime_guess::from_path(&product.image_path)
        .first_raw()
        .unwrap_or("image/png");

    let prompt = build_prompt(&catalog.tags, tags, &product.description);
    debug!("Prompt for '{}': {}", case_id, prompt);

    info!(
        "Requesting image for '{}' with {} tag(s) from {}",
        case_id,
        tags.len(),
        client.model()
    );
    let response = client.generate_content(&prompt, &image, mime_type).await?;
    info!("Received model response for '{}'", case_id);

    extract_image(response)
}

/// Pull the first inline image out of the first candidate
pub fn extract_image(response: GenerateContentResponse) -> Result<GeneratedImage, GenerateError> {
    let GenerateContentResponse {
        candidates,
        prompt_feedback,
    } = response;

    let candidate = candidates.into_iter().next().ok_or_else(|| {
        GenerateError::NoCandidates(
            prompt_feedback
                .map(|feedback| feedback.to_string())
                .unwrap_or_else(|| "none".to_string()),
        )
    })?;

    let blob = candidate
        .content
        .into_iter()
        .flat_map(|content| content.parts)
        .find_map(|part| part.inline_data)
        .ok_or(GenerateError::NoImageData)?;

    let data = BASE64
        .decode(blob.data.as_bytes())
        .map_err(|e| ModelError::Decode(format!("invalid base64 image data: {}", e)))?;

    debug!("Decoded {} byte {} image", data.len(), blob.mime_type);

    Ok(GeneratedImage {
        data,
        mime_type: blob.mime_type,
    })
}

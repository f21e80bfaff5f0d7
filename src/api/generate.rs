//! Generation endpoint
//!
//! POST /generate - Render a catalog product into a styled scene

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use tracing::{error, warn};

use super::{error_response, AppState};
use crate::images::generate_case_image;

/// Build the generate router
pub fn router() -> Router<AppState> {
    Router::new().route("/generate", post(generate))
}

/// Generation request. `null` and missing fields are accepted; a missing
/// case id fails the catalog lookup like any other unknown id.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub case_id: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Generate a product image and return it as PNG bytes
async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            error!("Unreadable generate request: {}", rejection.body_text());
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, rejection.body_text());
        }
    };
    let case_id = req.case_id.unwrap_or_default();
    let tags = req.tags.unwrap_or_default();

    match generate_case_image(&state.model, &state.catalog, &case_id, &tags).await {
        Ok(image) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "image/png")],
            image.data,
        )
            .into_response(),
        Err(e) => {
            let status = e.status_code();
            if status.is_server_error() {
                error!(error = ?e, "Generate request for '{}' failed: {}", case_id, e);
            } else {
                warn!("Generate request for '{}' failed: {}", case_id, e);
            }
            error_response(status, e.to_string())
        }
    }
}

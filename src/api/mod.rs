//! HTTP API module - generation endpoint, health check and front-end assets

mod generate;

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::gemini::ModelClient;
pub use generate::GenerateRequest;

/// Shared application state, read-only after startup
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<ModelClient>,
    pub catalog: Arc<Catalog>,
}

/// Build the API router
pub fn router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route_service("/", ServeFile::new(&config.index_page))
        .nest_service("/static", ServeDir::new(&config.assets_dir))
        .merge(generate::router())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub(crate) fn error_response(status: StatusCode, error: impl Into<String>) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    if state.model.is_ready() {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                model: "ready",
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy",
                model: "unavailable",
            }),
        )
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    model: &'static str,
}

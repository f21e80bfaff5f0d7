//! caseshot - product shot generation server
//!
//! Renders catalog PC cases into styled scenes by sending a reference image
//! and a tag-driven prompt to a Gemini image model.

pub mod api;
pub mod catalog;
pub mod config;
pub mod gemini;
pub mod images;

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use api::AppState;
use catalog::Catalog;
pub use config::{Config, ConfigError};
use gemini::ModelClient;

/// The caseshot server instance
pub struct Server {
    config: Config,
    state: AppState,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Server {
    /// Create a new server instance.
    ///
    /// A config without a usable API key still produces a server; the
    /// generation endpoint then answers with service-unavailable errors.
    pub fn new(config: Config) -> Self {
        let catalog = Catalog::builtin(&config.assets_dir);
        info!(
            "Catalog loaded: products [{}], {} style tags",
            catalog.products.ids().join(", "),
            catalog.tags.len()
        );
        catalog.products.check_assets();

        let model = ModelClient::from_config(&config);
        info!("Using model '{}'", config.model);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            config,
            state: AppState {
                model: Arc::new(model),
                catalog: Arc::new(catalog),
            },
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Get the shared model handle
    pub fn model(&self) -> Arc<ModelClient> {
        self.state.model.clone()
    }

    /// Build the router
    fn router(&self) -> Router {
        api::router(self.state.clone(), &self.config)
    }

    /// Run the server until shutdown
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr()).await?;
        let local_addr = listener.local_addr()?;
        info!("caseshot listening on {}", local_addr);

        let router = self.router();
        let mut shutdown_rx = self.shutdown_rx.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown_rx.changed().await.ok();
            })
            .await?;

        info!("caseshot shutdown complete");
        Ok(())
    }

    /// Signal the server to shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

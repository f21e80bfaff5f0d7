//! Common test utilities
//!
//! - `CaseshotTest`: spawns a real caseshot server on a random port with a
//!   temporary assets directory
//! - `MockGemini`: a canned `generateContent` upstream that records requests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use caseshot::{Config, Server};
use parking_lot::Mutex;
use reqwest::Client;
use secrecy::SecretString;
use serde_json::Value;
use tempfile::TempDir;
use tokio::task::JoinHandle;

/// Reference image bytes written for `white_case`
pub const WHITE_CASE_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nwhite-case-reference";
/// Reference image bytes written for `black_case`
pub const BLACK_CASE_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nblack-case-reference";
/// Front-end page written to the temp dir
pub const INDEX_HTML: &str = "<!doctype html><title>caseshot</title>";
/// API key the harness configures
pub const TEST_API_KEY: &str = "test-api-key";

/// Test harness that spawns a real caseshot server on a random port
pub struct CaseshotTest {
    pub addr: SocketAddr,
    pub client: Client,
    pub assets_dir: PathBuf,
    server: Arc<Server>,
    _temp_dir: TempDir,
    _handle: JoinHandle<()>,
}

impl CaseshotTest {
    /// Start a server whose model calls go to `upstream`
    pub async fn start(upstream: &MockGemini) -> Result<Self> {
        Self::start_with(Some(TEST_API_KEY), upstream.base_url()).await
    }

    /// Start a server with no API key (model unavailable)
    pub async fn start_unconfigured() -> Result<Self> {
        Self::start_with(None, "http://127.0.0.1:9/v1beta".to_string()).await
    }

    pub async fn start_with(api_key: Option<&str>, api_base_url: String) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let assets_dir = temp_dir.path().join("static");
        std::fs::create_dir_all(&assets_dir)?;
        std::fs::write(assets_dir.join("AP202_PBA_WHITE.png"), WHITE_CASE_BYTES)?;
        std::fs::write(assets_dir.join("pa401.png"), BLACK_CASE_BYTES)?;
        let index_page = temp_dir.path().join("index.html");
        std::fs::write(&index_page, INDEX_HTML)?;

        // Find a random available port
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        drop(listener);

        let config = Config {
            host: addr.ip(),
            port: addr.port(),
            api_key: api_key.map(|key| SecretString::from(key.to_string())),
            api_base_url,
            request_timeout_secs: 5,
            assets_dir: assets_dir.clone(),
            index_page,
            ..Config::default()
        };

        let server = Arc::new(Server::new(config));
        let server_clone = server.clone();

        // Spawn the server in a background task
        let handle = tokio::spawn(async move {
            if let Err(e) = server_clone.run().await {
                eprintln!("Server error: {}", e);
            }
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        // Poll until server is ready (max 2 seconds)
        let mut ready = false;
        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if client
                .get(format!("http://{}/health", addr))
                .send()
                .await
                .is_ok()
            {
                ready = true;
                break;
            }
        }

        if !ready {
            panic!("Server failed to start within 2 seconds");
        }

        Ok(Self {
            addr,
            client,
            assets_dir,
            server,
            _temp_dir: temp_dir,
            _handle: handle,
        })
    }

    /// Get the base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(format!("{}{}", self.base_url(), path))
            .send()
            .await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(format!("{}{}", self.base_url(), path))
            .json(body)
            .send()
            .await?)
    }

    /// POST /generate
    pub async fn generate(&self, case_id: &str, tags: &[&str]) -> Result<reqwest::Response> {
        self.post(
            "/generate",
            &serde_json::json!({ "case_id": case_id, "tags": tags }),
        )
        .await
    }

    pub fn model_ready(&self) -> bool {
        self.server.model().is_ready()
    }

    /// Shutdown the server gracefully
    pub fn shutdown(&self) {
        self.server.shutdown();
    }
}

impl Drop for CaseshotTest {
    fn drop(&mut self) {
        self.server.shutdown();
    }
}

/// A request received by the mock upstream
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub api_key: Option<String>,
    pub body: Value,
}

impl RecordedRequest {
    /// Text of the first request part
    pub fn prompt(&self) -> &str {
        self.body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap_or_default()
    }

    /// Decoded inline image of the second request part
    pub fn image(&self) -> Vec<u8> {
        let data = self.body["contents"][0]["parts"][1]["inlineData"]["data"]
            .as_str()
            .unwrap_or_default();
        BASE64.decode(data).unwrap_or_default()
    }
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: Value,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Mock Gemini API answering every generateContent call with a fixed reply
pub struct MockGemini {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl MockGemini {
    /// Reply 200 with `body`
    pub async fn start(body: Value) -> Result<Self> {
        Self::start_with_status(StatusCode::OK, body).await
    }

    pub async fn start_with_status(status: StatusCode, body: Value) -> Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            status,
            body,
            requests: requests.clone(),
        };

        let router = Router::new()
            .route("/v1beta/models/{*model_action}", post(generate_content))
            .with_state(state);

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                eprintln!("Mock Gemini error: {}", e);
            }
        });

        Ok(Self {
            addr,
            requests,
            handle,
        })
    }

    /// Base URL to configure the server with
    pub fn base_url(&self) -> String {
        format!("http://{}/v1beta", self.addr)
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// A reply carrying one inline PNG after a text part
    pub fn image_reply(image: &[u8]) -> Value {
        serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "Here is the product shot."},
                        {"inlineData": {"mimeType": "image/png", "data": BASE64.encode(image)}}
                    ]
                },
                "finishReason": "STOP"
            }]
        })
    }
}

impl Drop for MockGemini {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn generate_content(
    State(state): State<MockState>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.requests.lock().push(RecordedRequest {
        path: uri.path().to_string(),
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    (state.status, Json(state.body.clone()))
}

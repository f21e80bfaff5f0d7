//! Server configuration
//!
//! Layered with figment: built-in defaults, then an optional TOML file,
//! then `CASESHOT_*` environment variables, then the conventional `PORT`
//! and `GOOGLE_API_KEY` variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

/// Prefix for crate-specific environment variables
pub const ENV_PREFIX: &str = "CASESHOT_";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("configuration file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("GOOGLE_API_KEY is not set; refusing to start without a model credential")]
    MissingApiKey,

    #[error("request_timeout_secs must be greater than zero")]
    ZeroTimeout,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interface to bind
    pub host: IpAddr,
    /// Port to bind
    pub port: u16,
    /// Gemini API key
    pub api_key: Option<SecretString>,
    /// Image-capable model used for every request
    pub model: String,
    /// Gemini REST base URL (without `/models/...`)
    pub api_base_url: String,
    /// Upper bound on a single model call
    pub request_timeout_secs: u64,
    /// Directory holding product reference images
    pub assets_dir: PathBuf,
    /// Front-end page served at `/`
    pub index_page: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 5000,
            api_key: None,
            model: "gemini-2.5-flash-image-preview".to_string(),
            api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            request_timeout_secs: 120,
            assets_dir: PathBuf::from("static"),
            index_page: PathBuf::from("templates/index.html"),
        }
    }
}

impl Config {
    /// Figment with every configuration source layered in order
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::new();
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file_exact(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Env::raw().only(&["PORT"]))
            .merge(Env::raw().only(&["GOOGLE_API_KEY"]).map(|_| "api_key".into()))
    }

    /// Load configuration from all sources
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_file {
            if !path.is_file() {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
        }
        Self::figment(config_file)
            .extract()
            .map_err(|e| ConfigError::Figment(Box::new(e)))
    }

    /// Reject configurations the binary must not start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.api_key {
            Some(key) if !key.expose_secret().trim().is_empty() => {}
            _ => return Err(ConfigError::MissingApiKey),
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Address the server listens on
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

//! Configuration for supporter-backend.
//!
//! Config is loaded once at startup from an optional TOML file and validated
//! before the server opens its port. Invalid configs are rejected with a clear
//! error rather than silently falling back to defaults. When no config file is
//! given, the built-in defaults below apply and the service runs zero-config.
//!
//! # Example
//! ```toml
//! [server]
//! port = 8000
//!
//! [cors]
//! allowed_origins = ["http://localhost:5173", "http://localhost:3000"]
//! ```
//!
//! The deployment environment name is separate from the file: it is read once
//! from the `APP_ENV` environment variable (see [`app_env`]) and surfaced in
//! the `/health` response.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Environment name used when `APP_ENV` is unset or empty.
pub const DEFAULT_ENV: &str = "local";

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub cors: CorsConfig,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config: Self = toml::from_str(&content).context("parsing config TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        // Every allowed origin must be usable as an Access-Control-Allow-Origin
        // header value, scheme included.
        for origin in &self.cors.allowed_origins {
            anyhow::ensure!(
                origin.starts_with("http://") || origin.starts_with("https://"),
                "CORS origin `{}` must include an http:// or https:// scheme",
                origin
            );
            anyhow::ensure!(
                !origin.ends_with('/'),
                "CORS origin `{}` must not have a trailing slash",
                origin
            );
            anyhow::ensure!(
                origin.parse::<axum::http::HeaderValue>().is_ok(),
                "CORS origin `{}` is not a valid header value",
                origin
            );
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Port the service binds on (default: 8000).
    #[serde(default = "defaults::port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: defaults::port() }
    }
}

/// Cross-origin policy.
///
/// Origins listed here receive permissive CORS headers with credentials
/// allowed. Everyone else gets no CORS headers at all and is left to the
/// browser's same-origin rejection.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Exact origins allowed to call the API from a browser.
    #[serde(default = "defaults::allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self { allowed_origins: defaults::allowed_origins() }
    }
}

/// Deployment environment name, read from `APP_ENV`.
///
/// Read once at startup and held in [`crate::api::AppState`] for the life of
/// the process — a later change to the variable has no effect.
pub fn app_env() -> String {
    env_or_default(std::env::var("APP_ENV").ok())
}

fn env_or_default(value: Option<String>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_ENV.to_string())
}

mod defaults {
    pub fn port() -> u16 {
        8000
    }

    /// The two local frontend dev servers (Vite and CRA/Next defaults).
    pub fn allowed_origins() -> Vec<String> {
        vec![
            "http://localhost:5173".to_string(),
            "http://localhost:3000".to_string(),
        ]
    }
}

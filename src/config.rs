//! Application configuration
//!
//! Centralized configuration for the backend client and audio capture.

use std::time::Duration;

/// Environment variable overriding the backend base URL
pub const BACKEND_URL_ENV: &str = "PACTUM_BACKEND_URL";

/// Default backend base URL (local development server)
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";

/// Configuration for the backend HTTP client
#[derive(Clone, Debug)]
pub struct BackendConfig {
    /// Base URL of the drafting service
    pub base_url: String,

    /// Connect timeout for all requests
    pub connect_timeout: Duration,

    /// Total request timeout
    pub request_timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl BackendConfig {
    /// Build a configuration, honouring the environment override
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            let trimmed = url.trim();
            if !trimmed.is_empty() {
                config.base_url = trimmed.trim_end_matches('/').to_string();
            }
        }
        config
    }

    /// Set the base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Configuration for the complete application
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Backend client configuration
    pub backend: BackendConfig,

    /// Whether to enable microphone capture
    pub enable_audio_input: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::from_env(),
            enable_audio_input: true,
        }
    }
}

impl AppConfig {
    /// Disable audio input (text-only mode)
    pub fn without_audio_input(mut self) -> Self {
        self.enable_audio_input = false;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.backend.base_url.is_empty() {
            return Err("Backend base URL is required".to_string());
        }
        if !self.backend.base_url.starts_with("http://")
            && !self.backend.base_url.starts_with("https://")
        {
            return Err(format!(
                "Backend base URL must be http(s): {}",
                self.backend.base_url
            ));
        }
        Ok(())
    }
}

use std::time::Duration;

use promogen_provider::http::{ProviderConfig, DEFAULT_TIMEOUT_SECS};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`).
    ///
    /// Text dispatch is awaited inline, so this must exceed the AI
    /// service timeout or text requests get cut off mid-generation.
    pub request_timeout_secs: u64,
    /// Base URL of the AI generation service.
    pub ai_service_url: String,
    /// Timeout for AI generation calls in seconds.
    pub ai_service_timeout_secs: u64,
    /// Publicly reachable base URL of this server, used to build the
    /// webhook callback URL handed to the provider.
    pub webhook_base_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `HOST`                    | `0.0.0.0`               |
    /// | `PORT`                    | `3000`                  |
    /// | `CORS_ORIGINS`            | `http://localhost:4200` |
    /// | `REQUEST_TIMEOUT_SECS`    | `60`                    |
    /// | `AI_SERVICE_URL`          | `http://localhost:8000` |
    /// | `AI_SERVICE_TIMEOUT_SECS` | `30`                    |
    /// | `WEBHOOK_BASE_URL`        | `http://localhost:3000` |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:4200".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let ai_service_url =
            std::env::var("AI_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000".into());

        let ai_service_timeout_secs: u64 = std::env::var("AI_SERVICE_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("AI_SERVICE_TIMEOUT_SECS must be a valid u64");

        let webhook_base_url =
            std::env::var("WEBHOOK_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            ai_service_url,
            ai_service_timeout_secs,
            webhook_base_url,
        }
    }

    /// Derive the provider client configuration, including the webhook
    /// callback URL the provider will invoke on image completion.
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            base_url: self.ai_service_url.clone(),
            webhook_url: format!(
                "{}/api/v1/campaigns/webhook",
                self.webhook_base_url.trim_end_matches('/')
            ),
            timeout: Duration::from_secs(self.ai_service_timeout_secs),
        }
    }
}

//! HTTP implementation of [`GenerationProvider`] using [`reqwest`].
//!
//! Endpoints:
//! - `POST {base}/generate-text`  — synchronous text generation.
//! - `POST {base}/generate-image` — queues an image job; the payload
//!   carries our webhook callback URL and the campaign id as `track_id`.
//! - `GET  {base}/health`         — liveness probe.

use std::time::Duration;

use async_trait::async_trait;
use promogen_core::campaign::GenerationParams;
use promogen_core::types::CampaignId;
use serde::Deserialize;

use crate::{GenerationProvider, ProviderError};

/// Default per-request timeout for generation calls.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Short timeout for the health probe.
pub const HEALTH_TIMEOUT_SECS: u64 = 5;

/// Connection settings for the AI generation service.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base HTTP URL, e.g. `http://localhost:8000`.
    pub base_url: String,
    /// Public URL of our webhook receiver, sent along with image
    /// submissions so the provider can call back.
    pub webhook_url: String,
    /// Timeout for text generation and image submission requests.
    pub timeout: Duration,
}

/// HTTP client for the generation service.
pub struct HttpProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

/// Response body of `POST /generate-text`.
#[derive(Debug, Deserialize)]
struct GenerateTextResponse {
    success: bool,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Response body of `POST /generate-image`.
///
/// `status` is `success` or `processing` when the job was accepted, and
/// `error` when it was rejected outright.
#[derive(Debug, Deserialize)]
struct SubmitImageResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

impl HttpProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Build the image submission payload: flattened generation
    /// parameters plus the callback URL and correlation token.
    fn image_payload(
        &self,
        prompt: &str,
        params: &GenerationParams,
        track_id: CampaignId,
    ) -> serde_json::Value {
        serde_json::json!({
            "prompt": prompt,
            "negative_prompt": params.negative_prompt,
            "width": params.width,
            "height": params.height,
            "samples": params.samples,
            "safety_checker": params.safety_checker,
            "seed": params.seed,
            "base64": params.base64,
            "enhance_prompt": params.enhance_prompt,
            "webhook": self.config.webhook_url,
            "track_id": track_id.to_string(),
        })
    }
}

/// Translate a transport-level reqwest failure into a typed error.
fn classify_transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Connection(err.to_string())
    }
}

/// Reject non-2xx responses, surfacing the status and body text.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(ProviderError::Api {
            status: status.as_u16(),
            message: body,
        });
    }
    Ok(response)
}

#[async_trait]
impl GenerationProvider for HttpProvider {
    async fn generate_text(&self, prompt: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(format!("{}/generate-text", self.config.base_url))
            .timeout(self.config.timeout)
            .json(&serde_json::json!({ "prompt": prompt }))
            .send()
            .await
            .map_err(classify_transport_error)?;

        let body: GenerateTextResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Connection(format!("Malformed response body: {e}")))?;

        if !body.success {
            return Err(ProviderError::Api {
                status: 200,
                message: body.error.unwrap_or_else(|| "AI service error".to_string()),
            });
        }

        body.text.ok_or(ProviderError::Api {
            status: 200,
            message: "AI service returned success with no text".to_string(),
        })
    }

    async fn submit_image(
        &self,
        prompt: &str,
        params: &GenerationParams,
        track_id: CampaignId,
    ) -> Result<(), ProviderError> {
        let payload = self.image_payload(prompt, params, track_id);

        let response = self
            .client
            .post(format!("{}/generate-image", self.config.base_url))
            .timeout(self.config.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let body: SubmitImageResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Connection(format!("Malformed response body: {e}")))?;

        match body.status.as_str() {
            "success" | "processing" => {
                tracing::debug!(%track_id, "Image generation accepted by provider");
                Ok(())
            }
            _ => Err(ProviderError::Api {
                status: 200,
                message: body
                    .message
                    .unwrap_or_else(|| format!("Submission rejected with status '{}'", body.status)),
            }),
        }
    }

    async fn health_check(&self) -> bool {
        let result = self
            .client
            .get(format!("{}/health", self.config.base_url))
            .timeout(Duration::from_secs(HEALTH_TIMEOUT_SECS))
            .send()
            .await;

        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!(error = %e, "AI service health check failed");
                false
            }
        }
    }
}

//! Client for the external AI generation service.
//!
//! The orchestrator only sees the [`GenerationProvider`] trait: one
//! synchronous text call, one acceptance-only image submission (the
//! artifact arrives later via webhook), and a best-effort health probe.
//! [`http::HttpProvider`] is the production implementation; tests swap in
//! a fake.

use async_trait::async_trait;
use promogen_core::campaign::GenerationParams;
use promogen_core::types::CampaignId;

pub mod http;

/// Errors from the generation provider, distinguished so the orchestrator
/// can record an accurate failure reason on the campaign.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The request exceeded its deadline.
    #[error("AI service timeout")]
    Timeout,

    /// The request never reached the service (connect, DNS, TLS).
    #[error("AI service unavailable: {0}")]
    Connection(String),

    /// The service responded with an error (non-2xx, or a reported
    /// generation failure in a 2xx body).
    #[error("AI service error ({status}): {message}")]
    Api {
        /// HTTP status code, or 200 for an in-body failure report.
        status: u16,
        /// Provider-supplied error message.
        message: String,
    },
}

/// Narrow interface to the generation provider.
///
/// Keeping every provider-specific request/response shape behind this
/// trait lets the orchestrator's state machine stay provider-agnostic and
/// testable with a fake client.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate text for a prompt. Blocks until the provider answers or
    /// the configured timeout fires.
    async fn generate_text(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Submit an asynchronous image generation. Success only confirms the
    /// job was accepted; completion arrives later on the webhook callback
    /// carrying `track_id`.
    async fn submit_image(
        &self,
        prompt: &str,
        params: &GenerationParams,
        track_id: CampaignId,
    ) -> Result<(), ProviderError>;

    /// Best-effort liveness probe with a short timeout. Never errors;
    /// returns `false` on any failure.
    async fn health_check(&self) -> bool;
}

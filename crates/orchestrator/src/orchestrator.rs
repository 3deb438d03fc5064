//! The campaign lifecycle state machine.
//!
//! Dispatch semantics per campaign type:
//! - `text`: the provider call is awaited inline. The campaign reaches a
//!   terminal state (`completed` or `failed`) before `submit` returns.
//! - `image`: the provider call only confirms acceptance; the campaign
//!   stays `processing` until the provider's webhook callback is applied
//!   via [`Orchestrator::reconcile`].
//!
//! Provider failures during dispatch are recorded on the campaign as its
//! failure reason, never surfaced as request failures: the caller reads
//! the returned record's `status` and `error_message`. Nothing is retried
//! automatically; retry is always an explicit caller action.

use std::sync::Arc;

use promogen_core::campaign::{
    self, CampaignStatus, CampaignType, GenerationOutcome, GenerationParams,
};
use promogen_core::error::CoreError;
use promogen_core::types::CampaignId;
use promogen_db::models::campaign::Campaign;
use promogen_db::repositories::CampaignRepo;
use promogen_db::DbPool;
use promogen_provider::GenerationProvider;

use crate::locks::LockTable;

/// Errors surfaced by orchestrator operations.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A validated-on-entry generation request.
#[derive(Debug)]
pub struct SubmitRequest {
    pub name: Option<String>,
    pub prompt: String,
    pub campaign_type: CampaignType,
    pub params: Option<GenerationParams>,
}

/// Orchestrates campaign lifecycles over the store and the provider.
///
/// All status/result mutation in the system goes through this type; the
/// per-id [`LockTable`] serializes racing operations (e.g. a retry and a
/// stale webhook) on the same campaign.
pub struct Orchestrator {
    pool: DbPool,
    provider: Arc<dyn GenerationProvider>,
    locks: LockTable,
}

impl Orchestrator {
    pub fn new(pool: DbPool, provider: Arc<dyn GenerationProvider>) -> Self {
        Self {
            pool,
            provider,
            locks: LockTable::new(),
        }
    }

    /// Reachability of the generation provider, for the health endpoint.
    pub async fn provider_healthy(&self) -> bool {
        self.provider.health_check().await
    }

    /// Validate and persist a new campaign, then dispatch it.
    ///
    /// Validation failures reject the request before anything is
    /// persisted. On success the returned record reflects how far
    /// dispatch got: terminal for text, `processing` for an accepted
    /// image submission.
    pub async fn submit(&self, request: SubmitRequest) -> Result<Campaign, OrchestratorError> {
        campaign::validate_submission(
            request.name.as_deref(),
            &request.prompt,
            request.campaign_type,
            request.params.as_ref(),
        )?;

        let params_json = request
            .params
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| CoreError::Internal(format!("Failed to encode generation params: {e}")))?;

        let id = CampaignId::new_v4();
        let _guard = self.locks.acquire(id).await;

        let created = CampaignRepo::create(
            &self.pool,
            id,
            request.name.as_deref(),
            request.prompt.trim(),
            request.campaign_type.as_str(),
            params_json.as_ref(),
        )
        .await?;

        tracing::info!(
            campaign_id = %id,
            campaign_type = %created.campaign_type,
            "Campaign created, dispatching",
        );

        self.dispatch(&created).await?;
        self.reload(id).await
    }

    /// Apply a provider webhook outcome to the campaign identified by the
    /// correlation token.
    ///
    /// Unknown tokens fail with `NotFound` and mutate nothing. Campaigns
    /// already in a terminal state are left untouched — webhook delivery
    /// is at-least-once, so duplicates must be accepted silently.
    pub async fn reconcile(
        &self,
        track_id: CampaignId,
        outcome: GenerationOutcome,
    ) -> Result<Campaign, OrchestratorError> {
        let _guard = self.locks.acquire(track_id).await;

        let current = CampaignRepo::find_by_id(&self.pool, track_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Campaign",
                id: track_id,
            })?;

        if current.status.is_terminal() {
            tracing::debug!(
                campaign_id = %track_id,
                status = %current.status,
                "Duplicate webhook for terminal campaign, ignoring",
            );
            return Ok(current);
        }

        if current.status != CampaignStatus::Processing {
            // A callback for a campaign that is not awaiting one (e.g. a
            // stale delivery landing between retry reset and re-dispatch).
            tracing::warn!(
                campaign_id = %track_id,
                status = %current.status,
                "Webhook for campaign not in processing state, ignoring",
            );
            return Ok(current);
        }

        match outcome {
            GenerationOutcome::Success { output } => {
                let url = output.first().ok_or_else(|| {
                    CoreError::Internal(
                        "Success outcome reached reconcile without output references".into(),
                    )
                })?;
                CampaignRepo::complete_with_url(&self.pool, track_id, url).await?;
                tracing::info!(campaign_id = %track_id, content_url = %url, "Campaign completed");
            }
            GenerationOutcome::Error { message } => {
                CampaignRepo::mark_failed(&self.pool, track_id, &message).await?;
                tracing::warn!(campaign_id = %track_id, reason = %message, "Campaign failed");
            }
        }

        self.reload(track_id).await
    }

    /// Reset a failed campaign and re-dispatch it with its original
    /// prompt, type, and persisted generation parameters.
    pub async fn retry(&self, id: CampaignId) -> Result<Campaign, OrchestratorError> {
        let _guard = self.locks.acquire(id).await;

        let current = CampaignRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Campaign",
                id,
            })?;

        if current.status != CampaignStatus::Failed {
            return Err(CoreError::InvalidState(format!(
                "Only failed campaigns can be retried; campaign {id} is {}",
                current.status
            ))
            .into());
        }

        let reset = CampaignRepo::reset_for_retry(&self.pool, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Campaign",
                id,
            })?;

        tracing::info!(campaign_id = %id, "Retrying failed campaign");

        self.dispatch(&reset).await?;
        self.reload(id).await
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Run the type-specific dispatch for a `pending` campaign.
    ///
    /// Callers must hold the campaign's lock.
    async fn dispatch(&self, campaign: &Campaign) -> Result<(), OrchestratorError> {
        CampaignRepo::mark_processing(&self.pool, campaign.id).await?;

        match campaign.campaign_type {
            CampaignType::Text => self.dispatch_text(campaign).await,
            CampaignType::Image => self.dispatch_image(campaign).await,
        }
    }

    async fn dispatch_text(&self, campaign: &Campaign) -> Result<(), OrchestratorError> {
        match self.provider.generate_text(&campaign.prompt).await {
            Ok(text) => {
                CampaignRepo::complete_with_text(&self.pool, campaign.id, &text).await?;
                tracing::info!(campaign_id = %campaign.id, "Text generation completed");
            }
            Err(e) => {
                let reason = e.to_string();
                CampaignRepo::mark_failed(&self.pool, campaign.id, &reason).await?;
                tracing::warn!(campaign_id = %campaign.id, reason = %reason, "Text generation failed");
            }
        }
        Ok(())
    }

    async fn dispatch_image(&self, campaign: &Campaign) -> Result<(), OrchestratorError> {
        let params = campaign.generation_params()?.unwrap_or_default();

        match self
            .provider
            .submit_image(&campaign.prompt, &params, campaign.id)
            .await
        {
            Ok(()) => {
                // Accepted: the campaign stays `processing` until the
                // provider's webhook callback arrives.
                tracing::info!(campaign_id = %campaign.id, "Image generation submitted");
            }
            Err(e) => {
                let reason = e.to_string();
                CampaignRepo::mark_failed(&self.pool, campaign.id, &reason).await?;
                tracing::warn!(campaign_id = %campaign.id, reason = %reason, "Image submission rejected");
            }
        }
        Ok(())
    }

    /// Re-read a campaign after mutation so callers get the stored state,
    /// not an in-memory guess.
    async fn reload(&self, id: CampaignId) -> Result<Campaign, OrchestratorError> {
        CampaignRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| {
                CoreError::Internal(format!("Campaign {id} disappeared during operation")).into()
            })
    }
}

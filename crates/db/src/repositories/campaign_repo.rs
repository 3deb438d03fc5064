//! Repository for the `campaigns` table.
//!
//! Status strings come from `CampaignStatus` in `promogen-core`; no raw
//! status literals appear in queries. Lifecycle mutations that touch both
//! the campaign row and its result row run in a transaction so the
//! status/content pair is never observable half-written.

use promogen_core::campaign::CampaignStatus;
use promogen_core::types::CampaignId;
use sqlx::PgPool;

use crate::models::campaign::{Campaign, CampaignListQuery, CampaignPage, UpdateCampaign};

/// Column list for `campaigns` queries.
const COLUMNS: &str = "\
    id, name, prompt, campaign_type, status, error_message, \
    generation_params, created_at, updated_at";

/// Maximum page size for campaign listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for campaign listing.
const DEFAULT_LIMIT: i64 = 10;

/// Provides CRUD and lifecycle operations for campaigns.
pub struct CampaignRepo;

impl CampaignRepo {
    /// Insert a new campaign in `pending` status together with its empty
    /// result row. Both inserts run in one transaction so the 1:1
    /// campaign/result invariant holds from creation onward.
    pub async fn create(
        pool: &PgPool,
        id: CampaignId,
        name: Option<&str>,
        prompt: &str,
        campaign_type: &str,
        generation_params: Option<&serde_json::Value>,
    ) -> Result<Campaign, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO campaigns (id, name, prompt, campaign_type, status, generation_params) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        let campaign = sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(name)
            .bind(prompt)
            .bind(campaign_type)
            .bind(CampaignStatus::Pending.as_str())
            .bind(generation_params)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO results (campaign_id) VALUES ($1)")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(campaign)
    }

    /// Find a campaign by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: CampaignId,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List campaigns with pagination and sorting, plus the total count.
    ///
    /// `page` is 1-based; `limit` defaults to 10 and is capped at 100.
    /// Sort column and direction come from whitelisted enums, never from
    /// raw query strings.
    pub async fn list(
        pool: &PgPool,
        params: &CampaignListQuery,
    ) -> Result<CampaignPage, sqlx::Error> {
        let page = params.page.unwrap_or(1).max(1);
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = (page - 1) * limit;
        let sort_by = params.sort_by.unwrap_or_default();
        let direction = params.direction.unwrap_or_default();

        let query = format!(
            "SELECT {COLUMNS} FROM campaigns \
             ORDER BY {} {} \
             LIMIT $1 OFFSET $2",
            sort_by.as_column(),
            direction.as_sql(),
        );
        let items = sqlx::query_as::<_, Campaign>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM campaigns")
            .fetch_one(pool)
            .await?;

        Ok(CampaignPage {
            items,
            total,
            page,
            limit,
        })
    }

    /// List all campaigns currently in the given status, newest first.
    pub async fn list_by_status(
        pool: &PgPool,
        status: CampaignStatus,
    ) -> Result<Vec<Campaign>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaigns \
             WHERE status = $1 \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(status.as_str())
            .fetch_all(pool)
            .await
    }

    /// Update name and/or prompt. Returns `None` when the id is unknown.
    pub async fn update(
        pool: &PgPool,
        id: CampaignId,
        input: &UpdateCampaign,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!(
            "UPDATE campaigns \
             SET name = COALESCE($2, name), \
                 prompt = COALESCE($3, prompt), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.prompt.as_deref())
            .fetch_optional(pool)
            .await
    }

    /// Set the status directly. Returns `None` when the id is unknown.
    ///
    /// This is the administrative path; the orchestrator's lifecycle
    /// methods below enforce the state machine.
    pub async fn update_status(
        pool: &PgPool,
        id: CampaignId,
        status: CampaignStatus,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!(
            "UPDATE campaigns \
             SET status = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Move a pending campaign to `processing` before dispatch.
    pub async fn mark_processing(pool: &PgPool, id: CampaignId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE campaigns SET status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(CampaignStatus::Processing.as_str())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Complete a text generation: write the result text and advance the
    /// campaign to `completed` in one transaction.
    pub async fn complete_with_text(
        pool: &PgPool,
        id: CampaignId,
        text: &str,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query(
            "UPDATE results SET content_text = $2, content_url = NULL, updated_at = NOW() \
             WHERE campaign_id = $1",
        )
        .bind(id)
        .bind(text)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "UPDATE campaigns SET status = $2, error_message = NULL, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(CampaignStatus::Completed.as_str())
        .execute(&mut *tx)
        .await?;
        tx.commit().await
    }

    /// Complete an image generation: write the artifact reference and
    /// advance the campaign to `completed` in one transaction.
    pub async fn complete_with_url(
        pool: &PgPool,
        id: CampaignId,
        url: &str,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query(
            "UPDATE results SET content_url = $2, content_text = NULL, updated_at = NOW() \
             WHERE campaign_id = $1",
        )
        .bind(id)
        .bind(url)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "UPDATE campaigns SET status = $2, error_message = NULL, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(CampaignStatus::Completed.as_str())
        .execute(&mut *tx)
        .await?;
        tx.commit().await
    }

    /// Mark a campaign as failed, recording the failure reason.
    ///
    /// The reason is always persisted; a failed campaign with no recorded
    /// cause is not diagnosable or retryable in good conscience.
    pub async fn mark_failed(
        pool: &PgPool,
        id: CampaignId,
        reason: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE campaigns SET status = $2, error_message = $3, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(CampaignStatus::Failed.as_str())
        .bind(reason)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Reset a failed campaign for retry: status back to `pending`, failure
    /// reason cleared, stale result content wiped. One transaction so a
    /// concurrent reader never sees a pending campaign with leftovers.
    pub async fn reset_for_retry(
        pool: &PgPool,
        id: CampaignId,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query(
            "UPDATE results SET content_url = NULL, content_text = NULL, updated_at = NOW() \
             WHERE campaign_id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        let query = format!(
            "UPDATE campaigns \
             SET status = $2, error_message = NULL, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let campaign = sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(CampaignStatus::Pending.as_str())
            .fetch_optional(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(campaign)
    }

    /// Delete a campaign. The result row goes with it via `ON DELETE
    /// CASCADE`. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: CampaignId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Repository for the `results` table.
//!
//! Result content is only ever written through `CampaignRepo`'s
//! transactional lifecycle methods; this repo is the read side.

use promogen_core::types::CampaignId;
use sqlx::PgPool;

use crate::models::result::GenerationResult;

const COLUMNS: &str = "campaign_id, content_url, content_text, created_at, updated_at";

/// Read access to campaign results.
pub struct ResultRepo;

impl ResultRepo {
    /// Find the result row for a campaign.
    ///
    /// `None` here means the campaign itself does not exist -- every live
    /// campaign has a result row from creation.
    pub async fn find_by_campaign_id(
        pool: &PgPool,
        campaign_id: CampaignId,
    ) -> Result<Option<GenerationResult>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM results WHERE campaign_id = $1");
        sqlx::query_as::<_, GenerationResult>(&query)
            .bind(campaign_id)
            .fetch_optional(pool)
            .await
    }
}

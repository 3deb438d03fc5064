//! Result entity model.

use promogen_core::types::{CampaignId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `results` table.
///
/// Exactly one exists per campaign; `content_url` and `content_text` are
/// each written by exactly one dispatch path, so at most one of them is
/// set for any completed generation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GenerationResult {
    pub campaign_id: CampaignId,
    pub content_url: Option<String>,
    pub content_text: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

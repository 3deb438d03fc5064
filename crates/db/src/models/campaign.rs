//! Campaign entity model and request/query DTOs.

use promogen_core::campaign::{CampaignStatus, CampaignType, GenerationParams};
use promogen_core::error::CoreError;
use promogen_core::types::{CampaignId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::result::GenerationResult;

/// A row from the `campaigns` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: Option<String>,
    pub prompt: String,
    #[sqlx(try_from = "String")]
    #[serde(rename = "type")]
    pub campaign_type: CampaignType,
    #[sqlx(try_from = "String")]
    pub status: CampaignStatus,
    pub error_message: Option<String>,
    pub generation_params: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Campaign {
    /// Decode the persisted generation parameters, if any.
    ///
    /// Parameters are validated before persistence, so a decode failure
    /// here means the stored JSON was corrupted out of band.
    pub fn generation_params(&self) -> Result<Option<GenerationParams>, CoreError> {
        self.generation_params
            .as_ref()
            .map(|value| {
                serde_json::from_value(value.clone()).map_err(|e| {
                    CoreError::Internal(format!(
                        "Stored generation_params for campaign {} are not decodable: {e}",
                        self.id
                    ))
                })
            })
            .transpose()
    }
}

/// A campaign joined with its result, as returned by `GET /campaigns/{id}`.
#[derive(Debug, Serialize)]
pub struct CampaignWithResult {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub result: GenerationResult,
}

/// DTO for `POST /api/v1/campaigns`.
///
/// Image generation parameters arrive flattened alongside the campaign
/// fields, matching the create form payload.
#[derive(Debug, Deserialize)]
pub struct CreateCampaign {
    pub name: Option<String>,
    pub prompt: String,
    #[serde(rename = "type")]
    pub campaign_type: CampaignType,
    #[serde(flatten)]
    pub params: GenerationParams,
}

/// DTO for `PATCH /api/v1/campaigns/{id}` (administrative correction).
#[derive(Debug, Deserialize)]
pub struct UpdateCampaign {
    pub name: Option<String>,
    pub prompt: Option<String>,
}

/// DTO for `PATCH /api/v1/campaigns/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateCampaignStatus {
    pub status: CampaignStatus,
}

/// Sort keys accepted by the campaign listing endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    CreatedAt,
    UpdatedAt,
    Name,
}

impl SortBy {
    /// Whitelisted column name for ORDER BY interpolation.
    pub fn as_column(self) -> &'static str {
        match self {
            SortBy::CreatedAt => "created_at",
            SortBy::UpdatedAt => "updated_at",
            SortBy::Name => "name",
        }
    }
}

/// Sort direction for listing endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Query parameters for `GET /api/v1/campaigns`.
#[derive(Debug, Default, Deserialize)]
pub struct CampaignListQuery {
    /// 1-based page number. Defaults to 1.
    pub page: Option<i64>,
    /// Page size. Defaults to 10, capped at 100.
    pub limit: Option<i64>,
    pub sort_by: Option<SortBy>,
    pub direction: Option<SortDirection>,
}

/// A page of campaigns plus the total row count.
#[derive(Debug, Serialize)]
pub struct CampaignPage {
    pub items: Vec<Campaign>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

//! Campaign CRUD and lifecycle handlers.
//!
//! Routes:
//! - `POST   /campaigns`               — create and dispatch
//! - `GET    /campaigns`               — paginated listing
//! - `GET    /campaigns/status/{status}` — filter by status
//! - `GET    /campaigns/{id}`          — full record including result
//! - `PATCH  /campaigns/{id}`          — administrative field update
//! - `PATCH  /campaigns/{id}/status`   — direct status mutation
//! - `DELETE /campaigns/{id}`          — delete (cascades to result)
//! - `POST   /campaigns/{id}/retry`    — retry a failed campaign

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use promogen_core::campaign::{self, CampaignStatus};
use promogen_core::error::CoreError;
use promogen_core::types::CampaignId;
use promogen_db::models::campaign::{
    CampaignListQuery, CampaignWithResult, CreateCampaign, UpdateCampaign, UpdateCampaignStatus,
};
use promogen_db::repositories::{CampaignRepo, ResultRepo};
use promogen_orchestrator::SubmitRequest;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/campaigns", post(create_campaign).get(list_campaigns))
        .route("/campaigns/status/{status}", get(get_by_status))
        .route(
            "/campaigns/{id}",
            get(get_campaign)
                .patch(update_campaign)
                .delete(delete_campaign),
        )
        .route("/campaigns/{id}/status", patch(update_status))
        .route("/campaigns/{id}/retry", post(retry_campaign))
}

/// POST /api/v1/campaigns
///
/// Validates the submission, persists the campaign with its empty result,
/// and dispatches generation. The returned record reflects how far
/// dispatch got: terminal for text, `processing` for accepted images.
async fn create_campaign(
    State(state): State<AppState>,
    Json(input): Json<CreateCampaign>,
) -> AppResult<impl IntoResponse> {
    let name = input
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    let params = if input.params.is_empty() {
        None
    } else {
        Some(input.params)
    };

    let created = state
        .orchestrator
        .submit(SubmitRequest {
            name,
            prompt: input.prompt,
            campaign_type: input.campaign_type,
            params,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/campaigns
async fn list_campaigns(
    State(state): State<AppState>,
    Query(params): Query<CampaignListQuery>,
) -> AppResult<impl IntoResponse> {
    let page = CampaignRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/campaigns/status/{status}
async fn get_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> AppResult<impl IntoResponse> {
    let status: CampaignStatus = status.parse().map_err(AppError::Core)?;
    let campaigns = CampaignRepo::list_by_status(&state.pool, status).await?;
    Ok(Json(DataResponse { data: campaigns }))
}

/// GET /api/v1/campaigns/{id}
///
/// Returns the campaign together with its result row. Not-found is a
/// distinct outcome from found-with-empty-result: the latter returns 200
/// with `content_url`/`content_text` both null.
async fn get_campaign(
    State(state): State<AppState>,
    Path(id): Path<CampaignId>,
) -> AppResult<impl IntoResponse> {
    let campaign = CampaignRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id,
        }))?;

    let result = ResultRepo::find_by_campaign_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::InternalError(format!("Campaign {id} has no result row"))
        })?;

    Ok(Json(DataResponse {
        data: CampaignWithResult { campaign, result },
    }))
}

/// PATCH /api/v1/campaigns/{id}
async fn update_campaign(
    State(state): State<AppState>,
    Path(id): Path<CampaignId>,
    Json(input): Json<UpdateCampaign>,
) -> AppResult<impl IntoResponse> {
    campaign::validate_name(input.name.as_deref()).map_err(AppError::Core)?;
    if let Some(ref prompt) = input.prompt {
        campaign::validate_prompt(prompt).map_err(AppError::Core)?;
    }

    let updated = CampaignRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id,
        }))?;

    tracing::info!(campaign_id = %id, "Campaign updated");

    Ok(Json(DataResponse { data: updated }))
}

/// PATCH /api/v1/campaigns/{id}/status
///
/// Direct status mutation for administrative correction; does not go
/// through dispatch. The lifecycle transition rules still apply, so a
/// terminal campaign cannot be pushed back to `pending` this way.
async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<CampaignId>,
    Json(input): Json<UpdateCampaignStatus>,
) -> AppResult<impl IntoResponse> {
    let current = CampaignRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id,
        }))?;

    if !current.status.can_transition_to(input.status) {
        return Err(AppError::Core(CoreError::InvalidState(format!(
            "Cannot transition campaign {id} from {} to {}",
            current.status, input.status
        ))));
    }

    let updated = CampaignRepo::update_status(&state.pool, id, input.status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id,
        }))?;

    tracing::info!(campaign_id = %id, status = %input.status, "Campaign status updated");

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/campaigns/{id}
async fn delete_campaign(
    State(state): State<AppState>,
    Path(id): Path<CampaignId>,
) -> AppResult<impl IntoResponse> {
    let deleted = CampaignRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id,
        }));
    }

    tracing::info!(campaign_id = %id, "Campaign deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/campaigns/{id}/retry
///
/// Only valid on `failed` campaigns; re-runs dispatch with the original
/// prompt, type, and persisted generation parameters.
async fn retry_campaign(
    State(state): State<AppState>,
    Path(id): Path<CampaignId>,
) -> AppResult<impl IntoResponse> {
    let campaign = state.orchestrator.retry(id).await?;
    Ok(Json(DataResponse { data: campaign }))
}

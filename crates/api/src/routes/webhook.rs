//! Webhook receiver for asynchronous image generation callbacks.
//!
//! The AI service calls `POST /campaigns/webhook` when an image job it
//! accepted earlier finishes. The payload carries the correlation token
//! we handed it at submission time (the campaign id) plus either the
//! generated output URLs or an error message.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use promogen_core::campaign::GenerationOutcome;
use promogen_core::error::CoreError;
use promogen_core::types::CampaignId;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Callback payload from the AI service.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub track_id: String,
    pub status: String,
    #[serde(default)]
    pub output: Option<Vec<String>>,
    #[serde(default)]
    pub message: Option<String>,
}

impl WebhookPayload {
    /// Validates the payload and converts it into a campaign id plus
    /// generation outcome. All failures are validation errors (400); a
    /// malformed callback must never be mistaken for a server fault.
    fn into_outcome(self) -> Result<(CampaignId, GenerationOutcome), CoreError> {
        let track_id = self.track_id.trim();
        if track_id.is_empty() {
            return Err(CoreError::Validation("track_id must not be empty".into()));
        }
        let id: CampaignId = track_id
            .parse()
            .map_err(|_| CoreError::Validation(format!("Invalid track_id: {track_id}")))?;

        let outcome = match self.status.as_str() {
            "success" => {
                let output = self.output.unwrap_or_default();
                if output.is_empty() {
                    return Err(CoreError::Validation(
                        "Success callback must include at least one output".into(),
                    ));
                }
                GenerationOutcome::Success { output }
            }
            "error" => GenerationOutcome::Error {
                message: self
                    .message
                    .unwrap_or_else(|| "Generation failed".to_string()),
            },
            other => {
                return Err(CoreError::Validation(format!(
                    "Unknown webhook status: {other}"
                )))
            }
        };

        Ok((id, outcome))
    }
}

/// POST /api/v1/campaigns/webhook
///
/// Validates the callback at the boundary, then hands the outcome to the
/// orchestrator. Replays against campaigns already in a terminal state
/// are acknowledged without mutation.
async fn receive_webhook(
    State(state): State<AppState>,
    Json(payload): Json<WebhookPayload>,
) -> AppResult<impl IntoResponse> {
    tracing::info!(
        track_id = %payload.track_id,
        status = %payload.status,
        "Webhook received"
    );

    let (id, outcome) = payload.into_outcome().map_err(AppError::Core)?;
    let campaign = state.orchestrator.reconcile(id, outcome).await?;

    Ok(Json(DataResponse { data: campaign }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/campaigns/webhook", post(receive_webhook))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn payload(track_id: &str, status: &str) -> WebhookPayload {
        WebhookPayload {
            track_id: track_id.to_string(),
            status: status.to_string(),
            output: None,
            message: None,
        }
    }

    #[test]
    fn success_payload_converts_to_outcome() {
        let id = uuid::Uuid::new_v4();
        let mut p = payload(&id.to_string(), "success");
        p.output = Some(vec!["https://cdn.example.com/img.png".to_string()]);

        let (parsed, outcome) = p.into_outcome().unwrap();
        assert_eq!(parsed, id);
        assert_matches!(outcome, GenerationOutcome::Success { output } if output.len() == 1);
    }

    #[test]
    fn error_payload_defaults_message() {
        let id = uuid::Uuid::new_v4();
        let (_, outcome) = payload(&id.to_string(), "error").into_outcome().unwrap();
        assert_matches!(outcome, GenerationOutcome::Error { message } if message == "Generation failed");
    }

    #[test]
    fn empty_track_id_is_rejected() {
        let err = payload("  ", "success").into_outcome().unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn non_uuid_track_id_is_rejected() {
        let err = payload("not-a-uuid", "error").into_outcome().unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn success_without_output_is_rejected() {
        let id = uuid::Uuid::new_v4();
        let err = payload(&id.to_string(), "success").into_outcome().unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let id = uuid::Uuid::new_v4();
        let err = payload(&id.to_string(), "pending").into_outcome().unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }
}
